// SPDX-License-Identifier: MIT OR Apache-2.0
//! Application driver: load a scene, run one command, write results.

use crate::cli::{CliError, Command, Invocation};
use crate::modal::{InputEvent, SplineModeGesture};
use crate::operators::{
    editable_rig, loop_range, Operator, OperatorContext, OperatorError, OperatorOutcome,
    OperatorReport, SplineMode, ToggleInterpolation, UpdateEndFrame,
};
use crate::scene::{Scene, SceneError};
use crate::settings::{Settings, SettingsError, SETTINGS_FILE_NAME};
use animease_curves::MotionPath;
use std::path::{Path, PathBuf};

/// Application errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad command line
    #[error(transparent)]
    Cli(#[from] CliError),

    /// Settings could not be read or written
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Scene could not be read or written
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Operator refused to run or failed
    #[error(transparent)]
    Operator(#[from] OperatorError),

    /// JSON output failed
    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a command produced
#[derive(Debug)]
pub enum CommandOutput {
    /// An operator ran
    Report(OperatorReport),
    /// Motion paths were sampled
    Paths(MotionPath),
}

/// The AnimEase application
pub struct AnimEaseApp {
    scene: Scene,
    settings: Settings,
    settings_path: PathBuf,
}

impl AnimEaseApp {
    /// Load the scene and settings named by the invocation
    pub fn load(invocation: &Invocation) -> Result<Self, AppError> {
        let settings_path = invocation
            .settings
            .clone()
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE_NAME));
        let settings = match &invocation.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::load_or_default(&settings_path)?,
        };
        let scene = Scene::load(&invocation.scene)?;
        tracing::debug!("Loaded scene {:?}", invocation.scene);

        Ok(Self::new(scene, settings, settings_path))
    }

    /// Create an app over an in-memory scene
    pub fn new(scene: Scene, settings: Settings, settings_path: PathBuf) -> Self {
        Self {
            scene,
            settings,
            settings_path,
        }
    }

    /// Current scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one command against the loaded scene
    pub fn execute(&mut self, command: &Command) -> Result<CommandOutput, AppError> {
        match command {
            Command::Spline => self.run_operator(&ToggleInterpolation::spline()),
            Command::Stepped => self.run_operator(&ToggleInterpolation::stepped()),
            Command::EndFrame => self.run_operator(&UpdateEndFrame),
            Command::Splice { frame, solve } => {
                if let Some(frame) = frame {
                    self.scene.frame_current = *frame;
                }
                let saved = self.settings.solve_mode;
                if let Some(solve) = solve {
                    self.settings.solve_mode = *solve;
                }
                let result = self.run_operator(&SplineMode);
                self.settings.solve_mode = saved;
                result
            }
            Command::Gesture(events) => self.run_gesture(events),
            Command::Paths => {
                let rig = editable_rig(&self.scene)?;
                let (start, end) = loop_range(&self.scene)?;
                let path = rig
                    .action
                    .as_ref()
                    .map(|action| MotionPath::sample(action, start, end))
                    .unwrap_or_default();
                Ok(CommandOutput::Paths(path))
            }
        }
    }

    fn run_operator(&mut self, operator: &dyn Operator) -> Result<CommandOutput, AppError> {
        tracing::info!("Running {} ({})", operator.label(), operator.id());
        let mut ctx = OperatorContext::new(&mut self.scene, &mut self.settings);
        Ok(CommandOutput::Report(operator.run(&mut ctx)?))
    }

    fn run_gesture(&mut self, events: &[InputEvent]) -> Result<CommandOutput, AppError> {
        let mut gesture = SplineModeGesture::invoke(&self.settings.keymap);
        tracing::debug!("Gesture in {} mode", self.settings.anim_mode.display_name());
        let mut ctx = OperatorContext::new(&mut self.scene, &mut self.settings);

        for event in events {
            tracing::debug!("Event {event}");
            if gesture.modal(event, &mut ctx)? != OperatorOutcome::RunningModal {
                break;
            }
        }

        let report = gesture.take_report().unwrap_or_else(|| {
            tracing::warn!("Gesture still running after the last event, cancelling");
            OperatorReport::cancelled(SplineMode.id())
        });
        Ok(CommandOutput::Report(report))
    }

    /// Write the scene and any changed settings
    pub fn save(&self, scene_path: &Path, original_settings: &Settings) -> Result<(), AppError> {
        self.scene.save(scene_path)?;
        tracing::info!("Saved scene to {:?}", scene_path);

        if &self.settings != original_settings {
            self.settings.save(&self.settings_path)?;
            tracing::info!("Saved settings to {:?}", self.settings_path);
        }
        Ok(())
    }
}

/// Run a parsed invocation end to end
pub fn run(invocation: &Invocation) -> Result<(), AppError> {
    let mut app = AnimEaseApp::load(invocation)?;
    let original_scene = app.scene().clone();
    let original_settings = app.settings().clone();

    let output = app.execute(&invocation.command)?;

    match &output {
        CommandOutput::Report(report) if invocation.json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        CommandOutput::Paths(path) if invocation.json => {
            println!("{}", serde_json::to_string_pretty(path)?);
        }
        CommandOutput::Report(report) => {
            println!("{}: {:?}", report.operator, report.outcome);
        }
        CommandOutput::Paths(path) => print_paths(path),
    }

    if app.scene() != &original_scene || app.settings() != &original_settings {
        app.save(invocation.output_path(), &original_settings)?;
    }
    Ok(())
}

fn print_paths(path: &MotionPath) {
    for channel in &path.channels {
        let samples: Vec<String> = channel.samples.iter().map(|v| format!("{v:.3}")).collect();
        println!(
            "{}[{}] {}..{}: {}",
            channel.data_path,
            channel.array_index,
            path.start,
            path.end,
            samples.join(" ")
        );
    }
}
