// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command-line parsing.

use crate::modal::InputEvent;
use animease_curves::SolveMode;
use std::path::PathBuf;

/// Usage text
pub const USAGE: &str = "\
usage: animease [--settings <file>] [--output <file>] [--json] <scene.ron> <command> [args]

commands:
  spline                         set bezier interpolation on every key
  stepped                        set constant interpolation on every key
  endframe                       copy the first key to frame_end + 1
  splice [--frame N] [--solve free|auto]
                                 splice out the keys on a frame
  gesture <EVENT>...             feed events (G, R, S, LEFTMOUSE, ESC, ...) to the splice gesture
  paths                          print motion paths over the playback range";

/// Command to run
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Bezier interpolation on every key
    Spline,
    /// Constant interpolation on every key
    Stepped,
    /// Loopable end frame
    EndFrame,
    /// Splice a frame
    Splice {
        /// Frame override (defaults to the scene's current frame)
        frame: Option<i32>,
        /// Solver override
        solve: Option<SolveMode>,
    },
    /// Modal gesture fed from a list of events
    Gesture(Vec<InputEvent>),
    /// Print motion paths
    Paths,
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Scene document
    pub scene: PathBuf,
    /// Settings file override
    pub settings: Option<PathBuf>,
    /// Where to write the edited scene (defaults to `scene`)
    pub output: Option<PathBuf>,
    /// Print reports as JSON
    pub json: bool,
    /// Command to run
    pub command: Command,
}

/// Command-line errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CliError {
    /// `--help` was requested
    #[error("{}", USAGE)]
    Help,

    /// A flag is missing its value
    #[error("missing value for {0}")]
    MissingValue(String),

    /// A flag value could not be parsed
    #[error("invalid value '{value}' for {flag}")]
    InvalidValue {
        /// Flag name
        flag: String,
        /// Offending value
        value: String,
    },

    /// Unknown flag or command
    #[error("unknown argument '{0}'")]
    Unknown(String),

    /// Scene path or command missing
    #[error("missing {0}")]
    Missing(&'static str),
}

impl Invocation {
    /// Parse arguments (without the program name)
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::<String>::into);
        let mut settings = None;
        let mut output = None;
        let mut json = false;
        let mut positional = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Err(CliError::Help),
                "--settings" => settings = Some(PathBuf::from(value(&mut args, &arg)?)),
                "--output" | "-o" => output = Some(PathBuf::from(value(&mut args, &arg)?)),
                "--json" => json = true,
                _ => {
                    positional.push(arg);
                    // Everything after the command belongs to it
                    if positional.len() == 2 {
                        positional.extend(args.by_ref());
                    }
                }
            }
        }

        let mut positional = positional.into_iter();
        let scene = positional.next().ok_or(CliError::Missing("scene path"))?;
        let name = positional.next().ok_or(CliError::Missing("command"))?;
        let command = parse_command(&name, positional.collect())?;

        Ok(Self {
            scene: PathBuf::from(scene),
            settings,
            output,
            json,
            command,
        })
    }

    /// Path the edited scene is written to
    pub fn output_path(&self) -> &PathBuf {
        self.output.as_ref().unwrap_or(&self.scene)
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, CliError> {
    args.next()
        .ok_or_else(|| CliError::MissingValue(flag.to_string()))
}

fn parse_command(name: &str, rest: Vec<String>) -> Result<Command, CliError> {
    match name {
        "spline" => no_args(rest, Command::Spline),
        "stepped" => no_args(rest, Command::Stepped),
        "endframe" => no_args(rest, Command::EndFrame),
        "paths" => no_args(rest, Command::Paths),
        "gesture" => {
            if rest.is_empty() {
                return Err(CliError::Missing("gesture events"));
            }
            let events = rest
                .iter()
                .map(|s| match s.parse::<InputEvent>() {
                    Ok(event) => event,
                    Err(never) => match never {},
                })
                .collect();
            Ok(Command::Gesture(events))
        }
        "splice" => {
            let mut frame = None;
            let mut solve = None;
            let mut rest = rest.into_iter();
            while let Some(arg) = rest.next() {
                match arg.as_str() {
                    "--frame" => {
                        let raw = value(&mut rest, &arg)?;
                        frame = Some(raw.parse().map_err(|_| CliError::InvalidValue {
                            flag: arg.clone(),
                            value: raw.clone(),
                        })?);
                    }
                    "--solve" => {
                        let raw = value(&mut rest, &arg)?;
                        solve = Some(match raw.to_ascii_lowercase().as_str() {
                            "free" => SolveMode::Free,
                            "auto" => SolveMode::Auto,
                            _ => {
                                return Err(CliError::InvalidValue {
                                    flag: arg.clone(),
                                    value: raw,
                                })
                            }
                        });
                    }
                    _ => return Err(CliError::Unknown(arg)),
                }
            }
            Ok(Command::Splice { frame, solve })
        }
        _ => Err(CliError::Unknown(name.to_string())),
    }
}

fn no_args(rest: Vec<String>, command: Command) -> Result<Command, CliError> {
    match rest.into_iter().next() {
        Some(extra) => Err(CliError::Unknown(extra)),
        None => Ok(command),
    }
}
