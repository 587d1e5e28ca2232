// SPDX-License-Identifier: MIT OR Apache-2.0
//! AnimEase operators.
//!
//! Each operator checks the scene with [`Operator::poll`], then edits the
//! active rig's action through the curve core and returns a report.

use crate::scene::{ObjectKind, ObjectMode, Rig, Scene};
use crate::settings::Settings;
use animease_curves::{
    set_interpolation, splice_keyframe, update_end_frame, Action, CurveError, EndFrameReport,
    Interpolation, MotionPath, SpliceOutcome, SpliceReport,
};
use serde::Serialize;

/// Error type for operator execution
#[derive(Debug, thiserror::Error)]
pub enum OperatorError {
    /// Nothing is active in the scene
    #[error("No active object")]
    NoActiveObject,

    /// The active object is not a rig
    #[error("Select an armature ('{0}' is not one)")]
    NotAnArmature(String),

    /// The rig has no action to edit
    #[error("'{0}' has no animation data")]
    NoAnimationData(String),

    /// The scene's playback range cannot be extended by a loop frame
    #[error("Invalid frame range {start}..{end}")]
    InvalidFrameRange {
        /// First frame
        start: i32,
        /// Last frame
        end: i32,
    },

    /// Curve operation failed
    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),
}

/// How an operator invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperatorOutcome {
    /// Ran to completion
    Finished,
    /// Aborted without changes
    Cancelled,
    /// Waiting for more input events
    RunningModal,
}

/// Operator-specific results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReportDetail {
    /// Nothing beyond the outcome
    None,
    /// Interpolation change
    Interpolation {
        /// Mode applied
        mode: Interpolation,
        /// Points whose mode changed
        changed: usize,
    },
    /// Keyframe splice
    Splice(SpliceReport),
    /// End frame update
    EndFrame(EndFrameReport),
}

/// Result of running an operator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorReport {
    /// Operator ID
    pub operator: &'static str,
    /// How the run ended
    pub outcome: OperatorOutcome,
    /// Informational messages for the user
    pub messages: Vec<String>,
    /// Operator-specific results
    pub detail: ReportDetail,
    /// Motion path recomputed after the edit
    pub motion_path: Option<MotionPath>,
}

impl OperatorReport {
    /// Create a finished report with no detail
    pub fn finished(operator: &'static str) -> Self {
        Self {
            operator,
            outcome: OperatorOutcome::Finished,
            messages: Vec::new(),
            detail: ReportDetail::None,
            motion_path: None,
        }
    }

    /// Create a cancelled report
    pub fn cancelled(operator: &'static str) -> Self {
        Self {
            outcome: OperatorOutcome::Cancelled,
            ..Self::finished(operator)
        }
    }

    /// Log the report messages
    pub fn log(&self) {
        for message in &self.messages {
            tracing::info!(operator = self.operator, "{message}");
        }
        tracing::debug!(operator = self.operator, outcome = ?self.outcome, "Operator done");
    }
}

/// Mutable state handed to operators
pub struct OperatorContext<'a> {
    /// Scene being edited
    pub scene: &'a mut Scene,
    /// Tool settings
    pub settings: &'a mut Settings,
}

impl<'a> OperatorContext<'a> {
    /// Create a new context
    pub fn new(scene: &'a mut Scene, settings: &'a mut Settings) -> Self {
        Self { scene, settings }
    }
}

/// Trait for AnimEase operators
pub trait Operator {
    /// Unique operator ID
    fn id(&self) -> &'static str;

    /// Short label
    fn label(&self) -> &'static str;

    /// Check whether the operator can run on this scene
    fn poll(&self, scene: &Scene) -> Result<(), OperatorError> {
        editable_rig(scene)?;
        loop_range(scene)?;
        Ok(())
    }

    /// Run the operator
    fn execute(&self, ctx: &mut OperatorContext<'_>) -> Result<OperatorReport, OperatorError>;

    /// Poll, then execute
    fn run(&self, ctx: &mut OperatorContext<'_>) -> Result<OperatorReport, OperatorError> {
        self.poll(ctx.scene)?;
        let report = self.execute(ctx)?;
        report.log();
        Ok(report)
    }
}

/// The active object, if it is an armature with an action
pub fn editable_rig(scene: &Scene) -> Result<&Rig, OperatorError> {
    let rig = scene
        .active_object
        .as_ref()
        .ok_or(OperatorError::NoActiveObject)?;
    if rig.kind != ObjectKind::Armature {
        return Err(OperatorError::NotAnArmature(rig.name.clone()));
    }
    if rig.action.is_none() {
        return Err(OperatorError::NoAnimationData(rig.name.clone()));
    }
    Ok(rig)
}

/// Switch the active rig to pose mode and borrow its action
fn posed_action(scene: &mut Scene) -> Result<&mut Action, OperatorError> {
    let rig = scene
        .active_object
        .as_mut()
        .ok_or(OperatorError::NoActiveObject)?;
    if rig.kind != ObjectKind::Armature {
        return Err(OperatorError::NotAnArmature(rig.name.clone()));
    }
    if rig.mode != ObjectMode::Pose {
        tracing::debug!("Switching '{}' to pose mode", rig.name);
        rig.mode = ObjectMode::Pose;
    }
    let name = rig.name.clone();
    rig.action
        .as_mut()
        .ok_or(OperatorError::NoAnimationData(name))
}

/// Playback range plus the loop frame
pub fn loop_range(scene: &Scene) -> Result<(i32, i32), OperatorError> {
    scene
        .loop_range()
        .ok_or(OperatorError::InvalidFrameRange {
            start: scene.frame_start,
            end: scene.frame_end,
        })
}

/// Sample motion paths over the playback range plus the loop frame
fn motion_path(scene: &Scene) -> Result<Option<MotionPath>, OperatorError> {
    let (start, end) = loop_range(scene)?;
    Ok(scene
        .active_object
        .as_ref()
        .and_then(|rig| rig.action.as_ref())
        .map(|action| MotionPath::sample(action, start, end)))
}

/// Set one interpolation mode on every key of the action
#[derive(Debug, Clone, Copy)]
pub struct ToggleInterpolation {
    mode: Interpolation,
}

impl ToggleInterpolation {
    /// Toggle to bezier (spline) solving
    pub fn spline() -> Self {
        Self {
            mode: Interpolation::Bezier,
        }
    }

    /// Toggle to constant (stepped) solving
    pub fn stepped() -> Self {
        Self {
            mode: Interpolation::Constant,
        }
    }
}

impl Operator for ToggleInterpolation {
    fn id(&self) -> &'static str {
        match self.mode {
            Interpolation::Constant => "stepped.toggle",
            Interpolation::Linear => "linear.toggle",
            Interpolation::Bezier => "spline.toggle",
        }
    }

    fn label(&self) -> &'static str {
        match self.mode {
            Interpolation::Constant => "Stepped",
            Interpolation::Linear => "Linear",
            Interpolation::Bezier => "Spline",
        }
    }

    fn execute(&self, ctx: &mut OperatorContext<'_>) -> Result<OperatorReport, OperatorError> {
        ctx.settings.new_key_interpolation = self.mode;
        let action = posed_action(ctx.scene)?;
        let changed = set_interpolation(action.curves_mut(), self.mode);

        let mut report = OperatorReport::finished(self.id());
        report.detail = ReportDetail::Interpolation {
            mode: self.mode,
            changed,
        };
        report
            .messages
            .push(format!("{} interpolation on {changed} keys", self.mode.name()));
        Ok(report)
    }
}

/// Copy the first key of every curve to the frame after the playback range
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateEndFrame;

impl Operator for UpdateEndFrame {
    fn id(&self) -> &'static str {
        "anim.endframe"
    }

    fn label(&self) -> &'static str {
        "Update Endframe"
    }

    fn execute(&self, ctx: &mut OperatorContext<'_>) -> Result<OperatorReport, OperatorError> {
        let (_, end) = loop_range(ctx.scene)?;
        let action = posed_action(ctx.scene)?;
        let end_report = update_end_frame(action.curves_mut(), end as f32)?;

        let mut report = OperatorReport::finished(self.id());
        let skipped = end_report.skipped_count();
        if skipped > 0 {
            report
                .messages
                .push(format!("Skipped {skipped} curves without keyframes"));
        }
        report.detail = ReportDetail::EndFrame(end_report);
        report.motion_path = motion_path(ctx.scene)?;
        Ok(report)
    }
}

/// Splice the keys on the current frame out of every curve
#[derive(Debug, Clone, Copy, Default)]
pub struct SplineMode;

impl Operator for SplineMode {
    fn id(&self) -> &'static str {
        "anim.splinemode"
    }

    fn label(&self) -> &'static str {
        "SplineMode"
    }

    fn execute(&self, ctx: &mut OperatorContext<'_>) -> Result<OperatorReport, OperatorError> {
        let frame = ctx.scene.frame_current;
        let solve = ctx.settings.solve_mode;
        let single = ctx.settings.single_key_policy;
        let action = posed_action(ctx.scene)?;
        let splice = splice_keyframe(action.curves_mut(), frame as f32, solve, single)?;

        let mut report = OperatorReport::finished(self.id());
        if splice.count(SpliceOutcome::LeftOnly) > 0 {
            report.messages.push("Has points to left".to_string());
        }
        if splice.count(SpliceOutcome::RightOnly) > 0 {
            report.messages.push("Has points to right.".to_string());
        }
        let skipped = splice.count(SpliceOutcome::SkippedSingle);
        if skipped > 0 {
            report
                .messages
                .push(format!("Cannot splice {skipped} curves with one keyframe"));
        }
        report.detail = ReportDetail::Splice(splice);
        report.motion_path = motion_path(ctx.scene)?;
        Ok(report)
    }
}
