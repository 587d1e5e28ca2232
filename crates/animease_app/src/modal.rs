// SPDX-License-Identifier: MIT OR Apache-2.0
//! Modal splice gesture.
//!
//! While an animator moves, rotates or scales bones, the gesture waits for
//! the commit click. In spline mode the commit splices the keys on the
//! current frame; in block mode it just finishes.

use crate::operators::{
    Operator, OperatorContext, OperatorError, OperatorOutcome, OperatorReport, SplineMode,
};
use crate::settings::{AnimMode, Keymap};
use std::fmt;
use std::str::FromStr;

/// Input event delivered to a modal operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Keyboard key, by upper-case name
    Key(String),
    /// Left mouse button press (commit)
    LeftMouse,
    /// Right mouse button press (cancel)
    RightMouse,
    /// Escape key (cancel)
    Esc,
    /// Pointer motion
    MouseMove,
}

impl FromStr for InputEvent {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_uppercase();
        Ok(match name.as_str() {
            "LEFTMOUSE" => Self::LeftMouse,
            "RIGHTMOUSE" => Self::RightMouse,
            "ESC" => Self::Esc,
            "MOUSEMOVE" => Self::MouseMove,
            _ => Self::Key(name),
        })
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(name) => f.write_str(name),
            Self::LeftMouse => f.write_str("LEFTMOUSE"),
            Self::RightMouse => f.write_str("RIGHTMOUSE"),
            Self::Esc => f.write_str("ESC"),
            Self::MouseMove => f.write_str("MOUSEMOVE"),
        }
    }
}

/// Transform started from the gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    /// Translate (grab)
    Translate,
    /// Rotate
    Rotate,
    /// Scale (resize)
    Scale,
}

impl TransformKind {
    /// Get the name of this transform
    pub fn name(&self) -> &'static str {
        match self {
            Self::Translate => "Translating",
            Self::Rotate => "Rotating",
            Self::Scale => "Scaling",
        }
    }
}

/// State of a running splice gesture
#[derive(Debug, Clone)]
pub struct SplineModeGesture {
    translate_key: String,
    rotate_key: String,
    scale_key: String,
    /// Transform currently running
    pub active_transform: Option<TransformKind>,
    /// Current state
    pub outcome: OperatorOutcome,
    report: Option<OperatorReport>,
}

impl SplineModeGesture {
    /// Capture the transform keys and start waiting for events
    pub fn invoke(keymap: &Keymap) -> Self {
        Self {
            translate_key: keymap.translate.to_ascii_uppercase(),
            rotate_key: keymap.rotate.to_ascii_uppercase(),
            scale_key: keymap.scale.to_ascii_uppercase(),
            active_transform: None,
            outcome: OperatorOutcome::RunningModal,
            report: None,
        }
    }

    fn transform_for(&self, key: &str) -> Option<TransformKind> {
        if key == self.translate_key {
            Some(TransformKind::Translate)
        } else if key == self.rotate_key {
            Some(TransformKind::Rotate)
        } else if key == self.scale_key {
            Some(TransformKind::Scale)
        } else {
            None
        }
    }

    /// Handle one event. Events after the gesture ended are ignored.
    pub fn modal(
        &mut self,
        event: &InputEvent,
        ctx: &mut OperatorContext<'_>,
    ) -> Result<OperatorOutcome, OperatorError> {
        if self.outcome != OperatorOutcome::RunningModal {
            return Ok(self.outcome);
        }

        match event {
            InputEvent::Key(key) => {
                if let Some(kind) = self.transform_for(key) {
                    tracing::info!("{}..", kind.name());
                    self.active_transform = Some(kind);
                }
            }
            InputEvent::LeftMouse => {
                if let Some(kind) = self.active_transform.take() {
                    tracing::debug!("Committing {}", kind.name());
                }
                let report = match ctx.settings.anim_mode {
                    AnimMode::Spline => SplineMode.run(ctx)?,
                    AnimMode::Block => OperatorReport::finished(SplineMode.id()),
                };
                self.report = Some(report);
                self.outcome = OperatorOutcome::Finished;
            }
            InputEvent::Esc | InputEvent::RightMouse => {
                tracing::info!("Cancelled..");
                self.active_transform = None;
                self.report = Some(OperatorReport::cancelled(SplineMode.id()));
                self.outcome = OperatorOutcome::Cancelled;
            }
            InputEvent::MouseMove => {}
        }

        Ok(self.outcome)
    }

    /// Take the report of the finished or cancelled gesture
    pub fn take_report(&mut self) -> Option<OperatorReport> {
        self.report.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::tests::walk_scene;
    use crate::operators::ReportDetail;
    use crate::settings::Settings;
    use animease_curves::CurveData;

    fn events(names: &[&str]) -> Vec<InputEvent> {
        names.iter().map(|n| n.parse().unwrap()).collect()
    }

    fn key_count(ctx: &OperatorContext<'_>) -> usize {
        ctx.scene
            .active_object
            .as_ref()
            .and_then(|rig| rig.action.as_ref())
            .map(|action| action.curves().map(CurveData::len).sum())
            .unwrap_or(0)
    }

    #[test]
    fn test_parse_events() {
        assert_eq!(
            events(&["g", "leftmouse", "Esc"]),
            vec![
                InputEvent::Key("G".to_string()),
                InputEvent::LeftMouse,
                InputEvent::Esc,
            ]
        );
    }

    #[test]
    fn test_transform_then_commit_in_spline_mode() {
        let mut scene = walk_scene();
        let mut settings = Settings {
            anim_mode: AnimMode::Spline,
            ..Settings::default()
        };
        let mut ctx = OperatorContext::new(&mut scene, &mut settings);
        let mut gesture = SplineModeGesture::invoke(&ctx.settings.keymap);

        let outcome = gesture.modal(&InputEvent::Key("R".to_string()), &mut ctx).unwrap();
        assert_eq!(outcome, OperatorOutcome::RunningModal);
        assert_eq!(gesture.active_transform, Some(TransformKind::Rotate));

        let outcome = gesture.modal(&InputEvent::LeftMouse, &mut ctx).unwrap();
        assert_eq!(outcome, OperatorOutcome::Finished);
        assert_eq!(key_count(&ctx), 4);

        let report = gesture.take_report().unwrap();
        assert!(matches!(report.detail, ReportDetail::Splice(_)));
    }

    #[test]
    fn test_commit_in_block_mode_keeps_keys() {
        let mut scene = walk_scene();
        let mut settings = Settings::default();
        let mut ctx = OperatorContext::new(&mut scene, &mut settings);
        let mut gesture = SplineModeGesture::invoke(&ctx.settings.keymap);

        for event in events(&["G", "MOUSEMOVE", "LEFTMOUSE"]) {
            gesture.modal(&event, &mut ctx).unwrap();
        }
        assert_eq!(gesture.outcome, OperatorOutcome::Finished);
        assert_eq!(key_count(&ctx), 5);
    }

    #[test]
    fn test_cancel_ignores_later_events() {
        let mut scene = walk_scene();
        let mut settings = Settings {
            anim_mode: AnimMode::Spline,
            ..Settings::default()
        };
        let mut ctx = OperatorContext::new(&mut scene, &mut settings);
        let mut gesture = SplineModeGesture::invoke(&ctx.settings.keymap);

        for event in events(&["S", "RIGHTMOUSE", "LEFTMOUSE"]) {
            gesture.modal(&event, &mut ctx).unwrap();
        }
        assert_eq!(gesture.outcome, OperatorOutcome::Cancelled);
        assert_eq!(key_count(&ctx), 5);
        assert_eq!(
            gesture.take_report().map(|r| r.outcome),
            Some(OperatorOutcome::Cancelled)
        );
    }

    #[test]
    fn test_custom_keymap() {
        let keymap = Keymap {
            translate: "w".to_string(),
            rotate: "e".to_string(),
            scale: "r".to_string(),
        };
        let gesture = SplineModeGesture::invoke(&keymap);
        assert_eq!(gesture.transform_for("W"), Some(TransformKind::Translate));
        assert_eq!(gesture.transform_for("R"), Some(TransformKind::Scale));
        assert_eq!(gesture.transform_for("G"), None);
    }
}
