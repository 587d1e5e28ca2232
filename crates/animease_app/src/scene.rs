// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene context the operators run against.
//!
//! Holds the frame range, the current frame, and the active object with
//! its action. Scenes are read from and written to RON documents.

use animease_curves::Action;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Scene document errors
#[derive(Debug, Error)]
pub enum SceneError {
    /// Reading or writing the file failed
    #[error("Scene I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid scene document
    #[error("Invalid scene file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serializing the scene failed
    #[error("Failed to write scene: {0}")]
    Serialize(#[from] ron::Error),

    /// The playback range is inverted or outside the supported frames
    #[error("Invalid frame range {start}..{end}")]
    InvalidFrameRange {
        /// First frame
        start: i32,
        /// Last frame
        end: i32,
    },
}

/// Largest frame number a scene may use, in either direction
pub const MAX_FRAME: i32 = 1_048_574;

/// Kind of scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ObjectKind {
    /// Skeletal rig
    #[default]
    Armature,
    /// Mesh object
    Mesh,
    /// Empty transform
    Empty,
    /// Camera
    Camera,
}

/// Interaction mode of an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ObjectMode {
    /// Object mode
    #[default]
    Object,
    /// Pose mode (armatures only)
    Pose,
}

/// An animated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rig {
    /// Object name
    pub name: String,
    /// Object kind
    pub kind: ObjectKind,
    /// Current interaction mode
    #[serde(default)]
    pub mode: ObjectMode,
    /// Assigned action
    #[serde(default)]
    pub action: Option<Action>,
}

#[cfg(test)]
impl Rig {
    /// Create an armature with no action
    pub fn armature(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ObjectKind::Armature,
            mode: ObjectMode::Object,
            action: None,
        }
    }

    /// Assign an action
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }
}

/// Scene state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// First frame of the playback range
    pub frame_start: i32,
    /// Last frame of the playback range
    pub frame_end: i32,
    /// Current frame
    pub frame_current: i32,
    /// Active object
    #[serde(default)]
    pub active_object: Option<Rig>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            frame_start: 1,
            frame_end: 250,
            frame_current: 1,
            active_object: None,
        }
    }
}

impl Scene {
    /// Playback range extended by the frame the loop closes on.
    ///
    /// `None` when the range is inverted or leaves `-MAX_FRAME..=MAX_FRAME`.
    pub fn loop_range(&self) -> Option<(i32, i32)> {
        let in_bounds = |frame: i32| (-MAX_FRAME..=MAX_FRAME).contains(&frame);
        if self.frame_start > self.frame_end
            || !in_bounds(self.frame_start)
            || !in_bounds(self.frame_end)
        {
            return None;
        }
        Some((self.frame_start, self.frame_end.checked_add(1)?))
    }

    /// Check the frame range
    pub fn validate(&self) -> Result<(), SceneError> {
        match self.loop_range() {
            Some(_) => Ok(()),
            None => Err(SceneError::InvalidFrameRange {
                start: self.frame_start,
                end: self.frame_end,
            }),
        }
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Load a scene from file
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let contents = std::fs::read_to_string(path)?;
        let scene = Self::from_ron(&contents)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Save the scene to file
    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::{Operator, OperatorContext, ReportDetail, SplineMode, UpdateEndFrame};
    use crate::settings::Settings;
    use animease_curves::{CurveData, FCurve, KeyframePoint, SpliceOutcome};

    fn key(time: f32, value: f32) -> String {
        format!(
            "(co: ({time:?}, {value:?}), handle_left: ({:?}, {value:?}), \
             handle_right: ({:?}, {value:?}), handle_left_type: AutoClamped, \
             handle_right_type: AutoClamped, interpolation: Bezier)",
            time - 1.0,
            time + 1.0,
        )
    }

    /// A rig whose only curve stores its keys out of time order
    fn shuffled_document() -> String {
        let id = "\"5d0c8b52-3f1e-4b7a-8c2d-6e9f0a1b2c3d\"";
        let keys = [key(20.0, 3.0), key(1.0, 5.0), key(10.0, 9.0)].join(", ");
        format!(
            "(frame_start: 1, frame_end: 24, frame_current: 10, active_object: Some(( \
             name: \"Hero\", kind: Armature, action: Some((name: \"Walk\", fcurves: {{ \
             ({id}): (id: ({id}), data_path: \"location\", array_index: 0, \
             keyframe_points: [{keys}]) }})))))"
        )
    }

    #[test]
    fn test_scene_serialization() {
        let mut action = Action::new("Run");
        action.add_curve(
            FCurve::new("pose.bones[\"hand.L\"].location", 0)
                .with_group("hand.L")
                .with_points([KeyframePoint::new(1.0, 0.0), KeyframePoint::new(12.0, 0.5)]),
        );
        let scene = Scene {
            frame_end: 24,
            active_object: Some(Rig::armature("Hero").with_action(action)),
            ..Scene::default()
        };

        let ron = scene.to_ron().unwrap();
        let loaded = Scene::from_ron(&ron).unwrap();
        assert_eq!(loaded, scene);
        assert_eq!(loaded.loop_range(), Some((1, 25)));
    }

    #[test]
    fn test_minimal_document() {
        let scene = Scene::from_ron(
            "(frame_start: 1, frame_end: 48, frame_current: 10, \
             active_object: Some((name: \"Cube\", kind: Mesh)))",
        )
        .unwrap();
        let rig = scene.active_object.unwrap();
        assert_eq!(rig.kind, ObjectKind::Mesh);
        assert_eq!(rig.mode, ObjectMode::Object);
        assert!(rig.action.is_none());
    }

    #[test]
    fn test_out_of_order_document_is_sorted() {
        let mut scene = Scene::from_ron(&shuffled_document()).unwrap();
        let mut settings = Settings::default();
        let action = scene.active_object.as_ref().unwrap().action.as_ref().unwrap();
        let times: Vec<f32> = action
            .curves()
            .flat_map(|c| c.points().iter().map(KeyframePoint::time))
            .collect();
        assert_eq!(times, vec![1.0, 10.0, 20.0]);

        let mut ctx = OperatorContext::new(&mut scene, &mut settings);
        let report = SplineMode.run(&mut ctx).unwrap();
        let ReportDetail::Splice(splice) = report.detail else {
            panic!("expected splice detail");
        };
        assert_eq!(splice.outcomes, vec![SpliceOutcome::Both]);

        UpdateEndFrame.run(&mut ctx).unwrap();
        let action = ctx.scene.active_object.as_ref().unwrap().action.as_ref().unwrap();
        let curve = action.curves().next().unwrap();
        let last = curve.points()[2];
        assert_eq!(curve.points()[1].handle_left, [10.0, 9.0]);
        assert_eq!(last.co, [25.0, 5.0]);
    }

    #[test]
    fn test_rejects_overflowing_frame_range() {
        let scene = Scene {
            frame_end: i32::MAX,
            ..Scene::default()
        };
        assert_eq!(scene.loop_range(), None);
        assert!(matches!(
            scene.validate(),
            Err(SceneError::InvalidFrameRange { end: i32::MAX, .. })
        ));

        let inverted = Scene {
            frame_start: 30,
            frame_end: 10,
            ..Scene::default()
        };
        assert_eq!(inverted.loop_range(), None);
        assert_eq!(Scene::default().loop_range(), Some((1, 251)));
    }

    #[test]
    fn test_load_validates_frame_range() {
        let name = format!("animease-range-{}.ron", std::process::id());
        let path = std::env::temp_dir().join(name);
        let doc = "(frame_start: 1, frame_end: 2147483647, frame_current: 1)";
        std::fs::write(&path, doc).unwrap();
        let result = Scene::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(SceneError::InvalidFrameRange { .. })));
    }
}
