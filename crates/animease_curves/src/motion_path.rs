// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-frame sampling of an action's curves.

use crate::action::Action;
use crate::curve::{CurveData, CurveId};
use serde::{Deserialize, Serialize};

/// Sampled values of one curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionChannel {
    /// Source curve
    pub curve_id: CurveId,
    /// Animated property path
    pub data_path: String,
    /// Component of the property
    pub array_index: usize,
    /// One value per frame, starting at the path's start frame
    pub samples: Vec<f32>,
}

/// Curve values sampled at every frame of a range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionPath {
    /// First sampled frame
    pub start: i32,
    /// Last sampled frame (inclusive)
    pub end: i32,
    /// One channel per non-empty curve
    pub channels: Vec<MotionChannel>,
}

impl MotionPath {
    /// Sample every curve of `action` at each frame in `start..=end`.
    ///
    /// An inverted range yields channels with no samples.
    pub fn sample(action: &Action, start: i32, end: i32) -> Self {
        let channels = action
            .curves()
            .filter(|curve| !curve.is_empty())
            .map(|curve| MotionChannel {
                curve_id: curve.id,
                data_path: curve.data_path.clone(),
                array_index: curve.array_index,
                samples: (start..=end)
                    .filter_map(|frame| curve.evaluate(frame as f32))
                    .collect(),
            })
            .collect();

        Self {
            start,
            end,
            channels,
        }
    }

    /// Number of frames covered
    pub fn frame_count(&self) -> usize {
        usize::try_from(i64::from(self.end) - i64::from(self.start) + 1).unwrap_or(0)
    }

    /// Value of a channel at `frame`
    pub fn value_at(&self, curve_id: CurveId, frame: i32) -> Option<f32> {
        let offset = usize::try_from(i64::from(frame) - i64::from(self.start)).ok()?;
        self.channels
            .iter()
            .find(|c| c.curve_id == curve_id)?
            .samples
            .get(offset)
            .copied()
    }
}
