// SPDX-License-Identifier: MIT OR Apache-2.0
//! Loopable end frames.

use crate::curve::CurveData;
use crate::error::{ensure_finite, Result};
use crate::keyframe::{HandleType, KeyframePoint};
use serde::{Deserialize, Serialize};

/// Result of updating the end frame of one curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndFrameOutcome {
    /// A new key was added at the end frame
    Inserted,
    /// The key already at the end frame was overwritten
    Overwritten,
    /// The curve has no keys
    SkippedEmpty,
}

/// Per-curve results of an end frame update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndFrameReport {
    /// End frame that was written
    pub end: f32,
    /// One outcome per curve, in curve order
    pub outcomes: Vec<EndFrameOutcome>,
}

impl EndFrameReport {
    /// Number of curves that got a new key
    pub fn inserted_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| **o == EndFrameOutcome::Inserted)
            .count()
    }

    /// Number of empty curves skipped
    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| **o == EndFrameOutcome::SkippedEmpty)
            .count()
    }
}

/// Make every curve end on a copy of its first key at `end`
pub fn update_end_frame<'a, C, I>(curves: I, end: f32) -> Result<EndFrameReport>
where
    C: CurveData + 'a,
    I: IntoIterator<Item = &'a mut C>,
{
    let end = ensure_finite(end)?;
    let mut report = EndFrameReport {
        end,
        outcomes: Vec::new(),
    };

    for curve in curves {
        report.outcomes.push(mirror_first_key(curve, end));
    }

    tracing::debug!(
        end,
        inserted = report.inserted_count(),
        skipped = report.skipped_count(),
        "Updated end frame"
    );
    Ok(report)
}

/// The key written at `end` for a curve starting with `first`.
///
/// Handle y values are copied as-is; handle x values keep the first key's
/// horizontal distances.
pub fn end_key(first: &KeyframePoint, value: f32, end: f32) -> KeyframePoint {
    let (left_x, right_x) = first.handle_offsets();
    KeyframePoint {
        co: [end, value],
        handle_left: [end - left_x, first.handle_left[1]],
        handle_right: [end + right_x, first.handle_right[1]],
        handle_left_type: HandleType::Free,
        handle_right_type: HandleType::Free,
        interpolation: first.interpolation,
    }
}

fn mirror_first_key<C: CurveData>(curve: &mut C, end: f32) -> EndFrameOutcome {
    let Some(first) = curve.points().first().copied() else {
        tracing::debug!("Skipping curve without keyframes");
        return EndFrameOutcome::SkippedEmpty;
    };

    let value = curve.evaluate(first.time()).unwrap_or(first.value());
    let mut key = end_key(&first, value, end);

    let outcome = match curve.index_at(end) {
        Some(index) => {
            key.interpolation = curve.points()[index].interpolation;
            EndFrameOutcome::Overwritten
        }
        None => EndFrameOutcome::Inserted,
    };

    curve.insert_point(key);
    curve.update();
    outcome
}
