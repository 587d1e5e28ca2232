// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe splicing.
//!
//! Removing a key from the middle of a curve would normally let the curve
//! snap to a straight blend between the neighbours. Splicing first pins the
//! neighbour handles to the removed key's position so the curve keeps
//! passing near it:
//!
//! - With two neighbours, the inner handles of both meet at the removed key.
//! - With one neighbour, only that side is anchored.
//! - In [`SolveMode::Auto`], the outer handle of each neighbour is mirrored
//!   from its anchored inner handle. This is a smoothing heuristic and does
//!   not guarantee tangent continuity.

use crate::curve::CurveData;
use crate::error::{ensure_finite, Result};
use crate::keyframe::{add, HandleType};
use serde::{Deserialize, Serialize};

/// How neighbour handles are solved during a splice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SolveMode {
    /// Only anchor the inner handles
    Free,
    /// Anchor the inner handles and mirror the outer ones
    #[default]
    Auto,
}

impl SolveMode {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Auto => "Auto",
        }
    }
}

/// What to do with a curve holding a single key at the splice time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SingleKeyPolicy {
    /// Leave the curve untouched
    #[default]
    Keep,
    /// Remove the key, leaving an empty curve
    RemoveAtTime,
}

/// Result of splicing one curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpliceOutcome {
    /// Removed a key between two neighbours
    Both,
    /// Removed the last key, anchoring its left neighbour
    LeftOnly,
    /// Removed the first key, anchoring its right neighbour
    RightOnly,
    /// Removed the only key on the curve
    RemovedSingle,
    /// Kept the only key on the curve
    SkippedSingle,
    /// No key at the splice time
    NotFound,
}

impl SpliceOutcome {
    /// Whether a key was removed
    pub fn removed(&self) -> bool {
        matches!(
            self,
            Self::Both | Self::LeftOnly | Self::RightOnly | Self::RemovedSingle
        )
    }
}

/// Per-curve results of a splice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpliceReport {
    /// Frame that was spliced
    pub time: f32,
    /// One outcome per curve, in curve order
    pub outcomes: Vec<SpliceOutcome>,
}

impl SpliceReport {
    /// Number of keys removed
    pub fn removed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.removed()).count()
    }

    /// Number of curves with the given outcome
    pub fn count(&self, outcome: SpliceOutcome) -> usize {
        self.outcomes.iter().filter(|o| **o == outcome).count()
    }
}

/// Splice the key at `time` out of every curve
pub fn splice_keyframe<'a, C, I>(
    curves: I,
    time: f32,
    solve: SolveMode,
    single: SingleKeyPolicy,
) -> Result<SpliceReport>
where
    C: CurveData + 'a,
    I: IntoIterator<Item = &'a mut C>,
{
    let time = ensure_finite(time)?;
    let mut report = SpliceReport {
        time,
        outcomes: Vec::new(),
    };

    for curve in curves {
        let outcome = splice_curve(curve, time, solve, single)?;
        report.outcomes.push(outcome);
    }

    tracing::debug!(
        time,
        solve = solve.name(),
        removed = report.removed_count(),
        "Spliced keyframes"
    );
    Ok(report)
}

/// Splice the key at `time` out of one curve
pub fn splice_curve<C: CurveData>(
    curve: &mut C,
    time: f32,
    solve: SolveMode,
    single: SingleKeyPolicy,
) -> Result<SpliceOutcome> {
    let Some(index) = curve.index_at(time) else {
        return Ok(SpliceOutcome::NotFound);
    };
    let len = curve.len();

    if len < 2 {
        return match single {
            SingleKeyPolicy::Keep => {
                tracing::debug!(time, "Cannot splice a curve with one keyframe");
                Ok(SpliceOutcome::SkippedSingle)
            }
            SingleKeyPolicy::RemoveAtTime => {
                curve.remove_point(index)?;
                curve.update();
                Ok(SpliceOutcome::RemovedSingle)
            }
        };
    }

    let removed = curve.points()[index].co;
    let has_right = index + 1 < len;
    let points = curve.points_mut();

    let outcome = match (index.checked_sub(1), has_right) {
        (Some(left), true) => {
            let left = &mut points[left];
            left.handle_right = removed;
            left.handle_right_type = HandleType::Free;
            if solve == SolveMode::Auto {
                left.handle_left = add(left.co, left.right_handle_vector());
                left.handle_left_type = HandleType::Free;
            }

            let right = &mut points[index + 1];
            right.handle_left = removed;
            right.handle_left_type = HandleType::Free;
            if solve == SolveMode::Auto {
                right.handle_right = add(right.co, right.left_handle_vector());
                right.handle_right_type = HandleType::Free;
            }
            SpliceOutcome::Both
        }
        (Some(left), false) => {
            let left = &mut points[left];
            left.handle_right = removed;
            left.handle_right_type = HandleType::Free;
            SpliceOutcome::LeftOnly
        }
        // First of at least two keys
        (None, _) => {
            let right = &mut points[index + 1];
            right.handle_left = removed;
            right.handle_left_type = HandleType::Free;
            SpliceOutcome::RightOnly
        }
    };

    curve.remove_point(index)?;
    curve.update();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::FCurve;
    use crate::error::CurveError;
    use crate::keyframe::KeyframePoint;

    fn wave() -> FCurve {
        FCurve::new("location", 2).with_points([
            KeyframePoint::new(0.0, 0.0),
            KeyframePoint::new(10.0, 4.0),
            KeyframePoint::new(20.0, 1.0),
            KeyframePoint::new(30.0, 2.0),
        ])
    }

    #[test]
    fn test_splice_between_neighbours() {
        let mut curve = wave();
        let outcome =
            splice_curve(&mut curve, 10.0, SolveMode::Free, SingleKeyPolicy::Keep).unwrap();
        assert_eq!(outcome, SpliceOutcome::Both);
        assert_eq!(curve.len(), 3);

        let left = curve.points()[0];
        let right = curve.points()[1];
        assert_eq!(left.handle_right, [10.0, 4.0]);
        assert_eq!(right.handle_left, [10.0, 4.0]);
        assert_eq!(left.handle_right_type, HandleType::Free);
        assert_eq!(right.handle_left_type, HandleType::Free);
    }

    #[test]
    fn test_auto_mirrors_outer_handles() {
        let mut curve = wave();
        splice_curve(&mut curve, 20.0, SolveMode::Auto, SingleKeyPolicy::Keep).unwrap();

        let left = curve.points()[1];
        let right = curve.points()[2];
        // (10, 4) -> removed (20, 1): mirrored to (0, 7)
        assert_eq!(left.handle_right, [20.0, 1.0]);
        assert_eq!(left.handle_left, [0.0, 7.0]);
        // (30, 2) -> removed (20, 1): mirrored to (40, 3)
        assert_eq!(right.handle_left, [20.0, 1.0]);
        assert_eq!(right.handle_right, [40.0, 3.0]);
        assert_eq!(left.handle_left_type, HandleType::Free);
        assert_eq!(right.handle_right_type, HandleType::Free);
    }

    #[test]
    fn test_splice_last_key_anchors_left() {
        let mut curve = wave();
        let outcome =
            splice_curve(&mut curve, 30.0, SolveMode::Auto, SingleKeyPolicy::Keep).unwrap();
        assert_eq!(outcome, SpliceOutcome::LeftOnly);
        assert_eq!(curve.len(), 3);
        assert_eq!(curve.points()[2].handle_right, [30.0, 2.0]);
        assert_eq!(curve.points()[2].handle_right_type, HandleType::Free);
    }

    #[test]
    fn test_splice_first_key_anchors_right() {
        let mut curve = wave();
        let outcome =
            splice_curve(&mut curve, 0.0, SolveMode::Free, SingleKeyPolicy::Keep).unwrap();
        assert_eq!(outcome, SpliceOutcome::RightOnly);
        assert_eq!(curve.points()[0].time(), 10.0);
        assert_eq!(curve.points()[0].handle_left, [0.0, 0.0]);
    }

    #[test]
    fn test_no_key_at_time() {
        let mut curve = wave();
        let before = curve.clone();
        let outcome =
            splice_curve(&mut curve, 15.0, SolveMode::Auto, SingleKeyPolicy::Keep).unwrap();
        assert_eq!(outcome, SpliceOutcome::NotFound);
        assert_eq!(curve, before);
    }

    #[test]
    fn test_single_key_policies() {
        let single = FCurve::new("scale", 0).with_points([KeyframePoint::new(5.0, 1.0)]);

        let mut kept = single.clone();
        let outcome = splice_curve(&mut kept, 5.0, SolveMode::Auto, SingleKeyPolicy::Keep).unwrap();
        assert_eq!(outcome, SpliceOutcome::SkippedSingle);
        assert_eq!(kept.len(), 1);

        let mut removed = single.clone();
        let outcome = splice_curve(
            &mut removed,
            5.0,
            SolveMode::Auto,
            SingleKeyPolicy::RemoveAtTime,
        )
        .unwrap();
        assert_eq!(outcome, SpliceOutcome::RemovedSingle);
        assert!(removed.is_empty());

        let mut elsewhere = single;
        let outcome = splice_curve(
            &mut elsewhere,
            6.0,
            SolveMode::Auto,
            SingleKeyPolicy::RemoveAtTime,
        )
        .unwrap();
        assert_eq!(outcome, SpliceOutcome::NotFound);
        assert_eq!(elsewhere.len(), 1);
    }

    #[test]
    fn test_splice_all_curves_report() {
        let mut curves = vec![
            wave(),
            FCurve::new("location", 0).with_points([
                KeyframePoint::new(0.0, 0.0),
                KeyframePoint::new(20.0, 1.0),
            ]),
            FCurve::new("location", 1),
        ];
        let report =
            splice_keyframe(&mut curves, 20.0, SolveMode::Auto, SingleKeyPolicy::Keep).unwrap();
        assert_eq!(
            report.outcomes,
            vec![SpliceOutcome::Both, SpliceOutcome::LeftOnly, SpliceOutcome::NotFound]
        );
        assert_eq!(report.removed_count(), 2);
        assert!(curves
            .iter()
            .all(|c| c.points().windows(2).all(|w| w[0].time() < w[1].time())));
    }

    #[test]
    fn test_rejects_nan_time() {
        let mut curves = vec![wave()];
        let err = splice_keyframe(&mut curves, f32::NAN, SolveMode::Free, SingleKeyPolicy::Keep)
            .unwrap_err();
        assert!(matches!(err, CurveError::NonFiniteTime(_)));
    }
}
