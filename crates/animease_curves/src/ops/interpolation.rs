// SPDX-License-Identifier: MIT OR Apache-2.0
//! Bulk interpolation mode changes.

use crate::curve::CurveData;
use crate::keyframe::Interpolation;

/// Set `mode` on every point of every curve.
///
/// Returns the number of points whose mode changed.
pub fn set_interpolation<'a, C, I>(curves: I, mode: Interpolation) -> usize
where
    C: CurveData + 'a,
    I: IntoIterator<Item = &'a mut C>,
{
    let mut changed = 0;
    let mut curve_count = 0;

    for curve in curves {
        curve_count += 1;
        for point in curve.points_mut() {
            if point.interpolation != mode {
                point.interpolation = mode;
                changed += 1;
            }
        }
    }

    tracing::debug!(
        mode = mode.name(),
        curves = curve_count,
        changed,
        "Set interpolation"
    );
    changed
}
