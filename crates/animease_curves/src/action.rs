// SPDX-License-Identifier: MIT OR Apache-2.0
//! Action containing the animation curves of a rig.

use crate::curve::{CurveData, CurveId, FCurve};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named collection of curves
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Action name
    pub name: String,
    /// Curves in this action
    fcurves: IndexMap<CurveId, FCurve>,
}

impl Action {
    /// Create a new empty action
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fcurves: IndexMap::new(),
        }
    }

    /// Add a curve
    pub fn add_curve(&mut self, curve: FCurve) -> CurveId {
        let id = curve.id;
        self.fcurves.insert(id, curve);
        id
    }

    /// Remove a curve
    pub fn remove_curve(&mut self, curve_id: CurveId) -> Option<FCurve> {
        self.fcurves.shift_remove(&curve_id)
    }

    /// Get a curve
    pub fn curve(&self, curve_id: CurveId) -> Option<&FCurve> {
        self.fcurves.get(&curve_id)
    }

    /// Get a mutable curve
    pub fn curve_mut(&mut self, curve_id: CurveId) -> Option<&mut FCurve> {
        self.fcurves.get_mut(&curve_id)
    }

    /// Find a curve by property path and component
    pub fn find_curve(&self, data_path: &str, array_index: usize) -> Option<&FCurve> {
        self.fcurves
            .values()
            .find(|c| c.data_path == data_path && c.array_index == array_index)
    }

    /// Get all curves
    pub fn curves(&self) -> impl Iterator<Item = &FCurve> {
        self.fcurves.values()
    }

    /// Get all curves mutably
    pub fn curves_mut(&mut self) -> impl Iterator<Item = &mut FCurve> {
        self.fcurves.values_mut()
    }

    /// Get curve count
    pub fn curve_count(&self) -> usize {
        self.fcurves.len()
    }

    /// Total keyframe count over all curves
    pub fn keyframe_count(&self) -> usize {
        self.fcurves.values().map(CurveData::len).sum()
    }

    /// Earliest and latest key time over all curves
    pub fn frame_range(&self) -> Option<(f32, f32)> {
        self.fcurves
            .values()
            .filter_map(FCurve::frame_range)
            .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)))
    }
}
