// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation curves and the host-facing curve interface.

use crate::error::{ensure_finite, CurveError, Result};
use crate::keyframe::{add, sub, HandleType, Interpolator, KeyframePoint};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurveId(pub Uuid);

impl CurveId {
    /// Create a new random curve ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CurveId {
    fn default() -> Self {
        Self::new()
    }
}

/// Read/modify access to a host-owned curve.
///
/// Operations in [`crate::ops`] only go through this trait, so any host
/// container that keeps its points time-ordered can be edited.
pub trait CurveData {
    /// Points in time order
    fn points(&self) -> &[KeyframePoint];

    /// Mutable points. Callers must not reorder times.
    fn points_mut(&mut self) -> &mut [KeyframePoint];

    /// Insert a point in time order, replacing any point at the same time.
    /// Returns the index of the point.
    fn insert_point(&mut self, point: KeyframePoint) -> usize;

    /// Remove the point at `index`
    fn remove_point(&mut self, index: usize) -> Result<KeyframePoint>;

    /// Re-sort points and recompute automatic handles
    fn update(&mut self);

    /// Evaluate the curve value at `time`
    fn evaluate(&self, time: f32) -> Option<f32> {
        evaluate_points(self.points(), time)
    }

    /// Index of the point at `time`
    fn index_at(&self, time: f32) -> Option<usize> {
        self.points().iter().position(|p| p.is_at(time))
    }

    /// Number of points
    fn len(&self) -> usize {
        self.points().len()
    }

    /// Whether the curve has no points
    fn is_empty(&self) -> bool {
        self.points().is_empty()
    }
}

/// An animation curve driving one scalar property.
///
/// Deserialized curves are normalized: points are sorted by time, points
/// sharing a time collapse to the last one, and automatic handles are
/// recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FCurveDocument")]
pub struct FCurve {
    /// Unique curve ID
    pub id: CurveId,
    /// Animated property path, e.g. `pose.bones["spine"].location`
    pub data_path: String,
    /// Component of the property
    pub array_index: usize,
    /// Group the curve belongs to (usually the bone name)
    #[serde(default)]
    pub group: Option<String>,
    /// Keyframe points
    keyframe_points: Vec<KeyframePoint>,
}

impl FCurve {
    /// Create an empty curve
    pub fn new(data_path: impl Into<String>, array_index: usize) -> Self {
        Self {
            id: CurveId::new(),
            data_path: data_path.into(),
            array_index,
            group: None,
            keyframe_points: Vec::new(),
        }
    }

    /// Set the group name
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Build a curve from points, sorting and recomputing handles
    pub fn with_points(mut self, points: impl IntoIterator<Item = KeyframePoint>) -> Self {
        for point in points {
            self.insert_point(point);
        }
        self.update();
        self
    }

    /// Get the point at `time`
    pub fn point_at(&self, time: f32) -> Option<&KeyframePoint> {
        self.keyframe_points.iter().find(|p| p.is_at(time))
    }

    /// First and last key times
    pub fn frame_range(&self) -> Option<(f32, f32)> {
        let first = self.keyframe_points.first()?;
        let last = self.keyframe_points.last()?;
        Some((first.time(), last.time()))
    }

    fn sort_points(&mut self) {
        self.keyframe_points.sort_by(|a, b| a.co[0].total_cmp(&b.co[0]));
    }
}

/// On-disk shape of an [`FCurve`], before normalization
#[derive(Deserialize)]
struct FCurveDocument {
    id: CurveId,
    data_path: String,
    array_index: usize,
    #[serde(default)]
    group: Option<String>,
    #[serde(default)]
    keyframe_points: Vec<KeyframePoint>,
}

impl TryFrom<FCurveDocument> for FCurve {
    type Error = CurveError;

    fn try_from(doc: FCurveDocument) -> Result<Self> {
        for point in &doc.keyframe_points {
            ensure_finite(point.time())?;
        }
        let curve = Self {
            id: doc.id,
            data_path: doc.data_path,
            array_index: doc.array_index,
            group: doc.group,
            keyframe_points: Vec::with_capacity(doc.keyframe_points.len()),
        };
        Ok(curve.with_points(doc.keyframe_points))
    }
}

impl CurveData for FCurve {
    fn points(&self) -> &[KeyframePoint] {
        &self.keyframe_points
    }

    fn points_mut(&mut self) -> &mut [KeyframePoint] {
        &mut self.keyframe_points
    }

    fn insert_point(&mut self, point: KeyframePoint) -> usize {
        if let Some(index) = self.index_at(point.time()) {
            self.keyframe_points[index] = point;
            return index;
        }
        let index = self
            .keyframe_points
            .partition_point(|p| p.time() < point.time());
        self.keyframe_points.insert(index, point);
        index
    }

    fn remove_point(&mut self, index: usize) -> Result<KeyframePoint> {
        let len = self.keyframe_points.len();
        if index >= len {
            return Err(CurveError::IndexOutOfRange { index, len });
        }
        Ok(self.keyframe_points.remove(index))
    }

    fn update(&mut self) {
        self.sort_points();
        recalculate_handles(&mut self.keyframe_points);
    }
}

/// Evaluate time-ordered points at `time`, holding the end values outside the range
pub fn evaluate_points(points: &[KeyframePoint], time: f32) -> Option<f32> {
    let first = points.first()?;
    // Find the first key at or after time
    let next_idx = points.iter().position(|p| p.time() >= time);

    match next_idx {
        None => points.last().map(KeyframePoint::value),
        Some(0) => Some(first.value()),
        Some(idx) => Some(Interpolator::segment(&points[idx - 1], &points[idx], time)),
    }
}

/// Recompute every handle whose type is automatic
pub fn recalculate_handles(points: &mut [KeyframePoint]) {
    let cos: Vec<[f32; 2]> = points.iter().map(|p| p.co).collect();

    for (i, point) in points.iter_mut().enumerate() {
        let prev = i.checked_sub(1).map(|j| cos[j]);
        let next = cos.get(i + 1).copied();

        if point.handle_left_type.is_automatic() {
            point.handle_left = auto_handle(point.co, prev, next, point.handle_left_type, true);
        }
        if point.handle_right_type.is_automatic() {
            point.handle_right = auto_handle(point.co, prev, next, point.handle_right_type, false);
        }
    }
}

fn auto_handle(
    co: [f32; 2],
    prev: Option<[f32; 2]>,
    next: Option<[f32; 2]>,
    handle_type: HandleType,
    left: bool,
) -> [f32; 2] {
    let toward = if left { prev } else { next };

    if handle_type == HandleType::Vector {
        return match (toward, if left { next } else { prev }) {
            (Some(n), _) => add(co, scale(sub(n, co), 1.0 / 3.0)),
            // Mirror the vector toward the other neighbour
            (None, Some(other)) => sub(co, scale(sub(other, co), 1.0 / 3.0)),
            (None, None) => flat(co, 1.0, left),
        };
    }

    let reach = match (toward, if left { next } else { prev }) {
        (Some(n), _) | (None, Some(n)) => (n[0] - co[0]).abs() / 3.0,
        (None, None) => 1.0,
    };

    let slope = match (prev, next) {
        (Some(p), Some(n)) if (n[0] - p[0]).abs() > f32::EPSILON => {
            let extremum = (co[1] - p[1]) * (n[1] - co[1]) <= 0.0;
            if handle_type == HandleType::AutoClamped && extremum {
                0.0
            } else {
                (n[1] - p[1]) / (n[0] - p[0])
            }
        }
        _ => 0.0,
    };

    if left {
        [co[0] - reach, co[1] - slope * reach]
    } else {
        [co[0] + reach, co[1] + slope * reach]
    }
}

fn scale(v: [f32; 2], s: f32) -> [f32; 2] {
    [v[0] * s, v[1] * s]
}

fn flat(co: [f32; 2], reach: f32, left: bool) -> [f32; 2] {
    if left {
        [co[0] - reach, co[1]]
    } else {
        [co[0] + reach, co[1]]
    }
}
