// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe point definitions.

use serde::{Deserialize, Serialize};

/// Two keyframe times closer than this are the same frame
pub const TIME_EPSILON: f32 = 0.001;

/// Interpolation mode from a keyframe to the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Interpolation {
    /// Constant (stepped)
    Constant,
    /// Linear interpolation
    Linear,
    /// Cubic bezier driven by the point handles
    #[default]
    Bezier,
}

impl Interpolation {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Constant => "Constant",
            Self::Linear => "Linear",
            Self::Bezier => "Bezier",
        }
    }
}

/// How a tangent handle is positioned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HandleType {
    /// Placed by hand, never recomputed
    Free,
    /// Placed by hand, kept in line with the opposite handle by the host
    Aligned,
    /// Points at the neighbouring key
    Vector,
    /// Smooth, recomputed from the neighbours
    Auto,
    /// Smooth, flattened at extremes
    #[default]
    AutoClamped,
}

impl HandleType {
    /// Whether handle recalculation owns this handle's position
    pub fn is_automatic(&self) -> bool {
        matches!(self, Self::Vector | Self::Auto | Self::AutoClamped)
    }
}

/// A keyframe point on a curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyframePoint {
    /// Position as (time, value)
    pub co: [f32; 2],
    /// Left handle position (absolute)
    pub handle_left: [f32; 2],
    /// Right handle position (absolute)
    pub handle_right: [f32; 2],
    /// Left handle type
    pub handle_left_type: HandleType,
    /// Right handle type
    pub handle_right_type: HandleType,
    /// Interpolation mode to the next keyframe
    pub interpolation: Interpolation,
}

impl KeyframePoint {
    /// Create a new keyframe point with flat auto-clamped handles
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            co: [time, value],
            handle_left: [time - 1.0, value],
            handle_right: [time + 1.0, value],
            handle_left_type: HandleType::AutoClamped,
            handle_right_type: HandleType::AutoClamped,
            interpolation: Interpolation::Bezier,
        }
    }

    /// Set interpolation mode
    pub fn with_interpolation(mut self, mode: Interpolation) -> Self {
        self.interpolation = mode;
        self
    }

    /// Set both handles and mark them free
    pub fn with_handles(mut self, left: [f32; 2], right: [f32; 2]) -> Self {
        self.handle_left = left;
        self.handle_right = right;
        self.set_handle_types(HandleType::Free);
        self
    }

    /// Time of this key
    pub fn time(&self) -> f32 {
        self.co[0]
    }

    /// Value of this key
    pub fn value(&self) -> f32 {
        self.co[1]
    }

    /// Whether this key sits on `time`
    pub fn is_at(&self, time: f32) -> bool {
        (self.co[0] - time).abs() < TIME_EPSILON
    }

    /// Set the type of both handles
    pub fn set_handle_types(&mut self, handle_type: HandleType) {
        self.handle_left_type = handle_type;
        self.handle_right_type = handle_type;
    }

    /// Vector from the left handle to the key
    pub fn left_handle_vector(&self) -> [f32; 2] {
        sub(self.co, self.handle_left)
    }

    /// Vector from the right handle to the key
    pub fn right_handle_vector(&self) -> [f32; 2] {
        sub(self.co, self.handle_right)
    }

    /// Horizontal distance from the key to each handle
    pub fn handle_offsets(&self) -> (f32, f32) {
        (
            (self.handle_left[0] - self.co[0]).abs(),
            (self.handle_right[0] - self.co[0]).abs(),
        )
    }
}

/// Component-wise `a - b`
pub(crate) fn sub(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

/// Component-wise `a + b`
pub(crate) fn add(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [a[0] + b[0], a[1] + b[1]]
}

/// Interpolation utilities
pub struct Interpolator;

impl Interpolator {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Cubic bezier interpolation
    pub fn bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        p0 * mt3 + 3.0 * p1 * mt2 * t + 3.0 * p2 * mt * t2 + p3 * t3
    }

    /// Evaluate the bezier segment between two keys at `time`.
    ///
    /// Handle x values are clamped into the segment so x(t) is monotonic,
    /// then x(t) = time is solved by bisection.
    pub fn bezier_segment(a: &KeyframePoint, b: &KeyframePoint, time: f32) -> f32 {
        let x0 = a.co[0];
        let x3 = b.co[0];
        let x1 = a.handle_right[0].clamp(x0, x3);
        let x2 = b.handle_left[0].clamp(x0, x3);

        let mut lo = 0.0_f32;
        let mut hi = 1.0_f32;
        let mut t = 0.5_f32;
        for _ in 0..48 {
            t = 0.5 * (lo + hi);
            let x = Self::bezier(x0, x1, x2, x3, t);
            if (x - time).abs() < 1e-6 {
                break;
            }
            if x < time {
                lo = t;
            } else {
                hi = t;
            }
        }

        Self::bezier(a.co[1], a.handle_right[1], b.handle_left[1], b.co[1], t)
    }

    /// Evaluate between two keys using the left key's interpolation mode
    pub fn segment(a: &KeyframePoint, b: &KeyframePoint, time: f32) -> f32 {
        let span = b.co[0] - a.co[0];
        if span.abs() < 0.0001 {
            return b.co[1];
        }
        match a.interpolation {
            Interpolation::Constant => a.co[1],
            Interpolation::Linear => {
                let t = (time - a.co[0]) / span;
                Self::lerp(a.co[1], b.co[1], t)
            }
            Interpolation::Bezier => Self::bezier_segment(a, b, time),
        }
    }
}
