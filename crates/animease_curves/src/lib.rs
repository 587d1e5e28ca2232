// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe curve editing core for AnimEase.
//!
//! This crate holds the arithmetic behind the AnimEase operators:
//! - Bulk interpolation changes
//! - Keyframe splicing with handle repair
//! - Loopable end frames mirrored from the first key
//! - Motion path sampling
//!
//! ## Architecture
//!
//! Curves are reached through the [`CurveData`] trait, so the operations in
//! [`ops`] run on any host container. [`FCurve`] and [`Action`] are the
//! in-crate implementation used by the `animease` tool and the tests.

pub mod action;
pub mod curve;
pub mod error;
pub mod keyframe;
pub mod motion_path;
pub mod ops;

pub use action::Action;
pub use curve::{evaluate_points, recalculate_handles, CurveData, CurveId, FCurve};
pub use error::{CurveError, Result};
pub use keyframe::{HandleType, Interpolation, Interpolator, KeyframePoint, TIME_EPSILON};
pub use motion_path::{MotionChannel, MotionPath};
pub use ops::{
    set_interpolation, splice_keyframe, update_end_frame, EndFrameOutcome, EndFrameReport,
    SingleKeyPolicy, SolveMode, SpliceOutcome, SpliceReport,
};
