// SPDX-License-Identifier: MIT OR Apache-2.0
//! Bulk curve operations.
//!
//! Every operation takes any iterator of mutable [`CurveData`] curves and
//! runs once over each of them.
//!
//! [`CurveData`]: crate::curve::CurveData

pub mod end_frame;
pub mod interpolation;
pub mod splice;

pub use end_frame::{end_key, update_end_frame, EndFrameOutcome, EndFrameReport};
pub use interpolation::set_interpolation;
pub use splice::{
    splice_curve, splice_keyframe, SingleKeyPolicy, SolveMode, SpliceOutcome, SpliceReport,
};
