//! Progress Evaluation
//!
//! Classifies a learner's pacing through a timed course and derives the
//! expected progress and the daily learning time still needed.

#![warn(missing_docs)]

pub mod calendar;
pub mod evaluator;
pub mod rounding;

pub use calendar::{days_between, SECONDS_PER_DAY};
pub use evaluator::{evaluate_at, ProgressEvaluator};
pub use rounding::{div_ceil, div_round_half_up};
