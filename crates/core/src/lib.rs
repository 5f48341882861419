//! coursepace core data models.
//!
//! This crate defines the request and result types of a course progress
//! evaluation, and the clock capability evaluations read "now" from.

#![warn(missing_docs)]

// Time source
mod clock;

// Evaluation input and output
mod request;
mod result;

// Re-exports
pub use clock::{Clock, FixedClock, SystemClock};
pub use request::{ProgressRequest, RequestError, MIN_COURSE_DURATION, MAX_PROGRESS_PERCENT};
pub use result::{ProgressResult, ProgressStatus};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
