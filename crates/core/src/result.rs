//! Progress result model - the outcome of an evaluation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Learner status relative to even pacing over the course window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgressStatus {
    /// Progress meets or exceeds the expected progress
    #[serde(rename = "on track")]
    OnTrack,
    /// Progress is below the expected progress
    #[serde(rename = "not on track")]
    NotOnTrack,
    /// Deadline passed with the content unfinished
    #[serde(rename = "overdue")]
    Overdue,
}

impl ProgressStatus {
    /// Get the wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStatus::OnTrack => "on track",
            ProgressStatus::NotOnTrack => "not on track",
            ProgressStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating a progress request at some instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressResult {
    /// Status classification
    #[serde(rename = "progress_status")]
    pub status: ProgressStatus,

    /// Progress (0-100) the learner should have by now under even pacing
    pub expected_progress: u8,

    /// Seconds of content to complete per remaining day; once overdue, the
    /// whole remaining content
    pub needed_daily_learning_time: u64,
}

impl ProgressResult {
    /// Result for a course that has not started yet.
    pub fn not_started() -> Self {
        Self {
            status: ProgressStatus::OnTrack,
            expected_progress: 0,
            needed_daily_learning_time: 0,
        }
    }
}
