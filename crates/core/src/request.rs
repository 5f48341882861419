//! Progress request model - the four caller-supplied inputs of an evaluation.

use chrono::{DateTime, TimeZone, Utc};

use crate::Time;

/// Shortest course content the system accepts, in seconds.
pub const MIN_COURSE_DURATION: u64 = 10;

/// Upper bound of a progress percentage.
pub const MAX_PROGRESS_PERCENT: u8 = 100;

/// Errors raised when a request violates the evaluation contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Course content shorter than [`MIN_COURSE_DURATION`]
    #[error("course duration must be at least 10 seconds, got {0}")]
    DurationTooShort(u64),

    /// Progress above [`MAX_PROGRESS_PERCENT`]
    #[error("progress percent must be between 0 and 100, got {0}")]
    ProgressOutOfRange(u8),

    /// Due time at or before the assignment time
    #[error("due time {due} is not after assignment time {assignment}")]
    DueNotAfterAssignment {
        /// Assignment instant
        assignment: Time,
        /// Due instant
        due: Time,
    },

    /// Window between assignment and due time cannot hold the course content
    #[error("window of {window_seconds}s cannot contain {course_duration}s of content")]
    WindowTooSmall {
        /// Seconds between assignment and due time
        window_seconds: i64,
        /// Declared content duration
        course_duration: u64,
    },
}

/// A validated progress evaluation request.
///
/// Only [`ProgressRequest::new`] builds one, so every instance satisfies:
/// - `course_duration >= MIN_COURSE_DURATION`
/// - `progress_percent <= MAX_PROGRESS_PERCENT`
/// - `due_time > assignment_time`
/// - `due_time - assignment_time > course_duration` seconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRequest {
    course_duration: u64,
    progress_percent: u8,
    assignment_time: Time,
    due_time: Time,
}

impl ProgressRequest {
    /// Create a request, checking the evaluation contract.
    ///
    /// Timestamps may carry any UTC offset; they are compared as instants.
    pub fn new<Tz: TimeZone>(
        course_duration: u64,
        progress_percent: u8,
        assignment_time: DateTime<Tz>,
        due_time: DateTime<Tz>,
    ) -> Result<Self, RequestError> {
        if course_duration < MIN_COURSE_DURATION {
            return Err(RequestError::DurationTooShort(course_duration));
        }
        if progress_percent > MAX_PROGRESS_PERCENT {
            return Err(RequestError::ProgressOutOfRange(progress_percent));
        }

        let assignment_time = assignment_time.with_timezone(&Utc);
        let due_time = due_time.with_timezone(&Utc);
        if due_time <= assignment_time {
            return Err(RequestError::DueNotAfterAssignment {
                assignment: assignment_time,
                due: due_time,
            });
        }

        // Sub-second remainders count toward the window.
        let window = due_time - assignment_time;
        let fits = i64::try_from(course_duration)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .is_some_and(|content| window > content);
        if !fits {
            return Err(RequestError::WindowTooSmall {
                window_seconds: window.num_seconds(),
                course_duration,
            });
        }

        Ok(Self {
            course_duration,
            progress_percent,
            assignment_time,
            due_time,
        })
    }

    /// Total content duration in seconds.
    pub fn course_duration(&self) -> u64 {
        self.course_duration
    }

    /// Learner's current completion, 0-100.
    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    /// When the course became available.
    pub fn assignment_time(&self) -> Time {
        self.assignment_time
    }

    /// Course deadline.
    pub fn due_time(&self) -> Time {
        self.due_time
    }

    /// Whether the learner has finished the content.
    pub fn is_complete(&self) -> bool {
        self.progress_percent == MAX_PROGRESS_PERCENT
    }
}
