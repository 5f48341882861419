//! Progress status evaluation.

use coursepace_core::{
    Clock, ProgressRequest, ProgressResult, ProgressStatus, Time, MAX_PROGRESS_PERCENT,
};
use tracing::debug;

use crate::calendar::days_between;
use crate::rounding::{div_ceil, div_round_half_up};

/// Windows shorter than this many days are paced as a single day.
const MIN_PACED_WINDOW_DAYS: u64 = 2;

/// Evaluates progress requests against an injected clock.
#[derive(Debug, Clone, Default)]
pub struct ProgressEvaluator<C> {
    clock: C,
}

impl<C: Clock> ProgressEvaluator<C> {
    /// Create a new evaluator reading "now" from the given clock.
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Evaluate a request as of the clock's current instant.
    pub fn evaluate(&self, request: &ProgressRequest) -> ProgressResult {
        evaluate_at(request, self.clock.now())
    }
}

/// Evaluate a request as of `now`.
///
/// Branches, in order:
/// 1. deadline strictly passed and content unfinished: overdue, the whole
///    remaining content is needed at once;
/// 2. course not yet assigned: on track with nothing expected;
/// 3. otherwise pace evenly over the window's whole days.
pub fn evaluate_at(request: &ProgressRequest, now: Time) -> ProgressResult {
    let duration = u128::from(request.course_duration());
    let progress = request.progress_percent();
    let remaining_percent = u128::from(MAX_PROGRESS_PERCENT - progress);
    let assignment = request.assignment_time();
    let due = request.due_time();

    if due < now && !request.is_complete() {
        let result = ProgressResult {
            status: ProgressStatus::Overdue,
            expected_progress: MAX_PROGRESS_PERCENT,
            needed_daily_learning_time: to_seconds(div_ceil(duration * remaining_percent, 100)),
        };
        debug!(?result, "Course overdue");
        return result;
    }

    if now < assignment {
        debug!("Course not started yet");
        return ProgressResult::not_started();
    }

    let window_days = days_between(due, assignment);
    let expected_progress = if window_days < MIN_PACED_WINDOW_DAYS {
        if due < now {
            MAX_PROGRESS_PERCENT
        } else {
            0
        }
    } else {
        // Ceiling keeps the last day's share at or below the quota.
        let daily_quota = div_ceil(duration, u128::from(window_days));
        let reference = due.min(now);
        let elapsed_days = u128::from(days_between(assignment, reference));
        let expected = div_round_half_up(elapsed_days * daily_quota * 100, duration);
        debug!(window_days, %daily_quota, %elapsed_days, %expected, "Paced window");
        expected.min(u128::from(MAX_PROGRESS_PERCENT)) as u8
    };

    let status = if request.is_complete() || expected_progress <= progress {
        ProgressStatus::OnTrack
    } else {
        ProgressStatus::NotOnTrack
    };

    let needed_daily_learning_time = if request.is_complete() {
        0
    } else {
        // Less than a full day left still leaves today to work in.
        let remaining_days = days_between(due, now).max(1);
        to_seconds(div_ceil(
            duration * remaining_percent,
            100 * u128::from(remaining_days),
        ))
    };

    ProgressResult {
        status,
        expected_progress,
        needed_daily_learning_time,
    }
}

/// Needed time never exceeds the course duration, which is a `u64`.
fn to_seconds(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
