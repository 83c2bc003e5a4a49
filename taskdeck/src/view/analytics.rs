//! Completion and due-date aggregates.
//!
//! Always computed over the full task set, independent of any view filter.
//! Due dates are compared by calendar day in the timezone of `now`.

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use taskdeck_model::Task;

/// Number of priority buckets (priorities 1 through 5).
pub const PRIORITY_BUCKETS: usize = 5;

/// Summary statistics over every task.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    /// Count of all tasks.
    pub total_tasks: usize,
    /// Count of completed tasks.
    pub completed_tasks: usize,
    /// Completed share in percent; `0.0` when there are no tasks.
    pub completion_rate: f64,
    /// Open tasks due before today.
    pub overdue_tasks: usize,
    /// Open tasks due today.
    pub due_today_tasks: usize,
    /// Open tasks due after today.
    pub upcoming_tasks: usize,
    /// Task counts for priorities 1..=5; out-of-range priorities are skipped.
    pub priority_distribution: [usize; PRIORITY_BUCKETS],
}

/// Computes [`Analytics`] for `tasks` as of `now`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_analytics<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> Analytics {
    let tz = now.timezone();
    let today = now.date_naive();
    let mut stats = Analytics {
        total_tasks: tasks.len(),
        ..Analytics::default()
    };

    for task in tasks {
        if let Some(bucket) = task.priority.bucket() {
            stats.priority_distribution[bucket] += 1;
        }
        if task.completed {
            stats.completed_tasks += 1;
            continue;
        }
        let due = task.due_date.with_timezone(&tz).date_naive();
        match due.cmp(&today) {
            std::cmp::Ordering::Less => stats.overdue_tasks += 1,
            std::cmp::Ordering::Equal => stats.due_today_tasks += 1,
            std::cmp::Ordering::Greater => stats.upcoming_tasks += 1,
        }
    }

    if stats.total_tasks > 0 {
        // Counts stay far below f64's exact-integer range.
        stats.completion_rate = stats.completed_tasks as f64 / stats.total_tasks as f64 * 100.0;
    }
    stats
}
