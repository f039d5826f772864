//! Queue snapshots and aggregate counters.

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::errors::AdminError;
use super::ids::QueueName;
use super::state::TaskState;

/// Per-state task counts. Advisory: recomputed from the store on every read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub active: u64,
    pub pending: u64,
    pub scheduled: u64,
    pub retry: u64,
    pub archived: u64,
    pub completed: u64,
}

impl TaskCounts {
    pub fn get(&self, state: TaskState) -> u64 {
        match state {
            TaskState::Active => self.active,
            TaskState::Pending => self.pending,
            TaskState::Scheduled => self.scheduled,
            TaskState::Retry => self.retry,
            TaskState::Archived => self.archived,
        }
    }

    pub fn get_mut(&mut self, state: TaskState) -> &mut u64 {
        match state {
            TaskState::Active => &mut self.active,
            TaskState::Pending => &mut self.pending,
            TaskState::Scheduled => &mut self.scheduled,
            TaskState::Retry => &mut self.retry,
            TaskState::Archived => &mut self.archived,
        }
    }

    /// Tasks that still block queue deletion (everything except completed).
    pub fn live(&self) -> u64 {
        TaskState::ALL.iter().map(|s| self.get(*s)).sum()
    }
}

/// Snapshot of one queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueInfo {
    pub name: QueueName,
    pub paused: bool,
    pub counts: TaskCounts,
    /// Tasks processed today (succeeded or failed).
    pub processed_today: u64,
    /// Tasks failed today.
    pub failed_today: u64,
    pub observed_at: DateTime<Utc>,
}

impl QueueInfo {
    /// Stand-in for a queue that disappeared between enumeration and detail fetch.
    pub fn vanished(name: QueueName, observed_at: DateTime<Utc>) -> Self {
        Self {
            name,
            paused: false,
            counts: TaskCounts::default(),
            processed_today: 0,
            failed_today: 0,
            observed_at,
        }
    }

    /// Size of the queue: tasks not yet completed.
    pub fn size(&self) -> u64 {
        self.counts.live()
    }
}

/// Result of pause/resume. `changed` is false when the queue was already there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseReport {
    pub queue: QueueName,
    pub paused: bool,
    pub changed: bool,
}

/// Aggregation period for historical stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Hour,
    Day,
}

impl Period {
    pub fn length(self) -> Duration {
        match self {
            Period::Hour => Duration::hours(1),
            Period::Day => Duration::days(1),
        }
    }

    /// Start of the period containing `at`.
    pub fn bucket_start(self, at: DateTime<Utc>) -> DateTime<Utc> {
        at.duration_trunc(self.length()).unwrap_or(at)
    }

    /// Starts of the `n` periods ending with the one containing `now`, newest first.
    ///
    /// Stops early at the lower end of the representable time range.
    pub fn window(self, now: DateTime<Utc>, n: u32) -> Vec<DateTime<Utc>> {
        let current = self.bucket_start(now);
        (0..n)
            .map_while(|i| {
                let back = self.length().checked_mul(i32::try_from(i).ok()?)?;
                current.checked_sub_signed(back)
            })
            .collect()
    }
}

impl FromStr for Period {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" | "hourly" => Ok(Period::Hour),
            "day" | "daily" => Ok(Period::Day),
            other => Err(AdminError::validation(
                "period",
                format!("expected hour or day, got {other:?}"),
            )),
        }
    }
}

/// Counters for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub start: DateTime<Utc>,
    pub processed: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueHistory {
    pub queue: QueueName,
    /// Newest first.
    pub periods: Vec<PeriodStats>,
}

/// Historical stats for one queue or all of them, with per-period totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub period: Period,
    pub queues: Vec<QueueHistory>,
    /// Sum over `queues`, newest first.
    pub totals: Vec<PeriodStats>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn live_excludes_completed() {
        let counts = TaskCounts {
            active: 1,
            pending: 2,
            scheduled: 3,
            retry: 4,
            archived: 5,
            completed: 100,
        };
        assert_eq!(counts.live(), 15);
    }

    #[test]
    fn window_is_newest_first_and_truncated() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 42, 7).unwrap();
        let days = Period::Day.window(now, 3);
        assert_eq!(
            days,
            vec![
                Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap(),
            ]
        );

        let hours = Period::Hour.window(now, 2);
        assert_eq!(hours[0], Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap());
        assert_eq!(hours[1], Utc.with_ymd_and_hms(2024, 3, 10, 14, 0, 0).unwrap());
    }

    #[test]
    fn window_stops_at_the_earliest_time() {
        let start = DateTime::<Utc>::MIN_UTC + Duration::days(1);
        let days = Period::Day.window(start, 5);
        assert!(!days.is_empty());
        assert!(days.len() < 5);
        assert!(days.windows(2).all(|pair| pair[0] > pair[1]));
    }
}
