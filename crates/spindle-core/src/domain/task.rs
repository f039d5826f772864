//! Task record: a read snapshot of one task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{QueueName, TaskId};
use super::key::TaskKey;
use super::state::TaskState;

/// Why a task ended up archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveReason {
    /// Retries ran out.
    RetriesExhausted,
    /// Killed by an operator.
    Operator,
}

/// Retry bookkeeping, present only for Retry and Archived tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryInfo {
    pub retried: u32,
    pub max_retry: u32,
    pub last_error: Option<String>,
    pub last_failed_at: Option<DateTime<Utc>>,
}

/// Snapshot of one task.
///
/// The payload is carried as opaque bytes and never decoded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub id: TaskId,
    pub queue: QueueName,
    pub task_type: String,
    pub payload: Vec<u8>,
    pub state: TaskState,

    /// When the task entered its current queue position (FIFO order for pending/active).
    pub enqueued_at: DateTime<Utc>,

    /// Next process time (Scheduled, Retry).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_process_at: Option<DateTime<Utc>>,

    /// Processing deadline (Active).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_reason: Option<ArchiveReason>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryInfo>,
}

impl TaskInfo {
    pub fn payload_size(&self) -> usize {
        self.payload.len()
    }

    /// The key addressing this task in its current partition.
    ///
    /// `None` for Active and Pending tasks, and for records missing their score time.
    pub fn key(&self) -> Option<TaskKey> {
        let keyed = self.state.keyed()?;
        let score_at = match self.state {
            TaskState::Scheduled | TaskState::Retry => self.next_process_at?,
            TaskState::Archived => self.archived_at?,
            TaskState::Active | TaskState::Pending => return None,
        };
        Some(TaskKey::new(
            self.queue.clone(),
            keyed,
            self.id.clone(),
            score_at.timestamp(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::KeyedState;
    use chrono::TimeZone;

    fn task(state: TaskState) -> TaskInfo {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        TaskInfo {
            id: TaskId::parse("t1").unwrap(),
            queue: QueueName::parse("email").unwrap(),
            task_type: "email:send".to_string(),
            payload: b"{}".to_vec(),
            state,
            enqueued_at: at,
            next_process_at: Some(at),
            deadline: None,
            archived_at: Some(at + chrono::Duration::hours(1)),
            archive_reason: None,
            retry: None,
        }
    }

    #[test]
    fn key_uses_state_specific_score() {
        let scheduled = task(TaskState::Scheduled).key().unwrap();
        assert_eq!(scheduled.state(), KeyedState::Scheduled);
        assert_eq!(scheduled.to_string(), "s:t1:1704110400");

        let archived = task(TaskState::Archived).key().unwrap();
        assert_eq!(archived.to_string(), "a:t1:1704114000");
    }

    #[test]
    fn active_and_pending_have_no_key() {
        assert!(task(TaskState::Active).key().is_none());
        assert!(task(TaskState::Pending).key().is_none());
    }
}
