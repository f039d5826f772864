use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{EntryId, TaskId};

/// A periodic-enqueue definition registered by a scheduler process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerEntry {
    pub id: EntryId,
    /// Cron-like expression, e.g. `@every 30s` or `*/5 * * * *`.
    pub spec: String,
    pub task_type: String,
    pub payload: Vec<u8>,
    pub options: Vec<String>,
    pub next_enqueue_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_enqueue_at: Option<DateTime<Utc>>,
}

/// One firing of a scheduler entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnqueueEvent {
    pub task_id: TaskId,
    pub enqueued_at: DateTime<Utc>,
}
