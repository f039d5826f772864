//! Read-only snapshots of worker processes and of the backing store.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{QueueName, TaskId};

/// A worker process known to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub id: String,
    pub host: String,
    pub pid: u32,
    pub concurrency: u32,
    /// Queue name -> priority.
    pub queues: BTreeMap<String, u32>,
    pub strict_priority: bool,
    pub started_at: DateTime<Utc>,
    pub status: String,
    pub active_workers: Vec<WorkerInfo>,
}

/// A task currently being processed by a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerInfo {
    pub task_id: TaskId,
    pub task_type: String,
    pub queue: QueueName,
    pub started_at: DateTime<Utc>,
}

/// Diagnostic info about the backing store instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub version: Option<String>,
    pub mode: Option<String>,
    pub used_memory_human: Option<String>,
    pub connected_clients: Option<u64>,
    pub uptime_seconds: Option<u64>,
    /// Every `key:value` pair reported by the store.
    pub raw: BTreeMap<String, String>,
}
