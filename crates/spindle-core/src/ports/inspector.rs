//! Inspector port - the store capability the control plane acts through.
//!
//! Inspector は backing store（Redis）への読み書きを抽象化します。
//!
//! # 前提
//! - 1 タスクの遷移（run / archive / delete）はアトミック
//! - 複数タスクにまたがるトランザクションはない
//! - キャッシュしない: 毎回 store に問い合わせる

use async_trait::async_trait;

use crate::domain::{
    ArchiveReason, EnqueueEvent, EntryId, Period, PeriodStats, QueueInfo, QueueName, Result,
    SchedulerEntry, ServerInfo, TaskId, TaskInfo, TaskKey, TaskState,
};

#[async_trait]
pub trait Inspector: Send + Sync {
    /// Names of every queue the store has seen.
    async fn queues(&self) -> Result<Vec<QueueName>>;

    /// Current snapshot of one queue. `NotFound` if the queue does not exist.
    async fn queue_info(&self, queue: &QueueName) -> Result<QueueInfo>;

    /// Returns true if the queue was not already paused.
    async fn pause_queue(&self, queue: &QueueName) -> Result<bool>;

    /// Returns true if the queue was paused.
    async fn resume_queue(&self, queue: &QueueName) -> Result<bool>;

    /// Removes an empty queue. Emptiness is checked atomically with the removal.
    async fn delete_queue(&self, queue: &QueueName) -> Result<()>;

    /// Every task currently in `state`, read in one consistent pass. No order is promised.
    async fn snapshot(&self, queue: &QueueName, state: TaskState) -> Result<Vec<TaskInfo>>;

    /// Moves the task to Pending. `NotFound` if the key no longer resolves.
    async fn run_task(&self, key: &TaskKey) -> Result<()>;

    /// Moves the task to Archived. `NotFound` if the key no longer resolves.
    async fn archive_task(&self, key: &TaskKey, reason: ArchiveReason) -> Result<()>;

    /// Removes the task. `NotFound` if the key no longer resolves.
    async fn delete_task(&self, key: &TaskKey) -> Result<()>;

    /// Publishes a cancellation signal for `id`.
    ///
    /// Returns whether an active task with that id existed when the signal went
    /// out. The signal is published either way.
    async fn cancel_processing(&self, queue: &QueueName, id: &TaskId) -> Result<bool>;

    /// Processed/failed counters for the last `n` periods, newest first.
    async fn history(&self, queue: &QueueName, period: Period, n: u32)
    -> Result<Vec<PeriodStats>>;

    async fn servers(&self) -> Result<Vec<ServerInfo>>;

    async fn scheduler_entries(&self) -> Result<Vec<SchedulerEntry>>;

    /// Retained firing history of one entry, newest first. `NotFound` for an unknown entry.
    async fn enqueue_events(&self, entry: &EntryId) -> Result<Vec<EnqueueEvent>>;

    /// Releases the connection. Every later call fails with `StoreUnavailable`.
    async fn close(&self) -> Result<()>;
}
