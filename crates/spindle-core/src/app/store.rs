//! StoreHandle - the injected store connection.
//!
//! Every app component holds a clone. Each call is bounded by the configured
//! timeout; an elapsed call is reported as `StoreUnavailable` like any other
//! connection failure.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::domain::{
    AdminError, ArchiveReason, EnqueueEvent, EntryId, Period, PeriodStats, QueueInfo, QueueName,
    Result, SchedulerEntry, ServerInfo, TaskId, TaskInfo, TaskKey, TaskState,
};
use crate::ports::Inspector;

#[derive(Clone)]
pub struct StoreHandle {
    inspector: Arc<dyn Inspector>,
    timeout: Duration,
}

impl StoreHandle {
    pub fn new(inspector: Arc<dyn Inspector>, timeout: Duration) -> Self {
        Self { inspector, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn call<T, F>(&self, op: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let result = match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AdminError::unavailable(format!(
                "{op} timed out after {}ms",
                self.timeout.as_millis()
            ))),
        };
        if let Err(err) = &result
            && err.is_store_unavailable()
        {
            warn!(op, error = %err, "Store call failed");
        }
        result
    }

    pub async fn queues(&self) -> Result<Vec<QueueName>> {
        self.call("queues", self.inspector.queues()).await
    }

    pub async fn queue_info(&self, queue: &QueueName) -> Result<QueueInfo> {
        self.call("queue_info", self.inspector.queue_info(queue))
            .await
    }

    pub async fn pause_queue(&self, queue: &QueueName) -> Result<bool> {
        self.call("pause_queue", self.inspector.pause_queue(queue))
            .await
    }

    pub async fn resume_queue(&self, queue: &QueueName) -> Result<bool> {
        self.call("resume_queue", self.inspector.resume_queue(queue))
            .await
    }

    pub async fn delete_queue(&self, queue: &QueueName) -> Result<()> {
        self.call("delete_queue", self.inspector.delete_queue(queue))
            .await
    }

    pub async fn snapshot(&self, queue: &QueueName, state: TaskState) -> Result<Vec<TaskInfo>> {
        self.call("snapshot", self.inspector.snapshot(queue, state))
            .await
    }

    pub async fn run_task(&self, key: &TaskKey) -> Result<()> {
        self.call("run_task", self.inspector.run_task(key)).await
    }

    pub async fn archive_task(&self, key: &TaskKey, reason: ArchiveReason) -> Result<()> {
        self.call("archive_task", self.inspector.archive_task(key, reason))
            .await
    }

    pub async fn delete_task(&self, key: &TaskKey) -> Result<()> {
        self.call("delete_task", self.inspector.delete_task(key))
            .await
    }

    pub async fn cancel_processing(&self, queue: &QueueName, id: &TaskId) -> Result<bool> {
        self.call(
            "cancel_processing",
            self.inspector.cancel_processing(queue, id),
        )
        .await
    }

    pub async fn history(
        &self,
        queue: &QueueName,
        period: Period,
        n: u32,
    ) -> Result<Vec<PeriodStats>> {
        self.call("history", self.inspector.history(queue, period, n))
            .await
    }

    pub async fn servers(&self) -> Result<Vec<ServerInfo>> {
        self.call("servers", self.inspector.servers()).await
    }

    pub async fn scheduler_entries(&self) -> Result<Vec<SchedulerEntry>> {
        self.call("scheduler_entries", self.inspector.scheduler_entries())
            .await
    }

    pub async fn enqueue_events(&self, entry: &EntryId) -> Result<Vec<EnqueueEvent>> {
        self.call("enqueue_events", self.inspector.enqueue_events(entry))
            .await
    }

    /// Release the store connection. Calls after this fail with `StoreUnavailable`.
    pub async fn close(&self) -> Result<()> {
        self.call("close", self.inspector.close()).await
    }
}
