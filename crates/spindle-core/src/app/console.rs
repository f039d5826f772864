//! AdminConsole - the exposed operation set.
//!
//! One method per capability. Parameters arrive as strings (path segments,
//! query values) and are validated here; every failure is an `AdminError`
//! whose `status_class()` decides the response.

use std::sync::Arc;

use crate::app::batch::{BatchCoordinator, Selector};
use crate::app::lifecycle::{self, LifecycleEngine};
use crate::app::query::{TaskPage, TaskQuery};
use crate::app::registry::{QueueRegistry, StatsScope};
use crate::app::scheduler::SchedulerObserver;
use crate::app::store::StoreHandle;
use crate::domain::{
    AdminError, BatchOutcome, CancelReport, EnqueueEvent, EntryId, PauseReport, Period, QueueInfo,
    QueueName, Result, SchedulerEntry, ServerInfo, StatsReport, StoreInfo, TaskId, TaskKey,
    TaskOp, TaskState,
};
use crate::ports::StoreDiagnostics;

pub struct AdminConsole {
    pub(crate) store: StoreHandle,
    pub(crate) registry: QueueRegistry,
    pub(crate) query: TaskQuery,
    pub(crate) engine: LifecycleEngine,
    pub(crate) batch: BatchCoordinator,
    pub(crate) scheduler: SchedulerObserver,
    pub(crate) diagnostics: Option<Arc<dyn StoreDiagnostics>>,
}

fn queue(raw: &str) -> Result<QueueName> {
    QueueName::parse(raw)
}

fn state(raw: &str) -> Result<TaskState> {
    raw.parse()
}

impl AdminConsole {
    // ---- queues ----

    pub async fn list_queues(&self) -> Result<Vec<QueueInfo>> {
        self.registry.list().await
    }

    pub async fn get_queue(&self, name: &str) -> Result<QueueInfo> {
        self.registry.get(&queue(name)?).await
    }

    pub async fn delete_queue(&self, name: &str) -> Result<()> {
        self.registry.delete(&queue(name)?).await
    }

    pub async fn pause_queue(&self, name: &str) -> Result<PauseReport> {
        self.registry.pause(&queue(name)?).await
    }

    pub async fn resume_queue(&self, name: &str) -> Result<PauseReport> {
        self.registry.resume(&queue(name)?).await
    }

    /// Historical counters for one queue, or every queue when `name` is `None`.
    pub async fn queue_stats(
        &self,
        name: Option<&str>,
        period: &str,
        periods: u32,
    ) -> Result<StatsReport> {
        let scope = match name {
            Some(name) => StatsScope::Queue(queue(name)?),
            None => StatsScope::All,
        };
        let period: Period = period.parse()?;
        self.registry.stats(scope, period, periods).await
    }

    // ---- tasks ----

    pub async fn list_tasks(
        &self,
        queue_name: &str,
        state_name: &str,
        page: Option<u32>,
        size: Option<u32>,
    ) -> Result<TaskPage> {
        let queue = queue(queue_name)?;
        let state = state(state_name)?;
        let page = self.query.limits().resolve(page, size)?;
        self.query.list(&queue, state, page).await
    }

    pub async fn run_task(&self, queue_name: &str, state_name: &str, key: &str) -> Result<()> {
        self.task_op(queue_name, state_name, TaskOp::Run, key).await
    }

    pub async fn kill_task(&self, queue_name: &str, state_name: &str, key: &str) -> Result<()> {
        self.task_op(queue_name, state_name, TaskOp::Kill, key).await
    }

    pub async fn delete_task(&self, queue_name: &str, state_name: &str, key: &str) -> Result<()> {
        self.task_op(queue_name, state_name, TaskOp::Delete, key)
            .await
    }

    pub async fn run_all(&self, queue_name: &str, state_name: &str) -> Result<BatchOutcome<TaskKey>> {
        self.apply_all(queue_name, state_name, TaskOp::Run).await
    }

    pub async fn kill_all(&self, queue_name: &str, state_name: &str) -> Result<BatchOutcome<TaskKey>> {
        self.apply_all(queue_name, state_name, TaskOp::Kill).await
    }

    pub async fn delete_all(
        &self,
        queue_name: &str,
        state_name: &str,
    ) -> Result<BatchOutcome<TaskKey>> {
        self.apply_all(queue_name, state_name, TaskOp::Delete).await
    }

    pub async fn batch_run<S: AsRef<str>>(
        &self,
        queue_name: &str,
        state_name: &str,
        keys: &[S],
    ) -> Result<BatchOutcome<TaskKey>> {
        self.apply_keys(queue_name, state_name, TaskOp::Run, keys)
            .await
    }

    pub async fn batch_kill<S: AsRef<str>>(
        &self,
        queue_name: &str,
        state_name: &str,
        keys: &[S],
    ) -> Result<BatchOutcome<TaskKey>> {
        self.apply_keys(queue_name, state_name, TaskOp::Kill, keys)
            .await
    }

    pub async fn batch_delete<S: AsRef<str>>(
        &self,
        queue_name: &str,
        state_name: &str,
        keys: &[S],
    ) -> Result<BatchOutcome<TaskKey>> {
        self.apply_keys(queue_name, state_name, TaskOp::Delete, keys)
            .await
    }

    /// Signal one active task. Succeeds even if the task is no longer active.
    pub async fn cancel_task(&self, queue_name: &str, task_id: &str) -> Result<CancelReport> {
        let queue = queue(queue_name)?;
        let id = TaskId::parse(task_id)?;
        self.engine.cancel(&queue, &id).await
    }

    pub async fn cancel_all(&self, queue_name: &str) -> Result<BatchOutcome<TaskId>> {
        self.engine.cancel_all(&queue(queue_name)?).await
    }

    pub async fn batch_cancel<S: AsRef<str>>(
        &self,
        queue_name: &str,
        task_ids: &[S],
    ) -> Result<BatchOutcome<TaskId>> {
        let queue = queue(queue_name)?;
        let ids = task_ids
            .iter()
            .map(|raw| TaskId::parse(raw.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.batch.cancel(&queue, ids).await
    }

    async fn task_op(&self, queue_name: &str, state_name: &str, op: TaskOp, raw: &str) -> Result<()> {
        let queue = queue(queue_name)?;
        let state = state(state_name)?;
        lifecycle::check(state, op)?;
        let key = lifecycle::parse_key(&queue, state, raw)?;
        self.engine.apply(&key, op).await
    }

    async fn apply_all(
        &self,
        queue_name: &str,
        state_name: &str,
        op: TaskOp,
    ) -> Result<BatchOutcome<TaskKey>> {
        let queue = queue(queue_name)?;
        let state = state(state_name)?;
        self.batch.apply(&queue, state, op, Selector::All).await
    }

    async fn apply_keys<S: AsRef<str>>(
        &self,
        queue_name: &str,
        state_name: &str,
        op: TaskOp,
        raw_keys: &[S],
    ) -> Result<BatchOutcome<TaskKey>> {
        let queue = queue(queue_name)?;
        let state = state(state_name)?;
        lifecycle::check(state, op)?;
        let keys = raw_keys
            .iter()
            .map(|raw| lifecycle::parse_key(&queue, state, raw.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.batch.apply(&queue, state, op, Selector::Keys(keys)).await
    }

    // ---- servers, scheduler, store ----

    pub async fn list_servers(&self) -> Result<Vec<ServerInfo>> {
        self.store.servers().await
    }

    pub async fn list_scheduler_entries(&self) -> Result<Vec<SchedulerEntry>> {
        self.scheduler.entries().await
    }

    pub async fn list_enqueue_events(
        &self,
        entry_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<EnqueueEvent>> {
        let entry = EntryId::parse(entry_id)?;
        self.scheduler.enqueue_events(&entry, limit).await
    }

    pub async fn store_info(&self) -> Result<StoreInfo> {
        match &self.diagnostics {
            Some(diagnostics) => diagnostics.info().await,
            None => Err(AdminError::unavailable("no store diagnostics configured")),
        }
    }

    /// Close the store connection. The console is unusable afterwards.
    pub async fn close(&self) -> Result<()> {
        self.store.close().await
    }
}
