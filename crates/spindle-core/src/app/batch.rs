//! BatchCoordinator - one transition over a set of tasks.
//!
//! Items are applied one at a time and independently; the batch as a whole is
//! not atomic. Per-item failures land in the `BatchOutcome`. Only
//! `StoreUnavailable` stops the batch, and it is reported once.

use tracing::info;

use crate::app::lifecycle::{self, LifecycleEngine};
use crate::app::store::StoreHandle;
use crate::domain::{
    AdminError, BatchOutcome, QueueName, Result, TaskId, TaskInfo, TaskKey, TaskOp, TaskState,
};

/// Which tasks of the source state a batch covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Keys(Vec<TaskKey>),
    /// Every task in the source state when the call starts.
    All,
}

#[derive(Clone)]
pub struct BatchCoordinator {
    store: StoreHandle,
    engine: LifecycleEngine,
}

impl BatchCoordinator {
    pub fn new(store: StoreHandle, engine: LifecycleEngine) -> Self {
        Self { store, engine }
    }

    pub async fn apply(
        &self,
        queue: &QueueName,
        source: TaskState,
        op: TaskOp,
        selector: Selector,
    ) -> Result<BatchOutcome<TaskKey>> {
        if op == TaskOp::Cancel {
            return Err(AdminError::validation(
                "op",
                "cancel addresses active tasks by id",
            ));
        }
        lifecycle::check(source, op)?;

        let keys = match selector {
            Selector::Keys(keys) => {
                if let Some(stray) = keys
                    .iter()
                    .find(|k| k.queue() != queue || k.state().state() != source)
                {
                    return Err(AdminError::validation(
                        "task key",
                        format!("{stray} is not a {source} task of queue {queue}"),
                    ));
                }
                keys
            }
            Selector::All => {
                let snapshot = self.store.snapshot(queue, source).await?;
                snapshot.iter().filter_map(TaskInfo::key).collect()
            }
        };

        let mut outcome = BatchOutcome::new();
        for key in keys {
            match self.engine.apply(&key, op).await {
                Ok(()) => outcome.record_success(),
                Err(err) if err.is_store_unavailable() => return Err(err),
                Err(err) => outcome.record_failure(key, &err),
            }
        }

        info!(
            queue = %queue,
            state = %source,
            op = %op,
            attempted = outcome.attempted,
            succeeded = outcome.succeeded,
            failed = outcome.failed(),
            "Batch applied"
        );
        Ok(outcome)
    }

    /// Signal each listed task. Ids that are not active still count as signaled.
    pub async fn cancel(&self, queue: &QueueName, ids: Vec<TaskId>) -> Result<BatchOutcome<TaskId>> {
        let outcome = self.engine.cancel_each(queue, ids).await?;
        info!(queue = %queue, signaled = outcome.succeeded, "Batch cancel applied");
        Ok(outcome)
    }
}
