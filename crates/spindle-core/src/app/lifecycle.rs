//! LifecycleEngine - タスク単位の状態遷移
//!
//! 遷移の可否は `TaskState::allows` で判定し、実際の遷移は store に委ねます。
//! store 側の遷移は 1 タスク単位でアトミックです。

use tracing::{debug, info};

use crate::app::store::StoreHandle;
use crate::domain::{
    AdminError, ArchiveReason, BatchOutcome, CancelReport, QueueName, Result, TaskId, TaskKey,
    TaskOp, TaskState,
};

/// Fail with `InvalidState` unless `op` is legal from `state`.
pub fn check(state: TaskState, op: TaskOp) -> Result<()> {
    if state.allows(op) {
        Ok(())
    } else {
        Err(AdminError::InvalidState { op, state })
    }
}

/// Parse a key given in a request for tasks of `state` in `queue`.
///
/// A key that points into another state is malformed for this request.
pub fn parse_key(queue: &QueueName, state: TaskState, raw: &str) -> Result<TaskKey> {
    let key = TaskKey::parse(queue, raw)?;
    if key.state().state() != state {
        return Err(AdminError::validation(
            "task key",
            format!("{raw:?} addresses a {} task, not {state}", key.state()),
        ));
    }
    Ok(key)
}

#[derive(Clone)]
pub struct LifecycleEngine {
    store: StoreHandle,
}

impl LifecycleEngine {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Apply a keyed transition (run, kill or delete) to one task.
    pub async fn apply(&self, key: &TaskKey, op: TaskOp) -> Result<()> {
        check(key.state().state(), op)?;
        match op {
            TaskOp::Run => self.store.run_task(key).await?,
            TaskOp::Kill => self.store.archive_task(key, ArchiveReason::Operator).await?,
            TaskOp::Delete => self.store.delete_task(key).await?,
            TaskOp::Cancel => {
                // keyed states never allow cancel, so check() has already failed
                return Err(AdminError::InvalidState {
                    op,
                    state: key.state().state(),
                });
            }
        }
        info!(queue = %key.queue(), key = %key, op = %op, "Task transitioned");
        Ok(())
    }

    pub async fn run(&self, key: &TaskKey) -> Result<()> {
        self.apply(key, TaskOp::Run).await
    }

    pub async fn kill(&self, key: &TaskKey) -> Result<()> {
        self.apply(key, TaskOp::Kill).await
    }

    pub async fn delete(&self, key: &TaskKey) -> Result<()> {
        self.apply(key, TaskOp::Delete).await
    }

    /// Signal the worker processing `id` to stop.
    ///
    /// Never changes state here. An id with no active task is still a success,
    /// reported with `was_active: false`.
    pub async fn cancel(&self, queue: &QueueName, id: &TaskId) -> Result<CancelReport> {
        let was_active = self.store.cancel_processing(queue, id).await?;
        if was_active {
            info!(queue = %queue, task_id = %id, "Cancellation signaled");
        } else {
            debug!(queue = %queue, task_id = %id, "Cancel for a task that is not active");
        }
        Ok(CancelReport {
            task_id: id.clone(),
            was_active,
        })
    }

    /// Signal every task that is active right now.
    ///
    /// Tasks finishing in the meantime are still counted as signaled.
    pub async fn cancel_all(&self, queue: &QueueName) -> Result<BatchOutcome<TaskId>> {
        let active = self.store.snapshot(queue, TaskState::Active).await?;
        let ids: Vec<TaskId> = active.into_iter().map(|t| t.id).collect();
        let outcome = self.cancel_each(queue, ids).await?;
        info!(queue = %queue, signaled = outcome.succeeded, "Cancelled all active tasks");
        Ok(outcome)
    }

    /// Signal each id in order. `StoreUnavailable` aborts the rest.
    pub(crate) async fn cancel_each(
        &self,
        queue: &QueueName,
        ids: Vec<TaskId>,
    ) -> Result<BatchOutcome<TaskId>> {
        let mut outcome = BatchOutcome::new();
        for id in ids {
            match self.cancel(queue, &id).await {
                Ok(_) => outcome.record_success(),
                Err(err) if err.is_store_unavailable() => return Err(err),
                Err(err) => outcome.record_failure(id, &err),
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, KeyedState, RetryInfo};
    use crate::impls::InMemoryInspector;
    use chrono::Utc;
    use rstest::rstest;
    use std::sync::Arc;
    use std::time::Duration;

    fn q() -> QueueName {
        QueueName::parse("email").unwrap()
    }

    fn setup() -> (Arc<InMemoryInspector>, LifecycleEngine) {
        let inspector = Arc::new(InMemoryInspector::new());
        let store = StoreHandle::new(inspector.clone(), Duration::from_secs(1));
        (inspector, LifecycleEngine::new(store))
    }

    #[rstest]
    #[case(TaskState::Active, TaskOp::Run)]
    #[case(TaskState::Pending, TaskOp::Run)]
    #[case(TaskState::Archived, TaskOp::Run)]
    #[case(TaskState::Archived, TaskOp::Kill)]
    #[case(TaskState::Pending, TaskOp::Delete)]
    #[case(TaskState::Active, TaskOp::Delete)]
    fn illegal_ops_are_invalid_state(#[case] state: TaskState, #[case] op: TaskOp) {
        let err = check(state, op).unwrap_err();
        assert_eq!(err, AdminError::InvalidState { op, state });
    }

    #[test]
    fn parse_key_rejects_other_state() {
        let err = parse_key(&q(), TaskState::Retry, "s:01hx:1700000000").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let key = parse_key(&q(), TaskState::Archived, "d:01hx:1700000000").unwrap();
        assert_eq!(key.state(), KeyedState::Archived);
    }

    #[tokio::test]
    async fn kill_from_archived_is_invalid_state() {
        let (inspector, engine) = setup();
        let retry = RetryInfo {
            retried: 3,
            max_retry: 3,
            last_error: None,
            last_failed_at: None,
        };
        let key = inspector
            .add_archived(&q(), "email:send", vec![], Utc::now(), retry)
            .await;

        let err = engine.kill(&key).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        engine.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn cancel_publishes_even_when_not_active() {
        let (inspector, engine) = setup();
        inspector.enqueue(&q(), "email:send", vec![]).await;
        let finished = TaskId::parse("gone").unwrap();

        let report = engine.cancel(&q(), &finished).await.unwrap();
        assert!(!report.was_active);
        assert_eq!(inspector.cancel_signals().await, vec![finished]);
    }

    #[tokio::test]
    async fn cancel_on_unknown_queue_is_not_found() {
        let (_, engine) = setup();
        let err = engine
            .cancel(&q(), &TaskId::parse("x").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
