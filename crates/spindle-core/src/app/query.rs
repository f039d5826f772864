//! Task listing with stable ordering and bounded pages.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::app::store::StoreHandle;
use crate::domain::{AdminError, QueueName, Result, TaskInfo, TaskKey, TaskState};

/// Page size bounds for list requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u32,
    pub max_size: u32,
}

/// A validated page request. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
}

impl PageLimits {
    /// Fill in defaults and check bounds.
    pub fn resolve(&self, page: Option<u32>, size: Option<u32>) -> Result<Pagination> {
        let page = page.unwrap_or(1);
        let size = size.unwrap_or(self.default_size);
        if page == 0 {
            return Err(AdminError::validation("page", "pages start at 1"));
        }
        if size == 0 || size > self.max_size {
            return Err(AdminError::validation(
                "page size",
                format!("must be between 1 and {}", self.max_size),
            ));
        }
        Ok(Pagination { page, size })
    }
}

/// One listed task, with the key that addresses it (absent for pending and active).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<TaskKey>,
    #[serde(flatten)]
    pub task: TaskInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskPage {
    pub queue: QueueName,
    pub state: TaskState,
    pub page: u32,
    pub size: u32,
    /// Tasks in the state when the snapshot was read, across all pages.
    pub total: usize,
    pub tasks: Vec<TaskRow>,
}

/// Order tasks of `state` the way they are listed.
///
/// - Scheduled, Retry: next process time ascending
/// - Pending, Active: enqueue time ascending
/// - Archived: archive time descending
///
/// Ties break on id so the order is total.
pub fn sort_tasks(state: TaskState, tasks: &mut [TaskInfo]) {
    let by_id = |a: &TaskInfo, b: &TaskInfo| a.id.cmp(&b.id);
    let order: fn(&TaskInfo, &TaskInfo) -> Ordering = match state {
        TaskState::Scheduled | TaskState::Retry => {
            |a, b| a.next_process_at.cmp(&b.next_process_at)
        }
        TaskState::Pending | TaskState::Active => |a, b| a.enqueued_at.cmp(&b.enqueued_at),
        TaskState::Archived => |a, b| b.archived_at.cmp(&a.archived_at),
    };
    tasks.sort_by(|a, b| order(a, b).then_with(|| by_id(a, b)));
}

#[derive(Clone)]
pub struct TaskQuery {
    store: StoreHandle,
    limits: PageLimits,
}

impl TaskQuery {
    pub fn new(store: StoreHandle, limits: PageLimits) -> Self {
        Self { store, limits }
    }

    pub fn limits(&self) -> PageLimits {
        self.limits
    }

    /// One page of the tasks of `state`. `NotFound` if the queue does not exist.
    pub async fn list(
        &self,
        queue: &QueueName,
        state: TaskState,
        page: Pagination,
    ) -> Result<TaskPage> {
        let mut tasks = self.store.snapshot(queue, state).await?;
        sort_tasks(state, &mut tasks);
        let total = tasks.len();

        let skip = (page.page as usize - 1).saturating_mul(page.size as usize);
        let rows: Vec<TaskRow> = tasks
            .into_iter()
            .skip(skip)
            .take(page.size as usize)
            .map(|task| TaskRow {
                key: task.key(),
                task,
            })
            .collect();

        debug!(queue = %queue, state = %state, page = page.page, total, "Listed tasks");
        Ok(TaskPage {
            queue: queue.clone(),
            state,
            page: page.page,
            size: page.size,
            total,
            tasks: rows,
        })
    }
}
