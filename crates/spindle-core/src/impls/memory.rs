//! In-memory Inspector implementation.
//!
//! Stands in for the Redis store in tests and in the CLI demo. Besides the
//! `Inspector` operations it exposes the producer/worker side (enqueue,
//! schedule, activate, complete, fail, scheduler firings) so the control
//! plane can be exercised against live-looking traffic.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{
    AdminError, ArchiveReason, EnqueueEvent, EntryId, KeyedState, Period, PeriodStats, QueueInfo,
    QueueName, Result, RetryInfo, SchedulerEntry, ServerInfo, TaskCounts, TaskId, TaskInfo, TaskKey,
    TaskOp, TaskState,
};
use crate::ports::{Clock, IdGenerator, Inspector, SystemClock, UlidGenerator};

/// Default number of enqueue events kept per scheduler entry.
pub const DEFAULT_EVENT_RETENTION: usize = 1000;

/// How long an activated task may run before its deadline.
const ACTIVE_DEADLINE: chrono::Duration = chrono::Duration::minutes(30);

#[derive(Debug, Clone, Copy, Default)]
struct Counter {
    processed: u64,
    failed: u64,
}

/// One queue: its tasks partitioned by state.
struct QueueData {
    paused: bool,
    partitions: HashMap<TaskState, HashMap<TaskId, TaskInfo>>,
    completed: u64,
    /// Hour bucket start -> counters.
    hourly: BTreeMap<DateTime<Utc>, Counter>,
}

impl QueueData {
    fn new() -> Self {
        Self {
            paused: false,
            partitions: HashMap::new(),
            completed: 0,
            hourly: BTreeMap::new(),
        }
    }

    fn partition(&self, state: TaskState) -> impl Iterator<Item = &TaskInfo> {
        self.partitions.get(&state).into_iter().flat_map(|p| p.values())
    }

    fn counts(&self) -> TaskCounts {
        let mut counts = TaskCounts {
            completed: self.completed,
            ..TaskCounts::default()
        };
        for (state, tasks) in &self.partitions {
            *counts.get_mut(*state) += tasks.len() as u64;
        }
        counts
    }

    fn insert(&mut self, task: TaskInfo) {
        self.partitions
            .entry(task.state)
            .or_default()
            .insert(task.id.clone(), task);
    }

    /// Remove the task `key` points at. The score must match too: a task that
    /// was re-scheduled since the key was read is not the same position.
    fn take(&mut self, key: &TaskKey) -> Result<TaskInfo> {
        let partition = self
            .partitions
            .get_mut(&key.state().state())
            .ok_or_else(|| AdminError::not_found("task", key))?;
        let resolves = partition
            .get(key.id())
            .and_then(TaskInfo::key)
            .is_some_and(|current| current.score() == key.score());
        if !resolves {
            return Err(AdminError::not_found("task", key));
        }
        partition
            .remove(key.id())
            .ok_or_else(|| AdminError::not_found("task", key))
    }

    fn take_active(&mut self, id: &TaskId) -> Option<TaskInfo> {
        self.partitions.get_mut(&TaskState::Active)?.remove(id)
    }

    fn record(&mut self, at: DateTime<Utc>, failed: bool) {
        let counter = self.hourly.entry(Period::Hour.bucket_start(at)).or_default();
        counter.processed += 1;
        if failed {
            counter.failed += 1;
        }
    }

    fn sum_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Counter {
        self.hourly
            .range(start..end)
            .fold(Counter::default(), |acc, (_, c)| Counter {
                processed: acc.processed + c.processed,
                failed: acc.failed + c.failed,
            })
    }
}

struct EntryData {
    entry: SchedulerEntry,
    /// Oldest first.
    events: VecDeque<EnqueueEvent>,
}

/// In-memory store state.
struct InMemoryState {
    queues: BTreeMap<QueueName, QueueData>,
    servers: Vec<ServerInfo>,
    entries: BTreeMap<EntryId, EntryData>,
    /// Every cancellation signal published, in order.
    cancel_signals: Vec<TaskId>,
    closed: bool,
    /// Task transitions left before the store starts refusing them.
    mutation_budget: Option<usize>,
}

impl InMemoryState {
    fn new() -> Self {
        Self {
            queues: BTreeMap::new(),
            servers: Vec::new(),
            entries: BTreeMap::new(),
            cancel_signals: Vec::new(),
            closed: false,
            mutation_budget: None,
        }
    }

    fn queue(&self, name: &QueueName) -> Result<&QueueData> {
        self.queues
            .get(name)
            .ok_or_else(|| AdminError::not_found("queue", name))
    }

    fn queue_mut(&mut self, name: &QueueName) -> Result<&mut QueueData> {
        self.queues
            .get_mut(name)
            .ok_or_else(|| AdminError::not_found("queue", name))
    }

    /// Producers create queues implicitly.
    fn queue_or_create(&mut self, name: &QueueName) -> &mut QueueData {
        self.queues.entry(name.clone()).or_insert_with(QueueData::new)
    }

    fn spend_mutation(&mut self) -> Result<()> {
        match self.mutation_budget.as_mut() {
            Some(0) => Err(AdminError::unavailable("connection reset by store")),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// In-memory Inspector.
pub struct InMemoryInspector {
    state: Arc<Mutex<InMemoryState>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    latency: Option<Duration>,
    event_retention: usize,
}

impl InMemoryInspector {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock<C: Clock + Clone + 'static>(clock: C) -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryState::new())),
            ids: Arc::new(UlidGenerator::new(clock.clone())),
            clock: Arc::new(clock),
            latency: None,
            event_retention: DEFAULT_EVENT_RETENTION,
        }
    }

    /// Delay every Inspector call by `latency`, like a slow network hop.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_event_retention(mut self, retention: usize) -> Self {
        self.event_retention = retention.max(1);
        self
    }

    /// Lock the state for an Inspector call: applies latency and refuses when closed.
    async fn open_state(&self) -> Result<MutexGuard<'_, InMemoryState>> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let state = self.state.lock().await;
        if state.closed {
            return Err(AdminError::unavailable("store connection is closed"));
        }
        Ok(state)
    }

    fn new_task(
        &self,
        queue: &QueueName,
        task_type: &str,
        payload: Vec<u8>,
        state: TaskState,
    ) -> TaskInfo {
        TaskInfo {
            id: self.ids.generate_task_id(),
            queue: queue.clone(),
            task_type: task_type.to_string(),
            payload,
            state,
            enqueued_at: self.clock.now(),
            next_process_at: None,
            deadline: None,
            archived_at: None,
            archive_reason: None,
            retry: None,
        }
    }

    async fn insert_keyed(
        &self,
        task: TaskInfo,
        keyed: KeyedState,
        at: DateTime<Utc>,
    ) -> TaskKey {
        let key = TaskKey::new(task.queue.clone(), keyed, task.id.clone(), at.timestamp());
        let mut state = self.state.lock().await;
        state.queue_or_create(&task.queue).insert(task);
        key
    }

    // ------------------------------------------------------------------
    // Producer / worker side
    // ------------------------------------------------------------------

    /// Enqueue a task for immediate processing.
    pub async fn enqueue(&self, queue: &QueueName, task_type: &str, payload: Vec<u8>) -> TaskId {
        let task = self.new_task(queue, task_type, payload, TaskState::Pending);
        let id = task.id.clone();
        let mut state = self.state.lock().await;
        state.queue_or_create(queue).insert(task);
        id
    }

    /// Schedule a task to be processed at `process_at`.
    pub async fn schedule(
        &self,
        queue: &QueueName,
        task_type: &str,
        payload: Vec<u8>,
        process_at: DateTime<Utc>,
    ) -> TaskKey {
        let mut task = self.new_task(queue, task_type, payload, TaskState::Scheduled);
        task.next_process_at = Some(process_at);
        self.insert_keyed(task, KeyedState::Scheduled, process_at).await
    }

    /// Put a task directly into the retry set.
    pub async fn add_retry(
        &self,
        queue: &QueueName,
        task_type: &str,
        payload: Vec<u8>,
        retry_at: DateTime<Utc>,
        retry: RetryInfo,
    ) -> TaskKey {
        let mut task = self.new_task(queue, task_type, payload, TaskState::Retry);
        task.next_process_at = Some(retry_at);
        task.retry = Some(retry);
        self.insert_keyed(task, KeyedState::Retry, retry_at).await
    }

    /// Put a task directly into the archive, as if its retries ran out.
    pub async fn add_archived(
        &self,
        queue: &QueueName,
        task_type: &str,
        payload: Vec<u8>,
        archived_at: DateTime<Utc>,
        retry: RetryInfo,
    ) -> TaskKey {
        let mut task = self.new_task(queue, task_type, payload, TaskState::Archived);
        task.archived_at = Some(archived_at);
        task.archive_reason = Some(ArchiveReason::RetriesExhausted);
        task.retry = Some(retry);
        self.insert_keyed(task, KeyedState::Archived, archived_at).await
    }

    /// A worker dequeues the oldest pending task of an unpaused queue.
    pub async fn activate(&self, queue: &QueueName) -> Option<TaskId> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let data = state.queues.get_mut(queue)?;
        if data.paused {
            return None;
        }
        let oldest = data
            .partition(TaskState::Pending)
            .min_by(|a, b| a.enqueued_at.cmp(&b.enqueued_at).then(a.id.cmp(&b.id)))
            .map(|t| t.id.clone())?;
        let mut task = data.partitions.get_mut(&TaskState::Pending)?.remove(&oldest)?;
        task.state = TaskState::Active;
        task.deadline = Some(now + ACTIVE_DEADLINE);
        data.insert(task);
        Some(oldest)
    }

    /// A worker finishes an active task successfully.
    pub async fn complete(&self, queue: &QueueName, id: &TaskId) -> bool {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let Some(data) = state.queues.get_mut(queue) else {
            return false;
        };
        if data.take_active(id).is_none() {
            return false;
        }
        data.completed += 1;
        data.record(now, false);
        true
    }

    /// A worker fails an active task: retried at `retry_at`, or archived when `None`.
    pub async fn fail(
        &self,
        queue: &QueueName,
        id: &TaskId,
        error: &str,
        retry_at: Option<DateTime<Utc>>,
    ) -> Option<TaskKey> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let data = state.queues.get_mut(queue)?;
        let mut task = data.take_active(id)?;

        let mut retry = task.retry.take().unwrap_or(RetryInfo {
            retried: 0,
            max_retry: 25,
            last_error: None,
            last_failed_at: None,
        });
        retry.retried += 1;
        retry.last_error = Some(error.to_string());
        retry.last_failed_at = Some(now);

        task.retry = Some(retry);
        task.deadline = None;
        match retry_at {
            Some(at) => {
                task.state = TaskState::Retry;
                task.next_process_at = Some(at);
            }
            None => {
                task.state = TaskState::Archived;
                task.archived_at = Some(now);
                task.archive_reason = Some(ArchiveReason::RetriesExhausted);
            }
        }
        let key = task.key();
        data.insert(task);
        data.record(now, true);
        key
    }

    pub async fn register_server(&self, server: ServerInfo) {
        self.state.lock().await.servers.push(server);
    }

    pub async fn add_scheduler_entry(
        &self,
        spec: &str,
        task_type: &str,
        next_enqueue_at: DateTime<Utc>,
    ) -> EntryId {
        let id = self.ids.generate_entry_id();
        let entry = SchedulerEntry {
            id: id.clone(),
            spec: spec.to_string(),
            task_type: task_type.to_string(),
            payload: Vec::new(),
            options: Vec::new(),
            next_enqueue_at,
            prev_enqueue_at: None,
        };
        self.state.lock().await.entries.insert(
            id.clone(),
            EntryData {
                entry,
                events: VecDeque::new(),
            },
        );
        id
    }

    /// Record a firing of `entry`. The oldest event is dropped past the retention length.
    pub async fn record_enqueue_event(
        &self,
        entry: &EntryId,
        task_id: TaskId,
        enqueued_at: DateTime<Utc>,
    ) -> bool {
        let mut state = self.state.lock().await;
        let Some(data) = state.entries.get_mut(entry) else {
            return false;
        };
        data.entry.prev_enqueue_at = Some(enqueued_at);
        data.events.push_back(EnqueueEvent {
            task_id,
            enqueued_at,
        });
        while data.events.len() > self.event_retention {
            data.events.pop_front();
        }
        true
    }

    /// Cancellation signals published so far, oldest first.
    pub async fn cancel_signals(&self) -> Vec<TaskId> {
        self.state.lock().await.cancel_signals.clone()
    }

    /// Let `n` more task transitions through, then fail every later one with
    /// `StoreUnavailable` (for testing)
    #[cfg(test)]
    pub(crate) async fn refuse_mutations_after(&self, n: usize) {
        self.state.lock().await.mutation_budget = Some(n);
    }
}

impl Default for InMemoryInspector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Inspector for InMemoryInspector {
    async fn queues(&self) -> Result<Vec<QueueName>> {
        let state = self.open_state().await?;
        Ok(state.queues.keys().cloned().collect())
    }

    async fn queue_info(&self, queue: &QueueName) -> Result<QueueInfo> {
        let now = self.clock.now();
        let state = self.open_state().await?;
        let data = state.queue(queue)?;
        let today = Period::Day.bucket_start(now);
        let stats = data.sum_between(today, today + Period::Day.length());
        Ok(QueueInfo {
            name: queue.clone(),
            paused: data.paused,
            counts: data.counts(),
            processed_today: stats.processed,
            failed_today: stats.failed,
            observed_at: now,
        })
    }

    async fn pause_queue(&self, queue: &QueueName) -> Result<bool> {
        let mut state = self.open_state().await?;
        let data = state.queue_mut(queue)?;
        let changed = !data.paused;
        data.paused = true;
        Ok(changed)
    }

    async fn resume_queue(&self, queue: &QueueName) -> Result<bool> {
        let mut state = self.open_state().await?;
        let data = state.queue_mut(queue)?;
        let changed = data.paused;
        data.paused = false;
        Ok(changed)
    }

    async fn delete_queue(&self, queue: &QueueName) -> Result<()> {
        let mut state = self.open_state().await?;
        let remaining = state.queue(queue)?.counts().live();
        if remaining > 0 {
            return Err(AdminError::QueueNotEmpty {
                queue: queue.to_string(),
                remaining,
            });
        }
        state.queues.remove(queue);
        Ok(())
    }

    async fn snapshot(&self, queue: &QueueName, task_state: TaskState) -> Result<Vec<TaskInfo>> {
        let state = self.open_state().await?;
        Ok(state.queue(queue)?.partition(task_state).cloned().collect())
    }

    async fn run_task(&self, key: &TaskKey) -> Result<()> {
        if key.state().state() == TaskState::Archived {
            return Err(AdminError::InvalidState {
                op: TaskOp::Run,
                state: TaskState::Archived,
            });
        }
        let now = self.clock.now();
        let mut state = self.open_state().await?;
        state.spend_mutation()?;
        let data = state.queue_mut(key.queue())?;
        let mut task = data.take(key)?;
        task.state = TaskState::Pending;
        task.enqueued_at = now;
        task.next_process_at = None;
        task.deadline = None;
        task.archived_at = None;
        task.archive_reason = None;
        task.retry = None;
        data.insert(task);
        Ok(())
    }

    async fn archive_task(&self, key: &TaskKey, reason: ArchiveReason) -> Result<()> {
        if key.state().state() == TaskState::Archived {
            return Err(AdminError::InvalidState {
                op: TaskOp::Kill,
                state: TaskState::Archived,
            });
        }
        let now = self.clock.now();
        let mut state = self.open_state().await?;
        state.spend_mutation()?;
        let data = state.queue_mut(key.queue())?;
        let mut task = data.take(key)?;
        task.state = TaskState::Archived;
        task.archived_at = Some(now);
        task.archive_reason = Some(reason);
        task.next_process_at = None;
        task.retry.get_or_insert(RetryInfo {
            retried: 0,
            max_retry: 0,
            last_error: None,
            last_failed_at: None,
        });
        data.insert(task);
        Ok(())
    }

    async fn delete_task(&self, key: &TaskKey) -> Result<()> {
        let mut state = self.open_state().await?;
        state.spend_mutation()?;
        state.queue_mut(key.queue())?.take(key)?;
        Ok(())
    }

    async fn cancel_processing(&self, queue: &QueueName, id: &TaskId) -> Result<bool> {
        let mut state = self.open_state().await?;
        let was_active = state
            .queue(queue)?
            .partition(TaskState::Active)
            .any(|t| &t.id == id);
        state.cancel_signals.push(id.clone());
        Ok(was_active)
    }

    async fn history(
        &self,
        queue: &QueueName,
        period: Period,
        n: u32,
    ) -> Result<Vec<PeriodStats>> {
        let now = self.clock.now();
        let state = self.open_state().await?;
        let data = state.queue(queue)?;
        Ok(period
            .window(now, n)
            .into_iter()
            .map(|start| {
                let c = data.sum_between(start, start + period.length());
                PeriodStats {
                    start,
                    processed: c.processed,
                    failed: c.failed,
                }
            })
            .collect())
    }

    async fn servers(&self) -> Result<Vec<ServerInfo>> {
        Ok(self.open_state().await?.servers.clone())
    }

    async fn scheduler_entries(&self) -> Result<Vec<SchedulerEntry>> {
        let state = self.open_state().await?;
        Ok(state.entries.values().map(|d| d.entry.clone()).collect())
    }

    async fn enqueue_events(&self, entry: &EntryId) -> Result<Vec<EnqueueEvent>> {
        let state = self.open_state().await?;
        let data = state
            .entries
            .get(entry)
            .ok_or_else(|| AdminError::not_found("scheduler entry", entry))?;
        Ok(data.events.iter().rev().cloned().collect())
    }

    async fn close(&self) -> Result<()> {
        self.state.lock().await.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::ports::FixedClock;
    use chrono::TimeZone;

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap())
    }

    fn q(name: &str) -> QueueName {
        QueueName::parse(name).unwrap()
    }

    fn retry_info() -> RetryInfo {
        RetryInfo {
            retried: 1,
            max_retry: 5,
            last_error: Some("smtp timeout".to_string()),
            last_failed_at: None,
        }
    }

    #[tokio::test]
    async fn enqueue_creates_queue_and_counts() {
        let store = InMemoryInspector::with_clock(clock());
        store.enqueue(&q("email"), "email:send", vec![]).await;
        store.enqueue(&q("email"), "email:send", vec![]).await;

        let info = store.queue_info(&q("email")).await.unwrap();
        assert_eq!(info.counts.pending, 2);
        assert_eq!(info.size(), 2);
        assert!(!info.paused);
    }

    #[tokio::test]
    async fn stale_score_does_not_resolve() {
        let clock = clock();
        let store = InMemoryInspector::with_clock(clock.clone());
        let key = store
            .schedule(&q("email"), "email:send", vec![], clock.now())
            .await;
        let stale = TaskKey::new(
            key.queue().clone(),
            KeyedState::Scheduled,
            key.id().clone(),
            key.score() + 60,
        );

        let err = store.run_task(&stale).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        store.run_task(&key).await.unwrap();
    }

    #[tokio::test]
    async fn kill_rescores_to_archive_time() {
        let clock = clock();
        let store = InMemoryInspector::with_clock(clock.clone());
        let key = store
            .add_retry(&q("email"), "email:send", vec![], clock.now(), retry_info())
            .await;
        clock.advance(chrono::Duration::seconds(90));

        store.archive_task(&key, ArchiveReason::Operator).await.unwrap();

        let archived = store.snapshot(&q("email"), TaskState::Archived).await.unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].archive_reason, Some(ArchiveReason::Operator));
        assert_eq!(archived[0].retry, Some(retry_info()));
        assert_eq!(archived[0].key().unwrap().score(), clock.now().timestamp());
    }

    #[tokio::test]
    async fn archived_task_cannot_be_run_or_killed() {
        let clock = clock();
        let store = InMemoryInspector::with_clock(clock.clone());
        let key = store
            .add_archived(&q("email"), "email:send", vec![], clock.now(), retry_info())
            .await;

        let err = store.run_task(&key).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        let err = store.archive_task(&key, ArchiveReason::Operator).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        store.delete_task(&key).await.unwrap();
        assert!(store.snapshot(&q("email"), TaskState::Archived).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_queue_requires_empty() {
        let store = InMemoryInspector::with_clock(clock());
        let id = store.enqueue(&q("email"), "email:send", vec![]).await;

        let err = store.delete_queue(&q("email")).await.unwrap_err();
        assert_eq!(
            err,
            AdminError::QueueNotEmpty {
                queue: "email".to_string(),
                remaining: 1
            }
        );

        store.activate(&q("email")).await.unwrap();
        store.complete(&q("email"), &id).await;
        store.delete_queue(&q("email")).await.unwrap();
        assert!(store.queues().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn paused_queue_is_not_dequeued() {
        let store = InMemoryInspector::with_clock(clock());
        store.enqueue(&q("email"), "email:send", vec![]).await;
        store.pause_queue(&q("email")).await.unwrap();

        assert!(store.activate(&q("email")).await.is_none());
        store.resume_queue(&q("email")).await.unwrap();
        assert!(store.activate(&q("email")).await.is_some());
    }

    #[tokio::test]
    async fn history_buckets_by_period() {
        let clock = clock();
        let store = InMemoryInspector::with_clock(clock.clone());
        for fail in [false, true, false] {
            let id = store.enqueue(&q("email"), "email:send", vec![]).await;
            store.activate(&q("email")).await.unwrap();
            if fail {
                store.fail(&q("email"), &id, "boom", None).await.unwrap();
            } else {
                store.complete(&q("email"), &id).await;
            }
        }

        let days = store.history(&q("email"), Period::Day, 2).await.unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!((days[0].processed, days[0].failed), (3, 1));
        assert_eq!((days[1].processed, days[1].failed), (0, 0));

        let info = store.queue_info(&q("email")).await.unwrap();
        assert_eq!(info.processed_today, 3);
        assert_eq!(info.failed_today, 1);
        assert_eq!(info.counts.completed, 2);
        assert_eq!(info.counts.archived, 1);
    }

    #[tokio::test]
    async fn enqueue_events_are_capped_newest_first() {
        let clock = clock();
        let store = InMemoryInspector::with_clock(clock.clone()).with_event_retention(2);
        let entry = store
            .add_scheduler_entry("@every 1m", "report:daily", clock.now())
            .await;
        for minute in 0..3 {
            let task_id = TaskId::parse(&format!("t{minute}")).unwrap();
            let at = clock.now() + chrono::Duration::minutes(minute);
            assert!(store.record_enqueue_event(&entry, task_id, at).await);
        }

        let events = store.enqueue_events(&entry).await.unwrap();
        let ids: Vec<_> = events.iter().map(|e| e.task_id.as_str()).collect();
        assert_eq!(ids, vec!["t2", "t1"]);
    }

    #[tokio::test]
    async fn closed_store_is_unavailable() {
        let store = InMemoryInspector::with_clock(clock());
        store.enqueue(&q("email"), "email:send", vec![]).await;
        store.close().await.unwrap();

        let err = store.queues().await.unwrap_err();
        assert!(err.is_store_unavailable());
    }
}
