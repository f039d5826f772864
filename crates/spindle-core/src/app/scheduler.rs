//! Read-only view of scheduler entries and their firing history.

use tracing::debug;

use crate::app::store::StoreHandle;
use crate::domain::{AdminError, EnqueueEvent, EntryId, Result, SchedulerEntry};

#[derive(Clone)]
pub struct SchedulerObserver {
    store: StoreHandle,
    max_events: u32,
}

impl SchedulerObserver {
    pub fn new(store: StoreHandle, max_events: u32) -> Self {
        Self { store, max_events }
    }

    /// Every registered entry, soonest next firing first.
    pub async fn entries(&self) -> Result<Vec<SchedulerEntry>> {
        let mut entries = self.store.scheduler_entries().await?;
        entries.sort_by(|a, b| {
            a.next_enqueue_at
                .cmp(&b.next_enqueue_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(entries)
    }

    /// The most recent firings of `entry`, newest first.
    ///
    /// Only what the store still retains is returned; older events are gone.
    pub async fn enqueue_events(
        &self,
        entry: &EntryId,
        limit: Option<u32>,
    ) -> Result<Vec<EnqueueEvent>> {
        let limit = limit.unwrap_or(self.max_events);
        if limit == 0 || limit > self.max_events {
            return Err(AdminError::validation(
                "limit",
                format!("must be between 1 and {}", self.max_events),
            ));
        }
        let mut events = self.store.enqueue_events(entry).await?;
        events.sort_by(|a, b| b.enqueued_at.cmp(&a.enqueued_at));
        events.truncate(limit as usize);
        debug!(entry = %entry, returned = events.len(), "Listed enqueue events");
        Ok(events)
    }
}
