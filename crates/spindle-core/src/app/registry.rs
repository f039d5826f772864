//! QueueRegistry - キューの一覧・詳細・pause/resume・削除・統計
//!
//! キューの状態は毎回 store から読み直します（キャッシュしない）。

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::app::store::StoreHandle;
use crate::domain::{
    AdminError, PauseReport, Period, PeriodStats, QueueHistory, QueueInfo, QueueName, Result,
    StatsReport,
};
use crate::ports::Clock;

/// Which queues a stats request covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsScope {
    Queue(QueueName),
    All,
}

#[derive(Clone)]
pub struct QueueRegistry {
    store: StoreHandle,
    clock: Arc<dyn Clock>,
    max_history_periods: u32,
}

impl QueueRegistry {
    pub fn new(store: StoreHandle, clock: Arc<dyn Clock>, max_history_periods: u32) -> Self {
        Self {
            store,
            clock,
            max_history_periods,
        }
    }

    /// Every queue with its counters.
    ///
    /// A queue deleted between enumeration and its detail fetch is reported
    /// as empty instead of failing the listing.
    pub async fn list(&self) -> Result<Vec<QueueInfo>> {
        let names = self.store.queues().await?;
        let mut queues = Vec::with_capacity(names.len());
        for name in names {
            match self.store.queue_info(&name).await {
                Ok(info) => queues.push(info),
                Err(AdminError::NotFound { .. }) => {
                    debug!(queue = %name, "Queue vanished during listing");
                    queues.push(QueueInfo::vanished(name, self.clock.now()));
                }
                Err(err) => return Err(err),
            }
        }
        Ok(queues)
    }

    pub async fn get(&self, queue: &QueueName) -> Result<QueueInfo> {
        self.store.queue_info(queue).await
    }

    /// Idempotent. The second call reports `changed: false`.
    pub async fn pause(&self, queue: &QueueName) -> Result<PauseReport> {
        let changed = self.store.pause_queue(queue).await?;
        info!(queue = %queue, changed, "Queue paused");
        Ok(PauseReport {
            queue: queue.clone(),
            paused: true,
            changed,
        })
    }

    pub async fn resume(&self, queue: &QueueName) -> Result<PauseReport> {
        let changed = self.store.resume_queue(queue).await?;
        info!(queue = %queue, changed, "Queue resumed");
        Ok(PauseReport {
            queue: queue.clone(),
            paused: false,
            changed,
        })
    }

    /// Delete an empty queue.
    ///
    /// The counters checked here give the common error early; the store
    /// re-checks emptiness atomically with the removal.
    pub async fn delete(&self, queue: &QueueName) -> Result<()> {
        let info = self.store.queue_info(queue).await?;
        let remaining = info.counts.live();
        if remaining > 0 {
            return Err(AdminError::QueueNotEmpty {
                queue: queue.to_string(),
                remaining,
            });
        }
        self.store.delete_queue(queue).await?;
        info!(queue = %queue, "Queue deleted");
        Ok(())
    }

    /// Processed/failed counters for the last `periods` periods.
    pub async fn stats(
        &self,
        scope: StatsScope,
        period: Period,
        periods: u32,
    ) -> Result<StatsReport> {
        if periods == 0 || periods > self.max_history_periods {
            return Err(AdminError::validation(
                "periods",
                format!("must be between 1 and {}", self.max_history_periods),
            ));
        }

        let (names, tolerate_vanished) = match scope {
            StatsScope::Queue(queue) => (vec![queue], false),
            StatsScope::All => (self.store.queues().await?, true),
        };

        let mut queues = Vec::with_capacity(names.len());
        for name in names {
            match self.store.history(&name, period, periods).await {
                Ok(history) => queues.push(QueueHistory {
                    queue: name,
                    periods: history,
                }),
                Err(AdminError::NotFound { .. }) if tolerate_vanished => {
                    debug!(queue = %name, "Queue vanished during stats");
                }
                Err(err) => return Err(err),
            }
        }

        let totals = merge_totals(&queues);
        Ok(StatsReport {
            period,
            queues,
            totals,
        })
    }
}

/// Sum the per-queue counters by period start, newest first.
fn merge_totals(queues: &[QueueHistory]) -> Vec<PeriodStats> {
    let mut by_start: BTreeMap<DateTime<Utc>, (u64, u64)> = BTreeMap::new();
    for stats in queues.iter().flat_map(|q| &q.periods) {
        let slot = by_start.entry(stats.start).or_default();
        slot.0 += stats.processed;
        slot.1 += stats.failed;
    }
    by_start
        .into_iter()
        .rev()
        .map(|(start, (processed, failed))| PeriodStats {
            start,
            processed,
            failed,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::impls::InMemoryInspector;
    use crate::ports::{FixedClock, Inspector};
    use chrono::TimeZone;
    use std::time::Duration;

    fn q(name: &str) -> QueueName {
        QueueName::parse(name).unwrap()
    }

    fn setup() -> (Arc<InMemoryInspector>, QueueRegistry) {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
        let inspector = Arc::new(InMemoryInspector::with_clock(clock.clone()));
        let store = StoreHandle::new(inspector.clone(), Duration::from_secs(1));
        (inspector, QueueRegistry::new(store, Arc::new(clock), 30))
    }

    #[tokio::test]
    async fn get_unknown_queue_is_not_found() {
        let (_, registry) = setup();
        let err = registry.get(&q("nope")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test(start_paused = true)]
    async fn list_reports_queue_deleted_mid_listing_as_empty() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
        let inspector = Arc::new(
            InMemoryInspector::with_clock(clock.clone()).with_latency(Duration::from_millis(100)),
        );
        let store = StoreHandle::new(inspector.clone(), Duration::from_secs(1));
        let registry = QueueRegistry::new(store, Arc::new(clock), 30);

        inspector.enqueue(&q("a"), "job", vec![]).await;
        let id = inspector.enqueue(&q("b"), "job", vec![]).await;
        inspector.activate(&q("b")).await.unwrap();
        inspector.complete(&q("b"), &id).await;

        // lands after the names are read, before b's details are fetched
        let deleter = inspector.clone();
        let delete = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            deleter.delete_queue(&q("b")).await
        });

        let queues = registry.list().await.unwrap();
        delete.await.unwrap().unwrap();

        let listed: Vec<(String, u64)> = queues
            .iter()
            .map(|info| (info.name.to_string(), info.size()))
            .collect();
        assert_eq!(listed, vec![("a".to_string(), 1), ("b".to_string(), 0)]);
        assert!(registry.get(&q("b")).await.is_err());
    }

    #[tokio::test]
    async fn resume_twice_reports_no_change() {
        let (inspector, registry) = setup();
        inspector.enqueue(&q("email"), "email:send", vec![]).await;
        registry.pause(&q("email")).await.unwrap();

        assert!(registry.resume(&q("email")).await.unwrap().changed);
        assert!(!registry.resume(&q("email")).await.unwrap().changed);
        assert!(!registry.get(&q("email")).await.unwrap().paused);
    }

    #[tokio::test]
    async fn delete_counts_active_tasks() {
        let (inspector, registry) = setup();
        inspector.enqueue(&q("email"), "email:send", vec![]).await;
        inspector.activate(&q("email")).await.unwrap();

        let err = registry.delete(&q("email")).await.unwrap_err();
        assert_eq!(
            err,
            AdminError::QueueNotEmpty {
                queue: "email".to_string(),
                remaining: 1
            }
        );
    }

    #[tokio::test]
    async fn stats_totals_sum_queues() {
        let (inspector, registry) = setup();
        for name in ["email", "billing"] {
            let id = inspector.enqueue(&q(name), "job", vec![]).await;
            inspector.activate(&q(name)).await.unwrap();
            inspector.complete(&q(name), &id).await;
        }

        let report = registry.stats(StatsScope::All, Period::Hour, 3).await.unwrap();
        assert_eq!(report.queues.len(), 2);
        assert_eq!(report.totals.len(), 3);
        assert_eq!(report.totals[0].processed, 2);
        assert!(report.totals[0].start > report.totals[1].start);
    }

    #[tokio::test]
    async fn stats_window_is_bounded() {
        let (inspector, registry) = setup();
        inspector.enqueue(&q("email"), "email:send", vec![]).await;

        for periods in [0, 31] {
            let err = registry
                .stats(StatsScope::Queue(q("email")), Period::Day, periods)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn merge_totals_handles_no_queues() {
        assert!(merge_totals(&[]).is_empty());
    }
}
