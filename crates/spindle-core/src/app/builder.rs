//! ConsoleBuilder - AdminConsole の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - Inspector がなければ build() は BuildError::MissingInspector
//! - 設定値は build() 時に検証し、不正なら BuildError::InvalidConfig

use std::sync::Arc;

use crate::app::batch::BatchCoordinator;
use crate::app::console::AdminConsole;
use crate::app::lifecycle::LifecycleEngine;
use crate::app::query::{PageLimits, TaskQuery};
use crate::app::registry::QueueRegistry;
use crate::app::scheduler::SchedulerObserver;
use crate::app::store::StoreHandle;
use crate::config::{AdminConfig, ConfigError};
use crate::ports::{Clock, Inspector, StoreDiagnostics, SystemClock};

/// ConsoleBuilder は AdminConsole を構築
///
/// # 使用例
/// ```ignore
/// let console = ConsoleBuilder::new()
///     .inspector(Arc::new(InMemoryInspector::new()))
///     .config(AdminConfig::from_env()?)
///     .build()?;
/// ```
pub struct ConsoleBuilder {
    inspector: Option<Arc<dyn Inspector>>,
    diagnostics: Option<Arc<dyn StoreDiagnostics>>,
    clock: Option<Arc<dyn Clock>>,
    config: AdminConfig,
}

/// BuildError は AdminConsole 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("No Inspector was given. The console needs a store to act on.")]
    MissingInspector,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl ConsoleBuilder {
    pub fn new() -> Self {
        Self {
            inspector: None,
            diagnostics: None,
            clock: None,
            config: AdminConfig::default(),
        }
    }

    /// 操作対象の store（必須）
    pub fn inspector(mut self, inspector: Arc<dyn Inspector>) -> Self {
        self.inspector = Some(inspector);
        self
    }

    /// store の診断情報（省略時、store_info は StoreUnavailable）
    pub fn diagnostics(mut self, diagnostics: Arc<dyn StoreDiagnostics>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// 省略時は SystemClock
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn config(mut self, config: AdminConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<AdminConsole, BuildError> {
        self.config.validate()?;
        let inspector = self.inspector.ok_or(BuildError::MissingInspector)?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let store = StoreHandle::new(inspector, self.config.store_timeout());
        let engine = LifecycleEngine::new(store.clone());
        let limits = PageLimits {
            default_size: self.config.default_page_size,
            max_size: self.config.max_page_size,
        };

        Ok(AdminConsole {
            registry: QueueRegistry::new(
                store.clone(),
                clock,
                self.config.max_history_periods,
            ),
            query: TaskQuery::new(store.clone(), limits),
            batch: BatchCoordinator::new(store.clone(), engine.clone()),
            scheduler: SchedulerObserver::new(store.clone(), self.config.max_events),
            engine,
            diagnostics: self.diagnostics,
            store,
        })
    }
}

impl Default for ConsoleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::InMemoryInspector;

    #[test]
    fn build_success() {
        let console = ConsoleBuilder::new()
            .inspector(Arc::new(InMemoryInspector::new()))
            .build();
        assert!(console.is_ok());
    }

    #[test]
    fn build_missing_inspector() {
        let console = ConsoleBuilder::new().build();
        assert!(matches!(console, Err(BuildError::MissingInspector)));
    }

    #[test]
    fn build_invalid_config() {
        let console = ConsoleBuilder::new()
            .inspector(Arc::new(InMemoryInspector::new()))
            .config(AdminConfig::default().with_page_sizes(0, 10))
            .build();
        assert!(matches!(console, Err(BuildError::InvalidConfig(_))));
    }
}
