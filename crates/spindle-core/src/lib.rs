//! spindle-core
//!
//! Administrative control plane for a Redis-backed task queue.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, key, state, task, queue, scheduler, server, errors, outcome）
//! - **ports**: 抽象化レイヤー（Inspector, StoreDiagnostics, Clock, IdGenerator）
//! - **impls**: 実装（InMemoryInspector, RedisDiagnostics, StaticDiagnostics）
//! - **app**: 管理操作（LifecycleEngine, BatchCoordinator, QueueRegistry, TaskQuery,
//!   SchedulerObserver, AdminConsole, ConsoleBuilder）
//! - **config**: `SPINDLE_*` 環境変数からの設定
//! - **observability**: tracing subscriber の初期化

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;

pub use self::app::{AdminConsole, BuildError, ConsoleBuilder, StatusClass};
pub use self::config::{AdminConfig, ConfigError, LogConfig};
pub use self::domain::{AdminError, ErrorKind, Result};
