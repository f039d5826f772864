//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせて管理操作を実装します。
//!
//! # 主要コンポーネント
//! - **StoreHandle**: Inspector にタイムアウトを付けた共有ハンドル
//! - **LifecycleEngine**: タスク単位の遷移（run / kill / delete / cancel）
//! - **BatchCoordinator**: 複数タスクへの同一遷移、項目ごとの結果集計
//! - **QueueRegistry**: キューの一覧・pause/resume・削除・統計
//! - **TaskQuery**: 状態ごとのタスク一覧とページング
//! - **SchedulerObserver**: scheduler entry と enqueue 履歴
//! - **AdminConsole**: 上記をまとめた操作面（ConsoleBuilder で構築）

pub mod batch;
pub mod builder;
pub mod console;
pub mod lifecycle;
pub mod query;
pub mod registry;
pub mod scheduler;
pub mod status;
pub mod store;

// 主要な型を再エクスポート
pub use self::batch::{BatchCoordinator, Selector};
pub use self::builder::{BuildError, ConsoleBuilder};
pub use self::console::AdminConsole;
pub use self::lifecycle::LifecycleEngine;
pub use self::query::{PageLimits, Pagination, TaskPage, TaskQuery, TaskRow};
pub use self::registry::{QueueRegistry, StatsScope};
pub use self::scheduler::SchedulerObserver;
pub use self::status::StatusClass;
pub use self::store::StoreHandle;
