//! Impls - 実装
//!
//! このモジュールには ports の実装を含めます。
//!
//! # 含まれる実装
//! - **InMemoryInspector**: テスト・デモ用の task store
//! - **RedisDiagnostics**: Redis の `INFO` を読む
//! - **StaticDiagnostics**: 固定値を返す診断（InMemoryInspector と組み合わせる）

pub mod diagnostics;
pub mod memory;

pub use self::diagnostics::{RedisDiagnostics, StaticDiagnostics, parse_info};
pub use self::memory::{DEFAULT_EVENT_RETENTION, InMemoryInspector};
