//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」。各 trait は外部システム
//! （Redis の task store、store の診断情報、時刻、ID 生成）への
//! インターフェースを提供し、実装の詳細を隠蔽します。

pub mod clock;
pub mod diagnostics;
pub mod id_generator;
pub mod inspector;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::diagnostics::StoreDiagnostics;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::inspector::Inspector;
