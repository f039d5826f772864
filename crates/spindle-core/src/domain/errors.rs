//! Errors - エラー型と分類
//!
//! Every operation reports exactly one `AdminError`; batch operations report
//! per-item `ErrorKind`s inside a successful result instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::{TaskOp, TaskState};

pub type Result<T> = std::result::Result<T, AdminError>;

/// ErrorKind は AdminError の分類（batch の失敗マップで使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    QueueNotEmpty,
    StoreUnavailable,
    Validation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    /// Queue, task or scheduler entry is absent (or moved to another state).
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    /// The operation is not legal for the task's current state.
    #[error("cannot {op} a task in {state} state")]
    InvalidState { op: TaskOp, state: TaskState },

    #[error("queue {queue} is not empty ({remaining} tasks left)")]
    QueueNotEmpty { queue: String, remaining: u64 },

    /// The backing store is unreachable, closed or too slow.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Malformed identifier, selector or pagination parameter.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
}

impl AdminError {
    pub fn not_found(what: &'static str, id: impl ToString) -> Self {
        AdminError::NotFound {
            what,
            id: id.to_string(),
        }
    }

    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        AdminError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        AdminError::StoreUnavailable(reason.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminError::NotFound { .. } => ErrorKind::NotFound,
            AdminError::InvalidState { .. } => ErrorKind::InvalidState,
            AdminError::QueueNotEmpty { .. } => ErrorKind::QueueNotEmpty,
            AdminError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            AdminError::Validation { .. } => ErrorKind::Validation,
        }
    }

    pub fn is_store_unavailable(&self) -> bool {
        self.kind() == ErrorKind::StoreUnavailable
    }
}
