//! Task state machine as seen from the control plane.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::AdminError;

/// Task state.
///
/// Transitions the control plane may request:
/// - Scheduled -> Pending (run), Scheduled -> Archived (kill), Scheduled -> removed (delete)
/// - Retry -> Pending (run), Retry -> Archived (kill), Retry -> removed (delete)
/// - Archived -> removed (delete)
/// - Active: cancel only signals the worker, the worker picks the next state
/// - Pending: nothing is exposed
///
/// Completed tasks are only counted, never addressed, so they have no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Being processed by a worker.
    Active,

    /// Waiting to be dequeued.
    Pending,

    /// Waiting for its process time.
    Scheduled,

    /// Failed, waiting for the next retry.
    Retry,

    /// Retries exhausted or killed by an operator ("dead").
    Archived,
}

impl TaskState {
    pub const ALL: [TaskState; 5] = [
        TaskState::Active,
        TaskState::Pending,
        TaskState::Scheduled,
        TaskState::Retry,
        TaskState::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Active => "active",
            TaskState::Pending => "pending",
            TaskState::Scheduled => "scheduled",
            TaskState::Retry => "retry",
            TaskState::Archived => "archived",
        }
    }

    /// Is `op` legal for a task currently in this state?
    pub fn allows(self, op: TaskOp) -> bool {
        use TaskOp::*;
        use TaskState::*;
        matches!(
            (self, op),
            (Scheduled | Retry, Run | Kill | Delete) | (Archived, Delete) | (Active, Cancel)
        )
    }

    /// The score-ordered partition this state lives in, if tasks in it are keyed.
    pub fn keyed(self) -> Option<KeyedState> {
        match self {
            TaskState::Scheduled => Some(KeyedState::Scheduled),
            TaskState::Retry => Some(KeyedState::Retry),
            TaskState::Archived => Some(KeyedState::Archived),
            TaskState::Active | TaskState::Pending => None,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskState {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(TaskState::Active),
            "pending" => Ok(TaskState::Pending),
            "scheduled" => Ok(TaskState::Scheduled),
            "retry" => Ok(TaskState::Retry),
            "archived" | "dead" => Ok(TaskState::Archived),
            other => Err(AdminError::validation(
                "state",
                format!("unknown task state {other:?}"),
            )),
        }
    }
}

/// States whose tasks are addressed by a [`TaskKey`](super::TaskKey).
///
/// Active and Pending tasks have no key, so a key can never point into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyedState {
    Scheduled,
    Retry,
    Archived,
}

impl KeyedState {
    pub fn state(self) -> TaskState {
        match self {
            KeyedState::Scheduled => TaskState::Scheduled,
            KeyedState::Retry => TaskState::Retry,
            KeyedState::Archived => TaskState::Archived,
        }
    }

    pub(crate) fn prefix(self) -> char {
        match self {
            KeyedState::Scheduled => 's',
            KeyedState::Retry => 'r',
            KeyedState::Archived => 'a',
        }
    }

    /// `d` is the old prefix for archived ("dead") tasks.
    pub(crate) fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "s" => Some(KeyedState::Scheduled),
            "r" => Some(KeyedState::Retry),
            "a" | "d" => Some(KeyedState::Archived),
            _ => None,
        }
    }
}

impl fmt::Display for KeyedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.state().fmt(f)
    }
}

/// Administrative operation on a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOp {
    Run,
    Kill,
    Delete,
    Cancel,
}

impl TaskOp {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskOp::Run => "run",
            TaskOp::Kill => "kill",
            TaskOp::Delete => "delete",
            TaskOp::Cancel => "cancel",
        }
    }

    /// State the task lands in when the op applies synchronously.
    /// `None` means removed (delete) or decided by the worker (cancel).
    pub fn target(self) -> Option<TaskState> {
        match self {
            TaskOp::Run => Some(TaskState::Pending),
            TaskOp::Kill => Some(TaskState::Archived),
            TaskOp::Delete | TaskOp::Cancel => None,
        }
    }
}

impl fmt::Display for TaskOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
