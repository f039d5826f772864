//! Outcome model: result shapes of administrative operations.
//!
//! Batch operations never fail as a whole because one item failed. They
//! return a `BatchOutcome` whose failure list names each item that did not
//! apply and why.

use serde::Serialize;

use super::errors::{AdminError, ErrorKind};
use super::ids::TaskId;

/// Why one item of a batch did not apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure<K> {
    pub item: K,
    pub kind: ErrorKind,
    pub message: String,
}

/// Aggregate result of a batch.
///
/// `failures` keeps the order in which items were attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome<K> {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<BatchFailure<K>>,
}

impl<K> BatchOutcome<K> {
    pub fn new() -> Self {
        Self {
            attempted: 0,
            succeeded: 0,
            failures: Vec::new(),
        }
    }

    pub fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, item: K, error: &AdminError) {
        self.attempted += 1;
        self.failures.push(BatchFailure {
            item,
            kind: error.kind(),
            message: error.to_string(),
        });
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failure kind recorded for `item`, if it failed.
    pub fn failure_for(&self, item: &K) -> Option<ErrorKind>
    where
        K: PartialEq,
    {
        self.failures
            .iter()
            .find(|f| &f.item == item)
            .map(|f| f.kind)
    }
}

impl<K> Default for BatchOutcome<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of cancelling one active task.
///
/// `was_active` is false when no active task had that id at signal time.
/// That is still a success: the task most likely finished first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelReport {
    pub task_id: TaskId,
    pub was_active: bool,
}
