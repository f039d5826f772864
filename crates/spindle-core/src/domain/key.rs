//! Task keys: state-scoped locators.
//!
//! A key names the queue, the partition the task lives in and the task's
//! score inside that partition. The string form is `<prefix>:<id>:<score>`
//! where prefix is `s`, `r` or `a` and the score is unix seconds (next process
//! time for scheduled/retry, archive time for archived). A key stops resolving
//! as soon as the task leaves that partition or is re-scored.

use serde::{Serialize, Serializer};
use std::fmt;

use super::errors::AdminError;
use super::ids::{KEY_SEPARATOR, QueueName, TaskId};
use super::state::KeyedState;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskKey {
    queue: QueueName,
    state: KeyedState,
    id: TaskId,
    score: i64,
}

impl TaskKey {
    pub fn new(queue: QueueName, state: KeyedState, id: TaskId, score: i64) -> Self {
        Self {
            queue,
            state,
            id,
            score,
        }
    }

    /// Parse the string form of a key inside `queue`.
    pub fn parse(queue: &QueueName, raw: &str) -> Result<Self, AdminError> {
        let malformed = |reason: &str| {
            AdminError::validation("task key", format!("{raw:?}: {reason}"))
        };

        let mut parts = raw.splitn(3, KEY_SEPARATOR);
        let (Some(prefix), Some(id), Some(score)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed("expected <prefix>:<id>:<score>"));
        };
        let state = KeyedState::from_prefix(prefix)
            .ok_or_else(|| malformed("prefix must be one of s, r, a"))?;
        let id = TaskId::parse(id).map_err(|_| malformed("bad task id"))?;
        let score = score
            .parse::<i64>()
            .map_err(|_| malformed("score is not an integer"))?;

        Ok(Self::new(queue.clone(), state, id, score))
    }

    pub fn queue(&self) -> &QueueName {
        &self.queue
    }

    pub fn state(&self) -> KeyedState {
        self.state
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn score(&self) -> i64 {
        self.score
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.state.prefix(),
            self.id,
            self.score,
            sep = KEY_SEPARATOR
        )
    }
}

/// Keys serialize as their string form; the queue is implied by context.
impl Serialize for TaskKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
