//! Domain identifiers (strongly-typed IDs).
//!
//! # Phantom Type パターン
//! `Id<T>` は文字列 ID の共通実装を提供し、`T` はコンパイル時だけに使う
//! マーカー型です。TaskId と EntryId は同じ表現（不透明な文字列）ですが、
//! 型が違うので混同できません。
//!
//! Task ids are minted by external producers (UUIDs in practice), so they are
//! treated as opaque strings. Locally minted ids are ULIDs.
//!
//! `QueueName` is a separate newtype because it has its own validation rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

use super::errors::AdminError;

/// Separator used inside task keys (`s:<id>:<score>`), so ids may not contain it.
pub(crate) const KEY_SEPARATOR: char = ':';

/// IdMarker は各 ID 型のマーカー trait
pub trait IdMarker: Send + Sync + 'static {
    /// Human readable name used in error messages ("task", "scheduler entry").
    fn kind() -> &'static str;
}

/// ジェネリック ID 型
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    value: String,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    /// Parse an id received from a caller.
    ///
    /// Rejects empty ids, whitespace and the key separator.
    pub fn parse(raw: &str) -> Result<Self, AdminError> {
        if raw.is_empty() {
            return Err(AdminError::validation(
                T::kind(),
                "identifier must not be empty",
            ));
        }
        if raw.contains(KEY_SEPARATOR) || raw.chars().any(char::is_whitespace) {
            return Err(AdminError::validation(
                T::kind(),
                format!("identifier {raw:?} contains ':' or whitespace"),
            ));
        }
        Ok(Self::from_trusted(raw.to_string()))
    }

    fn from_trusted(value: String) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_trusted(ulid.to_string().to_lowercase())
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Task のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {}

impl IdMarker for Task {
    fn kind() -> &'static str {
        "task"
    }
}

/// Scheduler entry のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Entry {}

impl IdMarker for Entry {
    fn kind() -> &'static str {
        "scheduler entry"
    }
}

/// Identifier of a task, stable for the task's whole lifetime.
pub type TaskId = Id<Task>;

/// Identifier of a periodic-enqueue definition.
pub type EntryId = Id<Entry>;

/// Name of a queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueName(String);

impl QueueName {
    pub fn parse(raw: &str) -> Result<Self, AdminError> {
        if raw.trim().is_empty() {
            return Err(AdminError::validation("queue", "queue name must not be empty"));
        }
        if raw.trim() != raw || raw.chars().any(char::is_control) {
            return Err(AdminError::validation(
                "queue",
                format!("queue name {raw:?} has surrounding whitespace or control characters"),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    #[test]
    fn ids_are_distinct_types() {
        let task = TaskId::parse("abc").unwrap();
        let entry = EntryId::parse("abc").unwrap();

        assert_eq!(task.as_str(), entry.as_str());
        // let _: EntryId = task; // <- does not compile
    }

    #[test]
    fn ulid_ids_are_lowercase_and_parse_back() {
        let id: TaskId = Ulid::new().into();
        let parsed = TaskId::parse(id.as_str()).unwrap();
        assert_eq!(id, parsed);
        assert_eq!(id.as_str(), id.as_str().to_lowercase());
    }

    #[test]
    fn id_rejects_separator_and_empty() {
        for raw in ["", "a:b", "with space"] {
            let err = TaskId::parse(raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{raw:?}");
        }
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = TaskId::parse("7c0a").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7c0a\"");
        let back: TaskId = serde_json::from_str("\"7c0a\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn queue_name_validation() {
        assert!(QueueName::parse("email").is_ok());
        assert!(QueueName::parse("critical:high").is_ok());
        assert!(QueueName::parse("").is_err());
        assert!(QueueName::parse("  ").is_err());
        assert!(QueueName::parse(" email").is_err());
    }
}
