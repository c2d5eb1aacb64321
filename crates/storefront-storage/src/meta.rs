//! Local identity for records and children.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Local identity of a persisted record or child.
///
/// Assigned once on insert and never rewritten by reconciliation, so it
/// tells "updated in place" apart from "deleted and recreated".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bookkeeping carried by every top-level record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    pub object_id: ObjectId,
    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordMeta {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            object_id: ObjectId::new(),
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Marks the record as written now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for RecordMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// A leaf child owned by value inside its parent record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child<T> {
    pub object_id: ObjectId,
    pub inserted_at: DateTime<Utc>,
    pub value: T,
}

impl<T> Child<T> {
    pub fn new(value: T) -> Self {
        Self {
            object_id: ObjectId::new(),
            inserted_at: Utc::now(),
            value,
        }
    }
}

/// Read-only projection of a child list.
pub fn values<T: Clone>(children: &[Child<T>]) -> Vec<T> {
    children.iter().map(|child| child.value.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_ids_are_unique() {
        assert_ne!(ObjectId::new(), ObjectId::new());
    }

    #[test]
    fn touch_keeps_identity_and_insert_time() {
        let mut meta = RecordMeta::new();
        let before = meta.clone();
        meta.touch();
        assert_eq!(meta.object_id, before.object_id);
        assert_eq!(meta.inserted_at, before.inserted_at);
        assert!(meta.updated_at >= before.updated_at);
    }
}
