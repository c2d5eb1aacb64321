//! Keyed tables and the change sets staged against them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

use crate::records::StorageRecord;

/// Identifies one remote search: `(site_id, keyword[, filter])`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SearchKey {
    pub site_id: i64,
    pub keyword: String,
    pub filter: Option<String>,
}

impl SearchKey {
    pub fn new(site_id: i64, keyword: impl Into<String>) -> Self {
        Self {
            site_id,
            keyword: keyword.into(),
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filter {
            Some(filter) => write!(f, "{}:{}[{}]", self.site_id, self.keyword, filter),
            None => write!(f, "{}:{}", self.site_id, self.keyword),
        }
    }
}

/// All records of one kind, plus the search results indexing them.
///
/// Search results hold keys only. A member whose record is gone is skipped
/// when read.
#[derive(Debug, Clone)]
pub struct Table<R: StorageRecord> {
    rows: BTreeMap<R::Key, R>,
    searches: BTreeMap<SearchKey, Vec<R::Key>>,
}

impl<R: StorageRecord> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            searches: BTreeMap::new(),
        }
    }
}

/// Counts produced when a change set is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyCounts {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl<R: StorageRecord> Table<R> {
    pub fn get(&self, key: &R::Key) -> Option<&R> {
        self.rows.get(key)
    }

    pub fn contains(&self, key: &R::Key) -> bool {
        self.rows.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.rows.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &R::Key> {
        self.rows.keys()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn search_members(&self, key: &SearchKey) -> Option<&[R::Key]> {
        self.searches.get(key).map(Vec::as_slice)
    }

    pub(crate) fn searches(&self) -> impl Iterator<Item = (&SearchKey, &Vec<R::Key>)> {
        self.searches.iter()
    }

    pub(crate) fn insert_row(&mut self, record: R) {
        self.rows.insert(record.key(), record);
    }

    pub(crate) fn insert_search(&mut self, key: SearchKey, members: Vec<R::Key>) {
        self.searches.insert(key, members);
    }

    /// Applies a staged change set, last writer wins per key.
    pub(crate) fn apply(&mut self, changes: &TableChanges<R>) -> ApplyCounts {
        let mut counts = ApplyCounts::default();
        for (key, row) in &changes.rows {
            match row {
                Some(record) => {
                    if self.rows.insert(key.clone(), record.clone()).is_some() {
                        counts.updated += 1;
                    } else {
                        counts.inserted += 1;
                    }
                }
                None => {
                    if self.rows.remove(key).is_some() {
                        counts.deleted += 1;
                    }
                }
            }
        }
        for (key, members) in &changes.searches {
            self.searches.insert(key.clone(), members.clone());
        }
        counts
    }
}

/// Pending writes for one table. `None` marks a deletion.
#[derive(Debug, Clone)]
pub struct TableChanges<R: StorageRecord> {
    pub(crate) rows: BTreeMap<R::Key, Option<R>>,
    pub(crate) searches: BTreeMap<SearchKey, Vec<R::Key>>,
    /// The published copy each staged row started from.
    pub(crate) bases: BTreeMap<R::Key, R>,
}

impl<R: StorageRecord> Default for TableChanges<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            searches: BTreeMap::new(),
            bases: BTreeMap::new(),
        }
    }
}

impl<R: StorageRecord> TableChanges<R> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.searches.is_empty()
    }

    pub fn upserts(&self) -> impl Iterator<Item = &R> {
        self.rows.values().filter_map(Option::as_ref)
    }

    pub fn deletions(&self) -> impl Iterator<Item = &R::Key> {
        self.rows
            .iter()
            .filter_map(|(key, row)| row.is_none().then_some(key))
    }

    pub fn search_updates(&self) -> impl Iterator<Item = (&SearchKey, &Vec<R::Key>)> {
        self.searches.iter()
    }

    /// Folds in what other contexts published since the staged rows were
    /// copied.
    ///
    /// A staged row whose published copy moved on keeps the fields this
    /// context changed and takes every other field from `latest`. A row
    /// deleted by another context stays deleted. Returns the number of rows
    /// adjusted.
    pub(crate) fn rebase_onto(&mut self, latest: &Table<R>) -> usize {
        let mut adjusted = 0;
        for (key, base) in std::mem::take(&mut self.bases) {
            let Some(Some(staged)) = self.rows.get(&key) else {
                continue;
            };
            match latest.get(&key) {
                Some(current) if *current == base => {}
                Some(current) => {
                    let merged = merge_fields(&base, staged, current);
                    self.rows.insert(key, Some(merged));
                    adjusted += 1;
                }
                None => {
                    self.rows.remove(&key);
                    adjusted += 1;
                }
            }
        }
        adjusted
    }
}

/// Three-way merge over top-level fields: a field `staged` left as it was
/// in `base` takes its value from `current`.
fn merge_fields<R: StorageRecord>(base: &R, staged: &R, current: &R) -> R {
    match try_merge_fields(base, staged, current) {
        Ok(merged) => merged,
        Err(error) => {
            warn!(
                kind = %R::KIND,
                key = %staged.key(),
                error = %error,
                "storage: could not merge concurrent write, keeping staged copy"
            );
            staged.clone()
        }
    }
}

fn try_merge_fields<R: StorageRecord>(
    base: &R,
    staged: &R,
    current: &R,
) -> serde_json::Result<R> {
    let base = serde_json::to_value(base)?;
    let current = serde_json::to_value(current)?;
    let mut merged = serde_json::to_value(staged)?;

    if let (Value::Object(base), Value::Object(current), Value::Object(fields)) =
        (&base, &current, &mut merged)
    {
        for (field, value) in fields.iter_mut() {
            if base.get(field) == Some(&*value) {
                if let Some(newer) = current.get(field) {
                    *value = newer.clone();
                }
            }
        }
    }
    serde_json::from_value(merged)
}
