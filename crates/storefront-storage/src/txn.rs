//! The mutation surface handed to staged work.

use std::sync::Arc;

use crate::graph::{Graph, StagedChanges};
use crate::records::StorageRecord;
use crate::table::SearchKey;

/// An overlay of pending writes on top of a canonical snapshot.
///
/// Reads see the overlay first and fall through to the snapshot. Nothing
/// written here is visible to readers until the owning staging context
/// commits.
pub struct StagingTxn {
    base: Arc<Graph>,
    changes: StagedChanges,
}

impl StagingTxn {
    pub(crate) fn new(base: Arc<Graph>) -> Self {
        Self {
            base,
            changes: StagedChanges::default(),
        }
    }

    /// Looks up a record by composite key.
    pub fn load<R: StorageRecord>(&self, key: &R::Key) -> Option<&R> {
        match R::changes(&self.changes).rows.get(key) {
            Some(staged) => staged.as_ref(),
            None => R::table(&self.base).get(key),
        }
    }

    /// Mutable access to a record. The first call copies it into the overlay.
    pub fn load_mut<R: StorageRecord>(&mut self, key: &R::Key) -> Option<&mut R> {
        let staged = R::changes_mut(&mut self.changes);
        if !staged.rows.contains_key(key) {
            let current = R::table(&self.base).get(key)?;
            staged.bases.insert(key.clone(), current.clone());
            staged.rows.insert(key.clone(), Some(current.clone()));
        }
        staged.rows.get_mut(key).and_then(Option::as_mut)
    }

    pub fn contains<R: StorageRecord>(&self, key: &R::Key) -> bool {
        self.load::<R>(key).is_some()
    }

    /// Inserts or replaces the record stored under `record.key()`.
    pub fn insert<R: StorageRecord>(&mut self, record: R) {
        let key = record.key();
        let staged = R::changes_mut(&mut self.changes);
        if !staged.rows.contains_key(&key) {
            if let Some(current) = R::table(&self.base).get(&key) {
                staged.bases.insert(key.clone(), current.clone());
            }
        }
        staged.rows.insert(key, Some(record));
    }

    /// Deletes a record. Returns whether it existed.
    pub fn delete<R: StorageRecord>(&mut self, key: &R::Key) -> bool {
        let existed = self.contains::<R>(key);
        if existed {
            R::changes_mut(&mut self.changes)
                .rows
                .insert(key.clone(), None);
        }
        existed
    }

    /// Keys of every live record matching `predicate`.
    pub fn keys_matching<R, P>(&self, predicate: P) -> Vec<R::Key>
    where
        R: StorageRecord,
        P: Fn(&R) -> bool,
    {
        self.records_matching::<R, _>(predicate)
            .into_iter()
            .map(StorageRecord::key)
            .collect()
    }

    /// Every live record matching `predicate`, in key order.
    pub fn records_matching<R, P>(&self, predicate: P) -> Vec<&R>
    where
        R: StorageRecord,
        P: Fn(&R) -> bool,
    {
        let staged = &R::changes(&self.changes).rows;
        let mut matched: Vec<&R> = R::table(&self.base)
            .iter()
            .filter(|record| !staged.contains_key(&record.key()))
            .chain(staged.values().filter_map(Option::as_ref))
            .filter(|record| predicate(*record))
            .collect();
        matched.sort_by_key(|record| record.key());
        matched
    }

    /// Deletes every live record matching `predicate`. Returns the count.
    pub fn delete_matching<R, P>(&mut self, predicate: P) -> usize
    where
        R: StorageRecord,
        P: Fn(&R) -> bool,
    {
        let keys = self.keys_matching::<R, _>(predicate);
        let staged = R::changes_mut(&mut self.changes);
        for key in &keys {
            staged.rows.insert(key.clone(), None);
        }
        keys.len()
    }

    /// Current members of a search result, dangling members included.
    pub fn search_members<R: StorageRecord>(&self, key: &SearchKey) -> Vec<R::Key> {
        match R::changes(&self.changes).searches.get(key) {
            Some(members) => members.clone(),
            None => R::table(&self.base)
                .search_members(key)
                .map(<[R::Key]>::to_vec)
                .unwrap_or_default(),
        }
    }

    /// Replaces the membership of a search result.
    pub fn set_search_members<R: StorageRecord>(&mut self, key: SearchKey, members: Vec<R::Key>) {
        let mut deduped: Vec<R::Key> = Vec::with_capacity(members.len());
        for member in members {
            if !deduped.contains(&member) {
                deduped.push(member);
            }
        }
        R::changes_mut(&mut self.changes)
            .searches
            .insert(key, deduped);
    }

    /// Appends members to a search result, keeping existing ones first.
    pub fn extend_search_members<R: StorageRecord>(
        &mut self,
        key: SearchKey,
        members: impl IntoIterator<Item = R::Key>,
    ) {
        let mut current = self.search_members::<R>(&key);
        current.extend(members);
        self.set_search_members::<R>(key, current);
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Moves onto a newer snapshot. Only valid while the overlay is empty.
    pub(crate) fn rebase(&mut self, base: Arc<Graph>) {
        debug_assert!(self.changes.is_empty());
        self.base = base;
    }

    pub(crate) fn take_changes(&mut self) -> StagedChanges {
        std::mem::take(&mut self.changes)
    }
}
