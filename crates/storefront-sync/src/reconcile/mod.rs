//! Merging remote entities into the cache.
//!
//! Every store funnels its writes through [`reconcile`], which runs inside a
//! staging context:
//!
//! 1. Records are matched by composite key, never by position.
//! 2. A matched record keeps its local identity; only its fields change.
//! 3. Children are either rebuilt wholesale or matched by their own key
//!    (see [`children`]).
//! 4. Stale records are pruned only when the caller says the batch is
//!    authoritative for the scope.

pub mod children;
mod entities;

use std::collections::BTreeSet;

use storefront_storage::{StagingTxn, StorageRecord};

pub use children::{match_or_create_prune, replace_all, KeyedChild};
pub use entities::{reconcile_custom_fields, reconcile_notes, MetaDataParent};

/// A remote entity that can be written into the cache.
pub trait Upsertable: Clone + Send + Sync + 'static {
    type Record: StorageRecord;

    fn record_key(&self) -> <Self::Record as StorageRecord>::Key;

    /// Placeholders the remote hands out but that must never be cached.
    fn is_transient(&self) -> bool {
        false
    }

    /// A fresh record, children included.
    fn insert_record(&self) -> Self::Record;

    /// Brings an existing record in line with `self`, keeping its identity.
    fn update_record(&self, record: &mut Self::Record);

    /// Records that carry a search-only marker override this.
    fn set_exclusive_for_search(_record: &mut Self::Record, _exclusive: bool) {}
}

/// How existing records in scope are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Update matches in place, insert the rest.
    #[default]
    MergeInPlace,
    /// Delete everything in scope, then insert the batch.
    ReplaceAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileOptions {
    pub strategy: Strategy,
    /// Delete records in scope whose key is not in the batch.
    pub prune_stale: bool,
    /// Mark inserted records as only known through a search.
    pub search_only: bool,
}

impl ReconcileOptions {
    pub fn merge() -> Self {
        Self::default()
    }

    pub fn pruning(prune_stale: bool) -> Self {
        Self {
            prune_stale,
            ..Self::default()
        }
    }

    pub fn replace_all() -> Self {
        Self {
            strategy: Strategy::ReplaceAll,
            ..Self::default()
        }
    }

    pub fn search() -> Self {
        Self {
            search_only: true,
            ..Self::default()
        }
    }
}

/// What one reconcile pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    pub skipped: usize,
}

/// Merges `remotes` into the staged copy of the cache.
///
/// `scope` selects the records the batch speaks for. It only matters for
/// [`Strategy::ReplaceAll`] and stale pruning; records outside it are never
/// deleted.
pub fn reconcile<E, P>(
    txn: &mut StagingTxn,
    remotes: &[E],
    scope: P,
    options: ReconcileOptions,
) -> ReconcileReport
where
    E: Upsertable,
    P: Fn(&E::Record) -> bool,
{
    let mut report = ReconcileReport::default();

    if options.strategy == Strategy::ReplaceAll {
        report.deleted += txn.delete_matching::<E::Record, _>(&scope);
    }

    let mut synced = BTreeSet::new();
    for remote in remotes {
        if remote.is_transient() {
            report.skipped += 1;
            continue;
        }

        let key = remote.record_key();
        match txn.load_mut::<E::Record>(&key) {
            Some(record) => {
                remote.update_record(record);
                if !options.search_only {
                    E::set_exclusive_for_search(record, false);
                }
                report.updated += 1;
            }
            None => {
                let mut record = remote.insert_record();
                E::set_exclusive_for_search(&mut record, options.search_only);
                txn.insert(record);
                report.inserted += 1;
            }
        }
        synced.insert(key);
    }

    if options.prune_stale && options.strategy == Strategy::MergeInPlace {
        let stale = txn.keys_matching::<E::Record, _>(|record| {
            scope(record) && !synced.contains(&record.key())
        });
        for key in stale {
            if txn.delete::<E::Record>(&key) {
                report.deleted += 1;
            }
        }
    }

    report
}

/// Reconciles one entity and returns its cached record. Transient entities
/// are not cached and yield `None`.
pub fn upsert_one<E: Upsertable>(txn: &mut StagingTxn, remote: &E) -> Option<E::Record> {
    if remote.is_transient() {
        return None;
    }
    reconcile(txn, std::slice::from_ref(remote), |_| false, ReconcileOptions::merge());
    txn.load::<E::Record>(&remote.record_key()).cloned()
}
