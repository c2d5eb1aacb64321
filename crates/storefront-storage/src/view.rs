use std::sync::Arc;

use crate::graph::Graph;
use crate::records::StorageRecord;
use crate::table::SearchKey;

/// Read-only snapshot of the published graph.
///
/// Cheap to clone and never changes after it is taken; take a new view to
/// observe later commits.
#[derive(Debug, Clone)]
pub struct ReadView {
    graph: Arc<Graph>,
}

impl ReadView {
    pub(crate) fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    pub fn get<R: StorageRecord>(&self, key: &R::Key) -> Option<&R> {
        self.graph.table::<R>().get(key)
    }

    pub fn contains<R: StorageRecord>(&self, key: &R::Key) -> bool {
        self.graph.table::<R>().contains(key)
    }

    pub fn all<R: StorageRecord>(&self) -> impl Iterator<Item = &R> {
        self.graph.table::<R>().iter()
    }

    pub fn filter<R, P>(&self, predicate: P) -> Vec<&R>
    where
        R: StorageRecord,
        P: Fn(&R) -> bool,
    {
        self.all::<R>().filter(|record| predicate(*record)).collect()
    }

    pub fn count<R: StorageRecord>(&self) -> usize {
        self.graph.table::<R>().len()
    }

    pub fn first<R, P>(&self, predicate: P) -> Option<&R>
    where
        R: StorageRecord,
        P: Fn(&R) -> bool,
    {
        self.all::<R>().find(|record| predicate(*record))
    }

    /// Records found by a search, in result order. Members deleted since the
    /// search are skipped.
    pub fn search<R: StorageRecord>(&self, key: &SearchKey) -> Vec<&R> {
        let table = self.graph.table::<R>();
        table
            .search_members(key)
            .unwrap_or_default()
            .iter()
            .filter_map(|member| table.get(member))
            .collect()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}
