//! Owner of the canonical graph and the commit path.

use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::event::{NullSink, StorageEvent, StorageEventSink};
use crate::graph::{ChangeSummary, Graph, StagedChanges};
use crate::main_context::MainContext;
use crate::sqlite::SqliteStore;
use crate::staging::StagingContext;
use crate::view::ReadView;
use crate::StorageResult;

/// Result of publishing one staged change set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    pub summary: ChangeSummary,
    /// Set when the SQLite write failed. The in-memory publish still happened.
    pub persist_error: Option<String>,
}

impl CommitOutcome {
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

pub(crate) struct StorageInner {
    canonical: RwLock<Arc<Graph>>,
    /// Held for the whole persist-then-publish step so SQLite and memory
    /// see commits in the same order.
    store: Mutex<SqliteStore>,
    main: MainContext,
    sink: Arc<dyn StorageEventSink>,
}

impl StorageInner {
    pub(crate) fn snapshot(&self) -> Arc<Graph> {
        self.canonical.read().clone()
    }

    pub(crate) fn main(&self) -> &MainContext {
        &self.main
    }

    /// Persists `changes`, then makes them visible to readers.
    pub(crate) fn publish(&self, mut changes: StagedChanges) -> CommitOutcome {
        if changes.is_empty() {
            return CommitOutcome::default();
        }

        let mut store = self.store.lock();

        let adjusted = changes.rebase_onto(&self.snapshot());
        if adjusted > 0 {
            debug!(adjusted, "storage: rebased staged rows onto newer commits");
        }

        let persist_error = match store.write(&changes) {
            Ok(()) => None,
            Err(e) => {
                error!(error = %e, "storage: failed to persist staged changes");
                Some(e.to_string())
            }
        };

        let summary = {
            let mut canonical = self.canonical.write();
            let mut next = Graph::clone(&canonical);
            let summary = next.apply(&changes);
            *canonical = Arc::new(next);
            summary
        };
        drop(store);

        debug!(
            inserted = summary.inserted,
            updated = summary.updated,
            deleted = summary.deleted,
            "storage: published change set"
        );

        self.sink.emit(StorageEvent::Published {
            summary: summary.clone(),
            persisted: persist_error.is_none(),
        });

        CommitOutcome {
            summary,
            persist_error,
        }
    }
}

/// The local cache.
///
/// Readers take immutable snapshots through [`StorageManager::view`]. All
/// writes go through a [`StagingContext`] and become visible in one step
/// when that context commits.
#[derive(Clone)]
pub struct StorageManager {
    inner: Arc<StorageInner>,
}

impl StorageManager {
    /// Opens (or creates) a cache backed by the SQLite file at `path`.
    ///
    /// Existing rows are loaded into memory before this returns.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::open_with_sink(path, Arc::new(NullSink))
    }

    pub fn open_with_sink(
        path: impl AsRef<Path>,
        sink: Arc<dyn StorageEventSink>,
    ) -> StorageResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "storage: opening cache");
        let store = SqliteStore::open(path)?;
        Self::with_store(store, sink)
    }

    /// Creates a cache backed by an in-memory SQLite database.
    pub fn in_memory() -> StorageResult<Self> {
        Self::in_memory_with_sink(Arc::new(NullSink))
    }

    pub fn in_memory_with_sink(sink: Arc<dyn StorageEventSink>) -> StorageResult<Self> {
        Self::with_store(SqliteStore::in_memory()?, sink)
    }

    fn with_store(store: SqliteStore, sink: Arc<dyn StorageEventSink>) -> StorageResult<Self> {
        info!("storage: starting recovery from SQLite");
        let graph = store.load_graph()?;
        info!(records = graph.record_count(), "storage: recovery complete");

        Ok(Self {
            inner: Arc::new(StorageInner {
                canonical: RwLock::new(Arc::new(graph)),
                store: Mutex::new(store),
                main: MainContext::spawn()?,
                sink,
            }),
        })
    }

    /// A consistent read-only snapshot of everything published so far.
    pub fn view(&self) -> ReadView {
        ReadView::new(self.inner.snapshot())
    }

    /// Creates an independent staging context with its own worker.
    pub fn new_staging_context(&self, label: &str) -> StorageResult<StagingContext> {
        StagingContext::spawn(self.inner.clone(), label)
    }

    /// The context commit continuations run on.
    pub fn main_context(&self) -> &MainContext {
        self.inner.main()
    }
}
