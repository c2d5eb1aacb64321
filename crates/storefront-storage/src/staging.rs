//! Staging contexts: serial, isolated write surfaces.
//!
//! Each staging context owns one worker thread and one [`StagingTxn`].
//! Work and commits are queued to the worker and run strictly in FIFO
//! order, so two syncs sharing a context never interleave their writes.
//!
//! ```ignore
//! let staging = storage.new_staging_context("orders")?;
//! staging.perform(move |txn| txn.insert(record)).await?;
//! let outcome = staging.commit_and_wait().await?;
//! ```

use parking_lot::Mutex;
use std::sync::{mpsc, Arc};
use std::thread;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::manager::{CommitOutcome, StorageInner};
use crate::txn::StagingTxn;
use crate::{StorageError, StorageManager, StorageResult};

type Work = Box<dyn FnOnce(&mut StagingTxn) + Send + 'static>;
type Continuation = Box<dyn FnOnce(CommitOutcome) + Send + 'static>;

enum Job {
    Perform(Work),
    Commit(Continuation),
}

/// A mutation context bound to its own serial worker.
pub struct StagingContext {
    sender: mpsc::Sender<Job>,
    label: String,
}

impl StagingContext {
    pub(crate) fn spawn(inner: Arc<StorageInner>, label: &str) -> StorageResult<Self> {
        let (sender, receiver) = mpsc::channel::<Job>();
        let worker_label = label.to_string();

        thread::Builder::new()
            .name(format!("staging-{label}"))
            .spawn(move || run_worker(inner, receiver, worker_label))?;

        debug!(label, "staging: context created");
        Ok(Self {
            sender,
            label: label.to_string(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Runs `work` on the worker and returns its result.
    ///
    /// Writes made by `work` stay private to this context until the next
    /// commit.
    pub async fn perform<F, T>(&self, work: F) -> StorageResult<T>
    where
        F: FnOnce(&mut StagingTxn) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.send(Job::Perform(Box::new(move |txn| {
            let _ = tx.send(work(txn));
        })))?;
        rx.await.map_err(|_| self.closed())
    }

    /// Publishes everything staged so far, then runs `on_published` on the
    /// main context.
    pub fn commit(
        &self,
        on_published: impl FnOnce(CommitOutcome) + Send + 'static,
    ) -> StorageResult<()> {
        self.send(Job::Commit(Box::new(on_published)))
    }

    /// Publishes everything staged so far and waits until the main context
    /// has observed it.
    pub async fn commit_and_wait(&self) -> StorageResult<CommitOutcome> {
        let (tx, rx) = oneshot::channel();
        self.commit(move |outcome| {
            let _ = tx.send(outcome);
        })?;
        rx.await.map_err(|_| self.closed())
    }

    /// `perform` followed by `commit_and_wait`.
    pub async fn save<F, T>(&self, work: F) -> StorageResult<T>
    where
        F: FnOnce(&mut StagingTxn) -> T + Send + 'static,
        T: Send + 'static,
    {
        let value = self.perform(work).await?;
        let outcome = self.commit_and_wait().await?;
        if let Some(error) = &outcome.persist_error {
            warn!(label = %self.label, error = %error, "staging: saved in memory only");
        }
        Ok(value)
    }

    fn send(&self, job: Job) -> StorageResult<()> {
        self.sender.send(job).map_err(|_| self.closed())
    }

    fn closed(&self) -> StorageError {
        StorageError::ContextClosed(self.label.clone())
    }
}

fn run_worker(inner: Arc<StorageInner>, receiver: mpsc::Receiver<Job>, label: String) {
    let mut txn = StagingTxn::new(inner.snapshot());

    for job in receiver {
        match job {
            Job::Perform(work) => {
                if !txn.has_changes() {
                    txn.rebase(inner.snapshot());
                }
                work(&mut txn);
            }
            Job::Commit(on_published) => {
                let outcome = inner.publish(txn.take_changes());
                txn.rebase(inner.snapshot());
                inner.main().run(move || on_published(outcome));
            }
        }
    }

    debug!(label = %label, "staging: context closed");
}

/// Lazily creates one staging context and hands out the same one afterwards.
///
/// Owned by each orchestrator so that syncs of one domain share a worker.
pub struct LazyStaging {
    storage: StorageManager,
    label: String,
    context: Mutex<Option<Arc<StagingContext>>>,
}

impl LazyStaging {
    pub fn new(storage: StorageManager, label: impl Into<String>) -> Self {
        Self {
            storage,
            label: label.into(),
            context: Mutex::new(None),
        }
    }

    pub fn get(&self) -> StorageResult<Arc<StagingContext>> {
        let mut slot = self.context.lock();
        if let Some(context) = slot.as_ref() {
            return Ok(context.clone());
        }
        let context = Arc::new(self.storage.new_staging_context(&self.label)?);
        *slot = Some(context.clone());
        Ok(context)
    }

    pub fn storage(&self) -> &StorageManager {
        &self.storage
    }
}
