//! The execution context readers observe.
//!
//! Commit continuations run here, one at a time, in the order their commits
//! finished. Consumers that need "this ran after the data became visible"
//! hang their completion on it.

use std::sync::mpsc;
use std::thread::{self, ThreadId};
use tracing::{debug, warn};

use crate::StorageResult;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Name of the thread backing the main context.
pub const MAIN_THREAD_NAME: &str = "storefront-main";

/// A dedicated thread running continuations in FIFO order.
pub struct MainContext {
    sender: mpsc::Sender<Task>,
    thread_id: ThreadId,
}

impl MainContext {
    pub fn spawn() -> StorageResult<Self> {
        let (sender, receiver) = mpsc::channel::<Task>();
        let handle = thread::Builder::new()
            .name(MAIN_THREAD_NAME.to_string())
            .spawn(move || {
                for task in receiver {
                    task();
                }
                debug!("main context stopped");
            })?;

        Ok(Self {
            sender,
            thread_id: handle.thread().id(),
        })
    }

    /// Queues `task` behind everything already scheduled.
    pub fn run(&self, task: impl FnOnce() + Send + 'static) {
        if self.sender.send(Box::new(task)).is_err() {
            warn!("main context is gone, dropping continuation");
        }
    }

    /// True when called from the main context thread.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }
}
