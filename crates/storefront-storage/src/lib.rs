//! # storefront-storage
//!
//! Local cache for the storefront sync core.
//!
//! ## Principles
//!
//! - One record per composite key, with a local identity that survives updates
//! - Children are owned by value; dropping one from its parent deletes it
//! - Writers stage changes privately and publish them in one step
//! - Readers only ever see fully published snapshots
//! - SQLite is what survives a restart; the graph is rebuilt from it on open
//!
//! ## Architecture
//!
//! ```text
//!  orchestrator ──perform──► StagingContext (worker thread, FIFO)
//!                               │  StagingTxn = overlay over snapshot
//!                               │
//!                            commit
//!                               ▼
//!                      StorageManager::publish
//!                        1. write SQLite transaction
//!                        2. swap Arc<Graph>
//!                        3. emit StorageEvent
//!                               │
//!                               ▼
//!                        MainContext (continuation)
//!                               │
//!  UI ◄──── ReadView (immutable snapshot) ◄────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! let storage = StorageManager::in_memory()?;
//! let staging = storage.new_staging_context("coupons")?;
//!
//! staging
//!     .save(move |txn| txn.insert(StoredCoupon::new(&coupon)))
//!     .await?;
//!
//! let view = storage.view();
//! assert!(view.contains::<StoredCoupon>(&coupon.key()));
//! ```

mod error;
mod event;
mod graph;
mod main_context;
mod manager;
mod meta;
pub mod records;
mod sqlite;
mod staging;
mod table;
mod txn;
mod view;

pub use error::{StorageError, StorageResult};
pub use event::{NullSink, RecordingSink, StorageEvent, StorageEventSink};
pub use graph::{ChangeSummary, Graph, StagedChanges};
pub use main_context::{MainContext, MAIN_THREAD_NAME};
pub use manager::{CommitOutcome, StorageManager};
pub use meta::{values, Child, ObjectId, RecordMeta};
pub use records::{
    RecordKind, StorageRecord, StoredAttributeTerm, StoredCoupon, StoredOrder, StoredOrderItem,
    StoredOrderStats, StoredProduct, StoredRefund, StoredRefundItem, StoredShipmentTracking,
    StoredShippingLine, StoredSiteVisitStats, StoredTopEarnerStats, StoredTrackingProviderGroup,
};
pub use sqlite::SqliteStore;
pub use staging::{LazyStaging, StagingContext};
pub use table::{SearchKey, Table, TableChanges};
pub use txn::StagingTxn;
pub use view::ReadView;

#[cfg(test)]
mod tests;
