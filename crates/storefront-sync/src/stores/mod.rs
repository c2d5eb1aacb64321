//! One sync store per domain.
//!
//! Every store follows the same shape:
//!
//! ```text
//! caller ──► store op ──► remote (async)
//!                           │ ok
//!                           ▼
//!              staging.save(reconcile ...)   (store's own worker)
//!                           │ published
//!                           ▼
//!              read-only projection back to the caller
//! ```
//!
//! Remote errors are returned as they came; nothing is retried here.

mod attribute_term;
mod coupon;
mod metadata;
mod order;
mod order_note;
mod product;
mod refund;
mod shipment;
mod stats;

pub use attribute_term::AttributeTermStore;
pub use coupon::CouponStore;
pub use metadata::MetaDataStore;
pub use order::OrderStore;
pub use order_note::OrderNoteStore;
pub use product::ProductStore;
pub use refund::RefundStore;
pub use shipment::ShipmentStore;
pub use stats::{StatsStore, TOP_EARNERS_LIMIT};

use storefront_storage::{LazyStaging, StagingTxn, StorageRecord};
use tracing::debug;

use crate::reconcile::{upsert_one, Upsertable};
use crate::StoreResult;

/// Runs `work` on the store's staging context and publishes it.
pub(crate) async fn save<F, T>(staging: &LazyStaging, work: F) -> StoreResult<T>
where
    F: FnOnce(&mut StagingTxn) -> T + Send + 'static,
    T: Send + 'static,
{
    let context = staging.get()?;
    Ok(context.save(work).await?)
}

/// Deletes one cached record, if present.
pub(crate) async fn delete_stored<R: StorageRecord>(
    staging: &LazyStaging,
    key: R::Key,
) -> StoreResult<bool> {
    let label = key.to_string();
    let deleted = save(staging, move |txn| txn.delete::<R>(&key)).await?;
    if deleted {
        debug!(kind = %R::KIND, key = %label, "store: deleted cached record");
    }
    Ok(deleted)
}

/// Deletes every cached record of one kind.
pub(crate) async fn reset_stored<R: StorageRecord>(staging: &LazyStaging) -> StoreResult<usize> {
    let deleted = save(staging, |txn| txn.delete_matching::<R, _>(|_| true)).await?;
    debug!(kind = %R::KIND, deleted, "store: reset cached records");
    Ok(deleted)
}

/// Reconciles one entity and hands back its cached projection.
///
/// Transient entities are not cached and come back as given.
pub(crate) async fn upsert_projected<E, F>(
    staging: &LazyStaging,
    entity: E,
    project: F,
) -> StoreResult<E>
where
    E: Upsertable,
    F: FnOnce(&E::Record) -> E + Send + 'static,
{
    save(staging, move |txn| {
        let stored = upsert_one(txn, &entity);
        match stored {
            Some(stored) => project(&stored),
            None => entity,
        }
    })
    .await
}
