use std::sync::Arc;

use storefront_model::{MetaData, MetaDataUpdate, OrderKey, ProductKey};
use storefront_storage::{LazyStaging, StorageManager};
use tracing::debug;

use super::save;
use crate::reconcile::{reconcile_custom_fields, MetaDataParent};
use crate::remote::MetaDataRemote;
use crate::StoreResult;

/// Sends custom field edits and mirrors the result onto the cached parent.
pub struct MetaDataStore {
    remote: Arc<dyn MetaDataRemote>,
    staging: LazyStaging,
}

impl MetaDataStore {
    pub fn new(storage: StorageManager, remote: Arc<dyn MetaDataRemote>) -> Self {
        Self {
            remote,
            staging: LazyStaging::new(storage, "metadata"),
        }
    }

    /// Applies `updates` to an order's custom fields.
    ///
    /// The list the remote sends back replaces the cached one. An order that
    /// is not cached is left alone; the remote result is still returned.
    pub async fn update_order_metadata(
        &self,
        site_id: i64,
        order_id: i64,
        updates: &[MetaDataUpdate],
    ) -> StoreResult<Vec<MetaData>> {
        let metadata = self
            .remote
            .update_order_metadata(site_id, order_id, updates)
            .await?;
        self.mirror(MetaDataParent::Order(OrderKey::new(site_id, order_id)), metadata)
            .await
    }

    /// Product counterpart of [`update_order_metadata`](Self::update_order_metadata).
    pub async fn update_product_metadata(
        &self,
        site_id: i64,
        product_id: i64,
        updates: &[MetaDataUpdate],
    ) -> StoreResult<Vec<MetaData>> {
        let metadata = self
            .remote
            .update_product_metadata(site_id, product_id, updates)
            .await?;
        self.mirror(
            MetaDataParent::Product(ProductKey::new(site_id, product_id)),
            metadata,
        )
        .await
    }

    async fn mirror(
        &self,
        parent: MetaDataParent,
        metadata: Vec<MetaData>,
    ) -> StoreResult<Vec<MetaData>> {
        let (stored, metadata) = save(&self.staging, move |txn| {
            let stored = reconcile_custom_fields(txn, parent, &metadata);
            (stored, metadata)
        })
        .await?;
        debug!(%parent, stored, fields = metadata.len(), "metadata: custom fields updated");
        Ok(metadata)
    }
}
