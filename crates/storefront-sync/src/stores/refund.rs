use std::sync::Arc;

use storefront_model::{Refund, RefundKey};
use storefront_storage::{LazyStaging, StorageManager, StoredRefund};
use tracing::debug;

use super::{delete_stored, reset_stored, save, upsert_projected};
use crate::pagination::{PageOutcome, FIRST_PAGE};
use crate::reconcile::{reconcile, ReconcileOptions};
use crate::remote::RefundsRemote;
use crate::{StoreError, StoreResult};

/// Syncs the refunds of an order.
pub struct RefundStore {
    remote: Arc<dyn RefundsRemote>,
    staging: LazyStaging,
}

impl RefundStore {
    pub fn new(storage: StorageManager, remote: Arc<dyn RefundsRemote>) -> Self {
        Self {
            remote,
            staging: LazyStaging::new(storage, "refunds"),
        }
    }

    /// Syncs one page of an order's refunds. Page one prunes refunds of that
    /// order the remote no longer lists.
    pub async fn synchronize_refunds(
        &self,
        site_id: i64,
        order_id: i64,
        page: u32,
        page_size: usize,
    ) -> StoreResult<bool> {
        let refunds = self
            .remote
            .load_all_refunds(site_id, order_id, page, page_size)
            .await?;
        let outcome = PageOutcome::new(refunds.len(), page_size);

        let report = save(&self.staging, move |txn| {
            reconcile(
                txn,
                &refunds,
                |stored: &StoredRefund| stored.site_id == site_id && stored.order_id == order_id,
                ReconcileOptions::pruning(page == FIRST_PAGE),
            )
        })
        .await?;
        debug!(site_id, order_id, page, ?report, "refunds: page reconciled");

        Ok(outcome.has_next)
    }

    /// Fetches one refund. A refund the remote no longer has is dropped from
    /// the cache before the error is returned.
    pub async fn retrieve_refund(
        &self,
        site_id: i64,
        order_id: i64,
        refund_id: i64,
    ) -> StoreResult<Refund> {
        match self.remote.load_refund(site_id, order_id, refund_id).await {
            Ok(refund) => self.upsert(refund).await,
            Err(error) => {
                let error = StoreError::from(error);
                if error.is_not_found() {
                    delete_stored::<StoredRefund>(
                        &self.staging,
                        RefundKey::new(site_id, order_id, refund_id),
                    )
                    .await?;
                }
                Err(error)
            }
        }
    }

    /// Fetches a known list of an order's refunds. Nothing is pruned.
    pub async fn retrieve_refunds(
        &self,
        site_id: i64,
        order_id: i64,
        refund_ids: &[i64],
    ) -> StoreResult<Vec<Refund>> {
        if refund_ids.is_empty() {
            return Ok(Vec::new());
        }
        let refunds = self
            .remote
            .load_refunds(site_id, order_id, refund_ids)
            .await?;

        save(&self.staging, move |txn| {
            reconcile(txn, &refunds, |_| false, ReconcileOptions::merge());
            refunds
                .iter()
                .filter_map(|refund| txn.load::<StoredRefund>(&refund.key()))
                .map(StoredRefund::to_read_only)
                .collect()
        })
        .await
    }

    pub async fn create_refund(
        &self,
        site_id: i64,
        order_id: i64,
        refund: &Refund,
    ) -> StoreResult<Refund> {
        let created = self.remote.create_refund(site_id, order_id, refund).await?;
        self.upsert(created).await
    }

    pub async fn reset_stored_refunds(&self) -> StoreResult<usize> {
        reset_stored::<StoredRefund>(&self.staging).await
    }

    async fn upsert(&self, refund: Refund) -> StoreResult<Refund> {
        upsert_projected(&self.staging, refund, StoredRefund::to_read_only).await
    }
}
