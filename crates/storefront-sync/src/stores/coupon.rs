use std::sync::Arc;

use chrono::{DateTime, Utc};
use storefront_model::{Coupon, CouponKey, CouponReport};
use storefront_storage::{LazyStaging, SearchKey, StorageManager, StorageRecord, StoredCoupon};
use tracing::{debug, warn};

use super::{delete_stored, save, upsert_projected};
use crate::pagination::{synchronize_pages, PageOutcome, FIRST_PAGE};
use crate::reconcile::{reconcile, ReconcileOptions};
use crate::remote::CouponsRemote;
use crate::{StoreError, StoreResult};

/// Syncs coupons and their search results.
pub struct CouponStore {
    remote: Arc<dyn CouponsRemote>,
    staging: LazyStaging,
    page_size: usize,
}

impl CouponStore {
    pub fn new(storage: StorageManager, remote: Arc<dyn CouponsRemote>, page_size: usize) -> Self {
        Self {
            remote,
            staging: LazyStaging::new(storage, "coupons"),
            page_size,
        }
    }

    /// Syncs one page of a site's coupons. Page one prunes coupons the
    /// remote no longer lists.
    pub async fn synchronize_coupons(
        &self,
        site_id: i64,
        page: u32,
        page_size: usize,
    ) -> StoreResult<bool> {
        Ok(self.sync_page(site_id, page, page_size).await?.has_next)
    }

    /// Syncs every page of a site's coupons.
    pub async fn synchronize_all_coupons(&self, site_id: i64) -> StoreResult<usize> {
        let page_size = self.page_size;
        synchronize_pages("coupons", |page| self.sync_page(site_id, page, page_size)).await
    }

    async fn sync_page(
        &self,
        site_id: i64,
        page: u32,
        page_size: usize,
    ) -> StoreResult<PageOutcome> {
        let coupons = self
            .remote
            .load_all_coupons(site_id, page, page_size)
            .await?;
        let outcome = PageOutcome::new(coupons.len(), page_size);

        let report = save(&self.staging, move |txn| {
            reconcile(
                txn,
                &coupons,
                |stored: &StoredCoupon| stored.site_id() == site_id,
                ReconcileOptions::pruning(page == FIRST_PAGE),
            )
        })
        .await?;
        debug!(site_id, page, ?report, "coupons: page reconciled");

        Ok(outcome)
    }

    /// Searches coupons by keyword and records the result membership.
    pub async fn search_coupons(
        &self,
        site_id: i64,
        keyword: &str,
        page: u32,
        page_size: usize,
    ) -> StoreResult<bool> {
        let coupons = self
            .remote
            .search_coupons(site_id, keyword, page, page_size)
            .await?;
        let outcome = PageOutcome::new(coupons.len(), page_size);
        let search = SearchKey::new(site_id, keyword);

        save(&self.staging, move |txn| {
            reconcile(txn, &coupons, |_| false, ReconcileOptions::merge());
            let members: Vec<CouponKey> = coupons.iter().map(Coupon::key).collect();
            if page == FIRST_PAGE {
                txn.set_search_members::<StoredCoupon>(search, members);
            } else {
                txn.extend_search_members::<StoredCoupon>(search, members);
            }
        })
        .await?;

        Ok(outcome.has_next)
    }

    /// Fetches one coupon. A coupon the remote no longer has is dropped from
    /// the cache before the error is returned.
    pub async fn retrieve_coupon(&self, site_id: i64, coupon_id: i64) -> StoreResult<Coupon> {
        match self.remote.load_coupon(site_id, coupon_id).await {
            Ok(coupon) => self.upsert(coupon).await,
            Err(error) => {
                let error = StoreError::from(error);
                if error.is_not_found() {
                    delete_stored::<StoredCoupon>(&self.staging, CouponKey::new(site_id, coupon_id))
                        .await?;
                }
                Err(error)
            }
        }
    }

    pub async fn create_coupon(&self, coupon: &Coupon) -> StoreResult<Coupon> {
        let created = self.remote.create_coupon(coupon).await?;
        self.upsert(created).await
    }

    pub async fn update_coupon(&self, coupon: &Coupon) -> StoreResult<Coupon> {
        let updated = self.remote.update_coupon(coupon).await?;
        self.upsert(updated).await
    }

    /// Deletes a coupon remotely, then locally.
    ///
    /// If the remote echoes a different coupon than the one requested the
    /// cache is left untouched and [`StoreError::UnexpectedCouponDeleted`] is
    /// returned.
    pub async fn delete_coupon(&self, site_id: i64, coupon_id: i64) -> StoreResult<Coupon> {
        let expected = CouponKey::new(site_id, coupon_id);
        let deleted = self.remote.delete_coupon(site_id, coupon_id).await?;

        let actual = deleted.key();
        if actual != expected {
            warn!(%expected, %actual, "coupons: remote deleted a different coupon");
            return Err(StoreError::UnexpectedCouponDeleted { expected, actual });
        }

        delete_stored::<StoredCoupon>(&self.staging, expected).await?;
        Ok(deleted)
    }

    /// Usage analytics, straight from the remote.
    pub async fn load_coupon_report(
        &self,
        site_id: i64,
        coupon_id: i64,
        from: DateTime<Utc>,
    ) -> StoreResult<CouponReport> {
        Ok(self
            .remote
            .load_coupon_report(site_id, coupon_id, from)
            .await?)
    }

    pub async fn reset_stored_coupons(&self) -> StoreResult<usize> {
        super::reset_stored::<StoredCoupon>(&self.staging).await
    }

    async fn upsert(&self, coupon: Coupon) -> StoreResult<Coupon> {
        upsert_projected(&self.staging, coupon, StoredCoupon::to_read_only).await
    }
}
