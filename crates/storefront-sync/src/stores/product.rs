use std::collections::BTreeSet;
use std::sync::Arc;

use storefront_model::{Order, Product, ProductKey};
use storefront_storage::{LazyStaging, SearchKey, StorageManager, StorageRecord, StoredProduct};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::{delete_stored, reset_stored, save, upsert_projected};
use crate::pagination::{synchronize_pages, PageOutcome, FIRST_PAGE};
use crate::reconcile::{reconcile, ReconcileOptions};
use crate::remote::ProductsRemote;
use crate::{ProductUpdateError, StoreError, StoreResult};

/// Syncs products, product searches and product edits.
pub struct ProductStore {
    remote: Arc<dyn ProductsRemote>,
    staging: LazyStaging,
    page_size: usize,
    max_concurrent_fetches: usize,
}

impl ProductStore {
    pub fn new(
        storage: StorageManager,
        remote: Arc<dyn ProductsRemote>,
        page_size: usize,
        max_concurrent_fetches: usize,
    ) -> Self {
        Self {
            remote,
            staging: LazyStaging::new(storage, "products"),
            page_size,
            max_concurrent_fetches: max_concurrent_fetches.max(1),
        }
    }

    /// Syncs one page of a site's products. Page one prunes products the
    /// remote no longer lists.
    pub async fn synchronize_products(
        &self,
        site_id: i64,
        page: u32,
        page_size: usize,
    ) -> StoreResult<bool> {
        Ok(self.sync_page(site_id, page, page_size).await?.has_next)
    }

    pub async fn synchronize_all_products(&self, site_id: i64) -> StoreResult<usize> {
        let page_size = self.page_size;
        synchronize_pages("products", |page| self.sync_page(site_id, page, page_size)).await
    }

    async fn sync_page(
        &self,
        site_id: i64,
        page: u32,
        page_size: usize,
    ) -> StoreResult<PageOutcome> {
        let products = self
            .remote
            .load_all_products(site_id, page, page_size)
            .await?;
        let outcome = PageOutcome::new(products.len(), page_size);

        let report = save(&self.staging, move |txn| {
            reconcile(
                txn,
                &products,
                |stored: &StoredProduct| stored.site_id() == site_id,
                ReconcileOptions::pruning(page == FIRST_PAGE),
            )
        })
        .await?;
        debug!(site_id, page, ?report, "products: page reconciled");

        Ok(outcome)
    }

    /// Searches products by keyword, optionally narrowed by a filter.
    pub async fn search_products(
        &self,
        site_id: i64,
        keyword: &str,
        filter: Option<&str>,
        page: u32,
        page_size: usize,
    ) -> StoreResult<bool> {
        let products = self
            .remote
            .search_products(site_id, keyword, filter, page, page_size)
            .await?;
        let outcome = PageOutcome::new(products.len(), page_size);
        let search = match filter {
            Some(filter) => SearchKey::new(site_id, keyword).with_filter(filter),
            None => SearchKey::new(site_id, keyword),
        };

        save(&self.staging, move |txn| {
            reconcile(txn, &products, |_| false, ReconcileOptions::merge());
            let members: Vec<ProductKey> = products
                .iter()
                .filter(|product| !product.is_transient())
                .map(Product::key)
                .collect();
            if page == FIRST_PAGE {
                txn.set_search_members::<StoredProduct>(search, members);
            } else {
                txn.extend_search_members::<StoredProduct>(search, members);
            }
        })
        .await?;

        Ok(outcome.has_next)
    }

    /// Fetches one product. A product the remote no longer has is dropped
    /// from the cache before the error is returned.
    pub async fn retrieve_product(&self, site_id: i64, product_id: i64) -> StoreResult<Product> {
        match self.remote.load_product(site_id, product_id).await {
            Ok(product) => self.upsert(product).await,
            Err(error) => {
                let error = StoreError::from(error);
                if error.is_not_found() {
                    delete_stored::<StoredProduct>(
                        &self.staging,
                        ProductKey::new(site_id, product_id),
                    )
                    .await?;
                }
                Err(error)
            }
        }
    }

    /// Fetches a known list of products. Nothing is pruned.
    pub async fn retrieve_products(
        &self,
        site_id: i64,
        product_ids: &[i64],
    ) -> StoreResult<Vec<Product>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let products = self.remote.load_products(site_id, product_ids).await?;
        self.upsert_many(products).await
    }

    /// Fetches every product referenced by `order` that is not cached yet.
    ///
    /// Products are fetched concurrently. A failed fetch is logged and
    /// skipped; the rest are still cached. Returns how many were cached.
    pub async fn request_missing_products(&self, order: &Order) -> StoreResult<usize> {
        let site_id = order.site_id;
        let missing: Vec<i64> = {
            let view = self.staging.storage().view();
            order
                .items
                .iter()
                .map(|item| item.product_id)
                .filter(|product_id| *product_id != 0)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .filter(|product_id| {
                    !view.contains::<StoredProduct>(&ProductKey::new(site_id, *product_id))
                })
                .collect()
        };
        if missing.is_empty() {
            return Ok(0);
        }
        debug!(site_id, count = missing.len(), "products: requesting missing products");

        let limit = Arc::new(Semaphore::new(self.max_concurrent_fetches));
        let mut fetches = JoinSet::new();
        for product_id in missing {
            let remote = self.remote.clone();
            let limit = limit.clone();
            fetches.spawn(async move {
                let _permit = limit.acquire_owned().await;
                (product_id, remote.load_product(site_id, product_id).await)
            });
        }

        let mut fetched = Vec::new();
        while let Some(joined) = fetches.join_next().await {
            match joined {
                Ok((_, Ok(product))) => fetched.push(product),
                Ok((product_id, Err(error))) => {
                    warn!(
                        site_id,
                        product_id,
                        error = %error,
                        "products: missing product fetch failed"
                    );
                }
                Err(error) => {
                    warn!(site_id, error = %error, "products: missing product task failed");
                }
            }
        }

        let cached = self.upsert_many(fetched).await?.len();
        info!(site_id, cached, "products: missing products cached");
        Ok(cached)
    }

    /// Sends a product edit and caches the result.
    ///
    /// A SKU collision comes back as [`ProductUpdateError::InvalidSku`].
    pub async fn update_product(&self, product: &Product) -> Result<Product, ProductUpdateError> {
        let updated = self
            .remote
            .update_product(product)
            .await
            .map_err(StoreError::from)?;
        Ok(self.upsert(updated).await?)
    }

    /// Whether `sku` is free among the site's cached products. An empty SKU
    /// is always valid.
    pub fn validate_product_sku(&self, site_id: i64, sku: Option<&str>) -> bool {
        let Some(sku) = sku.filter(|sku| !sku.is_empty()) else {
            return true;
        };
        self.staging
            .storage()
            .view()
            .first::<StoredProduct, _>(|stored| {
                stored.site_id() == site_id && stored.sku.as_deref() == Some(sku)
            })
            .is_none()
    }

    pub async fn reset_stored_products(&self) -> StoreResult<usize> {
        let deleted = reset_stored::<StoredProduct>(&self.staging).await?;
        info!(deleted, "products: cache reset");
        Ok(deleted)
    }

    async fn upsert(&self, product: Product) -> StoreResult<Product> {
        upsert_projected(&self.staging, product, StoredProduct::to_read_only).await
    }

    async fn upsert_many(&self, products: Vec<Product>) -> StoreResult<Vec<Product>> {
        save(&self.staging, move |txn| {
            reconcile(txn, &products, |_| false, ReconcileOptions::merge());
            products
                .iter()
                .filter_map(|product| {
                    if product.is_transient() {
                        return Some(product.clone());
                    }
                    txn.load::<StoredProduct>(&product.key())
                        .map(StoredProduct::to_read_only)
                })
                .collect()
        })
        .await
    }
}
