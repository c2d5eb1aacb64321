use std::sync::Arc;

use chrono::{DateTime, Utc};
use storefront_model::{Order, OrderKey, OrderStatus, OrderUpdateField, SimplePaymentsUpdate};
use storefront_storage::{LazyStaging, SearchKey, StorageManager, StorageRecord, StoredOrder};
use tracing::{debug, info, warn};

use super::{delete_stored, reset_stored, save, upsert_projected};
use crate::pagination::{synchronize_pages, PageOutcome, FIRST_PAGE};
use crate::reconcile::{reconcile, ReconcileOptions};
use crate::remote::{OrderListFilter, OrdersRemote};
use crate::{StoreError, StoreResult};

/// Syncs orders, order searches and order mutations.
pub struct OrderStore {
    remote: Arc<dyn OrdersRemote>,
    staging: LazyStaging,
    page_size: usize,
}

impl OrderStore {
    pub fn new(storage: StorageManager, remote: Arc<dyn OrdersRemote>, page_size: usize) -> Self {
        Self {
            remote,
            staging: LazyStaging::new(storage, "orders"),
            page_size,
        }
    }

    /// Syncs one page of a site's orders.
    ///
    /// Page one prunes cached orders with a status the filter covers that
    /// the remote no longer lists. Incremental filters never prune.
    pub async fn synchronize_orders(
        &self,
        site_id: i64,
        filter: &OrderListFilter,
        page: u32,
        page_size: usize,
    ) -> StoreResult<bool> {
        Ok(self.sync_page(site_id, filter, page, page_size).await?.has_next)
    }

    pub async fn synchronize_all_orders(
        &self,
        site_id: i64,
        filter: &OrderListFilter,
    ) -> StoreResult<usize> {
        let page_size = self.page_size;
        synchronize_pages("orders", |page| {
            self.sync_page(site_id, filter, page, page_size)
        })
        .await
    }

    async fn sync_page(
        &self,
        site_id: i64,
        filter: &OrderListFilter,
        page: u32,
        page_size: usize,
    ) -> StoreResult<PageOutcome> {
        let orders = self
            .remote
            .load_all_orders(site_id, filter, page, page_size)
            .await?;
        let outcome = PageOutcome::new(orders.len(), page_size);

        let prune = page == FIRST_PAGE && !filter.is_incremental();
        let scope_filter = filter.clone();
        let report = save(&self.staging, move |txn| {
            reconcile(
                txn,
                &orders,
                move |stored: &StoredOrder| {
                    stored.site_id() == site_id && scope_filter.covers(stored)
                },
                ReconcileOptions::pruning(prune),
            )
        })
        .await?;
        debug!(site_id, page, ?report, "orders: page reconciled");

        Ok(outcome)
    }

    /// Fetches the first page for `filter`.
    ///
    /// With `delete_all_before_saving` every cached order of the site is
    /// replaced by the page in one publish.
    pub async fn fetch_filtered_orders(
        &self,
        site_id: i64,
        filter: &OrderListFilter,
        delete_all_before_saving: bool,
        page_size: usize,
    ) -> StoreResult<bool> {
        let orders = self
            .remote
            .load_all_orders(site_id, filter, FIRST_PAGE, page_size)
            .await?;
        let outcome = PageOutcome::new(orders.len(), page_size);

        let options = if delete_all_before_saving {
            ReconcileOptions::replace_all()
        } else {
            ReconcileOptions::merge()
        };
        let report = save(&self.staging, move |txn| {
            reconcile(
                txn,
                &orders,
                move |stored: &StoredOrder| stored.site_id() == site_id,
                options,
            )
        })
        .await?;
        debug!(site_id, ?report, "orders: filtered fetch reconciled");

        Ok(outcome.has_next)
    }

    /// Searches orders by keyword. Orders first seen here are flagged as
    /// search-only.
    pub async fn search_orders(
        &self,
        site_id: i64,
        keyword: &str,
        page: u32,
        page_size: usize,
    ) -> StoreResult<bool> {
        let orders = self
            .remote
            .search_orders(site_id, keyword, page, page_size)
            .await?;
        let outcome = PageOutcome::new(orders.len(), page_size);
        let search = SearchKey::new(site_id, keyword);

        save(&self.staging, move |txn| {
            reconcile(txn, &orders, |_| false, ReconcileOptions::search());
            let members: Vec<OrderKey> = orders
                .iter()
                .filter(|order| !order.is_transient())
                .map(Order::key)
                .collect();
            if page == FIRST_PAGE {
                txn.set_search_members::<StoredOrder>(search, members);
            } else {
                txn.extend_search_members::<StoredOrder>(search, members);
            }
        })
        .await?;

        Ok(outcome.has_next)
    }

    /// Returns one order.
    ///
    /// A cached order whose modification date still matches the remote is
    /// returned without a full fetch.
    pub async fn retrieve_order(&self, site_id: i64, order_id: i64) -> StoreResult<Order> {
        let key = OrderKey::new(site_id, order_id);
        let cached = self
            .staging
            .storage()
            .view()
            .get::<StoredOrder>(&key)
            .map(StoredOrder::to_read_only);

        if let Some(cached) = cached {
            match self.remote.fetch_date_modified(site_id, order_id).await {
                Ok(modified) if modified == cached.date_modified => {
                    debug!(order = %key, "orders: cached copy is current");
                    return Ok(cached);
                }
                Ok(_) => {}
                Err(error) => {
                    debug!(
                        order = %key,
                        error = %error,
                        "orders: could not check modification date"
                    );
                }
            }
        }

        self.load_order_from_remote(site_id, order_id).await
    }

    async fn load_order_from_remote(&self, site_id: i64, order_id: i64) -> StoreResult<Order> {
        match self.remote.load_order(site_id, order_id).await {
            Ok(order) => self.upsert(order).await,
            Err(error) => {
                let error = StoreError::from(error);
                if error.is_not_found() {
                    delete_stored::<StoredOrder>(&self.staging, OrderKey::new(site_id, order_id))
                        .await?;
                }
                Err(error)
            }
        }
    }

    /// Creates an order remotely. Auto-drafts are returned but not cached.
    pub async fn create_order(
        &self,
        site_id: i64,
        order: &Order,
        fields: &[OrderUpdateField],
    ) -> StoreResult<Order> {
        let created = self.remote.create_order(site_id, order, fields).await?;
        self.upsert(created).await
    }

    pub async fn update_order(
        &self,
        site_id: i64,
        order: &Order,
        fields: &[OrderUpdateField],
    ) -> StoreResult<Order> {
        let updated = self.remote.update_order(site_id, order, fields).await?;
        self.upsert(updated).await
    }

    /// Creates an order charging `amount` through one fee line. Auto-drafts
    /// are returned but not cached.
    pub async fn create_simple_payments_order(
        &self,
        site_id: i64,
        status: OrderStatus,
        amount: &str,
        taxable: bool,
    ) -> StoreResult<Order> {
        let order = Order::simple_payments(status, amount, taxable);
        let fields = [OrderUpdateField::Status, OrderUpdateField::Fees];
        self.create_order(site_id, &order, &fields).await
    }

    /// Rewrites the fee, note, billing email and status of a simple
    /// payments order.
    pub async fn update_simple_payments_order(
        &self,
        site_id: i64,
        update: &SimplePaymentsUpdate,
    ) -> StoreResult<Order> {
        let order = update.to_order();
        self.update_order(site_id, &order, &SimplePaymentsUpdate::FIELDS).await
    }

    /// Changes an order's status locally first, then remotely.
    ///
    /// If the remote rejects the change the previous status is put back and
    /// the remote error returned.
    pub async fn update_order_status(
        &self,
        site_id: i64,
        order_id: i64,
        status: OrderStatus,
    ) -> StoreResult<Order> {
        let key = OrderKey::new(site_id, order_id);
        let next = status.clone();
        let previous = save(&self.staging, move |txn| {
            txn.load_mut::<StoredOrder>(&key).map(|stored| {
                let previous = std::mem::replace(&mut stored.status, next);
                stored.meta.touch();
                previous
            })
        })
        .await?;

        let request = Order {
            site_id,
            order_id,
            status: status.clone(),
            ..Default::default()
        };
        match self
            .remote
            .update_order(site_id, &request, &[OrderUpdateField::Status])
            .await
        {
            Ok(updated) => self.upsert(updated).await,
            Err(error) => {
                warn!(
                    order = %key,
                    %status,
                    error = %error,
                    "orders: status update failed, rolling back"
                );
                if let Some(previous) = previous {
                    save(&self.staging, move |txn| {
                        if let Some(stored) = txn.load_mut::<StoredOrder>(&key) {
                            stored.status = previous;
                            stored.meta.touch();
                        }
                    })
                    .await?;
                }
                Err(error.into())
            }
        }
    }

    /// Writes `order` to the cache, then sends the update.
    ///
    /// On failure the cached copy is restored, or removed again when the
    /// order was not cached before.
    pub async fn update_order_optimistically(
        &self,
        site_id: i64,
        order: &Order,
        fields: &[OrderUpdateField],
    ) -> StoreResult<Order> {
        let key = order.key();
        let local = order.clone();
        let backup = save(&self.staging, move |txn| {
            let backup = txn.load::<StoredOrder>(&key).cloned();
            reconcile(txn, std::slice::from_ref(&local), |_| false, ReconcileOptions::merge());
            backup
        })
        .await?;

        match self.remote.update_order(site_id, order, fields).await {
            Ok(_) => Ok(order.clone()),
            Err(error) => {
                warn!(order = %key, error = %error, "orders: optimistic update failed, reverting");
                save(&self.staging, move |txn| match backup {
                    Some(previous) => txn.insert(previous),
                    None => {
                        txn.delete::<StoredOrder>(&key);
                    }
                })
                .await?;
                Err(error.into())
            }
        }
    }

    /// Deletes an order from the cache, then remotely.
    ///
    /// If the remote delete fails the order is put back, unless it is an
    /// auto-draft.
    pub async fn delete_order(
        &self,
        site_id: i64,
        order: &Order,
        force: bool,
    ) -> StoreResult<Order> {
        let key = OrderKey::new(site_id, order.order_id);
        let removed = save(&self.staging, move |txn| {
            let removed = txn.load::<StoredOrder>(&key).cloned();
            txn.delete::<StoredOrder>(&key);
            removed
        })
        .await?;

        match self.remote.delete_order(site_id, order.order_id, force).await {
            Ok(deleted) => Ok(deleted),
            Err(error) => {
                if !order.is_transient() {
                    warn!(order = %key, error = %error, "orders: delete failed, restoring order");
                    let fallback = order.clone();
                    save(&self.staging, move |txn| match removed {
                        Some(previous) => txn.insert(previous),
                        None => {
                            reconcile(
                                txn,
                                std::slice::from_ref(&fallback),
                                |_| false,
                                ReconcileOptions::merge(),
                            );
                        }
                    })
                    .await?;
                }
                Err(error.into())
            }
        }
    }

    /// Marks a cached order as paid without telling the remote.
    pub async fn mark_order_as_paid_locally(
        &self,
        site_id: i64,
        order_id: i64,
        date_paid: DateTime<Utc>,
    ) -> StoreResult<Order> {
        let key = OrderKey::new(site_id, order_id);
        let paid = save(&self.staging, move |txn| {
            txn.load_mut::<StoredOrder>(&key).map(|stored| {
                stored.date_paid = Some(date_paid);
                stored.status = OrderStatus::Processing;
                stored.meta.touch();
                stored.to_read_only()
            })
        })
        .await?;

        paid.ok_or(StoreError::OrderNotFoundInStorage(key))
    }

    /// Whether the site has any order, checking the cache before the remote.
    pub async fn check_if_store_has_orders(&self, site_id: i64) -> StoreResult<bool> {
        let cached = self
            .staging
            .storage()
            .view()
            .first::<StoredOrder, _>(|stored| stored.site_id() == site_id)
            .is_some();
        if cached {
            return Ok(true);
        }

        let orders = self
            .remote
            .load_all_orders(site_id, &OrderListFilter::default(), FIRST_PAGE, 1)
            .await?;
        Ok(!orders.is_empty())
    }

    pub async fn reset_stored_orders(&self) -> StoreResult<usize> {
        let deleted = reset_stored::<StoredOrder>(&self.staging).await?;
        info!(deleted, "orders: cache reset");
        Ok(deleted)
    }

    async fn upsert(&self, order: Order) -> StoreResult<Order> {
        upsert_projected(&self.staging, order, StoredOrder::to_read_only).await
    }
}
