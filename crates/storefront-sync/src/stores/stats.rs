use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use storefront_model::{
    LeaderboardRow, OrderStats, Product, ProductKey, SiteVisitStats, StatsTimeRange,
    TopEarnerStats, TopEarnerStatsItem,
};
use storefront_storage::{
    LazyStaging, StorageManager, StoredOrderStats, StoredProduct, StoredSiteVisitStats,
    StoredTopEarnerStats,
};
use tracing::{debug, info};

use super::{save, upsert_projected};
use crate::remote::{ProductsRemote, StatsRemote};
use crate::StoreResult;

/// Number of products kept in a top earners list.
pub const TOP_EARNERS_LIMIT: u32 = 3;

/// Syncs dashboard stats: order totals, visitors and top earners.
pub struct StatsStore {
    remote: Arc<dyn StatsRemote>,
    products: Arc<dyn ProductsRemote>,
    staging: LazyStaging,
}

impl StatsStore {
    pub fn new(
        storage: StorageManager,
        remote: Arc<dyn StatsRemote>,
        products: Arc<dyn ProductsRemote>,
    ) -> Self {
        Self {
            remote,
            products,
            staging: LazyStaging::new(storage, "stats"),
        }
    }

    /// Fetches order stats for a range. Intervals the remote no longer
    /// returns are dropped from the cached series.
    pub async fn retrieve_stats(
        &self,
        site_id: i64,
        time_range: StatsTimeRange,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
        quantity: u32,
    ) -> StoreResult<OrderStats> {
        let stats = self
            .remote
            .load_order_stats(site_id, time_range, earliest, latest, quantity)
            .await?;
        debug!(
            site_id,
            time_range = time_range.as_str(),
            intervals = stats.intervals.len(),
            "stats: order stats loaded"
        );
        upsert_projected(&self.staging, stats, StoredOrderStats::to_read_only).await
    }

    /// Fetches the visitor series ending at `latest`.
    pub async fn retrieve_site_visit_stats(
        &self,
        site_id: i64,
        time_range: StatsTimeRange,
        latest: DateTime<Utc>,
    ) -> StoreResult<SiteVisitStats> {
        let granularity = time_range.site_visit_granularity();
        let quantity = time_range.site_visit_quantity(latest);
        let stats = self
            .remote
            .load_site_visit_stats(site_id, granularity, latest, quantity)
            .await?;
        upsert_projected(&self.staging, stats, StoredSiteVisitStats::to_read_only).await
    }

    /// Fetches the best selling products of a range.
    ///
    /// The leaderboard only carries product ids. Names, prices and images
    /// come from cached products; products not cached yet are fetched in one
    /// request and used as they are, without being cached.
    pub async fn retrieve_top_earner_stats(
        &self,
        site_id: i64,
        time_range: StatsTimeRange,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
    ) -> StoreResult<TopEarnerStats> {
        let granularity = time_range.top_earner_granularity();
        let rows = self
            .remote
            .load_top_products(site_id, granularity, earliest, latest, TOP_EARNERS_LIMIT)
            .await?;

        let products = self.products_for(site_id, &rows).await?;
        let stats = TopEarnerStats {
            site_id,
            date: granularity.period_label(latest),
            granularity,
            limit: TOP_EARNERS_LIMIT,
            items: top_earner_items(&rows, &products),
        };
        upsert_projected(&self.staging, stats, StoredTopEarnerStats::to_read_only).await
    }

    async fn products_for(
        &self,
        site_id: i64,
        rows: &[LeaderboardRow],
    ) -> StoreResult<BTreeMap<i64, Product>> {
        let mut products: BTreeMap<i64, Product> = {
            let view = self.staging.storage().view();
            rows.iter()
                .map(|row| ProductKey::new(site_id, row.product_id))
                .filter_map(|key| view.get::<StoredProduct>(&key))
                .map(|stored| (stored.product_id, stored.to_read_only()))
                .collect()
        };

        let missing: Vec<i64> = rows
            .iter()
            .map(|row| row.product_id)
            .filter(|id| !products.contains_key(id))
            .collect();
        if !missing.is_empty() {
            debug!(site_id, missing = missing.len(), "stats: fetching top earner products");
            for product in self.products.load_products(site_id, &missing).await? {
                products.insert(product.product_id, product);
            }
        }

        Ok(products)
    }

    /// Deletes every cached stats record.
    pub async fn reset_stored_stats(&self) -> StoreResult<usize> {
        let deleted = save(&self.staging, |txn| {
            txn.delete_matching::<StoredOrderStats, _>(|_| true)
                + txn.delete_matching::<StoredSiteVisitStats, _>(|_| true)
                + txn.delete_matching::<StoredTopEarnerStats, _>(|_| true)
        })
        .await?;
        info!(deleted, "stats: cache reset");
        Ok(deleted)
    }
}

/// Leaderboard rows whose product is unknown are left out.
fn top_earner_items(
    rows: &[LeaderboardRow],
    products: &BTreeMap<i64, Product>,
) -> Vec<TopEarnerStatsItem> {
    rows.iter()
        .filter_map(|row| {
            let product = products.get(&row.product_id)?;
            Some(TopEarnerStatsItem {
                product_id: row.product_id,
                product_name: product.name.clone(),
                quantity: row.quantity,
                price: product.price.clone(),
                total: row.total,
                image_url: product.images.first().map(|image| image.src.clone()),
            })
        })
        .collect()
}
