//! Remote data source contracts.
//!
//! One trait per resource. Implementations own transport, auth and paging
//! query parameters; the stores only see typed results.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use storefront_model::{
    Coupon, CouponReport, LeaderboardRow, MetaData, MetaDataUpdate, Order, OrderNote, OrderStats,
    OrderStatus, OrderUpdateField, Product, ProductAttributeTerm, Refund, ShipmentTracking,
    ShipmentTrackingProviderGroup, SiteVisitStats, StatsGranularity, StatsTimeRange,
};
use storefront_storage::StoredOrder;
use thiserror::Error;

/// Failure reported by a remote data source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("resource not found")]
    NotFound,

    #[error("network error: {0}")]
    Network(String),

    #[error("could not decode response: {0}")]
    Decoding(String),

    #[error("server error {code}: {message}")]
    Server { code: String, message: String },
}

impl RemoteError {
    /// Server-side error code, when the remote sent one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Server { code, .. } => Some(code),
            _ => None,
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Which orders a list sync asks for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderListFilter {
    /// `None` asks for every status.
    pub statuses: Option<Vec<OrderStatus>>,
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    /// Only orders modified after this instant. Makes the sync incremental.
    pub modified_after: Option<DateTime<Utc>>,
}

impl OrderListFilter {
    pub fn with_statuses(statuses: Vec<OrderStatus>) -> Self {
        Self {
            statuses: Some(statuses),
            ..Default::default()
        }
    }

    /// An incremental sync only sees a slice of the store and never prunes.
    pub fn is_incremental(&self) -> bool {
        self.modified_after.is_some()
    }

    /// Whether a cached order falls inside the statuses and creation window
    /// this filter asks for.
    pub fn covers(&self, order: &StoredOrder) -> bool {
        let status_matches = match &self.statuses {
            Some(statuses) => statuses.contains(&order.status),
            None => true,
        };
        status_matches
            && self.after.map_or(true, |after| order.date_created > after)
            && self.before.map_or(true, |before| order.date_created < before)
    }
}

#[async_trait]
pub trait CouponsRemote: Send + Sync {
    async fn load_all_coupons(
        &self,
        site_id: i64,
        page: u32,
        page_size: usize,
    ) -> RemoteResult<Vec<Coupon>>;

    async fn search_coupons(
        &self,
        site_id: i64,
        keyword: &str,
        page: u32,
        page_size: usize,
    ) -> RemoteResult<Vec<Coupon>>;

    async fn load_coupon(&self, site_id: i64, coupon_id: i64) -> RemoteResult<Coupon>;

    async fn create_coupon(&self, coupon: &Coupon) -> RemoteResult<Coupon>;

    async fn update_coupon(&self, coupon: &Coupon) -> RemoteResult<Coupon>;

    /// Returns the coupon the remote actually deleted.
    async fn delete_coupon(&self, site_id: i64, coupon_id: i64) -> RemoteResult<Coupon>;

    async fn load_coupon_report(
        &self,
        site_id: i64,
        coupon_id: i64,
        from: DateTime<Utc>,
    ) -> RemoteResult<CouponReport>;
}

#[async_trait]
pub trait OrdersRemote: Send + Sync {
    async fn load_all_orders(
        &self,
        site_id: i64,
        filter: &OrderListFilter,
        page: u32,
        page_size: usize,
    ) -> RemoteResult<Vec<Order>>;

    async fn search_orders(
        &self,
        site_id: i64,
        keyword: &str,
        page: u32,
        page_size: usize,
    ) -> RemoteResult<Vec<Order>>;

    async fn load_order(&self, site_id: i64, order_id: i64) -> RemoteResult<Order>;

    /// Lightweight lookup used to skip a full fetch when the cached copy is current.
    async fn fetch_date_modified(&self, site_id: i64, order_id: i64)
        -> RemoteResult<DateTime<Utc>>;

    async fn create_order(
        &self,
        site_id: i64,
        order: &Order,
        fields: &[OrderUpdateField],
    ) -> RemoteResult<Order>;

    async fn update_order(
        &self,
        site_id: i64,
        order: &Order,
        fields: &[OrderUpdateField],
    ) -> RemoteResult<Order>;

    async fn delete_order(&self, site_id: i64, order_id: i64, force: bool) -> RemoteResult<Order>;
}

#[async_trait]
pub trait ProductsRemote: Send + Sync {
    async fn load_all_products(
        &self,
        site_id: i64,
        page: u32,
        page_size: usize,
    ) -> RemoteResult<Vec<Product>>;

    async fn search_products(
        &self,
        site_id: i64,
        keyword: &str,
        filter: Option<&str>,
        page: u32,
        page_size: usize,
    ) -> RemoteResult<Vec<Product>>;

    async fn load_product(&self, site_id: i64, product_id: i64) -> RemoteResult<Product>;

    async fn load_products(&self, site_id: i64, product_ids: &[i64]) -> RemoteResult<Vec<Product>>;

    async fn update_product(&self, product: &Product) -> RemoteResult<Product>;
}

#[async_trait]
pub trait RefundsRemote: Send + Sync {
    async fn load_all_refunds(
        &self,
        site_id: i64,
        order_id: i64,
        page: u32,
        page_size: usize,
    ) -> RemoteResult<Vec<Refund>>;

    async fn load_refund(&self, site_id: i64, order_id: i64, refund_id: i64)
        -> RemoteResult<Refund>;

    async fn load_refunds(
        &self,
        site_id: i64,
        order_id: i64,
        refund_ids: &[i64],
    ) -> RemoteResult<Vec<Refund>>;

    async fn create_refund(&self, site_id: i64, order_id: i64, refund: &Refund)
        -> RemoteResult<Refund>;
}

#[async_trait]
pub trait MetaDataRemote: Send + Sync {
    /// Returns the full custom field list of the order after the update.
    async fn update_order_metadata(
        &self,
        site_id: i64,
        order_id: i64,
        updates: &[MetaDataUpdate],
    ) -> RemoteResult<Vec<MetaData>>;

    /// Returns the full custom field list of the product after the update.
    async fn update_product_metadata(
        &self,
        site_id: i64,
        product_id: i64,
        updates: &[MetaDataUpdate],
    ) -> RemoteResult<Vec<MetaData>>;
}

#[async_trait]
pub trait OrderNotesRemote: Send + Sync {
    async fn load_order_notes(&self, site_id: i64, order_id: i64) -> RemoteResult<Vec<OrderNote>>;

    async fn add_order_note(
        &self,
        site_id: i64,
        order_id: i64,
        is_customer_note: bool,
        note: &str,
    ) -> RemoteResult<OrderNote>;
}

#[async_trait]
pub trait ProductAttributeTermsRemote: Send + Sync {
    async fn load_terms(
        &self,
        site_id: i64,
        attribute_id: i64,
        page: u32,
        page_size: usize,
    ) -> RemoteResult<Vec<ProductAttributeTerm>>;

    async fn create_term(
        &self,
        site_id: i64,
        attribute_id: i64,
        name: &str,
    ) -> RemoteResult<ProductAttributeTerm>;
}

#[async_trait]
pub trait StatsRemote: Send + Sync {
    /// Order totals for `time_range`, bucketed by its interval granularity.
    async fn load_order_stats(
        &self,
        site_id: i64,
        time_range: StatsTimeRange,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
        quantity: u32,
    ) -> RemoteResult<OrderStats>;

    async fn load_site_visit_stats(
        &self,
        site_id: i64,
        granularity: StatsGranularity,
        latest: DateTime<Utc>,
        quantity: u32,
    ) -> RemoteResult<SiteVisitStats>;

    /// Best selling products of the period, best first.
    async fn load_top_products(
        &self,
        site_id: i64,
        granularity: StatsGranularity,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
        limit: u32,
    ) -> RemoteResult<Vec<LeaderboardRow>>;
}

#[async_trait]
pub trait ShipmentsRemote: Send + Sync {
    async fn load_shipment_trackings(
        &self,
        site_id: i64,
        order_id: i64,
    ) -> RemoteResult<Vec<ShipmentTracking>>;

    async fn load_provider_groups(
        &self,
        site_id: i64,
        order_id: i64,
    ) -> RemoteResult<Vec<ShipmentTrackingProviderGroup>>;

    async fn create_shipment_tracking(
        &self,
        site_id: i64,
        order_id: i64,
        provider: &str,
        tracking_number: &str,
        date_shipped: DateTime<Utc>,
    ) -> RemoteResult<ShipmentTracking>;

    async fn create_custom_shipment_tracking(
        &self,
        site_id: i64,
        order_id: i64,
        provider: &str,
        tracking_number: &str,
        tracking_url: &str,
        date_shipped: DateTime<Utc>,
    ) -> RemoteResult<ShipmentTracking>;

    /// Returns the tracking the remote actually deleted.
    async fn delete_shipment_tracking(
        &self,
        site_id: i64,
        order_id: i64,
        tracking_id: &str,
    ) -> RemoteResult<ShipmentTracking>;
}

/// Every remote the stores talk to.
#[derive(Clone)]
pub struct Remotes {
    pub coupons: Arc<dyn CouponsRemote>,
    pub orders: Arc<dyn OrdersRemote>,
    pub products: Arc<dyn ProductsRemote>,
    pub refunds: Arc<dyn RefundsRemote>,
    pub metadata: Arc<dyn MetaDataRemote>,
    pub order_notes: Arc<dyn OrderNotesRemote>,
    pub attribute_terms: Arc<dyn ProductAttributeTermsRemote>,
    pub stats: Arc<dyn StatsRemote>,
    pub shipments: Arc<dyn ShipmentsRemote>,
}
