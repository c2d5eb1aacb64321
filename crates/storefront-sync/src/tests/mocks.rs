//! Scripted remotes.
//!
//! Each call pops the next queued response. An empty queue answers with a
//! network error naming the call, so a test that forgets to script a
//! response fails loudly instead of hanging.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use storefront_model::{
    Coupon, CouponReport, LeaderboardRow, MetaData, MetaDataUpdate, Order, OrderNote, OrderStats,
    OrderUpdateField, Product, ProductAttributeTerm, Refund, ShipmentTracking,
    ShipmentTrackingProviderGroup, SiteVisitStats, StatsGranularity, StatsTimeRange,
};

use crate::remote::{
    CouponsRemote, MetaDataRemote, OrderListFilter, OrderNotesRemote, OrdersRemote,
    ProductAttributeTermsRemote, ProductsRemote, RefundsRemote, RemoteError, RemoteResult,
    ShipmentsRemote, StatsRemote,
};

pub(crate) struct Script<T> {
    name: &'static str,
    responses: Mutex<VecDeque<RemoteResult<T>>>,
}

impl<T> Script<T> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            responses: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn ok(&self, value: T) {
        self.responses.lock().push_back(Ok(value));
    }

    pub(crate) fn fail(&self, error: RemoteError) {
        self.responses.lock().push_back(Err(error));
    }

    fn next(&self) -> RemoteResult<T> {
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::Network(format!("unscripted call: {}", self.name))))
    }
}

// ============================================================================
// Coupons
// ============================================================================

pub(crate) struct MockCoupons {
    pub pages: Script<Vec<Coupon>>,
    pub search: Script<Vec<Coupon>>,
    pub load: Script<Coupon>,
    pub delete: Script<Coupon>,
    pub report: Script<CouponReport>,
}

impl MockCoupons {
    pub(crate) fn new() -> Self {
        Self {
            pages: Script::new("load_all_coupons"),
            search: Script::new("search_coupons"),
            load: Script::new("load_coupon"),
            delete: Script::new("delete_coupon"),
            report: Script::new("load_coupon_report"),
        }
    }
}

#[async_trait]
impl CouponsRemote for MockCoupons {
    async fn load_all_coupons(&self, _: i64, _: u32, _: usize) -> RemoteResult<Vec<Coupon>> {
        self.pages.next()
    }

    async fn search_coupons(&self, _: i64, _: &str, _: u32, _: usize) -> RemoteResult<Vec<Coupon>> {
        self.search.next()
    }

    async fn load_coupon(&self, _: i64, _: i64) -> RemoteResult<Coupon> {
        self.load.next()
    }

    async fn create_coupon(&self, coupon: &Coupon) -> RemoteResult<Coupon> {
        Ok(coupon.clone())
    }

    async fn update_coupon(&self, coupon: &Coupon) -> RemoteResult<Coupon> {
        Ok(coupon.clone())
    }

    async fn delete_coupon(&self, _: i64, _: i64) -> RemoteResult<Coupon> {
        self.delete.next()
    }

    async fn load_coupon_report(
        &self,
        _: i64,
        _: i64,
        _: DateTime<Utc>,
    ) -> RemoteResult<CouponReport> {
        self.report.next()
    }
}

// ============================================================================
// Orders
// ============================================================================

pub(crate) struct MockOrders {
    pub pages: Script<Vec<Order>>,
    pub search: Script<Vec<Order>>,
    pub load: Script<Order>,
    pub modified: Script<DateTime<Utc>>,
    pub update: Script<Order>,
    pub delete: Script<Order>,
    /// Every update request, as sent.
    pub sent_updates: Mutex<Vec<(Order, Vec<OrderUpdateField>)>>,
    pub sent_creates: Mutex<Vec<(Order, Vec<OrderUpdateField>)>>,
}

/// Id the remote hands to an order created without one.
pub(crate) const CREATED_ORDER_ID: i64 = 500;

impl MockOrders {
    pub(crate) fn new() -> Self {
        Self {
            pages: Script::new("load_all_orders"),
            search: Script::new("search_orders"),
            load: Script::new("load_order"),
            modified: Script::new("fetch_date_modified"),
            update: Script::new("update_order"),
            delete: Script::new("delete_order"),
            sent_updates: Mutex::new(Vec::new()),
            sent_creates: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl OrdersRemote for MockOrders {
    async fn load_all_orders(
        &self,
        _: i64,
        _: &OrderListFilter,
        _: u32,
        _: usize,
    ) -> RemoteResult<Vec<Order>> {
        self.pages.next()
    }

    async fn search_orders(&self, _: i64, _: &str, _: u32, _: usize) -> RemoteResult<Vec<Order>> {
        self.search.next()
    }

    async fn load_order(&self, _: i64, _: i64) -> RemoteResult<Order> {
        self.load.next()
    }

    async fn fetch_date_modified(&self, _: i64, _: i64) -> RemoteResult<DateTime<Utc>> {
        self.modified.next()
    }

    /// Echoes the order, giving a new one the next free id.
    async fn create_order(
        &self,
        site_id: i64,
        order: &Order,
        fields: &[OrderUpdateField],
    ) -> RemoteResult<Order> {
        self.sent_creates
            .lock()
            .push((order.clone(), fields.to_vec()));
        let mut created = order.clone();
        created.site_id = site_id;
        if created.order_id == 0 {
            created.order_id = CREATED_ORDER_ID;
        }
        Ok(created)
    }

    async fn update_order(
        &self,
        _: i64,
        order: &Order,
        fields: &[OrderUpdateField],
    ) -> RemoteResult<Order> {
        self.sent_updates
            .lock()
            .push((order.clone(), fields.to_vec()));
        self.update.next()
    }

    async fn delete_order(&self, _: i64, _: i64, _: bool) -> RemoteResult<Order> {
        self.delete.next()
    }
}

// ============================================================================
// Products
// ============================================================================

pub(crate) struct MockProducts {
    pub pages: Script<Vec<Product>>,
    pub search: Script<Vec<Product>>,
    pub update: Script<Product>,
    /// Answers for `load_product`, by product id. Missing ids are not found.
    pub by_id: Mutex<HashMap<i64, RemoteResult<Product>>>,
    /// `(page, page_size)` of every list request.
    pub page_requests: Mutex<Vec<(u32, usize)>>,
    /// Ids of every batch request.
    pub batch_requests: Mutex<Vec<Vec<i64>>>,
}

impl MockProducts {
    pub(crate) fn new() -> Self {
        Self {
            pages: Script::new("load_all_products"),
            search: Script::new("search_products"),
            update: Script::new("update_product"),
            by_id: Mutex::new(HashMap::new()),
            page_requests: Mutex::new(Vec::new()),
            batch_requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn serve(&self, product_id: i64, response: RemoteResult<Product>) {
        self.by_id.lock().insert(product_id, response);
    }
}

#[async_trait]
impl ProductsRemote for MockProducts {
    async fn load_all_products(
        &self,
        _: i64,
        page: u32,
        page_size: usize,
    ) -> RemoteResult<Vec<Product>> {
        self.page_requests.lock().push((page, page_size));
        self.pages.next()
    }

    async fn search_products(
        &self,
        _: i64,
        _: &str,
        _: Option<&str>,
        _: u32,
        _: usize,
    ) -> RemoteResult<Vec<Product>> {
        self.search.next()
    }

    async fn load_product(&self, _: i64, product_id: i64) -> RemoteResult<Product> {
        self.by_id
            .lock()
            .get(&product_id)
            .cloned()
            .unwrap_or(Err(RemoteError::NotFound))
    }

    async fn load_products(&self, _: i64, product_ids: &[i64]) -> RemoteResult<Vec<Product>> {
        self.batch_requests.lock().push(product_ids.to_vec());
        let by_id = self.by_id.lock();
        Ok(product_ids
            .iter()
            .filter_map(|id| by_id.get(id).and_then(|response| response.clone().ok()))
            .collect())
    }

    async fn update_product(&self, _: &Product) -> RemoteResult<Product> {
        self.update.next()
    }
}

// ============================================================================
// Refunds, metadata, notes, terms
// ============================================================================

pub(crate) struct MockRefunds {
    pub pages: Script<Vec<Refund>>,
    pub load: Script<Refund>,
    pub load_many: Script<Vec<Refund>>,
}

impl MockRefunds {
    pub(crate) fn new() -> Self {
        Self {
            pages: Script::new("load_all_refunds"),
            load: Script::new("load_refund"),
            load_many: Script::new("load_refunds"),
        }
    }
}

#[async_trait]
impl RefundsRemote for MockRefunds {
    async fn load_all_refunds(
        &self,
        _: i64,
        _: i64,
        _: u32,
        _: usize,
    ) -> RemoteResult<Vec<Refund>> {
        self.pages.next()
    }

    async fn load_refund(&self, _: i64, _: i64, _: i64) -> RemoteResult<Refund> {
        self.load.next()
    }

    async fn load_refunds(&self, _: i64, _: i64, _: &[i64]) -> RemoteResult<Vec<Refund>> {
        self.load_many.next()
    }

    async fn create_refund(&self, _: i64, _: i64, refund: &Refund) -> RemoteResult<Refund> {
        Ok(refund.clone())
    }
}

pub(crate) struct MockMetaData {
    pub order: Script<Vec<MetaData>>,
    pub product: Script<Vec<MetaData>>,
}

impl MockMetaData {
    pub(crate) fn new() -> Self {
        Self {
            order: Script::new("update_order_metadata"),
            product: Script::new("update_product_metadata"),
        }
    }
}

#[async_trait]
impl MetaDataRemote for MockMetaData {
    async fn update_order_metadata(
        &self,
        _: i64,
        _: i64,
        _: &[MetaDataUpdate],
    ) -> RemoteResult<Vec<MetaData>> {
        self.order.next()
    }

    async fn update_product_metadata(
        &self,
        _: i64,
        _: i64,
        _: &[MetaDataUpdate],
    ) -> RemoteResult<Vec<MetaData>> {
        self.product.next()
    }
}

pub(crate) struct MockOrderNotes {
    pub load: Script<Vec<OrderNote>>,
    pub add: Script<OrderNote>,
}

impl MockOrderNotes {
    pub(crate) fn new() -> Self {
        Self {
            load: Script::new("load_order_notes"),
            add: Script::new("add_order_note"),
        }
    }
}

#[async_trait]
impl OrderNotesRemote for MockOrderNotes {
    async fn load_order_notes(&self, _: i64, _: i64) -> RemoteResult<Vec<OrderNote>> {
        self.load.next()
    }

    async fn add_order_note(&self, _: i64, _: i64, _: bool, _: &str) -> RemoteResult<OrderNote> {
        self.add.next()
    }
}

pub(crate) struct MockTerms {
    pub pages: Script<Vec<ProductAttributeTerm>>,
    pub create: Script<ProductAttributeTerm>,
}

impl MockTerms {
    pub(crate) fn new() -> Self {
        Self {
            pages: Script::new("load_terms"),
            create: Script::new("create_term"),
        }
    }
}

#[async_trait]
impl ProductAttributeTermsRemote for MockTerms {
    async fn load_terms(
        &self,
        _: i64,
        _: i64,
        _: u32,
        _: usize,
    ) -> RemoteResult<Vec<ProductAttributeTerm>> {
        self.pages.next()
    }

    async fn create_term(&self, _: i64, _: i64, _: &str) -> RemoteResult<ProductAttributeTerm> {
        self.create.next()
    }
}

// ============================================================================
// Stats, shipments
// ============================================================================

pub(crate) struct MockStats {
    pub orders: Script<OrderStats>,
    pub visits: Script<SiteVisitStats>,
    pub top_products: Script<Vec<LeaderboardRow>>,
    /// `(granularity, quantity)` of every visit request.
    pub visit_requests: Mutex<Vec<(StatsGranularity, u32)>>,
}

impl MockStats {
    pub(crate) fn new() -> Self {
        Self {
            orders: Script::new("load_order_stats"),
            visits: Script::new("load_site_visit_stats"),
            top_products: Script::new("load_top_products"),
            visit_requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StatsRemote for MockStats {
    async fn load_order_stats(
        &self,
        _: i64,
        _: StatsTimeRange,
        _: DateTime<Utc>,
        _: DateTime<Utc>,
        _: u32,
    ) -> RemoteResult<OrderStats> {
        self.orders.next()
    }

    async fn load_site_visit_stats(
        &self,
        _: i64,
        granularity: StatsGranularity,
        _: DateTime<Utc>,
        quantity: u32,
    ) -> RemoteResult<SiteVisitStats> {
        self.visit_requests.lock().push((granularity, quantity));
        self.visits.next()
    }

    async fn load_top_products(
        &self,
        _: i64,
        _: StatsGranularity,
        _: DateTime<Utc>,
        _: DateTime<Utc>,
        _: u32,
    ) -> RemoteResult<Vec<LeaderboardRow>> {
        self.top_products.next()
    }
}

pub(crate) struct MockShipments {
    pub trackings: Script<Vec<ShipmentTracking>>,
    pub groups: Script<Vec<ShipmentTrackingProviderGroup>>,
    pub create: Script<ShipmentTracking>,
    pub delete: Script<ShipmentTracking>,
}

impl MockShipments {
    pub(crate) fn new() -> Self {
        Self {
            trackings: Script::new("load_shipment_trackings"),
            groups: Script::new("load_provider_groups"),
            create: Script::new("create_shipment_tracking"),
            delete: Script::new("delete_shipment_tracking"),
        }
    }
}

#[async_trait]
impl ShipmentsRemote for MockShipments {
    async fn load_shipment_trackings(&self, _: i64, _: i64) -> RemoteResult<Vec<ShipmentTracking>> {
        self.trackings.next()
    }

    async fn load_provider_groups(
        &self,
        _: i64,
        _: i64,
    ) -> RemoteResult<Vec<ShipmentTrackingProviderGroup>> {
        self.groups.next()
    }

    async fn create_shipment_tracking(
        &self,
        _: i64,
        _: i64,
        _: &str,
        _: &str,
        _: DateTime<Utc>,
    ) -> RemoteResult<ShipmentTracking> {
        self.create.next()
    }

    async fn create_custom_shipment_tracking(
        &self,
        _: i64,
        _: i64,
        _: &str,
        _: &str,
        _: &str,
        _: DateTime<Utc>,
    ) -> RemoteResult<ShipmentTracking> {
        self.create.next()
    }

    async fn delete_shipment_tracking(
        &self,
        _: i64,
        _: i64,
        _: &str,
    ) -> RemoteResult<ShipmentTracking> {
        self.delete.next()
    }
}
