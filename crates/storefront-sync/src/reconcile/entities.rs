//! Per-entity upserts.

use std::fmt;

use storefront_model::{
    AttributeTermKey, Coupon, CouponKey, MetaData, Order, OrderKey, OrderNote, OrderStats,
    OrderStatsKey, Product, ProductAttributeTerm, ProductKey, Refund, RefundKey,
    ShipmentTracking, ShipmentTrackingKey, ShipmentTrackingProviderGroup, SiteVisitStats,
    StatsPeriodKey, TopEarnerStats, TrackingProviderGroupKey,
};
use storefront_storage::{
    Child, StagingTxn, StoredAttributeTerm, StoredCoupon, StoredOrder, StoredOrderStats,
    StoredProduct, StoredRefund, StoredShipmentTracking, StoredSiteVisitStats,
    StoredTopEarnerStats, StoredTrackingProviderGroup,
};
use tracing::warn;

use super::children::{match_or_create_prune, replace_all};
use super::Upsertable;

impl Upsertable for Order {
    type Record = StoredOrder;

    fn record_key(&self) -> OrderKey {
        self.key()
    }

    fn is_transient(&self) -> bool {
        Order::is_transient(self)
    }

    fn insert_record(&self) -> StoredOrder {
        let mut record = StoredOrder::new(self);
        reconcile_order_children(&mut record, self);
        record
    }

    fn update_record(&self, record: &mut StoredOrder) {
        record.apply_fields(self);
        reconcile_order_children(record, self);
    }

    fn set_exclusive_for_search(record: &mut StoredOrder, exclusive: bool) {
        record.exclusive_for_search = exclusive;
    }
}

/// Notes are left alone; they have their own sync.
fn reconcile_order_children(record: &mut StoredOrder, order: &Order) {
    match_or_create_prune(&mut record.items, &order.items);
    match_or_create_prune(&mut record.coupons, &order.coupons);
    match_or_create_prune(&mut record.fees, &order.fees);
    match_or_create_prune(&mut record.shipping_lines, &order.shipping_lines);
    match_or_create_prune(&mut record.taxes, &order.taxes);
    match_or_create_prune(&mut record.refunds, &order.refunds);
    match_or_create_prune(&mut record.custom_fields, &order.custom_fields);
    replace_all(&mut record.gift_cards, &order.gift_cards);

    record.attribution_info = match (record.attribution_info.take(), &order.attribution_info) {
        (Some(mut existing), Some(info)) => {
            existing.value = info.clone();
            Some(existing)
        }
        (None, Some(info)) => Some(Child::new(info.clone())),
        (_, None) => None,
    };
}

impl Upsertable for Product {
    type Record = StoredProduct;

    fn record_key(&self) -> ProductKey {
        self.key()
    }

    fn is_transient(&self) -> bool {
        Product::is_transient(self)
    }

    fn insert_record(&self) -> StoredProduct {
        let mut record = StoredProduct::new(self);
        reconcile_product_children(&mut record, self);
        record
    }

    fn update_record(&self, record: &mut StoredProduct) {
        record.apply_fields(self);
        reconcile_product_children(record, self);
    }
}

fn reconcile_product_children(record: &mut StoredProduct, product: &Product) {
    match_or_create_prune(&mut record.attributes, &product.attributes);
    match_or_create_prune(&mut record.default_attributes, &product.default_attributes);
    match_or_create_prune(&mut record.categories, &product.categories);
    match_or_create_prune(&mut record.custom_fields, &product.custom_fields);
    replace_all(&mut record.images, &product.images);
    replace_all(&mut record.tags, &product.tags);
    replace_all(&mut record.downloads, &product.downloads);
    replace_all(&mut record.add_ons, &product.add_ons);
    replace_all(&mut record.bundled_items, &product.bundled_items);
    replace_all(&mut record.composite_components, &product.composite_components);
}

impl Upsertable for Refund {
    type Record = StoredRefund;

    fn record_key(&self) -> RefundKey {
        self.key()
    }

    fn insert_record(&self) -> StoredRefund {
        let mut record = StoredRefund::new(self);
        match_or_create_prune(&mut record.items, &self.items);
        match_or_create_prune(&mut record.shipping_lines, &self.shipping_lines);
        record
    }

    fn update_record(&self, record: &mut StoredRefund) {
        record.apply_fields(self);
        match_or_create_prune(&mut record.items, &self.items);
        match_or_create_prune(&mut record.shipping_lines, &self.shipping_lines);
    }
}

impl Upsertable for Coupon {
    type Record = StoredCoupon;

    fn record_key(&self) -> CouponKey {
        self.key()
    }

    fn insert_record(&self) -> StoredCoupon {
        StoredCoupon::new(self)
    }

    fn update_record(&self, record: &mut StoredCoupon) {
        record.apply_fields(self);
    }
}

impl Upsertable for ProductAttributeTerm {
    type Record = StoredAttributeTerm;

    fn record_key(&self) -> AttributeTermKey {
        self.key()
    }

    fn insert_record(&self) -> StoredAttributeTerm {
        StoredAttributeTerm::new(self)
    }

    fn update_record(&self, record: &mut StoredAttributeTerm) {
        record.apply_fields(self);
    }
}

impl Upsertable for OrderStats {
    type Record = StoredOrderStats;

    fn record_key(&self) -> OrderStatsKey {
        self.key()
    }

    fn insert_record(&self) -> StoredOrderStats {
        let mut record = StoredOrderStats::new(self);
        match_or_create_prune(&mut record.intervals, &self.intervals);
        record
    }

    fn update_record(&self, record: &mut StoredOrderStats) {
        record.apply_fields(self);
        match_or_create_prune(&mut record.intervals, &self.intervals);
    }
}

impl Upsertable for SiteVisitStats {
    type Record = StoredSiteVisitStats;

    fn record_key(&self) -> StatsPeriodKey {
        self.key()
    }

    fn insert_record(&self) -> StoredSiteVisitStats {
        let mut record = StoredSiteVisitStats::new(self);
        replace_all(&mut record.items, &self.items);
        record
    }

    fn update_record(&self, record: &mut StoredSiteVisitStats) {
        record.meta.touch();
        replace_all(&mut record.items, &self.items);
    }
}

impl Upsertable for TopEarnerStats {
    type Record = StoredTopEarnerStats;

    fn record_key(&self) -> StatsPeriodKey {
        self.key()
    }

    fn insert_record(&self) -> StoredTopEarnerStats {
        let mut record = StoredTopEarnerStats::new(self);
        replace_all(&mut record.items, &self.items);
        record
    }

    fn update_record(&self, record: &mut StoredTopEarnerStats) {
        record.apply_fields(self);
        replace_all(&mut record.items, &self.items);
    }
}

impl Upsertable for ShipmentTracking {
    type Record = StoredShipmentTracking;

    fn record_key(&self) -> ShipmentTrackingKey {
        self.key()
    }

    fn insert_record(&self) -> StoredShipmentTracking {
        StoredShipmentTracking::new(self)
    }

    fn update_record(&self, record: &mut StoredShipmentTracking) {
        record.apply_fields(self);
    }
}

impl Upsertable for ShipmentTrackingProviderGroup {
    type Record = StoredTrackingProviderGroup;

    fn record_key(&self) -> TrackingProviderGroupKey {
        self.key()
    }

    fn insert_record(&self) -> StoredTrackingProviderGroup {
        let mut record = StoredTrackingProviderGroup::new(self);
        match_or_create_prune(&mut record.providers, &self.providers);
        record
    }

    fn update_record(&self, record: &mut StoredTrackingProviderGroup) {
        record.meta.touch();
        match_or_create_prune(&mut record.providers, &self.providers);
    }
}

/// The record a custom field list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaDataParent {
    Order(OrderKey),
    Product(ProductKey),
}

impl fmt::Display for MetaDataParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Order(key) => write!(f, "order {key}"),
            Self::Product(key) => write!(f, "product {key}"),
        }
    }
}

/// Replaces the parent's custom fields with `metadata`, matched by id.
///
/// Returns `false`, after logging, when the parent is not cached.
pub fn reconcile_custom_fields(
    txn: &mut StagingTxn,
    parent: MetaDataParent,
    metadata: &[MetaData],
) -> bool {
    let fields = match parent {
        MetaDataParent::Order(key) => txn.load_mut::<StoredOrder>(&key).map(|order| {
            order.meta.touch();
            &mut order.custom_fields
        }),
        MetaDataParent::Product(key) => txn.load_mut::<StoredProduct>(&key).map(|product| {
            product.meta.touch();
            &mut product.custom_fields
        }),
    };

    match fields {
        Some(fields) => {
            match_or_create_prune(fields, metadata);
            true
        }
        None => {
            warn!(parent = %parent, "metadata: parent is not stored, skipping update");
            false
        }
    }
}

/// Replaces the notes of a cached order, matched by note id.
///
/// Returns `false`, after logging, when the order is not cached.
pub fn reconcile_notes(txn: &mut StagingTxn, order: OrderKey, notes: &[OrderNote]) -> bool {
    match txn.load_mut::<StoredOrder>(&order) {
        Some(stored) => {
            match_or_create_prune(&mut stored.notes, notes);
            stored.meta.touch();
            true
        }
        None => {
            warn!(order = %order, "order notes: order is not stored, skipping update");
            false
        }
    }
}
