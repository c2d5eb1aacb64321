//! Tests for the sync stores.
//!
//! - `reconcile.rs`  - identity, key uniqueness, child strategies, scopes
//! - `pagination.rs` - page bookkeeping, stale pruning on the first page
//! - `orders.rs`     - optimistic writes, rollback, self-heal, search
//! - `products.rs`   - SKU checks, missing product fan-out
//! - `coupons.rs`    - delete confirmation, self-heal
//! - `children.rs`   - metadata, notes, refunds, attribute terms
//! - `stats.rs`      - interval matching, visitor and top earner caches
//! - `shipments.rs`  - tracking pruning, custom providers
//! - `dispatch.rs`   - action routing and completion delivery

mod mocks;
mod orders;
mod shipments;
mod stats;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use storefront_config::Config;
use storefront_model::{
    Coupon, MetaData, Order, OrderItem, OrderNote, OrderStatus, Product, ProductAttributeTerm,
    Refund,
};
use storefront_storage::StorageManager;

use self::mocks::{
    MockCoupons, MockMetaData, MockOrderNotes, MockOrders, MockProducts, MockRefunds,
    MockShipments, MockStats, MockTerms,
};
use crate::remote::Remotes;
use crate::StoresManager;

pub(crate) const SITE: i64 = 7;

pub(crate) fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

pub(crate) fn order(order_id: i64) -> Order {
    Order {
        site_id: SITE,
        order_id,
        number: order_id.to_string(),
        status: OrderStatus::Processing,
        currency: "USD".to_string(),
        date_created: at(1),
        date_modified: at(1),
        total: "20.00".to_string(),
        ..Default::default()
    }
}

pub(crate) fn order_item(item_id: i64, product_id: i64) -> OrderItem {
    OrderItem {
        item_id,
        name: format!("Item {item_id}"),
        product_id,
        quantity: 1.0,
        price: "10.00".to_string(),
        ..Default::default()
    }
}

pub(crate) fn product(product_id: i64) -> Product {
    Product {
        site_id: SITE,
        product_id,
        name: format!("Product {product_id}"),
        slug: format!("product-{product_id}"),
        price: "10.00".to_string(),
        date_created: at(1),
        date_modified: at(1),
        ..Default::default()
    }
}

pub(crate) fn coupon(coupon_id: i64) -> Coupon {
    Coupon {
        site_id: SITE,
        coupon_id,
        code: format!("SAVE{coupon_id}"),
        amount: "5.00".to_string(),
        ..Default::default()
    }
}

pub(crate) fn refund(order_id: i64, refund_id: i64) -> Refund {
    Refund {
        site_id: SITE,
        order_id,
        refund_id,
        date_created: at(2),
        amount: "5.00".to_string(),
        ..Default::default()
    }
}

pub(crate) fn note(note_id: i64, text: &str) -> OrderNote {
    OrderNote {
        note_id,
        date_created: at(2),
        note: text.to_string(),
        author: "shop manager".to_string(),
        ..Default::default()
    }
}

pub(crate) fn field(metadata_id: i64, value: &str) -> MetaData {
    MetaData::new(metadata_id, format!("key_{metadata_id}"), value)
}

pub(crate) fn term(attribute_id: i64, term_id: i64) -> ProductAttributeTerm {
    ProductAttributeTerm {
        site_id: SITE,
        attribute_id,
        term_id,
        name: format!("Term {term_id}"),
        slug: format!("term-{term_id}"),
        count: 0,
    }
}

/// In-memory cache, scripted remotes and every store.
pub(crate) struct Harness {
    pub storage: StorageManager,
    pub coupons: Arc<MockCoupons>,
    pub orders: Arc<MockOrders>,
    pub products: Arc<MockProducts>,
    pub refunds: Arc<MockRefunds>,
    pub metadata: Arc<MockMetaData>,
    pub notes: Arc<MockOrderNotes>,
    pub terms: Arc<MockTerms>,
    pub stats: Arc<MockStats>,
    pub shipments: Arc<MockShipments>,
    pub stores: Arc<StoresManager>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub(crate) fn with_config(config: &Config) -> Self {
        let storage = StorageManager::in_memory().unwrap();
        let coupons = Arc::new(MockCoupons::new());
        let orders = Arc::new(MockOrders::new());
        let products = Arc::new(MockProducts::new());
        let refunds = Arc::new(MockRefunds::new());
        let metadata = Arc::new(MockMetaData::new());
        let notes = Arc::new(MockOrderNotes::new());
        let terms = Arc::new(MockTerms::new());
        let stats = Arc::new(MockStats::new());
        let shipments = Arc::new(MockShipments::new());

        let remotes = Remotes {
            coupons: coupons.clone(),
            orders: orders.clone(),
            products: products.clone(),
            refunds: refunds.clone(),
            metadata: metadata.clone(),
            order_notes: notes.clone(),
            attribute_terms: terms.clone(),
            stats: stats.clone(),
            shipments: shipments.clone(),
        };
        let stores = Arc::new(StoresManager::new(storage.clone(), remotes, config));

        Self {
            storage,
            coupons,
            orders,
            products,
            refunds,
            metadata,
            notes,
            terms,
            stats,
            shipments,
            stores,
        }
    }
}
