//! Owns one instance of every store.

use storefront_config::Config;
use storefront_storage::StorageManager;
use tracing::info;

use crate::remote::Remotes;
use crate::stores::{
    AttributeTermStore, CouponStore, MetaDataStore, OrderNoteStore, OrderStore, ProductStore,
    RefundStore, ShipmentStore, StatsStore,
};

/// The stores of one cache, built from the shared config.
pub struct StoresManager {
    storage: StorageManager,
    coupons: CouponStore,
    orders: OrderStore,
    products: ProductStore,
    refunds: RefundStore,
    metadata: MetaDataStore,
    order_notes: OrderNoteStore,
    attribute_terms: AttributeTermStore,
    stats: StatsStore,
    shipments: ShipmentStore,
}

impl StoresManager {
    pub fn new(storage: StorageManager, remotes: Remotes, config: &Config) -> Self {
        info!(
            page_size = config.page_size,
            attribute_terms_page_size = config.attribute_terms_page_size,
            max_concurrent_fetches = config.max_concurrent_fetches,
            "stores: initializing"
        );

        Self {
            coupons: CouponStore::new(storage.clone(), remotes.coupons, config.page_size),
            orders: OrderStore::new(storage.clone(), remotes.orders, config.page_size),
            stats: StatsStore::new(storage.clone(), remotes.stats, remotes.products.clone()),
            shipments: ShipmentStore::new(storage.clone(), remotes.shipments),
            products: ProductStore::new(
                storage.clone(),
                remotes.products,
                config.page_size,
                config.max_concurrent_fetches,
            ),
            refunds: RefundStore::new(storage.clone(), remotes.refunds),
            metadata: MetaDataStore::new(storage.clone(), remotes.metadata),
            order_notes: OrderNoteStore::new(storage.clone(), remotes.order_notes),
            attribute_terms: AttributeTermStore::new(
                storage.clone(),
                remotes.attribute_terms,
                config.attribute_terms_page_size,
            ),
            storage,
        }
    }

    pub fn storage(&self) -> &StorageManager {
        &self.storage
    }

    pub fn coupons(&self) -> &CouponStore {
        &self.coupons
    }

    pub fn orders(&self) -> &OrderStore {
        &self.orders
    }

    pub fn products(&self) -> &ProductStore {
        &self.products
    }

    pub fn refunds(&self) -> &RefundStore {
        &self.refunds
    }

    pub fn metadata(&self) -> &MetaDataStore {
        &self.metadata
    }

    pub fn order_notes(&self) -> &OrderNoteStore {
        &self.order_notes
    }

    pub fn attribute_terms(&self) -> &AttributeTermStore {
        &self.attribute_terms
    }

    pub fn stats(&self) -> &StatsStore {
        &self.stats
    }

    pub fn shipments(&self) -> &ShipmentStore {
        &self.shipments
    }
}
