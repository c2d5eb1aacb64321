use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_model::{OrderItemRefund, OrderItemTaxRefund, Refund, RefundKey};

use super::{RecordKind, StorageRecord, StoredShippingLine};
use crate::meta::{values, Child, ObjectId, RecordMeta};

/// Persisted refund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRefund {
    pub meta: RecordMeta,
    pub site_id: i64,
    pub order_id: i64,
    pub refund_id: i64,
    pub date_created: DateTime<Utc>,
    pub amount: String,
    pub reason: String,
    pub refunded_by_user_id: i64,
    pub is_automated: Option<bool>,
    pub create_automated_refund: Option<bool>,
    pub items: Vec<StoredRefundItem>,
    pub shipping_lines: Vec<StoredShippingLine>,
}

impl StoredRefund {
    pub fn new(refund: &Refund) -> Self {
        Self {
            meta: RecordMeta::new(),
            site_id: refund.site_id,
            order_id: refund.order_id,
            refund_id: refund.refund_id,
            date_created: refund.date_created,
            amount: refund.amount.clone(),
            reason: refund.reason.clone(),
            refunded_by_user_id: refund.refunded_by_user_id,
            is_automated: refund.is_automated,
            create_automated_refund: refund.create_automated_refund,
            items: Vec::new(),
            shipping_lines: Vec::new(),
        }
    }

    pub fn apply_fields(&mut self, refund: &Refund) {
        self.site_id = refund.site_id;
        self.order_id = refund.order_id;
        self.refund_id = refund.refund_id;
        self.date_created = refund.date_created;
        self.amount = refund.amount.clone();
        self.reason = refund.reason.clone();
        self.refunded_by_user_id = refund.refunded_by_user_id;
        self.is_automated = refund.is_automated;
        self.create_automated_refund = refund.create_automated_refund;
        self.meta.touch();
    }

    pub fn to_read_only(&self) -> Refund {
        Refund {
            site_id: self.site_id,
            order_id: self.order_id,
            refund_id: self.refund_id,
            date_created: self.date_created,
            amount: self.amount.clone(),
            reason: self.reason.clone(),
            refunded_by_user_id: self.refunded_by_user_id,
            is_automated: self.is_automated,
            create_automated_refund: self.create_automated_refund,
            items: self.items.iter().map(StoredRefundItem::to_read_only).collect(),
            shipping_lines: self
                .shipping_lines
                .iter()
                .map(StoredShippingLine::to_read_only)
                .collect(),
        }
    }
}

impl StorageRecord for StoredRefund {
    type Key = RefundKey;

    const KIND: RecordKind = RecordKind::Refund;

    fn key(&self) -> RefundKey {
        RefundKey::new(self.site_id, self.order_id, self.refund_id)
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn site_id(&self) -> i64 {
        self.site_id
    }

    table_accessors!(refunds);
}

/// Persisted refunded line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRefundItem {
    pub object_id: ObjectId,
    pub inserted_at: DateTime<Utc>,
    pub item_id: i64,
    pub name: String,
    pub product_id: i64,
    pub variation_id: i64,
    pub quantity: f64,
    pub price: String,
    pub sku: Option<String>,
    pub subtotal: String,
    pub subtotal_tax: String,
    pub tax_class: String,
    pub total: String,
    pub total_tax: String,
    pub taxes: Vec<Child<OrderItemTaxRefund>>,
}

impl StoredRefundItem {
    pub fn new(item: &OrderItemRefund) -> Self {
        Self {
            object_id: ObjectId::new(),
            inserted_at: Utc::now(),
            item_id: item.item_id,
            name: item.name.clone(),
            product_id: item.product_id,
            variation_id: item.variation_id,
            quantity: item.quantity,
            price: item.price.clone(),
            sku: item.sku.clone(),
            subtotal: item.subtotal.clone(),
            subtotal_tax: item.subtotal_tax.clone(),
            tax_class: item.tax_class.clone(),
            total: item.total.clone(),
            total_tax: item.total_tax.clone(),
            taxes: Vec::new(),
        }
    }

    pub fn apply_fields(&mut self, item: &OrderItemRefund) {
        self.item_id = item.item_id;
        self.name = item.name.clone();
        self.product_id = item.product_id;
        self.variation_id = item.variation_id;
        self.quantity = item.quantity;
        self.price = item.price.clone();
        self.sku = item.sku.clone();
        self.subtotal = item.subtotal.clone();
        self.subtotal_tax = item.subtotal_tax.clone();
        self.tax_class = item.tax_class.clone();
        self.total = item.total.clone();
        self.total_tax = item.total_tax.clone();
    }

    pub fn to_read_only(&self) -> OrderItemRefund {
        OrderItemRefund {
            item_id: self.item_id,
            name: self.name.clone(),
            product_id: self.product_id,
            variation_id: self.variation_id,
            quantity: self.quantity,
            price: self.price.clone(),
            sku: self.sku.clone(),
            subtotal: self.subtotal.clone(),
            subtotal_tax: self.subtotal_tax.clone(),
            tax_class: self.tax_class.clone(),
            total: self.total.clone(),
            total_tax: self.total_tax.clone(),
            taxes: values(&self.taxes),
        }
    }
}
