use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_model::{
    Address, MetaData, Order, OrderAttributionInfo, OrderCouponLine, OrderFeeLine, OrderGiftCard,
    OrderItem, OrderItemAddOn, OrderItemAttribute, OrderItemTax, OrderKey, OrderNote,
    OrderRefundCondensed, OrderStatus, OrderTaxLine, ShippingLine, ShippingLineTax,
};

use super::{RecordKind, StorageRecord};
use crate::meta::{values, Child, ObjectId, RecordMeta};

/// Persisted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredOrder {
    pub meta: RecordMeta,
    /// Inserted while reconciling search results and never seen by a list sync.
    pub exclusive_for_search: bool,
    pub site_id: i64,
    pub order_id: i64,
    pub parent_id: i64,
    pub customer_id: i64,
    pub order_key: String,
    pub number: String,
    pub status: OrderStatus,
    pub currency: String,
    pub customer_note: Option<String>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub date_paid: Option<DateTime<Utc>>,
    pub discount_total: String,
    pub shipping_total: String,
    pub total: String,
    pub total_tax: String,
    pub payment_method_id: String,
    pub payment_method_title: String,
    pub billing_address: Option<Address>,
    pub shipping_address: Option<Address>,
    pub items: Vec<StoredOrderItem>,
    pub coupons: Vec<Child<OrderCouponLine>>,
    pub fees: Vec<Child<OrderFeeLine>>,
    pub shipping_lines: Vec<StoredShippingLine>,
    pub taxes: Vec<Child<OrderTaxLine>>,
    pub refunds: Vec<Child<OrderRefundCondensed>>,
    pub custom_fields: Vec<Child<MetaData>>,
    pub gift_cards: Vec<Child<OrderGiftCard>>,
    pub attribution_info: Option<Child<OrderAttributionInfo>>,
    /// Synced separately; order reconciliation leaves this alone.
    pub notes: Vec<Child<OrderNote>>,
}

impl StoredOrder {
    /// A record holding `order`'s scalar fields and no children yet.
    pub fn new(order: &Order) -> Self {
        let mut record = Self {
            meta: RecordMeta::new(),
            exclusive_for_search: false,
            site_id: order.site_id,
            order_id: order.order_id,
            parent_id: 0,
            customer_id: 0,
            order_key: String::new(),
            number: String::new(),
            status: OrderStatus::default(),
            currency: String::new(),
            customer_note: None,
            date_created: order.date_created,
            date_modified: order.date_modified,
            date_paid: None,
            discount_total: String::new(),
            shipping_total: String::new(),
            total: String::new(),
            total_tax: String::new(),
            payment_method_id: String::new(),
            payment_method_title: String::new(),
            billing_address: None,
            shipping_address: None,
            items: Vec::new(),
            coupons: Vec::new(),
            fees: Vec::new(),
            shipping_lines: Vec::new(),
            taxes: Vec::new(),
            refunds: Vec::new(),
            custom_fields: Vec::new(),
            gift_cards: Vec::new(),
            attribution_info: None,
            notes: Vec::new(),
        };
        record.apply_fields(order);
        record
    }

    /// Overwrites every scalar field with the remote values.
    pub fn apply_fields(&mut self, order: &Order) {
        self.site_id = order.site_id;
        self.order_id = order.order_id;
        self.parent_id = order.parent_id;
        self.customer_id = order.customer_id;
        self.order_key = order.order_key.clone();
        self.number = order.number.clone();
        self.status = order.status.clone();
        self.currency = order.currency.clone();
        self.customer_note = order.customer_note.clone();
        self.date_created = order.date_created;
        self.date_modified = order.date_modified;
        self.date_paid = order.date_paid;
        self.discount_total = order.discount_total.clone();
        self.shipping_total = order.shipping_total.clone();
        self.total = order.total.clone();
        self.total_tax = order.total_tax.clone();
        self.payment_method_id = order.payment_method_id.clone();
        self.payment_method_title = order.payment_method_title.clone();
        self.billing_address = order.billing_address.clone();
        self.shipping_address = order.shipping_address.clone();
        self.meta.touch();
    }

    pub fn to_read_only(&self) -> Order {
        Order {
            site_id: self.site_id,
            order_id: self.order_id,
            parent_id: self.parent_id,
            customer_id: self.customer_id,
            order_key: self.order_key.clone(),
            number: self.number.clone(),
            status: self.status.clone(),
            currency: self.currency.clone(),
            customer_note: self.customer_note.clone(),
            date_created: self.date_created,
            date_modified: self.date_modified,
            date_paid: self.date_paid,
            discount_total: self.discount_total.clone(),
            shipping_total: self.shipping_total.clone(),
            total: self.total.clone(),
            total_tax: self.total_tax.clone(),
            payment_method_id: self.payment_method_id.clone(),
            payment_method_title: self.payment_method_title.clone(),
            billing_address: self.billing_address.clone(),
            shipping_address: self.shipping_address.clone(),
            items: self.items.iter().map(StoredOrderItem::to_read_only).collect(),
            coupons: values(&self.coupons),
            fees: values(&self.fees),
            shipping_lines: self
                .shipping_lines
                .iter()
                .map(StoredShippingLine::to_read_only)
                .collect(),
            taxes: values(&self.taxes),
            refunds: values(&self.refunds),
            custom_fields: values(&self.custom_fields),
            gift_cards: values(&self.gift_cards),
            attribution_info: self
                .attribution_info
                .as_ref()
                .map(|info| info.value.clone()),
        }
    }

    pub fn notes(&self) -> Vec<OrderNote> {
        values(&self.notes)
    }
}

impl StorageRecord for StoredOrder {
    type Key = OrderKey;

    const KIND: RecordKind = RecordKind::Order;

    fn key(&self) -> OrderKey {
        OrderKey::new(self.site_id, self.order_id)
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn site_id(&self) -> i64 {
        self.site_id
    }

    table_accessors!(orders);
}

/// Persisted line item of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredOrderItem {
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
    pub taxes: Vec<Child<OrderItemTax>>,
    pub attributes: Vec<Child<OrderItemAttribute>>,
    pub add_ons: Vec<Child<OrderItemAddOn>>,
}

impl StoredOrderItem {
    pub fn new(item: &OrderItem) -> Self {
        let mut stored = Self {
            object_id: ObjectId::new(),
            inserted_at: Utc::now(),
            item_id: item.item_id,
            name: String::new(),
            product_id: 0,
            variation_id: 0,
            quantity: 0.0,
            price: String::new(),
            sku: None,
            subtotal: String::new(),
            subtotal_tax: String::new(),
            tax_class: String::new(),
            total: String::new(),
            total_tax: String::new(),
            taxes: Vec::new(),
            attributes: Vec::new(),
            add_ons: Vec::new(),
        };
        stored.apply_fields(item);
        stored
    }

    pub fn apply_fields(&mut self, item: &OrderItem) {
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

    pub fn to_read_only(&self) -> OrderItem {
        OrderItem {
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
            attributes: values(&self.attributes),
            add_ons: values(&self.add_ons),
        }
    }
}

/// Persisted shipping line. Shared by orders and refunds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredShippingLine {
    pub object_id: ObjectId,
    pub inserted_at: DateTime<Utc>,
    pub shipping_id: i64,
    pub method_title: String,
    pub method_id: Option<String>,
    pub total: String,
    pub total_tax: String,
    pub taxes: Vec<Child<ShippingLineTax>>,
}

impl StoredShippingLine {
    pub fn new(line: &ShippingLine) -> Self {
        let mut stored = Self {
            object_id: ObjectId::new(),
            inserted_at: Utc::now(),
            shipping_id: line.shipping_id,
            method_title: String::new(),
            method_id: None,
            total: String::new(),
            total_tax: String::new(),
            taxes: Vec::new(),
        };
        stored.apply_fields(line);
        stored
    }

    pub fn apply_fields(&mut self, line: &ShippingLine) {
        self.shipping_id = line.shipping_id;
        self.method_title = line.method_title.clone();
        self.method_id = line.method_id.clone();
        self.total = line.total.clone();
        self.total_tax = line.total_tax.clone();
    }

    pub fn to_read_only(&self) -> ShippingLine {
        ShippingLine {
            shipping_id: self.shipping_id,
            method_title: self.method_title.clone(),
            method_id: self.method_id.clone(),
            total: self.total.clone(),
            total_tax: self.total_tax.clone(),
            taxes: values(&self.taxes),
        }
    }
}
