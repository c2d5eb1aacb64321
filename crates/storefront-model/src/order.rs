//! Orders and everything an order owns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Identified, MetaData, OrderKey};

/// Order status as reported by the remote.
///
/// Unknown slugs (plugin-defined statuses) are kept verbatim in `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    OnHold,
    Completed,
    Cancelled,
    Refunded,
    Failed,
    /// Created by the block checkout before the shopper submits it.
    CheckoutDraft,
    /// Placeholder created by the remote admin before anything is saved.
    AutoDraft,
    Custom(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::OnHold => "on-hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::Failed => "failed",
            Self::CheckoutDraft => "checkout-draft",
            Self::AutoDraft => "auto-draft",
            Self::Custom(slug) => slug,
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(slug: &str) -> Self {
        match slug {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "on-hold" => Self::OnHold,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            "refunded" => Self::Refunded,
            "failed" => Self::Failed,
            "checkout-draft" => Self::CheckoutDraft,
            "auto-draft" => Self::AutoDraft,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(slug: String) -> Self {
        Self::from(slug.as_str())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Postal address used for billing and shipping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Order {
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
    pub items: Vec<OrderItem>,
    pub coupons: Vec<OrderCouponLine>,
    pub fees: Vec<OrderFeeLine>,
    pub shipping_lines: Vec<ShippingLine>,
    pub taxes: Vec<OrderTaxLine>,
    pub refunds: Vec<OrderRefundCondensed>,
    pub custom_fields: Vec<MetaData>,
    pub gift_cards: Vec<OrderGiftCard>,
    pub attribution_info: Option<OrderAttributionInfo>,
}

impl Order {
    pub fn key(&self) -> OrderKey {
        OrderKey::new(self.site_id, self.order_id)
    }

    /// Auto-drafts are never persisted.
    pub fn is_transient(&self) -> bool {
        self.status == OrderStatus::AutoDraft
    }

    /// An order that charges a bare amount through one fee line.
    pub fn simple_payments(status: OrderStatus, amount: &str, taxable: bool) -> Self {
        Self {
            status,
            fees: vec![OrderFeeLine::simple_payment(0, amount, taxable)],
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderItem {
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
    pub taxes: Vec<OrderItemTax>,
    pub attributes: Vec<OrderItemAttribute>,
    pub add_ons: Vec<OrderItemAddOn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderItemTax {
    pub tax_id: i64,
    pub subtotal: String,
    pub total: String,
}

impl Identified for OrderItemTax {
    type Id = i64;

    fn identity(&self) -> i64 {
        self.tax_id
    }
}

/// Variation attribute printed on a line item ("Color: Blue").
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderItemAttribute {
    pub meta_id: i64,
    pub name: String,
    pub value: String,
}

/// Product add-on selected for a line item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderItemAddOn {
    pub add_on_id: Option<i64>,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderCouponLine {
    pub coupon_id: i64,
    pub code: String,
    pub discount: String,
    pub discount_tax: String,
}

impl Identified for OrderCouponLine {
    type Id = i64;

    fn identity(&self) -> i64 {
        self.coupon_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderFeeLine {
    pub fee_id: i64,
    pub name: String,
    pub tax_class: String,
    pub tax_status: String,
    pub total: String,
    pub total_tax: String,
}

/// New values for an existing simple payments order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimplePaymentsUpdate {
    pub order_id: i64,
    pub fee_id: i64,
    pub status: OrderStatus,
    pub amount: String,
    pub taxable: bool,
    pub customer_note: Option<String>,
    pub email: Option<String>,
}

impl SimplePaymentsUpdate {
    /// Fields the update request sends.
    pub const FIELDS: [OrderUpdateField; 4] = [
        OrderUpdateField::CustomerNote,
        OrderUpdateField::BillingAddress,
        OrderUpdateField::Fees,
        OrderUpdateField::Status,
    ];

    /// The order body sent with the update. Billing only carries the email.
    pub fn to_order(&self) -> Order {
        Order {
            order_id: self.order_id,
            customer_note: self.customer_note.clone(),
            billing_address: Some(Address {
                email: self.email.clone(),
                ..Default::default()
            }),
            fees: vec![OrderFeeLine::simple_payment(self.fee_id, &self.amount, self.taxable)],
            ..Order::simple_payments(self.status.clone(), &self.amount, self.taxable)
        }
    }
}

impl OrderFeeLine {
    pub const SIMPLE_PAYMENT_NAME: &'static str = "Simple Payments";

    pub fn simple_payment(fee_id: i64, amount: &str, taxable: bool) -> Self {
        Self {
            fee_id,
            name: Self::SIMPLE_PAYMENT_NAME.to_string(),
            tax_status: if taxable { "taxable" } else { "none" }.to_string(),
            total: amount.to_string(),
            ..Default::default()
        }
    }
}

impl Identified for OrderFeeLine {
    type Id = i64;

    fn identity(&self) -> i64 {
        self.fee_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShippingLine {
    pub shipping_id: i64,
    pub method_title: String,
    pub method_id: Option<String>,
    pub total: String,
    pub total_tax: String,
    pub taxes: Vec<ShippingLineTax>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShippingLineTax {
    pub tax_id: i64,
    pub subtotal: String,
    pub total: String,
}

impl Identified for ShippingLineTax {
    type Id = i64;

    fn identity(&self) -> i64 {
        self.tax_id
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderTaxLine {
    pub tax_id: i64,
    pub rate_code: String,
    pub rate_id: i64,
    pub label: String,
    pub is_compound_tax: bool,
    pub total_tax: String,
    pub total_shipping_tax: String,
    pub rate_percent: f64,
}

impl Identified for OrderTaxLine {
    type Id = i64;

    fn identity(&self) -> i64 {
        self.tax_id
    }
}

/// Refund summary embedded in an order payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderRefundCondensed {
    pub refund_id: i64,
    pub reason: Option<String>,
    pub total: String,
}

impl Identified for OrderRefundCondensed {
    type Id = i64;

    fn identity(&self) -> i64 {
        self.refund_id
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderGiftCard {
    pub gift_card_id: i64,
    pub code: String,
    pub amount: f64,
}

/// Where the order came from, as tracked by the remote.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderAttributionInfo {
    pub source_type: Option<String>,
    pub campaign: Option<String>,
    pub source: Option<String>,
    pub medium: Option<String>,
    pub device_type: Option<String>,
    pub session_page_views: Option<String>,
}

/// A note left on an order by staff, the system or the customer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderNote {
    pub note_id: i64,
    pub date_created: DateTime<Utc>,
    pub note: String,
    pub is_customer_note: bool,
    pub author: String,
}

impl Identified for OrderNote {
    type Id = i64;

    fn identity(&self) -> i64 {
        self.note_id
    }
}

/// Fields an order create/update request is allowed to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderUpdateField {
    CustomerNote,
    ShippingAddress,
    BillingAddress,
    Fees,
    Status,
    Items,
    ShippingLines,
    CouponLines,
    PaymentMethodId,
    PaymentMethodTitle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_slug_roundtrip() {
        for slug in [
            "pending",
            "processing",
            "on-hold",
            "completed",
            "cancelled",
            "refunded",
            "failed",
            "checkout-draft",
            "auto-draft",
        ] {
            assert_eq!(OrderStatus::from(slug).as_str(), slug);
        }
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let status = OrderStatus::from("awaiting-pickup");
        assert_eq!(status, OrderStatus::Custom("awaiting-pickup".to_string()));
        assert_eq!(status.to_string(), "awaiting-pickup");
    }

    #[test]
    fn status_serializes_as_slug() {
        let json = serde_json::to_string(&OrderStatus::OnHold).unwrap();
        assert_eq!(json, "\"on-hold\"");
        let back: OrderStatus = serde_json::from_str("\"auto-draft\"").unwrap();
        assert_eq!(back, OrderStatus::AutoDraft);
    }

    #[test]
    fn simple_payments_order_carries_one_fee() {
        let order = Order::simple_payments(OrderStatus::Pending, "12.50", false);
        assert_eq!(order.fees.len(), 1);
        assert_eq!(order.fees[0].total, "12.50");
        assert_eq!(order.fees[0].tax_status, "none");
        assert_eq!(order.fees[0].name, OrderFeeLine::SIMPLE_PAYMENT_NAME);
    }

    #[test]
    fn simple_payments_update_replaces_the_fee() {
        let update = SimplePaymentsUpdate {
            order_id: 40,
            fee_id: 3,
            status: OrderStatus::Processing,
            amount: "9.00".to_string(),
            taxable: true,
            customer_note: Some("thanks".to_string()),
            email: Some("buyer@example.com".to_string()),
        };
        let order = update.to_order();
        assert_eq!(order.order_id, 40);
        assert_eq!(order.fees.len(), 1);
        assert_eq!(order.fees[0].fee_id, 3);
        assert_eq!(order.fees[0].tax_status, "taxable");
        let billing = order.billing_address.unwrap();
        assert_eq!(billing.email.as_deref(), Some("buyer@example.com"));
        assert_eq!(billing.first_name, "");
    }

    #[test]
    fn only_auto_draft_is_transient() {
        let mut order = Order {
            status: OrderStatus::AutoDraft,
            ..Default::default()
        };
        assert!(order.is_transient());

        order.status = OrderStatus::CheckoutDraft;
        assert!(!order.is_transient());
    }
}
