use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Identified, RefundKey, ShippingLine};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Refund {
    pub site_id: i64,
    pub order_id: i64,
    pub refund_id: i64,
    pub date_created: DateTime<Utc>,
    pub amount: String,
    pub reason: String,
    pub refunded_by_user_id: i64,
    pub is_automated: Option<bool>,
    /// Ask the payment gateway to move the money. Only meaningful on create.
    pub create_automated_refund: Option<bool>,
    pub items: Vec<OrderItemRefund>,
    pub shipping_lines: Vec<ShippingLine>,
}

impl Refund {
    pub fn key(&self) -> RefundKey {
        RefundKey::new(self.site_id, self.order_id, self.refund_id)
    }
}

/// A refunded line item. Quantities and totals are negative.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderItemRefund {
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
    pub taxes: Vec<OrderItemTaxRefund>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderItemTaxRefund {
    pub tax_id: i64,
    pub subtotal: String,
    pub total: String,
}

impl Identified for OrderItemTaxRefund {
    type Id = i64;

    fn identity(&self) -> i64 {
        self.tax_id
    }
}
