use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CouponKey;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    #[default]
    Percent,
    FixedCart,
    FixedProduct,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Coupon {
    pub site_id: i64,
    pub coupon_id: i64,
    pub code: String,
    pub amount: String,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub discount_type: DiscountType,
    pub description: String,
    pub date_expires: Option<DateTime<Utc>>,
    pub usage_count: i64,
    pub individual_use: bool,
    pub product_ids: Vec<i64>,
    pub excluded_product_ids: Vec<i64>,
    pub usage_limit: Option<i64>,
    pub usage_limit_per_user: Option<i64>,
    pub limit_usage_to_x_items: Option<i64>,
    pub free_shipping: bool,
    pub product_category_ids: Vec<i64>,
    pub excluded_product_category_ids: Vec<i64>,
    pub exclude_sale_items: bool,
    pub minimum_amount: String,
    pub maximum_amount: String,
    pub email_restrictions: Vec<String>,
    pub used_by: Vec<String>,
}

impl Coupon {
    pub fn key(&self) -> CouponKey {
        CouponKey::new(self.site_id, self.coupon_id)
    }
}

/// Usage analytics for a single coupon.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CouponReport {
    pub coupon_id: i64,
    pub amount: String,
    pub orders_count: i64,
}
