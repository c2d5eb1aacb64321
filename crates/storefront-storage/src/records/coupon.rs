use serde::{Deserialize, Serialize};
use storefront_model::{Coupon, CouponKey};

use super::{RecordKind, StorageRecord};
use crate::meta::RecordMeta;

/// Persisted coupon. Coupons own no children, so the remote value is kept whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCoupon {
    pub meta: RecordMeta,
    pub coupon: Coupon,
}

impl StoredCoupon {
    pub fn new(coupon: &Coupon) -> Self {
        Self {
            meta: RecordMeta::new(),
            coupon: coupon.clone(),
        }
    }

    pub fn apply_fields(&mut self, coupon: &Coupon) {
        self.coupon = coupon.clone();
        self.meta.touch();
    }

    pub fn to_read_only(&self) -> Coupon {
        self.coupon.clone()
    }
}

impl StorageRecord for StoredCoupon {
    type Key = CouponKey;

    const KIND: RecordKind = RecordKind::Coupon;

    fn key(&self) -> CouponKey {
        self.coupon.key()
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn site_id(&self) -> i64 {
        self.coupon.site_id
    }

    table_accessors!(coupons);
}
