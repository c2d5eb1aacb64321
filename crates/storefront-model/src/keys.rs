//! Composite keys.
//!
//! A key is the tuple of remote identifiers that is unique within one
//! domain. At most one persisted record exists per key.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stats::{StatsGranularity, StatsTimeRange};

/// `(site_id, order_id)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderKey {
    pub site_id: i64,
    pub order_id: i64,
}

/// `(site_id, product_id)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductKey {
    pub site_id: i64,
    pub product_id: i64,
}

/// `(site_id, coupon_id)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CouponKey {
    pub site_id: i64,
    pub coupon_id: i64,
}

/// `(site_id, order_id, refund_id)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RefundKey {
    pub site_id: i64,
    pub order_id: i64,
    pub refund_id: i64,
}

/// `(site_id, attribute_id, term_id)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttributeTermKey {
    pub site_id: i64,
    pub attribute_id: i64,
    pub term_id: i64,
}

/// `(site_id, time_range)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderStatsKey {
    pub site_id: i64,
    pub time_range: StatsTimeRange,
}

/// `(site_id, granularity, date)`, the period a visit or top earner series ends in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StatsPeriodKey {
    pub site_id: i64,
    pub granularity: StatsGranularity,
    pub date: String,
}

/// `(site_id, order_id, tracking_id)`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShipmentTrackingKey {
    pub site_id: i64,
    pub order_id: i64,
    pub tracking_id: String,
}

/// `(site_id, name)`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackingProviderGroupKey {
    pub site_id: i64,
    pub name: String,
}

impl OrderKey {
    pub fn new(site_id: i64, order_id: i64) -> Self {
        Self { site_id, order_id }
    }
}

impl ProductKey {
    pub fn new(site_id: i64, product_id: i64) -> Self {
        Self {
            site_id,
            product_id,
        }
    }
}

impl CouponKey {
    pub fn new(site_id: i64, coupon_id: i64) -> Self {
        Self { site_id, coupon_id }
    }
}

impl RefundKey {
    pub fn new(site_id: i64, order_id: i64, refund_id: i64) -> Self {
        Self {
            site_id,
            order_id,
            refund_id,
        }
    }
}

impl AttributeTermKey {
    pub fn new(site_id: i64, attribute_id: i64, term_id: i64) -> Self {
        Self {
            site_id,
            attribute_id,
            term_id,
        }
    }
}

impl OrderStatsKey {
    pub fn new(site_id: i64, time_range: StatsTimeRange) -> Self {
        Self {
            site_id,
            time_range,
        }
    }
}

impl StatsPeriodKey {
    pub fn new(site_id: i64, granularity: StatsGranularity, date: impl Into<String>) -> Self {
        Self {
            site_id,
            granularity,
            date: date.into(),
        }
    }
}

impl ShipmentTrackingKey {
    pub fn new(site_id: i64, order_id: i64, tracking_id: impl Into<String>) -> Self {
        Self {
            site_id,
            order_id,
            tracking_id: tracking_id.into(),
        }
    }
}

impl TrackingProviderGroupKey {
    pub fn new(site_id: i64, name: impl Into<String>) -> Self {
        Self {
            site_id,
            name: name.into(),
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.site_id, self.order_id)
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.site_id, self.product_id)
    }
}

impl fmt::Display for CouponKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.site_id, self.coupon_id)
    }
}

impl fmt::Display for RefundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.site_id, self.order_id, self.refund_id)
    }
}

impl fmt::Display for AttributeTermKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.site_id, self.attribute_id, self.term_id)
    }
}

impl fmt::Display for OrderStatsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.site_id, self.time_range.as_str())
    }
}

impl fmt::Display for StatsPeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.site_id, self.granularity.as_str(), self.date)
    }
}

impl fmt::Display for ShipmentTrackingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.site_id, self.order_id, self.tracking_id)
    }
}

impl fmt::Display for TrackingProviderGroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.site_id, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_order_by_site_first() {
        let a = OrderKey::new(1, 500);
        let b = OrderKey::new(2, 1);
        assert!(a < b);
    }

    #[test]
    fn display_joins_components() {
        assert_eq!(RefundKey::new(1, 2, 3).to_string(), "1/2/3");
        assert_eq!(CouponKey::new(1, 77).to_string(), "1/77");
        assert_eq!(
            StatsPeriodKey::new(1, StatsGranularity::Week, "2024-W11").to_string(),
            "1/week/2024-W11"
        );
    }
}
