//! Remote entity types.
//!
//! Every type in this crate is an immutable snapshot of a resource as the
//! remote API returned it. Nothing here carries local identity; persisted
//! counterparts live in `storefront-storage`.
//!
//! Entities are identified by composite keys (see [`keys`]). Child entities
//! that keep their identity across syncs implement [`Identified`].

mod attribute_term;
mod coupon;
pub mod keys;
mod metadata;
mod order;
mod product;
mod refund;
mod shipment;
mod stats;

pub use attribute_term::ProductAttributeTerm;
pub use coupon::{Coupon, CouponReport, DiscountType};
pub use keys::{
    AttributeTermKey, CouponKey, OrderKey, OrderStatsKey, ProductKey, RefundKey,
    ShipmentTrackingKey, StatsPeriodKey, TrackingProviderGroupKey,
};
pub use metadata::{MetaData, MetaDataUpdate};
pub use order::{
    Address, Order, OrderAttributionInfo, OrderCouponLine, OrderFeeLine, OrderGiftCard,
    OrderItem, OrderItemAddOn, OrderItemAttribute, OrderItemTax, OrderNote, OrderRefundCondensed,
    OrderStatus, OrderTaxLine, OrderUpdateField, ShippingLine, ShippingLineTax,
    SimplePaymentsUpdate,
};
pub use product::{
    Product, ProductAddOn, ProductAttribute, ProductBundleItem, ProductCategory,
    ProductCompositeComponent, ProductDefaultAttribute, ProductDimensions, ProductDownload,
    ProductImage, ProductStatus, ProductTag,
};
pub use refund::{OrderItemRefund, OrderItemTaxRefund, Refund};
pub use shipment::{
    ShipmentTracking, ShipmentTrackingProvider, ShipmentTrackingProviderGroup,
    CUSTOM_PROVIDER_GROUP,
};
pub use stats::{
    LeaderboardRow, OrderStats, OrderStatsInterval, OrderStatsTotals, SiteVisitStats,
    SiteVisitStatsItem, StatsGranularity, StatsTimeRange, TopEarnerStats, TopEarnerStatsItem,
};

/// A child entity that keeps its identity across syncs.
///
/// Children implementing this are matched by `identity()` when their parent
/// is reconciled, instead of being dropped and rebuilt.
pub trait Identified {
    type Id: PartialEq + Clone + std::fmt::Debug;

    fn identity(&self) -> Self::Id;
}
