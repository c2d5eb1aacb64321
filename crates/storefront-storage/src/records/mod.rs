//! Persisted record types.
//!
//! A persisted record is the mutable, identity-bearing counterpart of a
//! remote entity. Children are owned by value: removing a child from its
//! parent's collection deletes it, there is no separate child table.

/// Wires a record type to its field in `Graph` and `StagedChanges`.
macro_rules! table_accessors {
    ($field:ident) => {
        fn table(graph: &$crate::graph::Graph) -> &std::sync::Arc<$crate::table::Table<Self>> {
            &graph.$field
        }

        fn table_mut(
            graph: &mut $crate::graph::Graph,
        ) -> &mut std::sync::Arc<$crate::table::Table<Self>> {
            &mut graph.$field
        }

        fn changes(
            changes: &$crate::graph::StagedChanges,
        ) -> &$crate::table::TableChanges<Self> {
            &changes.$field
        }

        fn changes_mut(
            changes: &mut $crate::graph::StagedChanges,
        ) -> &mut $crate::table::TableChanges<Self> {
            &mut changes.$field
        }
    };
}

mod coupon;
mod order;
mod product;
mod refund;
mod shipment;
mod stats;
mod term;

pub use coupon::StoredCoupon;
pub use order::{StoredOrder, StoredOrderItem, StoredShippingLine};
pub use product::StoredProduct;
pub use refund::{StoredRefund, StoredRefundItem};
pub use shipment::{StoredShipmentTracking, StoredTrackingProviderGroup};
pub use stats::{StoredOrderStats, StoredSiteVisitStats, StoredTopEarnerStats};
pub use term::StoredAttributeTerm;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::graph::{Graph, StagedChanges};
use crate::meta::RecordMeta;
use crate::table::{Table, TableChanges};

/// The record kinds the cache knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Order,
    Product,
    Coupon,
    Refund,
    AttributeTerm,
    OrderStats,
    SiteVisitStats,
    TopEarnerStats,
    ShipmentTracking,
    TrackingProviderGroup,
}

impl RecordKind {
    pub const ALL: [RecordKind; 10] = [
        RecordKind::Order,
        RecordKind::Product,
        RecordKind::Coupon,
        RecordKind::Refund,
        RecordKind::AttributeTerm,
        RecordKind::OrderStats,
        RecordKind::SiteVisitStats,
        RecordKind::TopEarnerStats,
        RecordKind::ShipmentTracking,
        RecordKind::TrackingProviderGroup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Product => "product",
            Self::Coupon => "coupon",
            Self::Refund => "refund",
            Self::AttributeTerm => "attribute_term",
            Self::OrderStats => "order_stats",
            Self::SiteVisitStats => "site_visit_stats",
            Self::TopEarnerStats => "top_earner_stats",
            Self::ShipmentTracking => "shipment_tracking",
            Self::TrackingProviderGroup => "tracking_provider_group",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record type stored in its own table of the graph.
pub trait StorageRecord:
    Clone + PartialEq + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Composite key, unique within the table.
    type Key: Clone
        + Ord
        + fmt::Debug
        + fmt::Display
        + Send
        + Sync
        + Serialize
        + DeserializeOwned
        + 'static;

    const KIND: RecordKind;

    fn key(&self) -> Self::Key;

    fn meta(&self) -> &RecordMeta;

    fn site_id(&self) -> i64;

    #[doc(hidden)]
    fn table(graph: &Graph) -> &Arc<Table<Self>>;

    #[doc(hidden)]
    fn table_mut(graph: &mut Graph) -> &mut Arc<Table<Self>>;

    #[doc(hidden)]
    fn changes(changes: &StagedChanges) -> &TableChanges<Self>;

    #[doc(hidden)]
    fn changes_mut(changes: &mut StagedChanges) -> &mut TableChanges<Self>;
}
