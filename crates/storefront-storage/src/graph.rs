//! The canonical object graph and the change sets merged into it.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::records::{
    RecordKind, StorageRecord, StoredAttributeTerm, StoredCoupon, StoredOrder, StoredOrderStats,
    StoredProduct, StoredRefund, StoredShipmentTracking, StoredSiteVisitStats,
    StoredTopEarnerStats, StoredTrackingProviderGroup,
};
use crate::table::{ApplyCounts, Table, TableChanges};

/// Every table of the cache.
///
/// Tables sit behind their own `Arc`, so publishing a change set only copies
/// the tables it touched.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(crate) orders: Arc<Table<StoredOrder>>,
    pub(crate) products: Arc<Table<StoredProduct>>,
    pub(crate) coupons: Arc<Table<StoredCoupon>>,
    pub(crate) refunds: Arc<Table<StoredRefund>>,
    pub(crate) attribute_terms: Arc<Table<StoredAttributeTerm>>,
    pub(crate) order_stats: Arc<Table<StoredOrderStats>>,
    pub(crate) site_visit_stats: Arc<Table<StoredSiteVisitStats>>,
    pub(crate) top_earner_stats: Arc<Table<StoredTopEarnerStats>>,
    pub(crate) shipment_trackings: Arc<Table<StoredShipmentTracking>>,
    pub(crate) tracking_provider_groups: Arc<Table<StoredTrackingProviderGroup>>,
}

impl Graph {
    pub fn table<R: StorageRecord>(&self) -> &Table<R> {
        R::table(self)
    }

    /// Total number of records across all tables.
    pub fn record_count(&self) -> usize {
        self.orders.len()
            + self.products.len()
            + self.coupons.len()
            + self.refunds.len()
            + self.attribute_terms.len()
            + self.order_stats.len()
            + self.site_visit_stats.len()
            + self.top_earner_stats.len()
            + self.shipment_trackings.len()
            + self.tracking_provider_groups.len()
    }

    /// Merges a staged change set into this graph.
    pub(crate) fn apply(&mut self, changes: &StagedChanges) -> ChangeSummary {
        let mut summary = ChangeSummary::default();
        apply_table::<StoredOrder>(self, changes, &mut summary);
        apply_table::<StoredProduct>(self, changes, &mut summary);
        apply_table::<StoredCoupon>(self, changes, &mut summary);
        apply_table::<StoredRefund>(self, changes, &mut summary);
        apply_table::<StoredAttributeTerm>(self, changes, &mut summary);
        apply_table::<StoredOrderStats>(self, changes, &mut summary);
        apply_table::<StoredSiteVisitStats>(self, changes, &mut summary);
        apply_table::<StoredTopEarnerStats>(self, changes, &mut summary);
        apply_table::<StoredShipmentTracking>(self, changes, &mut summary);
        apply_table::<StoredTrackingProviderGroup>(self, changes, &mut summary);
        summary
    }
}

fn apply_table<R: StorageRecord>(
    graph: &mut Graph,
    changes: &StagedChanges,
    summary: &mut ChangeSummary,
) {
    let table_changes = R::changes(changes);
    if table_changes.is_empty() {
        return;
    }
    let counts = Arc::make_mut(R::table_mut(graph)).apply(table_changes);
    summary.record(R::KIND, counts);
}

/// Writes staged in one staging context since its last commit.
#[derive(Debug, Clone, Default)]
pub struct StagedChanges {
    pub(crate) orders: TableChanges<StoredOrder>,
    pub(crate) products: TableChanges<StoredProduct>,
    pub(crate) coupons: TableChanges<StoredCoupon>,
    pub(crate) refunds: TableChanges<StoredRefund>,
    pub(crate) attribute_terms: TableChanges<StoredAttributeTerm>,
    pub(crate) order_stats: TableChanges<StoredOrderStats>,
    pub(crate) site_visit_stats: TableChanges<StoredSiteVisitStats>,
    pub(crate) top_earner_stats: TableChanges<StoredTopEarnerStats>,
    pub(crate) shipment_trackings: TableChanges<StoredShipmentTracking>,
    pub(crate) tracking_provider_groups: TableChanges<StoredTrackingProviderGroup>,
}

impl StagedChanges {
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
            && self.products.is_empty()
            && self.coupons.is_empty()
            && self.refunds.is_empty()
            && self.attribute_terms.is_empty()
            && self.order_stats.is_empty()
            && self.site_visit_stats.is_empty()
            && self.top_earner_stats.is_empty()
            && self.shipment_trackings.is_empty()
            && self.tracking_provider_groups.is_empty()
    }

    pub fn table<R: StorageRecord>(&self) -> &TableChanges<R> {
        R::changes(self)
    }

    /// Rebases every table's staged rows onto `latest`. Returns the number
    /// of rows adjusted.
    pub(crate) fn rebase_onto(&mut self, latest: &Graph) -> usize {
        rebase_table::<StoredOrder>(self, latest)
            + rebase_table::<StoredProduct>(self, latest)
            + rebase_table::<StoredCoupon>(self, latest)
            + rebase_table::<StoredRefund>(self, latest)
            + rebase_table::<StoredAttributeTerm>(self, latest)
            + rebase_table::<StoredOrderStats>(self, latest)
            + rebase_table::<StoredSiteVisitStats>(self, latest)
            + rebase_table::<StoredTopEarnerStats>(self, latest)
            + rebase_table::<StoredShipmentTracking>(self, latest)
            + rebase_table::<StoredTrackingProviderGroup>(self, latest)
    }
}

fn rebase_table<R: StorageRecord>(changes: &mut StagedChanges, latest: &Graph) -> usize {
    R::changes_mut(changes).rebase_onto(R::table(latest))
}

/// What a publish changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    pub kinds: BTreeSet<RecordKind>,
}

impl ChangeSummary {
    fn record(&mut self, kind: RecordKind, counts: ApplyCounts) {
        self.inserted += counts.inserted;
        self.updated += counts.updated;
        self.deleted += counts.deleted;
        self.kinds.insert(kind);
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
