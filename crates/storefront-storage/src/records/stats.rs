use serde::{Deserialize, Serialize};
use storefront_model::{
    OrderStats, OrderStatsInterval, OrderStatsKey, OrderStatsTotals, SiteVisitStats,
    SiteVisitStatsItem, StatsGranularity, StatsPeriodKey, StatsTimeRange, TopEarnerStats,
    TopEarnerStatsItem,
};

use super::{RecordKind, StorageRecord};
use crate::meta::{values, Child, RecordMeta};

/// Persisted order stats of one range. Intervals are matched by label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredOrderStats {
    pub meta: RecordMeta,
    pub site_id: i64,
    pub time_range: StatsTimeRange,
    pub granularity: StatsGranularity,
    pub totals: OrderStatsTotals,
    pub intervals: Vec<Child<OrderStatsInterval>>,
}

impl StoredOrderStats {
    pub fn new(stats: &OrderStats) -> Self {
        Self {
            meta: RecordMeta::new(),
            site_id: stats.site_id,
            time_range: stats.time_range,
            granularity: stats.granularity,
            totals: stats.totals.clone(),
            intervals: Vec::new(),
        }
    }

    pub fn apply_fields(&mut self, stats: &OrderStats) {
        self.granularity = stats.granularity;
        self.totals = stats.totals.clone();
        self.meta.touch();
    }

    pub fn to_read_only(&self) -> OrderStats {
        OrderStats {
            site_id: self.site_id,
            time_range: self.time_range,
            granularity: self.granularity,
            totals: self.totals.clone(),
            intervals: values(&self.intervals),
        }
    }
}

impl StorageRecord for StoredOrderStats {
    type Key = OrderStatsKey;

    const KIND: RecordKind = RecordKind::OrderStats;

    fn key(&self) -> OrderStatsKey {
        OrderStatsKey::new(self.site_id, self.time_range)
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn site_id(&self) -> i64 {
        self.site_id
    }

    table_accessors!(order_stats);
}

/// Persisted visitor series. Items are a plain cache, rebuilt on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSiteVisitStats {
    pub meta: RecordMeta,
    pub site_id: i64,
    pub date: String,
    pub granularity: StatsGranularity,
    pub items: Vec<Child<SiteVisitStatsItem>>,
}

impl StoredSiteVisitStats {
    pub fn new(stats: &SiteVisitStats) -> Self {
        Self {
            meta: RecordMeta::new(),
            site_id: stats.site_id,
            date: stats.date.clone(),
            granularity: stats.granularity,
            items: Vec::new(),
        }
    }

    pub fn to_read_only(&self) -> SiteVisitStats {
        SiteVisitStats {
            site_id: self.site_id,
            date: self.date.clone(),
            granularity: self.granularity,
            items: values(&self.items),
        }
    }
}

impl StorageRecord for StoredSiteVisitStats {
    type Key = StatsPeriodKey;

    const KIND: RecordKind = RecordKind::SiteVisitStats;

    fn key(&self) -> StatsPeriodKey {
        StatsPeriodKey::new(self.site_id, self.granularity, &self.date)
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn site_id(&self) -> i64 {
        self.site_id
    }

    table_accessors!(site_visit_stats);
}

/// Persisted top products of one period. Items are rebuilt on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTopEarnerStats {
    pub meta: RecordMeta,
    pub site_id: i64,
    pub date: String,
    pub granularity: StatsGranularity,
    pub limit: u32,
    pub items: Vec<Child<TopEarnerStatsItem>>,
}

impl StoredTopEarnerStats {
    pub fn new(stats: &TopEarnerStats) -> Self {
        Self {
            meta: RecordMeta::new(),
            site_id: stats.site_id,
            date: stats.date.clone(),
            granularity: stats.granularity,
            limit: stats.limit,
            items: Vec::new(),
        }
    }

    pub fn apply_fields(&mut self, stats: &TopEarnerStats) {
        self.limit = stats.limit;
        self.meta.touch();
    }

    pub fn to_read_only(&self) -> TopEarnerStats {
        TopEarnerStats {
            site_id: self.site_id,
            date: self.date.clone(),
            granularity: self.granularity,
            limit: self.limit,
            items: values(&self.items),
        }
    }
}

impl StorageRecord for StoredTopEarnerStats {
    type Key = StatsPeriodKey;

    const KIND: RecordKind = RecordKind::TopEarnerStats;

    fn key(&self) -> StatsPeriodKey {
        StatsPeriodKey::new(self.site_id, self.granularity, &self.date)
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn site_id(&self) -> i64 {
        self.site_id
    }

    table_accessors!(top_earner_stats);
}
