use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::keys::{OrderStatsKey, StatsPeriodKey};
use crate::Identified;

/// Bucket size of a stats series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsGranularity {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl StatsGranularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// The period label the remote uses for the bucket containing `date`.
    pub fn period_label(&self, date: DateTime<Utc>) -> String {
        match self {
            Self::Hour | Self::Day => date.format("%Y-%m-%d").to_string(),
            Self::Week => date.format("%G-W%V").to_string(),
            Self::Month => date.format("%Y-%m").to_string(),
            Self::Year => date.format("%Y").to_string(),
        }
    }
}

/// The ranges the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsTimeRange {
    Today,
    ThisWeek,
    ThisMonth,
    ThisYear,
}

impl StatsTimeRange {
    /// Bucket size of the order stats intervals.
    pub fn interval_granularity(&self) -> StatsGranularity {
        match self {
            Self::Today => StatsGranularity::Hour,
            Self::ThisWeek | Self::ThisMonth => StatsGranularity::Day,
            Self::ThisYear => StatsGranularity::Month,
        }
    }

    pub fn site_visit_granularity(&self) -> StatsGranularity {
        match self {
            Self::Today | Self::ThisWeek | Self::ThisMonth => StatsGranularity::Day,
            Self::ThisYear => StatsGranularity::Month,
        }
    }

    pub fn top_earner_granularity(&self) -> StatsGranularity {
        match self {
            Self::Today => StatsGranularity::Day,
            Self::ThisWeek => StatsGranularity::Week,
            Self::ThisMonth => StatsGranularity::Month,
            Self::ThisYear => StatsGranularity::Year,
        }
    }

    /// Number of visit buckets from the start of the range up to `latest`.
    pub fn site_visit_quantity(&self, latest: DateTime<Utc>) -> u32 {
        match self {
            Self::Today => 1,
            Self::ThisWeek => 7,
            Self::ThisMonth => latest.day(),
            Self::ThisYear => latest.month(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::ThisWeek => "this_week",
            Self::ThisMonth => "this_month",
            Self::ThisYear => "this_year",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderStatsTotals {
    pub total_orders: i64,
    pub total_items_sold: i64,
    pub gross_revenue: f64,
    pub net_revenue: f64,
    pub average_order_value: f64,
}

/// One bucket of an order stats series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderStatsInterval {
    /// Remote bucket label, unique within the series.
    pub interval: String,
    pub date_start: String,
    pub date_end: String,
    pub subtotals: OrderStatsTotals,
}

impl Identified for OrderStatsInterval {
    type Id = String;

    fn identity(&self) -> String {
        self.interval.clone()
    }
}

/// Order totals for a range, with one interval per bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStats {
    pub site_id: i64,
    pub time_range: StatsTimeRange,
    pub granularity: StatsGranularity,
    pub totals: OrderStatsTotals,
    pub intervals: Vec<OrderStatsInterval>,
}

impl OrderStats {
    pub fn key(&self) -> OrderStatsKey {
        OrderStatsKey::new(self.site_id, self.time_range)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SiteVisitStatsItem {
    pub period: String,
    pub visitors: i64,
    pub views: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteVisitStats {
    pub site_id: i64,
    /// Label of the latest bucket in the series.
    pub date: String,
    pub granularity: StatsGranularity,
    pub items: Vec<SiteVisitStatsItem>,
}

impl SiteVisitStats {
    pub fn key(&self) -> StatsPeriodKey {
        StatsPeriodKey::new(self.site_id, self.granularity, &self.date)
    }

    pub fn total_visitors(&self) -> i64 {
        self.items.iter().map(|item| item.visitors).sum()
    }
}

/// One row of the remote's top products leaderboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub product_id: i64,
    pub quantity: i64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TopEarnerStatsItem {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub price: String,
    pub total: f64,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopEarnerStats {
    pub site_id: i64,
    pub date: String,
    pub granularity: StatsGranularity,
    pub limit: u32,
    pub items: Vec<TopEarnerStatsItem>,
}

impl TopEarnerStats {
    pub fn key(&self) -> StatsPeriodKey {
        StatsPeriodKey::new(self.site_id, self.granularity, &self.date)
    }
}
