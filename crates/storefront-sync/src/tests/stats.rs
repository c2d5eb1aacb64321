//! Stats store behavior.
//!
//! - Order stats intervals keep their identity across refreshes
//! - Visitor and top earner items are a plain cache, rebuilt every time
//! - Top earners are filled from cached products first

use storefront_model::{
    LeaderboardRow, OrderStats, OrderStatsInterval, OrderStatsKey, OrderStatsTotals, ProductImage,
    ProductKey, SiteVisitStats, SiteVisitStatsItem, StatsGranularity, StatsPeriodKey,
    StatsTimeRange,
};
use storefront_storage::{
    StoredOrderStats, StoredProduct, StoredSiteVisitStats, StoredTopEarnerStats,
};

use super::{at, product, Harness, SITE};
use crate::stores::TOP_EARNERS_LIMIT;

fn totals(orders: i64) -> OrderStatsTotals {
    OrderStatsTotals {
        total_orders: orders,
        total_items_sold: orders * 2,
        gross_revenue: orders as f64 * 10.0,
        net_revenue: orders as f64 * 9.0,
        average_order_value: 10.0,
    }
}

fn interval(label: &str, orders: i64) -> OrderStatsInterval {
    OrderStatsInterval {
        interval: label.to_string(),
        date_start: format!("{label} 00:00:00"),
        date_end: format!("{label} 23:59:59"),
        subtotals: totals(orders),
    }
}

fn week_stats(intervals: Vec<OrderStatsInterval>) -> OrderStats {
    let orders = intervals.iter().map(|i| i.subtotals.total_orders).sum();
    OrderStats {
        site_id: SITE,
        time_range: StatsTimeRange::ThisWeek,
        granularity: StatsGranularity::Day,
        totals: totals(orders),
        intervals,
    }
}

async fn retrieve_week(harness: &Harness, stats: OrderStats) -> OrderStats {
    harness.stats.orders.ok(stats);
    harness
        .stores
        .stats()
        .retrieve_stats(SITE, StatsTimeRange::ThisWeek, at(4), at(10), 7)
        .await
        .unwrap()
}

fn cached_week(harness: &Harness) -> StoredOrderStats {
    harness
        .storage
        .view()
        .get::<StoredOrderStats>(&OrderStatsKey::new(SITE, StatsTimeRange::ThisWeek))
        .cloned()
        .unwrap()
}

// ============================================================================
// Order stats
// ============================================================================

#[tokio::test]
async fn refresh_matches_intervals_by_label() {
    let harness = Harness::new();
    let first = vec![interval("2024-03-04", 1), interval("2024-03-05", 2)];
    retrieve_week(&harness, week_stats(first)).await;
    let before = cached_week(&harness);

    let second = vec![interval("2024-03-05", 5), interval("2024-03-06", 3)];
    let returned = retrieve_week(&harness, week_stats(second)).await;

    let after = cached_week(&harness);
    let labels: Vec<&str> = after
        .intervals
        .iter()
        .map(|child| child.value.interval.as_str())
        .collect();
    assert_eq!(labels, vec!["2024-03-05", "2024-03-06"]);
    assert_eq!(after.intervals[0].object_id, before.intervals[1].object_id);
    assert_eq!(after.intervals[0].value.subtotals.total_orders, 5);
    assert_eq!(after.totals.total_orders, 8);
    assert_eq!(after.meta.object_id, before.meta.object_id);
    assert_eq!(returned.intervals.len(), 2);
}

#[tokio::test]
async fn empty_series_clears_every_interval() {
    let harness = Harness::new();
    retrieve_week(&harness, week_stats(vec![interval("2024-03-04", 1)])).await;

    retrieve_week(&harness, week_stats(Vec::new())).await;

    let cached = cached_week(&harness);
    assert!(cached.intervals.is_empty());
    assert_eq!(cached.totals.total_orders, 0);
}

// ============================================================================
// Visitors
// ============================================================================

fn visits(date: &str, counts: &[i64]) -> SiteVisitStats {
    SiteVisitStats {
        site_id: SITE,
        date: date.to_string(),
        granularity: StatsGranularity::Day,
        items: counts
            .iter()
            .enumerate()
            .map(|(day, visitors)| SiteVisitStatsItem {
                period: format!("2024-03-{:02}", day + 1),
                visitors: *visitors,
                views: visitors * 3,
            })
            .collect(),
    }
}

#[tokio::test]
async fn visitor_items_are_rebuilt_on_refresh() {
    let harness = Harness::new();
    let key = StatsPeriodKey::new(SITE, StatsGranularity::Day, "2024-03-10");
    let stats = harness.stores.stats();

    harness.stats.visits.ok(visits("2024-03-10", &[4, 6]));
    stats
        .retrieve_site_visit_stats(SITE, StatsTimeRange::ThisMonth, at(10))
        .await
        .unwrap();
    let before = harness
        .storage
        .view()
        .get::<StoredSiteVisitStats>(&key)
        .cloned()
        .unwrap();

    harness.stats.visits.ok(visits("2024-03-10", &[4, 6, 1]));
    let returned = stats
        .retrieve_site_visit_stats(SITE, StatsTimeRange::ThisMonth, at(10))
        .await
        .unwrap();

    let view = harness.storage.view();
    let after = view.get::<StoredSiteVisitStats>(&key).unwrap();
    assert_eq!(after.items.len(), 3);
    assert_ne!(after.items[0].object_id, before.items[0].object_id);
    assert_eq!(after.meta.object_id, before.meta.object_id);
    assert_eq!(returned.total_visitors(), 11);
    assert_eq!(
        *harness.stats.visit_requests.lock(),
        vec![(StatsGranularity::Day, 10), (StatsGranularity::Day, 10)]
    );
}

// ============================================================================
// Top earners
// ============================================================================

fn row(product_id: i64, quantity: i64) -> LeaderboardRow {
    LeaderboardRow {
        product_id,
        quantity,
        total: quantity as f64 * 10.0,
    }
}

#[tokio::test]
async fn top_earners_prefer_cached_products() {
    let harness = Harness::new();
    let mut cached = product(1);
    cached.images = vec![ProductImage {
        image_id: 9,
        date_created: at(1),
        src: "https://example.com/1.png".to_string(),
        ..Default::default()
    }];
    harness.products.pages.ok(vec![cached]);
    harness
        .stores
        .products()
        .synchronize_products(SITE, 1, 25)
        .await
        .unwrap();
    harness.products.serve(2, Ok(product(2)));
    harness
        .stats
        .top_products
        .ok(vec![row(2, 8), row(1, 5), row(3, 1)]);

    let stats = harness
        .stores
        .stats()
        .retrieve_top_earner_stats(SITE, StatsTimeRange::ThisMonth, at(1), at(14))
        .await
        .unwrap();

    let ids: Vec<i64> = stats.items.iter().map(|item| item.product_id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(stats.items[1].image_url.as_deref(), Some("https://example.com/1.png"));
    assert_eq!(stats.items[0].product_name, "Product 2");
    assert_eq!(stats.date, "2024-03");
    assert_eq!(stats.limit, TOP_EARNERS_LIMIT);
    assert_eq!(*harness.products.batch_requests.lock(), vec![vec![2, 3]]);

    let view = harness.storage.view();
    assert!(view.contains::<StoredTopEarnerStats>(&StatsPeriodKey::new(
        SITE,
        StatsGranularity::Month,
        "2024-03"
    )));
    assert!(!view.contains::<StoredProduct>(&ProductKey::new(SITE, 2)));
}

#[tokio::test]
async fn top_earners_skip_the_fetch_when_every_product_is_cached() {
    let harness = Harness::new();
    harness.products.pages.ok(vec![product(1)]);
    harness
        .stores
        .products()
        .synchronize_products(SITE, 1, 25)
        .await
        .unwrap();
    harness.stats.top_products.ok(vec![row(1, 2)]);

    let stats = harness
        .stores
        .stats()
        .retrieve_top_earner_stats(SITE, StatsTimeRange::Today, at(14), at(14))
        .await
        .unwrap();

    assert_eq!(stats.items.len(), 1);
    assert_eq!(stats.granularity, StatsGranularity::Day);
    assert!(harness.products.batch_requests.lock().is_empty());
}

#[tokio::test]
async fn reset_clears_every_stats_record() {
    let harness = Harness::new();
    retrieve_week(&harness, week_stats(vec![interval("2024-03-04", 1)])).await;
    harness.stats.visits.ok(visits("2024-03-10", &[1]));
    harness
        .stores
        .stats()
        .retrieve_site_visit_stats(SITE, StatsTimeRange::ThisWeek, at(10))
        .await
        .unwrap();

    let deleted = harness.stores.stats().reset_stored_stats().await.unwrap();

    assert_eq!(deleted, 2);
    let view = harness.storage.view();
    assert_eq!(view.count::<StoredOrderStats>(), 0);
    assert_eq!(view.count::<StoredSiteVisitStats>(), 0);
}
