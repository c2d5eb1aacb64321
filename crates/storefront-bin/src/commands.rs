//! Subcommand implementations.

use anyhow::Context;
use serde::Serialize;
use storefront_config::{Config, Paths};
use storefront_storage::{
    ReadView, RecordKind, StorageManager, StorageRecord, StoredAttributeTerm, StoredCoupon,
    StoredOrder, StoredOrderStats, StoredProduct, StoredRefund, StoredShipmentTracking,
    StoredSiteVisitStats, StoredTopEarnerStats, StoredTrackingProviderGroup,
};
use tracing::info;

use crate::Kind;

fn open(config: &Config, paths: &Paths) -> anyhow::Result<StorageManager> {
    paths.ensure_dirs().context("creating cache directory")?;
    let path = config.database_file(paths);
    StorageManager::open(&path).with_context(|| format!("opening cache at {}", path.display()))
}

fn print_lines<T: Serialize>(rows: impl IntoIterator<Item = T>) -> anyhow::Result<()> {
    for row in rows {
        println!("{}", serde_json::to_string(&row)?);
    }
    Ok(())
}

#[derive(Serialize)]
struct Stats {
    database: String,
    counts: Vec<(RecordKind, usize)>,
    total: usize,
}

pub(crate) fn stats(config: &Config, paths: &Paths) -> anyhow::Result<()> {
    let storage = open(config, paths)?;
    let view = storage.view();
    let counts = vec![
        (RecordKind::Order, view.count::<StoredOrder>()),
        (RecordKind::Product, view.count::<StoredProduct>()),
        (RecordKind::Coupon, view.count::<StoredCoupon>()),
        (RecordKind::Refund, view.count::<StoredRefund>()),
        (RecordKind::AttributeTerm, view.count::<StoredAttributeTerm>()),
        (RecordKind::OrderStats, view.count::<StoredOrderStats>()),
        (RecordKind::SiteVisitStats, view.count::<StoredSiteVisitStats>()),
        (RecordKind::TopEarnerStats, view.count::<StoredTopEarnerStats>()),
        (RecordKind::ShipmentTracking, view.count::<StoredShipmentTracking>()),
        (RecordKind::TrackingProviderGroup, view.count::<StoredTrackingProviderGroup>()),
    ];
    let stats = Stats {
        database: config.database_file(paths).display().to_string(),
        total: counts.iter().map(|(_, count)| count).sum(),
        counts,
    };
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn for_site<R: StorageRecord>(view: &ReadView, site_id: i64) -> Vec<&R> {
    view.filter::<R, _>(|record| record.site_id() == site_id)
}

pub(crate) fn list_orders(config: &Config, paths: &Paths, site_id: i64) -> anyhow::Result<()> {
    let view = open(config, paths)?.view();
    print_lines(
        for_site::<StoredOrder>(&view, site_id)
            .into_iter()
            .map(StoredOrder::to_read_only),
    )
}

pub(crate) fn list_products(config: &Config, paths: &Paths, site_id: i64) -> anyhow::Result<()> {
    let view = open(config, paths)?.view();
    print_lines(
        for_site::<StoredProduct>(&view, site_id)
            .into_iter()
            .map(StoredProduct::to_read_only),
    )
}

pub(crate) fn list_coupons(config: &Config, paths: &Paths, site_id: i64) -> anyhow::Result<()> {
    let view = open(config, paths)?.view();
    print_lines(
        for_site::<StoredCoupon>(&view, site_id)
            .into_iter()
            .map(StoredCoupon::to_read_only),
    )
}

/// Deletes cached records through a staging context, like any other write.
pub(crate) async fn reset(
    config: &Config,
    paths: &Paths,
    kind: Option<Kind>,
) -> anyhow::Result<()> {
    let storage = open(config, paths)?;
    let staging = storage
        .new_staging_context("cli-reset")
        .context("starting staging context")?;

    let deleted = staging
        .save(move |txn| {
            let everything = kind.is_none();
            let wants = |candidate: Kind| everything || kind == Some(candidate);
            let mut deleted = 0;
            if wants(Kind::Orders) {
                deleted += txn.delete_matching::<StoredOrder, _>(|_| true);
            }
            if wants(Kind::Products) {
                deleted += txn.delete_matching::<StoredProduct, _>(|_| true);
            }
            if wants(Kind::Coupons) {
                deleted += txn.delete_matching::<StoredCoupon, _>(|_| true);
            }
            if wants(Kind::Refunds) {
                deleted += txn.delete_matching::<StoredRefund, _>(|_| true);
            }
            if wants(Kind::AttributeTerms) {
                deleted += txn.delete_matching::<StoredAttributeTerm, _>(|_| true);
            }
            if wants(Kind::Stats) {
                deleted += txn.delete_matching::<StoredOrderStats, _>(|_| true);
                deleted += txn.delete_matching::<StoredSiteVisitStats, _>(|_| true);
                deleted += txn.delete_matching::<StoredTopEarnerStats, _>(|_| true);
            }
            if wants(Kind::Shipments) {
                deleted += txn.delete_matching::<StoredShipmentTracking, _>(|_| true);
                deleted += txn.delete_matching::<StoredTrackingProviderGroup, _>(|_| true);
            }
            deleted
        })
        .await
        .context("resetting cache")?;

    info!(?kind, deleted, "cache reset");
    println!("deleted {deleted} records");
    Ok(())
}
