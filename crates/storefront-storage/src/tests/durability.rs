//! Durability.
//!
//! - Published records and search results survive a reopen
//! - Deletions are persisted too
//! - Composite keys and owned children round-trip through SQLite
//! - A failed SQLite write still publishes in memory and is reported

use std::sync::Arc;

use storefront_model::{
    CouponKey, ShipmentTracking, ShipmentTrackingKey, ShipmentTrackingProvider,
    TrackingProviderGroupKey,
};
use tempfile::TempDir;

use super::coupon;
use crate::{
    Child, RecordingSink, SearchKey, SqliteStore, StorageEvent, StorageManager, StoredCoupon,
    StoredShipmentTracking, StoredTrackingProviderGroup,
};

// ============================================================================
// Recovery
// ============================================================================

#[tokio::test]
async fn records_and_searches_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache").join("storefront.sqlite");

    {
        let storage = StorageManager::open(&path).unwrap();
        let staging = storage.new_staging_context("coupons").unwrap();
        staging
            .save(|txn| {
                txn.insert(StoredCoupon::new(&coupon(1, 1)));
                txn.insert(StoredCoupon::new(&coupon(1, 2)));
                txn.set_search_members::<StoredCoupon>(
                    SearchKey::new(1, "code"),
                    vec![CouponKey::new(1, 2), CouponKey::new(1, 1)],
                );
            })
            .await
            .unwrap();
    }

    let reopened = StorageManager::open(&path).unwrap();
    let view = reopened.view();
    assert_eq!(view.count::<StoredCoupon>(), 2);

    let found: Vec<i64> = view
        .search::<StoredCoupon>(&SearchKey::new(1, "code"))
        .into_iter()
        .map(|stored| stored.coupon.coupon_id)
        .collect();
    assert_eq!(found, vec![2, 1]);
}

#[tokio::test]
async fn identity_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storefront.sqlite");

    let object_id = {
        let storage = StorageManager::open(&path).unwrap();
        let staging = storage.new_staging_context("coupons").unwrap();
        staging
            .save(|txn| txn.insert(StoredCoupon::new(&coupon(3, 9))))
            .await
            .unwrap();
        storage
            .view()
            .get::<StoredCoupon>(&CouponKey::new(3, 9))
            .unwrap()
            .meta
            .object_id
    };

    let reopened = StorageManager::open(&path).unwrap();
    let view = reopened.view();
    let stored = view.get::<StoredCoupon>(&CouponKey::new(3, 9)).unwrap();
    assert_eq!(stored.meta.object_id, object_id);
}

#[tokio::test]
async fn deletions_are_persisted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storefront.sqlite");

    {
        let storage = StorageManager::open(&path).unwrap();
        let staging = storage.new_staging_context("coupons").unwrap();
        staging
            .save(|txn| {
                txn.insert(StoredCoupon::new(&coupon(1, 1)));
                txn.insert(StoredCoupon::new(&coupon(1, 2)));
            })
            .await
            .unwrap();
        staging
            .save(|txn| txn.delete::<StoredCoupon>(&CouponKey::new(1, 1)))
            .await
            .unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.count::<StoredCoupon>().unwrap(), 1);

    let reopened = StorageManager::open(&path).unwrap();
    assert!(!reopened
        .view()
        .contains::<StoredCoupon>(&CouponKey::new(1, 1)));
}

#[tokio::test]
async fn composite_keys_and_children_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storefront.sqlite");
    let tracking = ShipmentTracking {
        site_id: 1,
        order_id: 40,
        tracking_id: "a1".to_string(),
        tracking_number: "1Z999".to_string(),
        ..Default::default()
    };

    let provider_id = {
        let storage = StorageManager::open(&path).unwrap();
        let staging = storage.new_staging_context("shipments").unwrap();
        let mut group = StoredTrackingProviderGroup::empty(1, "Custom");
        group.providers.push(Child::new(ShipmentTrackingProvider {
            site_id: 1,
            name: "Courier".to_string(),
            url: "https://courier.example/".to_string(),
        }));
        let provider_id = group.providers[0].object_id;
        staging
            .save(move |txn| {
                txn.insert(group);
                txn.insert(StoredShipmentTracking::new(&tracking));
            })
            .await
            .unwrap();
        provider_id
    };

    let reopened = StorageManager::open(&path).unwrap();
    let view = reopened.view();
    assert!(view.contains::<StoredShipmentTracking>(&ShipmentTrackingKey::new(1, 40, "a1")));
    let group = view
        .get::<StoredTrackingProviderGroup>(&TrackingProviderGroupKey::new(1, "Custom"))
        .unwrap();
    assert_eq!(group.providers.len(), 1);
    assert_eq!(group.providers[0].object_id, provider_id);
}

// ============================================================================
// Persistence failures
// ============================================================================

#[tokio::test]
async fn failed_persist_still_publishes_in_memory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storefront.sqlite");
    let sink = Arc::new(RecordingSink::new());
    let storage = StorageManager::open_with_sink(&path, sink.clone()).unwrap();

    // Pull the table out from under the cache.
    let sabotage = rusqlite::Connection::open(&path).unwrap();
    sabotage.execute_batch("DROP TABLE records;").unwrap();
    drop(sabotage);

    let staging = storage.new_staging_context("coupons").unwrap();
    staging
        .perform(|txn| txn.insert(StoredCoupon::new(&coupon(1, 1))))
        .await
        .unwrap();
    let outcome = staging.commit_and_wait().await.unwrap();

    assert!(outcome.persist_error.is_some());
    assert!(storage
        .view()
        .contains::<StoredCoupon>(&CouponKey::new(1, 1)));
    assert!(matches!(
        sink.events().as_slice(),
        [StorageEvent::Published { persisted: false, .. }]
    ));
}

#[tokio::test]
async fn save_succeeds_when_persist_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storefront.sqlite");
    let storage = StorageManager::open(&path).unwrap();

    let sabotage = rusqlite::Connection::open(&path).unwrap();
    sabotage.execute_batch("DROP TABLE records;").unwrap();
    drop(sabotage);

    let staging = storage.new_staging_context("coupons").unwrap();
    let result = staging
        .save(|txn| {
            txn.insert(StoredCoupon::new(&coupon(1, 1)));
            "done"
        })
        .await;

    assert_eq!(result.unwrap(), "done");
}
