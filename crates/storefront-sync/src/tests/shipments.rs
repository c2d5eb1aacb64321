//! Shipment store behavior.

use storefront_model::{
    ShipmentTracking, ShipmentTrackingKey, ShipmentTrackingProvider,
    ShipmentTrackingProviderGroup, TrackingProviderGroupKey, CUSTOM_PROVIDER_GROUP,
};
use storefront_storage::{StoredShipmentTracking, StoredTrackingProviderGroup};

use super::{at, Harness, SITE};
use crate::remote::RemoteError;

fn tracking(order_id: i64, tracking_id: &str) -> ShipmentTracking {
    ShipmentTracking {
        site_id: SITE,
        order_id,
        tracking_id: tracking_id.to_string(),
        tracking_number: format!("NUM-{tracking_id}"),
        tracking_provider: Some("UPS".to_string()),
        tracking_url: None,
        date_shipped: Some(at(3)),
    }
}

fn provider(name: &str) -> ShipmentTrackingProvider {
    ShipmentTrackingProvider {
        site_id: SITE,
        name: name.to_string(),
        url: format!("https://{}.example.com/", name.to_lowercase()),
    }
}

fn group(name: &str, providers: &[&str]) -> ShipmentTrackingProviderGroup {
    ShipmentTrackingProviderGroup {
        site_id: SITE,
        name: name.to_string(),
        providers: providers.iter().map(|name| provider(name)).collect(),
    }
}

fn tracking_ids(harness: &Harness, order_id: i64) -> Vec<String> {
    let view = harness.storage.view();
    let mut ids: Vec<String> = view
        .filter::<StoredShipmentTracking, _>(|stored| stored.tracking.order_id == order_id)
        .into_iter()
        .map(|stored| stored.tracking.tracking_id.clone())
        .collect();
    ids.sort();
    ids
}

fn cached_group(harness: &Harness, name: &str) -> Option<StoredTrackingProviderGroup> {
    harness
        .storage
        .view()
        .get::<StoredTrackingProviderGroup>(&TrackingProviderGroupKey::new(SITE, name))
        .cloned()
}

async fn sync_trackings(harness: &Harness, order_id: i64, trackings: Vec<ShipmentTracking>) {
    harness.shipments.trackings.ok(trackings);
    harness
        .stores
        .shipments()
        .synchronize_shipment_trackings(SITE, order_id)
        .await
        .unwrap();
}

// ============================================================================
// Trackings
// ============================================================================

#[tokio::test]
async fn sync_prunes_only_the_synced_order() {
    let harness = Harness::new();
    sync_trackings(&harness, 1, vec![tracking(1, "a"), tracking(1, "b")]).await;
    sync_trackings(&harness, 2, vec![tracking(2, "c")]).await;

    sync_trackings(&harness, 1, vec![tracking(1, "b")]).await;

    assert_eq!(tracking_ids(&harness, 1), vec!["b"]);
    assert_eq!(tracking_ids(&harness, 2), vec!["c"]);
}

#[tokio::test]
async fn failed_sync_keeps_cached_trackings() {
    let harness = Harness::new();
    sync_trackings(&harness, 1, vec![tracking(1, "a")]).await;
    harness
        .shipments
        .trackings
        .fail(RemoteError::Network("offline".to_string()));

    let result = harness
        .stores
        .shipments()
        .synchronize_shipment_trackings(SITE, 1)
        .await;

    assert!(result.is_err());
    assert_eq!(tracking_ids(&harness, 1), vec!["a"]);
}

#[tokio::test]
async fn added_tracking_is_cached() {
    let harness = Harness::new();
    harness.shipments.create.ok(tracking(1, "new"));

    let added = harness
        .stores
        .shipments()
        .add_tracking(SITE, 1, "UPS", "NUM-new", at(3))
        .await
        .unwrap();

    assert_eq!(added.tracking_id, "new");
    assert_eq!(tracking_ids(&harness, 1), vec!["new"]);
}

#[tokio::test]
async fn deleted_tracking_leaves_the_cache() {
    let harness = Harness::new();
    sync_trackings(&harness, 1, vec![tracking(1, "a"), tracking(1, "b")]).await;
    harness.shipments.delete.ok(tracking(1, "a"));

    harness
        .stores
        .shipments()
        .delete_tracking(SITE, 1, "a")
        .await
        .unwrap();

    assert_eq!(tracking_ids(&harness, 1), vec!["b"]);
    assert!(!harness
        .storage
        .view()
        .contains::<StoredShipmentTracking>(&ShipmentTrackingKey::new(SITE, 1, "a")));
}

// ============================================================================
// Providers
// ============================================================================

#[tokio::test]
async fn provider_sync_matches_providers_by_name() {
    let harness = Harness::new();
    let shipments = harness.stores.shipments();
    harness.shipments.groups.ok(vec![
        group("United States", &["UPS", "USPS"]),
        group("Australia", &["Australia Post"]),
    ]);
    shipments.synchronize_tracking_providers(SITE, 1).await.unwrap();
    let before = cached_group(&harness, "United States").unwrap();

    harness
        .shipments
        .groups
        .ok(vec![group("United States", &["USPS", "FedEx"])]);
    shipments.synchronize_tracking_providers(SITE, 1).await.unwrap();

    let after = cached_group(&harness, "United States").unwrap();
    let names: Vec<&str> = after
        .providers
        .iter()
        .map(|child| child.value.name.as_str())
        .collect();
    assert_eq!(names, vec!["USPS", "FedEx"]);
    assert_eq!(after.providers[0].object_id, before.providers[1].object_id);
    assert!(cached_group(&harness, "Australia").is_none());
}

#[tokio::test]
async fn custom_tracking_remembers_its_provider() {
    let harness = Harness::new();
    let mut created = tracking(1, "custom");
    created.tracking_provider = Some("Local Courier".to_string());
    harness.shipments.create.ok(created);

    harness
        .stores
        .shipments()
        .add_custom_tracking(
            SITE,
            1,
            "Local Courier",
            "LC-1",
            "https://courier.example.com/",
            at(3),
        )
        .await
        .unwrap();

    let custom = cached_group(&harness, CUSTOM_PROVIDER_GROUP).unwrap();
    assert_eq!(custom.providers.len(), 1);
    assert_eq!(custom.providers[0].value.url, "https://courier.example.com/");
    assert_eq!(tracking_ids(&harness, 1), vec!["custom"]);

    harness.shipments.groups.ok(vec![group("United States", &["UPS"])]);
    harness
        .stores
        .shipments()
        .synchronize_tracking_providers(SITE, 1)
        .await
        .unwrap();
    assert!(cached_group(&harness, CUSTOM_PROVIDER_GROUP).is_some());
}

#[tokio::test]
async fn custom_provider_is_not_duplicated() {
    let harness = Harness::new();
    let shipments = harness.stores.shipments();
    for tracking_id in ["one", "two"] {
        harness.shipments.create.ok(tracking(1, tracking_id));
        shipments
            .add_custom_tracking(SITE, 1, "Courier", tracking_id, "https://c.example/", at(3))
            .await
            .unwrap();
    }

    let custom = cached_group(&harness, CUSTOM_PROVIDER_GROUP).unwrap();
    assert_eq!(custom.providers.len(), 1);
    assert_eq!(tracking_ids(&harness, 1), vec!["one", "two"]);
}
