use serde::{Deserialize, Serialize};
use storefront_model::{
    ShipmentTracking, ShipmentTrackingKey, ShipmentTrackingProvider,
    ShipmentTrackingProviderGroup, TrackingProviderGroupKey,
};

use super::{RecordKind, StorageRecord};
use crate::meta::{values, Child, RecordMeta};

/// Persisted tracking number of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredShipmentTracking {
    pub meta: RecordMeta,
    pub tracking: ShipmentTracking,
}

impl StoredShipmentTracking {
    pub fn new(tracking: &ShipmentTracking) -> Self {
        Self {
            meta: RecordMeta::new(),
            tracking: tracking.clone(),
        }
    }

    pub fn apply_fields(&mut self, tracking: &ShipmentTracking) {
        self.tracking = tracking.clone();
        self.meta.touch();
    }

    pub fn to_read_only(&self) -> ShipmentTracking {
        self.tracking.clone()
    }
}

impl StorageRecord for StoredShipmentTracking {
    type Key = ShipmentTrackingKey;

    const KIND: RecordKind = RecordKind::ShipmentTracking;

    fn key(&self) -> ShipmentTrackingKey {
        self.tracking.key()
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn site_id(&self) -> i64 {
        self.tracking.site_id
    }

    table_accessors!(shipment_trackings);
}

/// Persisted provider group. Providers are matched by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTrackingProviderGroup {
    pub meta: RecordMeta,
    pub site_id: i64,
    pub name: String,
    pub providers: Vec<Child<ShipmentTrackingProvider>>,
}

impl StoredTrackingProviderGroup {
    pub fn new(group: &ShipmentTrackingProviderGroup) -> Self {
        Self::empty(group.site_id, &group.name)
    }

    pub fn empty(site_id: i64, name: &str) -> Self {
        Self {
            meta: RecordMeta::new(),
            site_id,
            name: name.to_string(),
            providers: Vec::new(),
        }
    }

    pub fn to_read_only(&self) -> ShipmentTrackingProviderGroup {
        ShipmentTrackingProviderGroup {
            site_id: self.site_id,
            name: self.name.clone(),
            providers: values(&self.providers),
        }
    }
}

impl StorageRecord for StoredTrackingProviderGroup {
    type Key = TrackingProviderGroupKey;

    const KIND: RecordKind = RecordKind::TrackingProviderGroup;

    fn key(&self) -> TrackingProviderGroupKey {
        TrackingProviderGroupKey::new(self.site_id, &self.name)
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn site_id(&self) -> i64 {
        self.site_id
    }

    table_accessors!(tracking_provider_groups);
}
