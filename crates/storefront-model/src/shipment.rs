use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::keys::{ShipmentTrackingKey, TrackingProviderGroupKey};
use crate::Identified;

/// Group that collects providers added by hand with a custom tracking.
pub const CUSTOM_PROVIDER_GROUP: &str = "Custom";

/// A tracking number attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShipmentTracking {
    pub site_id: i64,
    pub order_id: i64,
    pub tracking_id: String,
    pub tracking_number: String,
    pub tracking_provider: Option<String>,
    pub tracking_url: Option<String>,
    pub date_shipped: Option<DateTime<Utc>>,
}

impl ShipmentTracking {
    pub fn key(&self) -> ShipmentTrackingKey {
        ShipmentTrackingKey::new(self.site_id, self.order_id, &self.tracking_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShipmentTrackingProvider {
    pub site_id: i64,
    pub name: String,
    pub url: String,
}

impl Identified for ShipmentTrackingProvider {
    type Id = String;

    fn identity(&self) -> String {
        self.name.clone()
    }
}

/// Carriers the remote offers, grouped by region.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShipmentTrackingProviderGroup {
    pub site_id: i64,
    pub name: String,
    pub providers: Vec<ShipmentTrackingProvider>,
}

impl ShipmentTrackingProviderGroup {
    pub fn key(&self) -> TrackingProviderGroupKey {
        TrackingProviderGroupKey::new(self.site_id, &self.name)
    }
}
