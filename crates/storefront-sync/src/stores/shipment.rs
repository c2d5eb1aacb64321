use std::sync::Arc;

use chrono::{DateTime, Utc};
use storefront_model::{
    ShipmentTracking, ShipmentTrackingKey, ShipmentTrackingProvider, TrackingProviderGroupKey,
    CUSTOM_PROVIDER_GROUP,
};
use storefront_storage::{
    Child, LazyStaging, StagingTxn, StorageManager, StoredShipmentTracking,
    StoredTrackingProviderGroup,
};
use tracing::debug;

use super::{delete_stored, save, upsert_projected};
use crate::reconcile::{reconcile, upsert_one, ReconcileOptions};
use crate::remote::ShipmentsRemote;
use crate::StoreResult;

/// Syncs order shipment trackings and the carriers they can use.
pub struct ShipmentStore {
    remote: Arc<dyn ShipmentsRemote>,
    staging: LazyStaging,
}

impl ShipmentStore {
    pub fn new(storage: StorageManager, remote: Arc<dyn ShipmentsRemote>) -> Self {
        Self {
            remote,
            staging: LazyStaging::new(storage, "shipments"),
        }
    }

    /// Syncs an order's trackings. Trackings of that order the remote no
    /// longer lists are deleted.
    pub async fn synchronize_shipment_trackings(
        &self,
        site_id: i64,
        order_id: i64,
    ) -> StoreResult<usize> {
        let trackings = self
            .remote
            .load_shipment_trackings(site_id, order_id)
            .await?;
        let count = trackings.len();

        let report = save(&self.staging, move |txn| {
            reconcile(
                txn,
                &trackings,
                |stored: &StoredShipmentTracking| {
                    stored.tracking.site_id == site_id && stored.tracking.order_id == order_id
                },
                ReconcileOptions::pruning(true),
            )
        })
        .await?;
        debug!(site_id, order_id, ?report, "shipments: trackings reconciled");

        Ok(count)
    }

    /// Syncs a site's provider groups, matching providers by name.
    ///
    /// The custom group only exists locally, so it is never pruned.
    pub async fn synchronize_tracking_providers(
        &self,
        site_id: i64,
        order_id: i64,
    ) -> StoreResult<usize> {
        let groups = self.remote.load_provider_groups(site_id, order_id).await?;
        let count = groups.len();

        let report = save(&self.staging, move |txn| {
            reconcile(
                txn,
                &groups,
                |stored: &StoredTrackingProviderGroup| {
                    stored.site_id == site_id && stored.name != CUSTOM_PROVIDER_GROUP
                },
                ReconcileOptions::pruning(true),
            )
        })
        .await?;
        debug!(site_id, ?report, "shipments: provider groups reconciled");

        Ok(count)
    }

    /// Adds a tracking with one of the remote's providers.
    pub async fn add_tracking(
        &self,
        site_id: i64,
        order_id: i64,
        provider: &str,
        tracking_number: &str,
        date_shipped: DateTime<Utc>,
    ) -> StoreResult<ShipmentTracking> {
        let created = self
            .remote
            .create_shipment_tracking(site_id, order_id, provider, tracking_number, date_shipped)
            .await?;
        upsert_projected(&self.staging, created, StoredShipmentTracking::to_read_only).await
    }

    /// Adds a tracking with a provider the user typed in, and remembers that
    /// provider in the custom group.
    pub async fn add_custom_tracking(
        &self,
        site_id: i64,
        order_id: i64,
        provider: &str,
        tracking_number: &str,
        tracking_url: &str,
        date_shipped: DateTime<Utc>,
    ) -> StoreResult<ShipmentTracking> {
        let created = self
            .remote
            .create_custom_shipment_tracking(
                site_id,
                order_id,
                provider,
                tracking_number,
                tracking_url,
                date_shipped,
            )
            .await?;

        let provider = ShipmentTrackingProvider {
            site_id,
            name: provider.to_string(),
            url: tracking_url.to_string(),
        };
        save(&self.staging, move |txn| {
            remember_custom_provider(txn, provider);
            match upsert_one(txn, &created) {
                Some(stored) => stored.to_read_only(),
                None => created,
            }
        })
        .await
    }

    /// Deletes a tracking remotely, then locally.
    pub async fn delete_tracking(
        &self,
        site_id: i64,
        order_id: i64,
        tracking_id: &str,
    ) -> StoreResult<ShipmentTracking> {
        let deleted = self
            .remote
            .delete_shipment_tracking(site_id, order_id, tracking_id)
            .await?;

        let key = ShipmentTrackingKey::new(site_id, order_id, tracking_id);
        delete_stored::<StoredShipmentTracking>(&self.staging, key).await?;
        Ok(deleted)
    }
}

fn remember_custom_provider(txn: &mut StagingTxn, provider: ShipmentTrackingProvider) {
    let key = TrackingProviderGroupKey::new(provider.site_id, CUSTOM_PROVIDER_GROUP);
    if !txn.contains::<StoredTrackingProviderGroup>(&key) {
        txn.insert(StoredTrackingProviderGroup::empty(
            provider.site_id,
            CUSTOM_PROVIDER_GROUP,
        ));
    }
    let Some(group) = txn.load_mut::<StoredTrackingProviderGroup>(&key) else {
        return;
    };

    match group
        .providers
        .iter_mut()
        .find(|known| known.value.name == provider.name)
    {
        Some(known) => known.value = provider,
        None => group.providers.push(Child::new(provider)),
    }
    group.meta.touch();
}
