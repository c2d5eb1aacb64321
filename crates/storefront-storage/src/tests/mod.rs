//! Tests for the storefront cache.
//!
//! - `txn.rs`        - overlay reads and writes, search membership
//! - `staging.rs`    - isolation, FIFO serialization, main-context delivery
//! - `durability.rs` - SQLite write-through, recovery, persistence failures
//! - `view.rs`       - snapshot stability, search reads

mod durability;
mod view;

use std::sync::Arc;

use storefront_model::Coupon;

use crate::records::StorageRecord;
use crate::{RecordingSink, StorageEvent, StorageManager, StoredCoupon};

pub(crate) fn coupon(site_id: i64, coupon_id: i64) -> Coupon {
    Coupon {
        site_id,
        coupon_id,
        code: format!("CODE{coupon_id}"),
        amount: "10.00".to_string(),
        ..Default::default()
    }
}

/// Basic workflow: stage, commit, read.
#[tokio::test]
async fn basic_workflow() {
    let sink = Arc::new(RecordingSink::new());
    let storage = StorageManager::in_memory_with_sink(sink.clone()).unwrap();
    let staging = storage.new_staging_context("coupons").unwrap();

    let record = StoredCoupon::new(&coupon(1, 77));
    let key = record.key();
    staging.perform(move |txn| txn.insert(record)).await.unwrap();

    // Staged, not published.
    assert!(storage.view().get::<StoredCoupon>(&key).is_none());

    let outcome = staging.commit_and_wait().await.unwrap();
    assert!(outcome.is_persisted());
    assert_eq!(outcome.summary.inserted, 1);

    let view = storage.view();
    let stored = view.get::<StoredCoupon>(&key).unwrap();
    assert_eq!(stored.coupon.code, "CODE77");

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        StorageEvent::Published { summary, persisted: true } if summary.inserted == 1
    ));
}
