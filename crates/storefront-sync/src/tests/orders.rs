//! Order store behavior.
//!
//! - Optimistic writes roll back when the remote refuses them
//! - Orders the remote no longer has are dropped from the cache
//! - Search results record their membership per page

use storefront_model::{OrderFeeLine, OrderKey, OrderStatus, OrderUpdateField, SimplePaymentsUpdate};
use storefront_storage::{SearchKey, StoredOrder};

use super::mocks::CREATED_ORDER_ID;
use super::{at, order, Harness, SITE};
use crate::remote::{OrderListFilter, RemoteError};
use crate::StoreError;

async fn cache_orders(harness: &Harness, orders: Vec<storefront_model::Order>) {
    harness.orders.pages.ok(orders);
    harness
        .stores
        .orders()
        .synchronize_orders(SITE, &OrderListFilter::default(), 1, 25)
        .await
        .unwrap();
}

fn cached(harness: &Harness, order_id: i64) -> Option<StoredOrder> {
    harness
        .storage
        .view()
        .get::<StoredOrder>(&OrderKey::new(SITE, order_id))
        .cloned()
}

// ============================================================================
// Optimistic status updates
// ============================================================================

#[tokio::test]
async fn status_update_rolls_back_on_remote_failure() {
    let harness = Harness::new();
    cache_orders(&harness, vec![order(1)]).await;
    harness
        .orders
        .update
        .fail(RemoteError::Network("timeout".to_string()));

    let result = harness
        .stores
        .orders()
        .update_order_status(SITE, 1, OrderStatus::Completed)
        .await;

    assert!(matches!(result, Err(StoreError::Remote(RemoteError::Network(_)))));
    assert_eq!(cached(&harness, 1).unwrap().status, OrderStatus::Processing);

    let sent = harness.orders.sent_updates.lock();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0.status, OrderStatus::Completed);
    assert_eq!(sent[0].1, vec![OrderUpdateField::Status]);
}

#[tokio::test]
async fn status_update_keeps_remote_result_on_success() {
    let harness = Harness::new();
    cache_orders(&harness, vec![order(1)]).await;
    let mut updated = order(1);
    updated.status = OrderStatus::Completed;
    updated.date_modified = at(3);
    harness.orders.update.ok(updated);

    let order = harness
        .stores
        .orders()
        .update_order_status(SITE, 1, OrderStatus::Completed)
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Completed);
    let stored = cached(&harness, 1).unwrap();
    assert_eq!(stored.status, OrderStatus::Completed);
    assert_eq!(stored.date_modified, at(3));
}

#[tokio::test]
async fn optimistic_update_restores_previous_copy() {
    let harness = Harness::new();
    cache_orders(&harness, vec![order(1)]).await;
    let before = cached(&harness, 1).unwrap();
    harness
        .orders
        .update
        .fail(RemoteError::Network("offline".to_string()));

    let mut edited = order(1);
    edited.customer_note = Some("leave at the door".to_string());
    let result = harness
        .stores
        .orders()
        .update_order_optimistically(SITE, &edited, &[OrderUpdateField::CustomerNote])
        .await;

    assert!(result.is_err());
    let after = cached(&harness, 1).unwrap();
    assert_eq!(after.customer_note, None);
    assert_eq!(after.meta.object_id, before.meta.object_id);
}

#[tokio::test]
async fn optimistic_update_of_uncached_order_is_removed_on_failure() {
    let harness = Harness::new();
    harness
        .orders
        .update
        .fail(RemoteError::Network("offline".to_string()));

    let result = harness
        .stores
        .orders()
        .update_order_optimistically(SITE, &order(8), &[OrderUpdateField::Status])
        .await;

    assert!(result.is_err());
    assert!(cached(&harness, 8).is_none());
}

// ============================================================================
// Deletion
// ============================================================================

#[tokio::test]
async fn failed_delete_restores_the_order() {
    let harness = Harness::new();
    cache_orders(&harness, vec![order(1)]).await;
    let before = cached(&harness, 1).unwrap();
    harness
        .orders
        .delete
        .fail(RemoteError::Server {
            code: "forbidden".to_string(),
            message: "nope".to_string(),
        });

    let result = harness
        .stores
        .orders()
        .delete_order(SITE, &order(1), false)
        .await;

    assert!(result.is_err());
    let restored = cached(&harness, 1).unwrap();
    assert_eq!(restored.meta.object_id, before.meta.object_id);
}

#[tokio::test]
async fn successful_delete_removes_the_order() {
    let harness = Harness::new();
    cache_orders(&harness, vec![order(1), order(2)]).await;
    harness.orders.delete.ok(order(1));

    let deleted = harness
        .stores
        .orders()
        .delete_order(SITE, &order(1), true)
        .await
        .unwrap();

    assert_eq!(deleted.order_id, 1);
    assert!(cached(&harness, 1).is_none());
    assert!(cached(&harness, 2).is_some());
}

#[tokio::test]
async fn failed_delete_of_auto_draft_is_not_restored() {
    let harness = Harness::new();
    let mut draft = order(9);
    draft.status = OrderStatus::AutoDraft;
    harness
        .orders
        .delete
        .fail(RemoteError::Network("offline".to_string()));

    let result = harness.stores.orders().delete_order(SITE, &draft, true).await;

    assert!(result.is_err());
    assert!(cached(&harness, 9).is_none());
}

// ============================================================================
// Retrieval
// ============================================================================

#[tokio::test]
async fn not_found_order_is_dropped_from_cache() {
    let harness = Harness::new();
    cache_orders(&harness, vec![order(1)]).await;
    harness.orders.modified.fail(RemoteError::NotFound);
    harness.orders.load.fail(RemoteError::NotFound);

    let error = harness
        .stores
        .orders()
        .retrieve_order(SITE, 1)
        .await
        .unwrap_err();

    assert!(error.is_not_found());
    assert!(cached(&harness, 1).is_none());
}

#[tokio::test]
async fn other_errors_keep_the_cached_order() {
    let harness = Harness::new();
    cache_orders(&harness, vec![order(1)]).await;
    harness
        .orders
        .modified
        .fail(RemoteError::Network("offline".to_string()));
    harness
        .orders
        .load
        .fail(RemoteError::Network("offline".to_string()));

    let result = harness.stores.orders().retrieve_order(SITE, 1).await;

    assert!(result.is_err());
    assert!(cached(&harness, 1).is_some());
}

#[tokio::test]
async fn current_cached_order_skips_the_full_fetch() {
    let harness = Harness::new();
    cache_orders(&harness, vec![order(1)]).await;
    harness.orders.modified.ok(at(1));

    // `load` is not scripted: a full fetch would fail.
    let order = harness
        .stores
        .orders()
        .retrieve_order(SITE, 1)
        .await
        .unwrap();

    assert_eq!(order.order_id, 1);
}

#[tokio::test]
async fn stale_cached_order_is_refetched() {
    let harness = Harness::new();
    cache_orders(&harness, vec![order(1)]).await;
    let mut newer = order(1);
    newer.total = "99.00".to_string();
    newer.date_modified = at(5);
    harness.orders.modified.ok(at(5));
    harness.orders.load.ok(newer);

    let order = harness
        .stores
        .orders()
        .retrieve_order(SITE, 1)
        .await
        .unwrap();

    assert_eq!(order.total, "99.00");
    assert_eq!(cached(&harness, 1).unwrap().total, "99.00");
}

// ============================================================================
// Local-only changes
// ============================================================================

#[tokio::test]
async fn mark_as_paid_requires_a_cached_order() {
    let harness = Harness::new();

    let error = harness
        .stores
        .orders()
        .mark_order_as_paid_locally(SITE, 3, at(4))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        StoreError::OrderNotFoundInStorage(key) if key == OrderKey::new(SITE, 3)
    ));
}

#[tokio::test]
async fn mark_as_paid_sets_processing_and_date() {
    let harness = Harness::new();
    let mut pending = order(3);
    pending.status = OrderStatus::Pending;
    cache_orders(&harness, vec![pending]).await;

    let paid = harness
        .stores
        .orders()
        .mark_order_as_paid_locally(SITE, 3, at(4))
        .await
        .unwrap();

    assert_eq!(paid.status, OrderStatus::Processing);
    assert_eq!(paid.date_paid, Some(at(4)));
    assert_eq!(cached(&harness, 3).unwrap().date_paid, Some(at(4)));
}

#[tokio::test]
async fn created_auto_draft_is_not_cached() {
    let harness = Harness::new();
    let mut draft = order(11);
    draft.status = OrderStatus::AutoDraft;

    let created = harness
        .stores
        .orders()
        .create_order(SITE, &draft, &[])
        .await
        .unwrap();

    assert_eq!(created.order_id, 11);
    assert!(cached(&harness, 11).is_none());
}

#[tokio::test]
async fn simple_payments_order_is_created_with_one_fee() {
    let harness = Harness::new();

    let created = harness
        .stores
        .orders()
        .create_simple_payments_order(SITE, OrderStatus::Pending, "18.00", false)
        .await
        .unwrap();

    let sent = harness.orders.sent_creates.lock();
    assert_eq!(sent[0].1, vec![OrderUpdateField::Status, OrderUpdateField::Fees]);
    assert_eq!(sent[0].0.fees.len(), 1);
    assert_eq!(sent[0].0.fees[0].total, "18.00");
    assert_eq!(created.order_id, CREATED_ORDER_ID);
    let stored = cached(&harness, CREATED_ORDER_ID).unwrap();
    assert_eq!(stored.fees.len(), 1);
}

#[tokio::test]
async fn simple_payments_update_sends_fee_note_and_email() {
    let harness = Harness::new();
    let mut existing = order(12);
    existing.fees = vec![OrderFeeLine::simple_payment(4, "10.00", false)];
    cache_orders(&harness, vec![existing.clone()]).await;

    let mut updated = existing;
    updated.fees = vec![OrderFeeLine::simple_payment(4, "25.00", true)];
    updated.customer_note = Some("gift".to_string());
    harness.orders.update.ok(updated);

    let update = SimplePaymentsUpdate {
        order_id: 12,
        fee_id: 4,
        status: OrderStatus::Pending,
        amount: "25.00".to_string(),
        taxable: true,
        customer_note: Some("gift".to_string()),
        email: Some("buyer@example.com".to_string()),
    };
    let result = harness
        .stores
        .orders()
        .update_simple_payments_order(SITE, &update)
        .await
        .unwrap();

    {
        let sent = harness.orders.sent_updates.lock();
        assert_eq!(sent[0].1, SimplePaymentsUpdate::FIELDS.to_vec());
        let billing = sent[0].0.billing_address.clone().unwrap();
        assert_eq!(billing.email.as_deref(), Some("buyer@example.com"));
    }
    assert_eq!(result.customer_note.as_deref(), Some("gift"));
    let stored = cached(&harness, 12).unwrap();
    assert_eq!(stored.fees.len(), 1);
    assert_eq!(stored.fees[0].value.total, "25.00");
}

// ============================================================================
// Lists and searches
// ============================================================================

#[tokio::test]
async fn search_membership_is_reset_on_first_page() {
    let harness = Harness::new();
    let orders = harness.stores.orders();
    let search = SearchKey::new(SITE, "ann");
    let members = |harness: &Harness| {
        let mut ids: Vec<i64> = harness
            .storage
            .view()
            .search::<StoredOrder>(&search)
            .iter()
            .map(|stored| stored.order_id)
            .collect();
        ids.sort_unstable();
        ids
    };

    harness.orders.search.ok(vec![order(1), order(2)]);
    orders.search_orders(SITE, "ann", 1, 2).await.unwrap();
    harness.orders.search.ok(vec![order(3)]);
    orders.search_orders(SITE, "ann", 2, 2).await.unwrap();
    assert_eq!(members(&harness), vec![1, 2, 3]);
    assert!(cached(&harness, 3).unwrap().exclusive_for_search);

    harness.orders.search.ok(vec![order(4)]);
    orders.search_orders(SITE, "ann", 1, 2).await.unwrap();
    assert_eq!(members(&harness), vec![4]);
}

#[tokio::test]
async fn filtered_fetch_can_replace_the_site() {
    let harness = Harness::new();
    cache_orders(&harness, vec![order(1), order(2)]).await;
    harness.orders.pages.ok(vec![order(3)]);

    let has_next = harness
        .stores
        .orders()
        .fetch_filtered_orders(SITE, &OrderListFilter::default(), true, 25)
        .await
        .unwrap();

    assert!(!has_next);
    assert!(cached(&harness, 1).is_none());
    assert!(cached(&harness, 2).is_none());
    assert!(cached(&harness, 3).is_some());
}

#[tokio::test]
async fn store_has_orders_checks_cache_first() {
    let harness = Harness::new();
    harness.orders.pages.ok(Vec::new());
    assert!(!harness
        .stores
        .orders()
        .check_if_store_has_orders(SITE)
        .await
        .unwrap());

    cache_orders(&harness, vec![order(1)]).await;
    // No remote page scripted: the cached order answers.
    assert!(harness
        .stores
        .orders()
        .check_if_store_has_orders(SITE)
        .await
        .unwrap());
}
