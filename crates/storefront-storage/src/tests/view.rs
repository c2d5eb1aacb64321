//! Read views.

use storefront_model::CouponKey;

use super::coupon;
use crate::{SearchKey, StorageManager, StoredCoupon};

#[tokio::test]
async fn old_views_do_not_change() {
    let storage = StorageManager::in_memory().unwrap();
    let staging = storage.new_staging_context("coupons").unwrap();

    let before = storage.view();
    staging
        .save(|txn| txn.insert(StoredCoupon::new(&coupon(1, 1))))
        .await
        .unwrap();
    let after = storage.view();

    assert_eq!(before.count::<StoredCoupon>(), 0);
    assert_eq!(after.count::<StoredCoupon>(), 1);
}

#[tokio::test]
async fn search_skips_deleted_members() {
    let storage = StorageManager::in_memory().unwrap();
    let staging = storage.new_staging_context("coupons").unwrap();
    let key = SearchKey::new(1, "sale");

    let search_key = key.clone();
    staging
        .save(move |txn| {
            for id in 1..=3 {
                txn.insert(StoredCoupon::new(&coupon(1, id)));
            }
            txn.set_search_members::<StoredCoupon>(
                search_key,
                (1..=3).map(|id| CouponKey::new(1, id)).collect(),
            );
        })
        .await
        .unwrap();

    staging
        .save(|txn| txn.delete::<StoredCoupon>(&CouponKey::new(1, 2)))
        .await
        .unwrap();

    let view = storage.view();
    let found: Vec<i64> = view
        .search::<StoredCoupon>(&key)
        .into_iter()
        .map(|stored| stored.coupon.coupon_id)
        .collect();
    assert_eq!(found, vec![1, 3]);
}

#[tokio::test]
async fn filter_and_first_see_published_rows() {
    let storage = StorageManager::in_memory().unwrap();
    let staging = storage.new_staging_context("coupons").unwrap();

    staging
        .save(|txn| {
            txn.insert(StoredCoupon::new(&coupon(1, 1)));
            txn.insert(StoredCoupon::new(&coupon(2, 1)));
            txn.insert(StoredCoupon::new(&coupon(2, 2)));
        })
        .await
        .unwrap();

    let view = storage.view();
    assert_eq!(
        view.filter::<StoredCoupon, _>(|stored| stored.coupon.site_id == 2)
            .len(),
        2
    );
    assert!(view
        .first::<StoredCoupon, _>(|stored| stored.coupon.site_id == 3)
        .is_none());
}
