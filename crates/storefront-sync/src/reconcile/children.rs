//! Child collection strategies.
//!
//! - [`replace_all`]: children with no identity of their own are rebuilt from
//!   the remote list, every one with a fresh local id.
//! - [`match_or_create_prune`]: children with a remote id are matched by it.
//!   Matches are updated in place, unknown ids are created and whatever is
//!   left over is dropped.

use storefront_model::{Identified, OrderItem, OrderItemRefund, ShippingLine};
use storefront_storage::{Child, StoredOrderItem, StoredRefundItem, StoredShippingLine};

/// Drops every existing child and rebuilds the list in remote order.
pub fn replace_all<T: Clone>(children: &mut Vec<Child<T>>, remote: &[T]) {
    *children = remote.iter().cloned().map(Child::new).collect();
}

/// A persisted child matched against its remote counterpart by id.
pub trait KeyedChild: Sized {
    type Remote;
    type Id: PartialEq;

    fn remote_id(remote: &Self::Remote) -> Self::Id;

    fn id(&self) -> Self::Id;

    fn create(remote: &Self::Remote) -> Self;

    fn update(&mut self, remote: &Self::Remote);
}

/// Reconciles `children` against `remote` by id.
///
/// The result follows remote order. Duplicate ids in `remote` collapse into
/// one child, the last one winning.
pub fn match_or_create_prune<C: KeyedChild>(children: &mut Vec<C>, remote: &[C::Remote]) {
    let mut existing = std::mem::take(children);
    let mut next: Vec<C> = Vec::with_capacity(remote.len());

    for item in remote {
        let id = C::remote_id(item);
        if let Some(seen) = next.iter_mut().find(|child| child.id() == id) {
            seen.update(item);
            continue;
        }
        match existing.iter().position(|child| child.id() == id) {
            Some(index) => {
                let mut child = existing.swap_remove(index);
                child.update(item);
                next.push(child);
            }
            None => next.push(C::create(item)),
        }
    }

    *children = next;
}

impl<T> KeyedChild for Child<T>
where
    T: Identified + Clone,
{
    type Remote = T;
    type Id = T::Id;

    fn remote_id(remote: &T) -> T::Id {
        remote.identity()
    }

    fn id(&self) -> T::Id {
        self.value.identity()
    }

    fn create(remote: &T) -> Self {
        Child::new(remote.clone())
    }

    fn update(&mut self, remote: &T) {
        self.value = remote.clone();
    }
}

impl KeyedChild for StoredOrderItem {
    type Remote = OrderItem;
    type Id = i64;

    fn remote_id(remote: &OrderItem) -> i64 {
        remote.item_id
    }

    fn id(&self) -> i64 {
        self.item_id
    }

    fn create(remote: &OrderItem) -> Self {
        let mut item = StoredOrderItem::new(remote);
        fill_order_item(&mut item, remote);
        item
    }

    fn update(&mut self, remote: &OrderItem) {
        self.apply_fields(remote);
        fill_order_item(self, remote);
    }
}

fn fill_order_item(item: &mut StoredOrderItem, remote: &OrderItem) {
    match_or_create_prune(&mut item.taxes, &remote.taxes);
    replace_all(&mut item.attributes, &remote.attributes);
    replace_all(&mut item.add_ons, &remote.add_ons);
}

impl KeyedChild for StoredShippingLine {
    type Remote = ShippingLine;
    type Id = i64;

    fn remote_id(remote: &ShippingLine) -> i64 {
        remote.shipping_id
    }

    fn id(&self) -> i64 {
        self.shipping_id
    }

    fn create(remote: &ShippingLine) -> Self {
        let mut line = StoredShippingLine::new(remote);
        match_or_create_prune(&mut line.taxes, &remote.taxes);
        line
    }

    fn update(&mut self, remote: &ShippingLine) {
        self.apply_fields(remote);
        match_or_create_prune(&mut self.taxes, &remote.taxes);
    }
}

impl KeyedChild for StoredRefundItem {
    type Remote = OrderItemRefund;
    type Id = i64;

    fn remote_id(remote: &OrderItemRefund) -> i64 {
        remote.item_id
    }

    fn id(&self) -> i64 {
        self.item_id
    }

    fn create(remote: &OrderItemRefund) -> Self {
        let mut item = StoredRefundItem::new(remote);
        match_or_create_prune(&mut item.taxes, &remote.taxes);
        item
    }

    fn update(&mut self, remote: &OrderItemRefund) {
        self.apply_fields(remote);
        match_or_create_prune(&mut self.taxes, &remote.taxes);
    }
}
