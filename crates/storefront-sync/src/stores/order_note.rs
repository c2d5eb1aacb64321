use std::sync::Arc;

use storefront_model::{Identified, OrderKey, OrderNote};
use storefront_storage::{Child, LazyStaging, StorageManager, StoredOrder};
use tracing::{debug, warn};

use super::save;
use crate::reconcile::reconcile_notes;
use crate::remote::OrderNotesRemote;
use crate::StoreResult;

/// Syncs the notes of cached orders.
pub struct OrderNoteStore {
    remote: Arc<dyn OrderNotesRemote>,
    staging: LazyStaging,
}

impl OrderNoteStore {
    pub fn new(storage: StorageManager, remote: Arc<dyn OrderNotesRemote>) -> Self {
        Self {
            remote,
            staging: LazyStaging::new(storage, "order-notes"),
        }
    }

    /// Replaces an order's cached notes with the remote list.
    ///
    /// Notes are matched by id, so unchanged notes keep their local
    /// identity. An order that is not cached is skipped with a warning.
    pub async fn synchronize_order_notes(
        &self,
        site_id: i64,
        order_id: i64,
    ) -> StoreResult<Vec<OrderNote>> {
        let notes = self.remote.load_order_notes(site_id, order_id).await?;
        let order = OrderKey::new(site_id, order_id);

        let (stored, notes) = save(&self.staging, move |txn| {
            let stored = reconcile_notes(txn, order, &notes);
            (stored, notes)
        })
        .await?;
        debug!(%order, stored, notes = notes.len(), "order notes: synchronized");

        Ok(notes)
    }

    /// Posts a note and attaches it to the cached order.
    pub async fn add_order_note(
        &self,
        site_id: i64,
        order_id: i64,
        is_customer_note: bool,
        note: &str,
    ) -> StoreResult<OrderNote> {
        let created = self
            .remote
            .add_order_note(site_id, order_id, is_customer_note, note)
            .await?;
        let order = OrderKey::new(site_id, order_id);

        let note = created.clone();
        save(&self.staging, move |txn| {
            let Some(stored) = txn.load_mut::<StoredOrder>(&order) else {
                warn!(%order, "order notes: order is not stored, note not cached");
                return;
            };
            let note_id = note.identity();
            match stored
                .notes
                .iter_mut()
                .find(|child| child.value.identity() == note_id)
            {
                Some(existing) => existing.value = note,
                None => stored.notes.push(Child::new(note)),
            }
            stored.meta.touch();
        })
        .await?;

        Ok(created)
    }
}
