use std::collections::BTreeSet;
use std::sync::Arc;

use storefront_config::DEFAULT_ATTRIBUTE_TERMS_PAGE_SIZE;
use storefront_model::{AttributeTermKey, ProductAttributeTerm};
use storefront_storage::{LazyStaging, StorageManager, StorageRecord, StoredAttributeTerm};
use tracing::{debug, info};

use super::{save, upsert_projected};
use crate::pagination::{PageOutcome, FIRST_PAGE};
use crate::reconcile::{reconcile, ReconcileOptions};
use crate::remote::ProductAttributeTermsRemote;
use crate::{AttributeTermError, StoreResult};

/// Syncs the terms of global product attributes.
pub struct AttributeTermStore {
    remote: Arc<dyn ProductAttributeTermsRemote>,
    staging: LazyStaging,
    page_size: usize,
}

impl AttributeTermStore {
    pub fn new(
        storage: StorageManager,
        remote: Arc<dyn ProductAttributeTermsRemote>,
        page_size: usize,
    ) -> Self {
        let page_size = if page_size == 0 {
            DEFAULT_ATTRIBUTE_TERMS_PAGE_SIZE
        } else {
            page_size
        };
        Self {
            remote,
            staging: LazyStaging::new(storage, "attribute-terms"),
            page_size,
        }
    }

    /// Syncs every term of one attribute.
    ///
    /// Pages are fetched until one comes back short. Terms of the attribute
    /// that no page returned are deleted once, after the last page. A failed
    /// page stops the sync and nothing is deleted.
    pub async fn synchronize_all_terms(
        &self,
        site_id: i64,
        attribute_id: i64,
    ) -> Result<usize, AttributeTermError> {
        let mut seen = BTreeSet::new();
        let mut page = FIRST_PAGE;
        loop {
            let outcome = self
                .sync_page(site_id, attribute_id, page, &mut seen)
                .await
                .map_err(|source| AttributeTermError::TermsSynchronization {
                    page_number: page,
                    source,
                })?;
            if !outcome.has_next {
                break;
            }
            page += 1;
        }

        let total = seen.len();
        let deleted = save(&self.staging, move |txn| {
            txn.delete_matching::<StoredAttributeTerm, _>(|stored| {
                stored.site_id() == site_id
                    && stored.term.attribute_id == attribute_id
                    && !seen.contains(&stored.key())
            })
        })
        .await
        .map_err(|source| AttributeTermError::TermsSynchronization {
            page_number: page,
            source,
        })?;
        info!(site_id, attribute_id, total, deleted, "attribute terms: synchronized");

        Ok(total)
    }

    async fn sync_page(
        &self,
        site_id: i64,
        attribute_id: i64,
        page: u32,
        seen: &mut BTreeSet<AttributeTermKey>,
    ) -> StoreResult<PageOutcome> {
        let terms = self
            .remote
            .load_terms(site_id, attribute_id, page, self.page_size)
            .await?;
        let outcome = PageOutcome::new(terms.len(), self.page_size);
        seen.extend(terms.iter().map(ProductAttributeTerm::key));

        let report = save(&self.staging, move |txn| {
            reconcile(txn, &terms, |_| false, ReconcileOptions::merge())
        })
        .await?;
        debug!(site_id, attribute_id, page, ?report, "attribute terms: page reconciled");

        Ok(outcome)
    }

    pub async fn create_term(
        &self,
        site_id: i64,
        attribute_id: i64,
        name: &str,
    ) -> StoreResult<ProductAttributeTerm> {
        let created = self.remote.create_term(site_id, attribute_id, name).await?;
        upsert_projected(&self.staging, created, StoredAttributeTerm::to_read_only).await
    }
}
