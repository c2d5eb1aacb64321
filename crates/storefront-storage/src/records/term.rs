use serde::{Deserialize, Serialize};
use storefront_model::{AttributeTermKey, ProductAttributeTerm};

use super::{RecordKind, StorageRecord};
use crate::meta::RecordMeta;

/// Persisted product attribute term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAttributeTerm {
    pub meta: RecordMeta,
    pub term: ProductAttributeTerm,
}

impl StoredAttributeTerm {
    pub fn new(term: &ProductAttributeTerm) -> Self {
        Self {
            meta: RecordMeta::new(),
            term: term.clone(),
        }
    }

    pub fn apply_fields(&mut self, term: &ProductAttributeTerm) {
        self.term = term.clone();
        self.meta.touch();
    }

    pub fn to_read_only(&self) -> ProductAttributeTerm {
        self.term.clone()
    }
}

impl StorageRecord for StoredAttributeTerm {
    type Key = AttributeTermKey;

    const KIND: RecordKind = RecordKind::AttributeTerm;

    fn key(&self) -> AttributeTermKey {
        self.term.key()
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn site_id(&self) -> i64 {
        self.term.site_id
    }

    table_accessors!(attribute_terms);
}
