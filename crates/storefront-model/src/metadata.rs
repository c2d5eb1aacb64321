use serde::{Deserialize, Serialize};

use crate::Identified;

/// A custom field attached to an order or a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaData {
    pub metadata_id: i64,
    pub key: String,
    pub value: String,
}

impl Identified for MetaData {
    type Id = i64;

    fn identity(&self) -> i64 {
        self.metadata_id
    }
}

/// One change sent with a metadata update request.
///
/// `id == None` creates a new entry; `value == None` removes the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaDataUpdate {
    pub id: Option<i64>,
    pub key: String,
    pub value: Option<String>,
}

impl MetaData {
    pub fn new(metadata_id: i64, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            metadata_id,
            key: key.into(),
            value: value.into(),
        }
    }
}
