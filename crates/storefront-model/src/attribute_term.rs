use serde::{Deserialize, Serialize};

use crate::AttributeTermKey;

/// One option of a global product attribute ("Blue" for "Color").
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductAttributeTerm {
    pub site_id: i64,
    pub attribute_id: i64,
    pub term_id: i64,
    pub name: String,
    pub slug: String,
    pub count: i64,
}

impl ProductAttributeTerm {
    pub fn key(&self) -> AttributeTermKey {
        AttributeTermKey::new(self.site_id, self.attribute_id, self.term_id)
    }
}
