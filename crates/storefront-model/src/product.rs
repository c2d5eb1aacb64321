//! Products and their child collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Identified, MetaData, ProductKey};

/// Publication status of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductStatus {
    #[default]
    Published,
    Draft,
    Pending,
    Private,
    /// Row created by an in-flight CSV import.
    Importing,
    Custom(String),
}

impl ProductStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Published => "publish",
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Private => "private",
            Self::Importing => "importing",
            Self::Custom(slug) => slug,
        }
    }
}

impl From<&str> for ProductStatus {
    fn from(slug: &str) -> Self {
        match slug {
            "publish" => Self::Published,
            "draft" => Self::Draft,
            "pending" => Self::Pending,
            "private" => Self::Private,
            "importing" => Self::Importing,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for ProductStatus {
    fn from(slug: String) -> Self {
        Self::from(slug.as_str())
    }
}

impl From<ProductStatus> for String {
    fn from(status: ProductStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductDimensions {
    pub length: String,
    pub width: String,
    pub height: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Product {
    pub site_id: i64,
    pub product_id: i64,
    pub name: String,
    pub slug: String,
    pub permalink: String,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub product_type: String,
    pub status: ProductStatus,
    pub featured: bool,
    pub catalog_visibility: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub sku: Option<String>,
    pub price: String,
    pub regular_price: Option<String>,
    pub sale_price: Option<String>,
    pub on_sale: bool,
    pub purchasable: bool,
    pub total_sales: i64,
    pub is_virtual: bool,
    pub downloadable: bool,
    pub manage_stock: bool,
    pub stock_quantity: Option<i64>,
    pub stock_status: String,
    pub backorders: String,
    pub weight: Option<String>,
    pub dimensions: ProductDimensions,
    pub shipping_class: Option<String>,
    pub shipping_class_id: i64,
    pub parent_id: i64,
    pub menu_order: i64,
    pub upsell_ids: Vec<i64>,
    pub cross_sell_ids: Vec<i64>,
    pub variations: Vec<i64>,
    pub grouped_products: Vec<i64>,
    pub attributes: Vec<ProductAttribute>,
    pub default_attributes: Vec<ProductDefaultAttribute>,
    pub images: Vec<ProductImage>,
    pub categories: Vec<ProductCategory>,
    pub tags: Vec<ProductTag>,
    pub downloads: Vec<ProductDownload>,
    pub add_ons: Vec<ProductAddOn>,
    pub bundled_items: Vec<ProductBundleItem>,
    pub composite_components: Vec<ProductCompositeComponent>,
    pub custom_fields: Vec<MetaData>,
}

impl Product {
    pub fn key(&self) -> ProductKey {
        ProductKey::new(self.site_id, self.product_id)
    }

    /// Products still being imported are never persisted.
    pub fn is_transient(&self) -> bool {
        self.status == ProductStatus::Importing
    }
}

/// Attribute assigned to a product. Local attributes have `attribute_id == 0`
/// and are told apart by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub attribute_id: i64,
    pub name: String,
    pub position: i64,
    pub visible: bool,
    pub variation: bool,
    pub options: Vec<String>,
}

impl Identified for ProductAttribute {
    type Id = (i64, String);

    fn identity(&self) -> (i64, String) {
        (self.attribute_id, self.name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductDefaultAttribute {
    pub attribute_id: i64,
    pub name: Option<String>,
    pub option: Option<String>,
}

impl Identified for ProductDefaultAttribute {
    type Id = (i64, Option<String>);

    fn identity(&self) -> (i64, Option<String>) {
        (self.attribute_id, self.name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductImage {
    pub image_id: i64,
    pub date_created: DateTime<Utc>,
    pub date_modified: Option<DateTime<Utc>>,
    pub src: String,
    pub name: Option<String>,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductCategory {
    pub category_id: i64,
    pub name: String,
    pub slug: String,
}

impl Identified for ProductCategory {
    type Id = i64;

    fn identity(&self) -> i64 {
        self.category_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductTag {
    pub tag_id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductDownload {
    pub download_id: String,
    pub name: Option<String>,
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductAddOn {
    pub add_on_type: String,
    pub name: String,
    pub description: String,
    pub required: bool,
    pub price: String,
    pub price_type: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductBundleItem {
    pub bundled_item_id: i64,
    pub product_id: i64,
    pub menu_order: i64,
    pub title: String,
    pub stock_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductCompositeComponent {
    pub component_id: String,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub option_type: String,
    pub option_ids: Vec<i64>,
    pub default_option_id: Option<String>,
}
