use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_model::{
    MetaData, Product, ProductAddOn, ProductAttribute, ProductBundleItem, ProductCategory,
    ProductCompositeComponent, ProductDefaultAttribute, ProductDimensions, ProductDownload,
    ProductImage, ProductKey, ProductStatus, ProductTag,
};

use super::{RecordKind, StorageRecord};
use crate::meta::{values, Child, RecordMeta};

/// Persisted product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProduct {
    pub meta: RecordMeta,
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
    pub attributes: Vec<Child<ProductAttribute>>,
    pub default_attributes: Vec<Child<ProductDefaultAttribute>>,
    pub images: Vec<Child<ProductImage>>,
    pub categories: Vec<Child<ProductCategory>>,
    pub tags: Vec<Child<ProductTag>>,
    pub downloads: Vec<Child<ProductDownload>>,
    pub add_ons: Vec<Child<ProductAddOn>>,
    pub bundled_items: Vec<Child<ProductBundleItem>>,
    pub composite_components: Vec<Child<ProductCompositeComponent>>,
    pub custom_fields: Vec<Child<MetaData>>,
}

impl StoredProduct {
    /// A record holding `product`'s scalar fields and no children yet.
    pub fn new(product: &Product) -> Self {
        Self {
            meta: RecordMeta::new(),
            site_id: product.site_id,
            product_id: product.product_id,
            name: product.name.clone(),
            slug: product.slug.clone(),
            permalink: product.permalink.clone(),
            date_created: product.date_created,
            date_modified: product.date_modified,
            product_type: product.product_type.clone(),
            status: product.status.clone(),
            featured: product.featured,
            catalog_visibility: product.catalog_visibility.clone(),
            description: product.description.clone(),
            short_description: product.short_description.clone(),
            sku: product.sku.clone(),
            price: product.price.clone(),
            regular_price: product.regular_price.clone(),
            sale_price: product.sale_price.clone(),
            on_sale: product.on_sale,
            purchasable: product.purchasable,
            total_sales: product.total_sales,
            is_virtual: product.is_virtual,
            downloadable: product.downloadable,
            manage_stock: product.manage_stock,
            stock_quantity: product.stock_quantity,
            stock_status: product.stock_status.clone(),
            backorders: product.backorders.clone(),
            weight: product.weight.clone(),
            dimensions: product.dimensions.clone(),
            shipping_class: product.shipping_class.clone(),
            shipping_class_id: product.shipping_class_id,
            parent_id: product.parent_id,
            menu_order: product.menu_order,
            upsell_ids: product.upsell_ids.clone(),
            cross_sell_ids: product.cross_sell_ids.clone(),
            variations: product.variations.clone(),
            grouped_products: product.grouped_products.clone(),
            attributes: Vec::new(),
            default_attributes: Vec::new(),
            images: Vec::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            downloads: Vec::new(),
            add_ons: Vec::new(),
            bundled_items: Vec::new(),
            composite_components: Vec::new(),
            custom_fields: Vec::new(),
        }
    }

    /// Overwrites every scalar field with the remote values.
    pub fn apply_fields(&mut self, product: &Product) {
        let meta = self.meta.clone();
        let children = self.take_children();
        *self = Self::new(product);
        self.meta = meta;
        self.restore_children(children);
        self.meta.touch();
    }

    pub fn to_read_only(&self) -> Product {
        Product {
            site_id: self.site_id,
            product_id: self.product_id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            permalink: self.permalink.clone(),
            date_created: self.date_created,
            date_modified: self.date_modified,
            product_type: self.product_type.clone(),
            status: self.status.clone(),
            featured: self.featured,
            catalog_visibility: self.catalog_visibility.clone(),
            description: self.description.clone(),
            short_description: self.short_description.clone(),
            sku: self.sku.clone(),
            price: self.price.clone(),
            regular_price: self.regular_price.clone(),
            sale_price: self.sale_price.clone(),
            on_sale: self.on_sale,
            purchasable: self.purchasable,
            total_sales: self.total_sales,
            is_virtual: self.is_virtual,
            downloadable: self.downloadable,
            manage_stock: self.manage_stock,
            stock_quantity: self.stock_quantity,
            stock_status: self.stock_status.clone(),
            backorders: self.backorders.clone(),
            weight: self.weight.clone(),
            dimensions: self.dimensions.clone(),
            shipping_class: self.shipping_class.clone(),
            shipping_class_id: self.shipping_class_id,
            parent_id: self.parent_id,
            menu_order: self.menu_order,
            upsell_ids: self.upsell_ids.clone(),
            cross_sell_ids: self.cross_sell_ids.clone(),
            variations: self.variations.clone(),
            grouped_products: self.grouped_products.clone(),
            attributes: values(&self.attributes),
            default_attributes: values(&self.default_attributes),
            images: values(&self.images),
            categories: values(&self.categories),
            tags: values(&self.tags),
            downloads: values(&self.downloads),
            add_ons: values(&self.add_ons),
            bundled_items: values(&self.bundled_items),
            composite_components: values(&self.composite_components),
            custom_fields: values(&self.custom_fields),
        }
    }

    fn take_children(&mut self) -> ProductChildren {
        ProductChildren {
            attributes: std::mem::take(&mut self.attributes),
            default_attributes: std::mem::take(&mut self.default_attributes),
            images: std::mem::take(&mut self.images),
            categories: std::mem::take(&mut self.categories),
            tags: std::mem::take(&mut self.tags),
            downloads: std::mem::take(&mut self.downloads),
            add_ons: std::mem::take(&mut self.add_ons),
            bundled_items: std::mem::take(&mut self.bundled_items),
            composite_components: std::mem::take(&mut self.composite_components),
            custom_fields: std::mem::take(&mut self.custom_fields),
        }
    }

    fn restore_children(&mut self, children: ProductChildren) {
        self.attributes = children.attributes;
        self.default_attributes = children.default_attributes;
        self.images = children.images;
        self.categories = children.categories;
        self.tags = children.tags;
        self.downloads = children.downloads;
        self.add_ons = children.add_ons;
        self.bundled_items = children.bundled_items;
        self.composite_components = children.composite_components;
        self.custom_fields = children.custom_fields;
    }
}

struct ProductChildren {
    attributes: Vec<Child<ProductAttribute>>,
    default_attributes: Vec<Child<ProductDefaultAttribute>>,
    images: Vec<Child<ProductImage>>,
    categories: Vec<Child<ProductCategory>>,
    tags: Vec<Child<ProductTag>>,
    downloads: Vec<Child<ProductDownload>>,
    add_ons: Vec<Child<ProductAddOn>>,
    bundled_items: Vec<Child<ProductBundleItem>>,
    composite_components: Vec<Child<ProductCompositeComponent>>,
    custom_fields: Vec<Child<MetaData>>,
}

impl StorageRecord for StoredProduct {
    type Key = ProductKey;

    const KIND: RecordKind = RecordKind::Product;

    fn key(&self) -> ProductKey {
        ProductKey::new(self.site_id, self.product_id)
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn site_id(&self) -> i64 {
        self.site_id
    }

    table_accessors!(products);
}
