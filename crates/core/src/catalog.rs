//! Catalog entities: products, their images and variants, and categories.
//!
//! `Product::category` names a [`Category`] by convention only. Nothing keeps
//! the two in sync, and deleting a category leaves its products untouched.

use serde::{Deserialize, Serialize};

use crate::types::lenient;
use crate::types::{CategoryId, ImageId, ProductId, VariantId};

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(deserialize_with = "lenient::f64_or_string")]
    pub price: f64,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub description: String,
    /// Authoritative sellable count. Not derived from `variants`.
    #[serde(default, deserialize_with = "lenient::u32_or_string")]
    pub inventory: u32,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Product {
    /// Sum of the per-variant stock figures.
    ///
    /// Informational only; compare with `inventory` to spot drift.
    #[must_use]
    pub fn variant_stock(&self) -> u64 {
        self.variants.iter().map(|v| u64::from(v.stock)).sum()
    }

    /// URL of the first image by display order, if any.
    #[must_use]
    pub fn primary_image_url(&self) -> Option<&str> {
        self.images
            .iter()
            .min_by_key(|img| img.order)
            .map(|img| img.url.as_str())
    }
}

/// A product image.
///
/// Accepts either the full object or a bare URL string on input; a bare URL
/// becomes an image with an empty id and order `0`. Callers that store
/// images run [`normalize_images`] to fill those in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ImageRepr")]
pub struct ProductImage {
    pub id: ImageId,
    pub url: String,
    pub order: u32,
    pub variant: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImageRepr {
    Url(String),
    Full {
        #[serde(default, deserialize_with = "lenient::string_or_number")]
        id: String,
        url: String,
        #[serde(default, deserialize_with = "lenient::u32_or_string")]
        order: u32,
        #[serde(default)]
        variant: String,
    },
}

impl From<ImageRepr> for ProductImage {
    fn from(repr: ImageRepr) -> Self {
        match repr {
            ImageRepr::Url(url) => Self {
                id: ImageId::new(""),
                url,
                order: 0,
                variant: String::new(),
            },
            ImageRepr::Full {
                id,
                url,
                order,
                variant,
            } => Self {
                id: ImageId::new(id),
                url,
                order,
                variant,
            },
        }
    }
}

/// Fill in missing image ids and variants and renumber `order` by position.
///
/// Images with a blank URL are dropped.
#[must_use]
pub fn normalize_images(images: Vec<ProductImage>) -> Vec<ProductImage> {
    images
        .into_iter()
        .filter(|img| !img.url.trim().is_empty())
        .enumerate()
        .map(|(position, mut img)| {
            if img.id.as_str().is_empty() {
                img.id = ImageId::new(format!("img{}", position + 1));
            }
            if img.variant.is_empty() {
                img.variant = if position == 0 { "front" } else { "product" }.to_owned();
            }
            img.order = u32::try_from(position).unwrap_or(u32::MAX);
            img
        })
        .collect()
}

/// A purchasable color/size combination of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantId,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default, deserialize_with = "lenient::u32_or_string")]
    pub stock: u32,
    #[serde(deserialize_with = "lenient::f64_or_string")]
    pub price: f64,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_image_accepts_bare_url_and_numeric_id() {
        let images: Vec<ProductImage> = serde_json::from_str(
            r#"["https://cdn/a.jpg", {"id": 1718000000000, "url": "https://cdn/b.jpg", "order": 1, "variant": "back"}]"#,
        )
        .unwrap();

        assert_eq!(images[0].url, "https://cdn/a.jpg");
        assert_eq!(images[0].id.as_str(), "");
        assert_eq!(images[1].id.as_str(), "1718000000000");
        assert_eq!(images[1].variant, "back");
    }

    #[test]
    fn test_normalize_images_fills_gaps_and_drops_blank_urls() {
        let images: Vec<ProductImage> = serde_json::from_str(
            r#"["https://cdn/a.jpg", {"id": "x", "url": "   ", "order": 4}, {"id": "keep", "url": "https://cdn/c.jpg", "order": 9, "variant": "back"}]"#,
        )
        .unwrap();

        let normalized = normalize_images(images);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].id.as_str(), "img1");
        assert_eq!(normalized[0].variant, "front");
        assert_eq!(normalized[0].order, 0);
        assert_eq!(normalized[1].id.as_str(), "keep");
        assert_eq!(normalized[1].variant, "back");
        assert_eq!(normalized[1].order, 1);
    }

    #[test]
    fn test_product_tolerates_missing_optional_fields() {
        let product: Product = serde_json::from_str(
            r#"{"id": "p9", "name": "Tee", "category": "Men's", "price": "19.5"}"#,
        )
        .unwrap();

        assert!((product.price - 19.5).abs() < f64::EPSILON);
        assert_eq!(product.inventory, 0);
        assert!(product.variants.is_empty());
        assert_eq!(product.primary_image_url(), None);
    }

    #[test]
    fn test_variant_stock_is_independent_of_inventory() {
        let product: Product = serde_json::from_str(
            r#"{"id": "p1", "name": "Tee", "price": 10, "inventory": 100,
                "variants": [
                    {"id": "v1", "color": "Black", "size": "S", "sku": "T-S", "stock": 20, "price": 10},
                    {"id": "v2", "color": "Black", "size": "M", "sku": "T-M", "stock": 25, "price": 10}
                ]}"#,
        )
        .unwrap();

        assert_eq!(product.variant_stock(), 45);
        assert_eq!(product.inventory, 100);
    }
}
