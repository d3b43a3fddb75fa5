//! Catalog service: products and categories.
//!
//! Every mutation runs in a single store write together with its audit
//! entry. Deletes are idempotent: removing an id that does not exist still
//! succeeds and is still audited.

use honor_culture_core::types::lenient;
use honor_culture_core::{
    AuditAction, Category, CategoryId, Product, ProductId, ProductImage, ProductVariant,
    normalize_images,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};

use crate::error::{AppError, Result};
use crate::services::audit;
use crate::store::{DocumentStore, unique_id};

/// Image used when a product is created without any.
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1556906781-9a412961c28c?w=800&q=80";

/// Inventory assigned when a product is created without a count.
pub const DEFAULT_INVENTORY: u32 = 50;

/// Category value meaning "no category filter".
const ALL_CATEGORIES: &str = "All";

// =============================================================================
// Inputs
// =============================================================================

/// Product list filter. Price bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ProductFilter {
    /// Whether `product` passes every set criterion.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
            .is_none_or(|c| product.category == c);

        category_ok
            && self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
    }
}

/// Product fields accepted on create and update.
///
/// On update, `name`, `category` and `price` ignore empty or zero values;
/// list fields overwrite when present; `description` and `inventory`
/// overwrite whenever present, so they can be cleared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        deserialize_with = "lenient::opt_f64_or_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ProductImage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        deserialize_with = "lenient::opt_u32_or_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub inventory: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<ProductVariant>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ProductInput {
    fn check_price(&self) -> Result<()> {
        match self.price {
            Some(price) if price < 0.0 => Err(AppError::BadRequest(
                "Price must be a non-negative number".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Merge into `product`, returning the names of the fields written.
    pub fn apply(&self, product: &mut Product) -> Vec<&'static str> {
        let mut changed = Vec::new();

        if let Some(name) = non_blank(self.name.as_deref()) {
            product.name = name.to_string();
            changed.push("name");
        }
        if let Some(category) = non_blank(self.category.as_deref()) {
            product.category = category.to_string();
            changed.push("category");
        }
        if let Some(price) = self.price.filter(|p| *p != 0.0) {
            product.price = price;
            changed.push("price");
        }
        if let Some(colors) = &self.colors {
            product.colors.clone_from(colors);
            changed.push("colors");
        }
        if let Some(sizes) = &self.sizes {
            product.sizes.clone_from(sizes);
            changed.push("sizes");
        }
        if let Some(images) = &self.images {
            product.images = normalize_images(images.clone());
            changed.push("images");
        }
        if let Some(description) = &self.description {
            product.description.clone_from(description);
            changed.push("description");
        }
        if let Some(inventory) = self.inventory {
            product.inventory = inventory;
            changed.push("inventory");
        }
        if let Some(variants) = &self.variants {
            product.variants.clone_from(variants);
            changed.push("variants");
        }
        if let Some(tags) = &self.tags {
            product.tags.clone_from(tags);
            changed.push("tags");
        }

        changed
    }
}

/// Category fields accepted on create and update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub subcategories: Option<Vec<String>>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Service
// =============================================================================

/// Catalog service.
pub struct CatalogService<'a> {
    store: &'a DocumentStore,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    /// Products passing `filter`, in document order.
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: &ProductFilter) -> Vec<Product> {
        self.store
            .read(|doc| {
                doc.products
                    .iter()
                    .filter(|p| filter.matches(p))
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no product has `id`.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product> {
        self.store
            .read(|doc| doc.products.iter().find(|p| &p.id == id).cloned())
            .await
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    /// Create a product, filling defaults for absent fields.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if `name` or `price` is missing or the
    /// price is negative, or `AppError::Store` if persisting fails.
    #[instrument(skip(self, input), fields(admin_id = %actor))]
    pub async fn create_product(&self, input: ProductInput, actor: &str) -> Result<Product> {
        let name = non_blank(input.name.as_deref())
            .ok_or_else(|| AppError::BadRequest("Product name is required".to_string()))?
            .to_string();
        input.check_price()?;
        let price = input
            .price
            .ok_or_else(|| AppError::BadRequest("Price is required".to_string()))?;

        let images = input
            .images
            .map(normalize_images)
            .filter(|images| !images.is_empty())
            .unwrap_or_else(default_images);

        let product = self
            .store
            .write(|doc| {
                let id = unique_id("p", |candidate| {
                    doc.products.iter().any(|p| p.id.as_str() == candidate)
                });
                let product = Product {
                    id: ProductId::new(id),
                    name,
                    category: input.category.unwrap_or_default().trim().to_string(),
                    price,
                    colors: input.colors.unwrap_or_else(|| vec!["Black".to_string()]),
                    sizes: input.sizes.unwrap_or_else(|| vec!["M".to_string()]),
                    images,
                    description: input.description.unwrap_or_default(),
                    inventory: input.inventory.unwrap_or(DEFAULT_INVENTORY),
                    variants: input.variants.unwrap_or_default(),
                    tags: input.tags.unwrap_or_default(),
                };

                doc.products.push(product.clone());
                audit::append(
                    doc,
                    actor,
                    AuditAction::AddProduct,
                    json!({ "productId": product.id, "productName": product.name }),
                );
                Ok::<_, AppError>(product)
            })
            .await?;

        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Merge `input` into an existing product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no product has `id`,
    /// `AppError::BadRequest` for a negative price, or `AppError::Store` if
    /// persisting fails.
    #[instrument(skip(self, input), fields(product_id = %id, admin_id = %actor))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        input: &ProductInput,
        actor: &str,
    ) -> Result<Product> {
        input.check_price()?;

        self.store
            .write(|doc| {
                let product = doc
                    .products
                    .iter_mut()
                    .find(|p| &p.id == id)
                    .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

                let fields = input.apply(product);
                let updated = product.clone();

                audit::append(
                    doc,
                    actor,
                    AuditAction::UpdateProduct,
                    json!({ "productId": id, "productName": updated.name, "fields": fields }),
                );
                Ok(updated)
            })
            .await
    }

    /// Remove a product. Succeeds even if `id` does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if persisting fails.
    #[instrument(skip(self), fields(product_id = %id, admin_id = %actor))]
    pub async fn delete_product(&self, id: &ProductId, actor: &str) -> Result<()> {
        self.store
            .write(|doc| {
                let name = doc
                    .products
                    .iter()
                    .find(|p| &p.id == id)
                    .map(|p| p.name.clone());
                doc.products.retain(|p| &p.id != id);

                audit::append(
                    doc,
                    actor,
                    AuditAction::DeleteProduct,
                    json!({ "productId": id, "productName": name }),
                );
                Ok(())
            })
            .await
    }

    /// Remove every product in `ids`, returning how many existed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if persisting fails.
    #[instrument(skip(self, ids), fields(count = ids.len(), admin_id = %actor))]
    pub async fn bulk_delete(&self, ids: &[ProductId], actor: &str) -> Result<usize> {
        self.store
            .write(|doc| {
                let before = doc.products.len();
                doc.products.retain(|p| !ids.contains(&p.id));
                let deleted = before - doc.products.len();

                audit::append(
                    doc,
                    actor,
                    AuditAction::BulkDeleteProducts,
                    json!({ "count": ids.len(), "productIds": ids }),
                );
                Ok(deleted)
            })
            .await
    }

    /// Merge `updates` into every product in `ids`, returning how many matched.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for a negative price, or
    /// `AppError::Store` if persisting fails.
    #[instrument(skip(self, ids, updates), fields(count = ids.len(), admin_id = %actor))]
    pub async fn bulk_update(
        &self,
        ids: &[ProductId],
        updates: &ProductInput,
        actor: &str,
    ) -> Result<usize> {
        updates.check_price()?;

        self.store
            .write(|doc| {
                let mut updated = 0;
                for product in doc.products.iter_mut().filter(|p| ids.contains(&p.id)) {
                    updates.apply(product);
                    updated += 1;
                }

                audit::append(
                    doc,
                    actor,
                    AuditAction::BulkUpdateProducts,
                    json!({ "count": updated, "productIds": ids, "updates": updates }),
                );
                Ok(updated)
            })
            .await
    }

    // -------------------------------------------------------------------------
    // Categories
    // -------------------------------------------------------------------------

    /// All categories, in document order.
    pub async fn list_categories(&self) -> Vec<Category> {
        self.store.read(|doc| doc.categories.clone()).await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if `name` is missing, or
    /// `AppError::Store` if persisting fails.
    #[instrument(skip(self, input), fields(admin_id = %actor))]
    pub async fn create_category(&self, input: CategoryInput, actor: &str) -> Result<Category> {
        let name = non_blank(input.name.as_deref())
            .ok_or_else(|| AppError::BadRequest("Category name is required".to_string()))?
            .to_string();

        self.store
            .write(|doc| {
                let id = unique_id("cat", |candidate| {
                    doc.categories.iter().any(|c| c.id.as_str() == candidate)
                });
                let category = Category {
                    id: CategoryId::new(id),
                    name,
                    description: input.description.unwrap_or_default(),
                    subcategories: input.subcategories.unwrap_or_default(),
                };

                doc.categories.push(category.clone());
                audit::append(
                    doc,
                    actor,
                    AuditAction::AddCategory,
                    json!({ "categoryId": category.id, "categoryName": category.name }),
                );
                Ok(category)
            })
            .await
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no category has `id`, or
    /// `AppError::Store` if persisting fails.
    #[instrument(skip(self, input), fields(category_id = %id, admin_id = %actor))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        input: CategoryInput,
        actor: &str,
    ) -> Result<Category> {
        self.store
            .write(|doc| {
                let category = doc
                    .categories
                    .iter_mut()
                    .find(|c| &c.id == id)
                    .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

                if let Some(name) = non_blank(input.name.as_deref()) {
                    category.name = name.to_string();
                }
                if let Some(description) = input.description {
                    category.description = description;
                }
                if let Some(subcategories) = input.subcategories {
                    category.subcategories = subcategories;
                }
                let updated = category.clone();

                audit::append(
                    doc,
                    actor,
                    AuditAction::UpdateCategory,
                    json!({ "categoryId": id, "categoryName": updated.name }),
                );
                Ok(updated)
            })
            .await
    }

    /// Remove a category. Products naming it are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if persisting fails.
    #[instrument(skip(self), fields(category_id = %id, admin_id = %actor))]
    pub async fn delete_category(&self, id: &CategoryId, actor: &str) -> Result<()> {
        self.store
            .write(|doc| {
                doc.categories.retain(|c| &c.id != id);
                audit::append(
                    doc,
                    actor,
                    AuditAction::DeleteCategory,
                    json!({ "categoryId": id }),
                );
                Ok(())
            })
            .await
    }
}

fn default_images() -> Vec<ProductImage> {
    normalize_images(vec![ProductImage {
        id: honor_culture_core::ImageId::new(""),
        url: DEFAULT_IMAGE_URL.to_string(),
        order: 0,
        variant: String::new(),
    }])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use honor_culture_core::Document;

    fn product(id: &str, category: &str, price: f64) -> Product {
        serde_json::from_value(json!({
            "id": id, "name": id, "category": category, "price": price, "inventory": 5
        }))
        .unwrap()
    }

    fn store_with(products: Vec<Product>) -> DocumentStore {
        let path = std::env::temp_dir().join(format!("honor-catalog-{}.json", uuid::Uuid::new_v4()));
        DocumentStore::from_document(
            path,
            Document {
                products,
                ..Document::default()
            },
        )
    }

    fn input(value: serde_json::Value) -> ProductInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_filter_category_and_price_bounds() {
        let filter = ProductFilter {
            category: Some("Men's".to_string()),
            min_price: Some(40.0),
            max_price: Some(60.0),
        };
        assert!(filter.matches(&product("a", "Men's", 40.0)));
        assert!(filter.matches(&product("b", "Men's", 60.0)));
        assert!(!filter.matches(&product("c", "Men's", 79.99)));
        assert!(!filter.matches(&product("d", "Women's", 50.0)));

        let all = ProductFilter {
            category: Some("All".to_string()),
            ..ProductFilter::default()
        };
        assert!(all.matches(&product("e", "Accessories", 1.0)));
    }

    #[test]
    fn test_apply_ignores_empty_name_and_zero_price() {
        let mut p = product("p1", "Men's", 49.99);
        let changed = input(json!({ "name": "", "price": 0, "category": "  " })).apply(&mut p);
        assert!(changed.is_empty());
        assert_eq!(p.name, "p1");
        assert!((p.price - 49.99).abs() < f64::EPSILON);
    }

    #[test]
    fn test_apply_allows_clearing_description_and_inventory() {
        let mut p = product("p1", "Men's", 49.99);
        p.description = "Soft".to_string();
        let changed = input(json!({ "description": "", "inventory": 0 })).apply(&mut p);
        assert_eq!(changed, vec!["description", "inventory"]);
        assert_eq!(p.description, "");
        assert_eq!(p.inventory, 0);
    }

    #[tokio::test]
    async fn test_create_product_defaults_and_string_price() {
        let store = store_with(vec![]);
        let catalog = CatalogService::new(&store);

        let created = catalog
            .create_product(input(json!({ "name": "Tank", "price": "29.50" })), "admin1")
            .await
            .unwrap();

        assert!(created.id.as_str().starts_with('p'));
        assert!((created.price - 29.5).abs() < f64::EPSILON);
        assert_eq!(created.colors, vec!["Black"]);
        assert_eq!(created.sizes, vec!["M"]);
        assert_eq!(created.inventory, DEFAULT_INVENTORY);
        assert_eq!(created.images.len(), 1);
        assert_eq!(created.images[0].variant, "front");

        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn test_create_product_keeps_explicit_zero_inventory() {
        let store = store_with(vec![]);
        let catalog = CatalogService::new(&store);

        let created = catalog
            .create_product(
                input(json!({ "name": "Tank", "price": 10, "inventory": 0 })),
                "admin1",
            )
            .await
            .unwrap();
        assert_eq!(created.inventory, 0);

        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn test_create_product_validation() {
        let store = store_with(vec![]);
        let catalog = CatalogService::new(&store);

        let missing_name = catalog
            .create_product(input(json!({ "price": 10 })), "admin1")
            .await;
        assert!(matches!(missing_name, Err(AppError::BadRequest(_))));

        let negative = catalog
            .create_product(input(json!({ "name": "X", "price": -1 })), "admin1")
            .await;
        assert!(matches!(negative, Err(AppError::BadRequest(_))));

        assert!(store.read(|d| d.products.is_empty()).await);
    }

    #[tokio::test]
    async fn test_created_ids_are_unique() {
        let store = store_with(vec![]);
        let catalog = CatalogService::new(&store);

        for _ in 0..5 {
            catalog
                .create_product(input(json!({ "name": "X", "price": 1 })), "admin1")
                .await
                .unwrap();
        }

        let mut ids: Vec<String> = store
            .read(|d| d.products.iter().map(|p| p.id.to_string()).collect())
            .await;
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);

        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let store = store_with(vec![]);
        let catalog = CatalogService::new(&store);

        let result = catalog
            .update_product(&ProductId::new("nope"), &input(json!({ "name": "X" })), "admin1")
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(store.read(|d| d.audit_log.is_empty()).await);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_audited() {
        let store = store_with(vec![product("p1", "Men's", 10.0)]);
        let catalog = CatalogService::new(&store);

        catalog
            .delete_product(&ProductId::new("ghost"), "admin1")
            .await
            .unwrap();

        let entry = store.read(|d| d.audit_log[0].clone()).await;
        assert_eq!(entry.action, AuditAction::DeleteProduct);
        assert_eq!(entry.details["productName"], serde_json::Value::Null);
        assert_eq!(store.read(|d| d.products.len()).await, 1);

        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn test_bulk_operations_count_existing_only() {
        let store = store_with(vec![
            product("p1", "Men's", 10.0),
            product("p2", "Men's", 20.0),
            product("p3", "Women's", 30.0),
        ]);
        let catalog = CatalogService::new(&store);

        let updated = catalog
            .bulk_update(
                &[ProductId::new("p1"), ProductId::new("p9")],
                &input(json!({ "category": "Sale", "inventory": "3" })),
                "admin1",
            )
            .await
            .unwrap();
        assert_eq!(updated, 1);
        let p1 = catalog.get_product(&ProductId::new("p1")).await.unwrap();
        assert_eq!(p1.category, "Sale");
        assert_eq!(p1.inventory, 3);

        let deleted = catalog
            .bulk_delete(
                &[ProductId::new("p2"), ProductId::new("p3"), ProductId::new("p9")],
                "admin1",
            )
            .await
            .unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.read(|d| d.products.len()).await, 1);

        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn test_category_crud() {
        let store = store_with(vec![product("p1", "Men's", 10.0)]);
        let catalog = CatalogService::new(&store);

        let created = catalog
            .create_category(
                serde_json::from_value(json!({ "name": "Men's" })).unwrap(),
                "admin1",
            )
            .await
            .unwrap();
        assert!(created.id.as_str().starts_with("cat"));
        assert!(created.subcategories.is_empty());

        let updated = catalog
            .update_category(
                &created.id,
                serde_json::from_value(json!({ "name": "", "description": "Tops", "subcategories": ["Tees"] }))
                    .unwrap(),
                "admin1",
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Men's");
        assert_eq!(updated.description, "Tops");
        assert_eq!(updated.subcategories, vec!["Tees"]);

        catalog.delete_category(&created.id, "admin1").await.unwrap();
        assert!(catalog.list_categories().await.is_empty());
        // Products referencing the category are untouched
        assert_eq!(store.read(|d| d.products.len()).await, 1);

        let _ = std::fs::remove_file(store.path());
    }
}
