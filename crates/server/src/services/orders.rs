//! Order service: checkout, order management and inventory alerts.

use chrono::Utc;
use honor_culture_core::types::lenient;
use honor_culture_core::{
    AuditAction, Order, OrderId, OrderItem, OrderStatus, PaymentSummary, Product, ProductId,
    SYSTEM_ACTOR, ShippingInfo,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::error::{AppError, Result};
use crate::services::audit;
use crate::services::notifications::{NotificationDispatcher, messages};
use crate::store::{DocumentStore, unique_id};

// =============================================================================
// Inputs
// =============================================================================

/// Checkout submission.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderRequest {
    pub items: Vec<CartLine>,
    pub shipping_info: ShippingInfo,
    pub payment_info: Option<PaymentInput>,
    #[serde(deserialize_with = "lenient::opt_f64_or_string")]
    pub total: Option<f64>,
}

/// One cart line as the storefront sends it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::f64_or_string")]
    pub price: f64,
    #[serde(default = "one", deserialize_with = "lenient::u32_or_string")]
    pub quantity: u32,
    #[serde(default)]
    pub variant: Option<Value>,
    #[serde(default)]
    pub images: Vec<Value>,
    #[serde(default)]
    pub image: Option<String>,
}

const fn one() -> u32 {
    1
}

impl CartLine {
    /// First image URL: `images[0]` (a URL or `{url}` object), then `image`.
    fn image_url(&self) -> String {
        let from_images = self.images.first().and_then(|first| match first {
            Value::String(url) => Some(url.clone()),
            Value::Object(obj) => obj.get("url").and_then(Value::as_str).map(str::to_string),
            _ => None,
        });

        from_images
            .or_else(|| self.image.clone())
            .unwrap_or_default()
    }

    fn snapshot(&self) -> OrderItem {
        OrderItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            quantity: self.quantity,
            variant: self.variant.clone().unwrap_or_else(|| json!({})),
            image: self.image_url(),
        }
    }
}

/// Payment fields read from a checkout submission.
///
/// Only the holder name and card number are read; the number is reduced to
/// its last four digits before anything is stored.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentInput {
    pub card_holder_name: Option<String>,
    pub card_number: Option<String>,
}

impl std::fmt::Debug for PaymentInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentInput")
            .field("card_holder_name", &self.card_holder_name)
            .field("card_number", &"[REDACTED]")
            .finish()
    }
}

/// Back-office order update.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderUpdate {
    pub status: Option<String>,
}

// =============================================================================
// Outputs
// =============================================================================

/// A product in an inventory alert, with its summed variant stock.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    #[serde(flatten)]
    pub product: Product,
    pub variant_stock: u64,
}

impl From<&Product> for StockAlert {
    fn from(product: &Product) -> Self {
        Self {
            product: product.clone(),
            variant_stock: product.variant_stock(),
        }
    }
}

/// Low-stock and out-of-stock views.
///
/// `total` counts both lists, so an out-of-stock product is counted twice.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAlerts {
    pub low_stock: Vec<StockAlert>,
    pub out_of_stock: Vec<StockAlert>,
    pub total: usize,
}

// =============================================================================
// Service
// =============================================================================

/// Order service.
pub struct OrderService<'a> {
    store: &'a DocumentStore,
    notifications: &'a NotificationDispatcher,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(store: &'a DocumentStore, notifications: &'a NotificationDispatcher) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Validate and store a checkout submission.
    ///
    /// Line items are copied, so later catalog edits never reach the order.
    /// A notification is dispatched in the background.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Rejected` for an empty cart or missing shipping
    /// fields, or `AppError::Store` if persisting fails.
    #[instrument(skip_all, fields(items = request.items.len()))]
    pub async fn place_order(&self, request: OrderRequest) -> Result<Order> {
        if request.items.is_empty() {
            return Err(AppError::Rejected("No items in order".to_string()));
        }

        let missing = request.shipping_info.missing_fields();
        if !missing.is_empty() {
            tracing::debug!(?missing, "Order rejected");
            return Err(AppError::Rejected(
                "Missing shipping information".to_string(),
            ));
        }

        let items: Vec<OrderItem> = request.items.iter().map(CartLine::snapshot).collect();
        let total = request
            .total
            .unwrap_or_else(|| items.iter().map(OrderItem::line_total).sum());
        let payment = request.payment_info.unwrap_or_default();
        let payment_info = PaymentSummary::redact(
            payment.card_holder_name.as_deref(),
            payment.card_number.as_deref(),
        );
        let shipping_info = request.shipping_info;

        let order = self
            .store
            .write(|doc| {
                let id = OrderId::new(unique_id("ORD-", |candidate| {
                    doc.orders.iter().any(|o| o.id.as_str() == candidate)
                }));
                let now = Utc::now();
                let order = Order {
                    order_number: id.clone(),
                    id,
                    items,
                    shipping_info,
                    payment_info,
                    total,
                    status: OrderStatus::Pending,
                    date: now,
                    created_at: now,
                    updated_at: None,
                };

                doc.orders.push(order.clone());
                audit::append(
                    doc,
                    SYSTEM_ACTOR,
                    AuditAction::OrderCreated,
                    json!({
                        "orderId": order.id,
                        "customerEmail": order.shipping_info.email,
                        "total": order.total,
                    }),
                );
                Ok::<_, AppError>(order)
            })
            .await?;

        info!(order_id = %order.id, total = order.total, "Order placed");
        self.notifications
            .dispatch("order_placed", messages::order_placed(&order));

        Ok(order)
    }

    /// All orders, newest first.
    pub async fn list_orders(&self) -> Vec<Order> {
        let mut orders = self.store.read(|doc| doc.orders.clone()).await;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no order has `id`.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order> {
        self.store
            .read(|doc| doc.orders.iter().find(|o| &o.id == id).cloned())
            .await
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }

    /// Change an order's status and stamp `updatedAt`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown status,
    /// `AppError::NotFound` if no order has `id`, or `AppError::Store` if
    /// persisting fails.
    #[instrument(skip(self, update), fields(order_id = %id, admin_id = %actor))]
    pub async fn update_order(
        &self,
        id: &OrderId,
        update: OrderUpdate,
        actor: &str,
    ) -> Result<Order> {
        let status = update
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<OrderStatus>)
            .transpose()
            .map_err(AppError::BadRequest)?;

        self.store
            .write(|doc| {
                let order = doc
                    .orders
                    .iter_mut()
                    .find(|o| &o.id == id)
                    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

                if let Some(status) = status {
                    order.status = status;
                }
                order.updated_at = Some(Utc::now());
                let updated = order.clone();

                audit::append(
                    doc,
                    actor,
                    AuditAction::UpdateOrder,
                    json!({ "orderId": id, "status": status }),
                );
                Ok(updated)
            })
            .await
    }

    /// Products at or below `threshold`, and products with no inventory.
    ///
    /// Recomputed from the product list on every call.
    #[instrument(skip(self))]
    pub async fn inventory_alerts(&self, threshold: u32) -> InventoryAlerts {
        self.store
            .read(|doc| {
                let low_stock: Vec<StockAlert> = doc
                    .products
                    .iter()
                    .filter(|p| p.inventory <= threshold)
                    .map(StockAlert::from)
                    .collect();
                let out_of_stock: Vec<StockAlert> = doc
                    .products
                    .iter()
                    .filter(|p| p.inventory == 0)
                    .map(StockAlert::from)
                    .collect();
                let total = low_stock.len() + out_of_stock.len();

                InventoryAlerts {
                    low_stock,
                    out_of_stock,
                    total,
                }
            })
            .await
    }
}
