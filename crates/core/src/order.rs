//! Orders placed through the storefront checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderStatus, ProductId};

/// A placed order.
///
/// `items` are copies taken at checkout time. Later catalog edits or
/// deletions never reach a stored order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Same value as `id`; kept for the invoice renderer.
    pub order_number: OrderId,
    pub items: Vec<OrderItem>,
    pub shipping_info: ShippingInfo,
    pub payment_info: PaymentSummary,
    pub total: f64,
    #[serde(default)]
    pub status: OrderStatus,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A frozen cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    /// Whatever variant selection the cart carried (`{}` when none).
    #[serde(default)]
    pub variant: serde_json::Value,
    #[serde(default)]
    pub image: String,
}

impl OrderItem {
    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Shipping and contact details captured at checkout.
///
/// Absent fields deserialize as empty strings so that
/// [`ShippingInfo::missing_fields`] can report them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShippingInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub street_address: String,
    pub postal_code: String,
}

impl ShippingInfo {
    /// Names of required fields that are blank, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("country", &self.country),
            ("state", &self.state),
            ("city", &self.city),
            ("streetAddress", &self.street_address),
            ("postalCode", &self.postal_code),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// The only payment data an order keeps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub card_holder_name: String,
    pub last_four_digits: String,
}

impl PaymentSummary {
    /// Placeholder used when no card number was supplied.
    pub const MASKED: &'static str = "****";

    /// Reduce a raw card number to its last four digits.
    ///
    /// Non-digit characters are ignored. Fewer than four digits yields the
    /// masked placeholder rather than a partial number.
    #[must_use]
    pub fn redact(card_holder_name: Option<&str>, card_number: Option<&str>) -> Self {
        let digits: Vec<char> = card_number
            .unwrap_or_default()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();

        let last_four_digits = digits
            .len()
            .checked_sub(4)
            .and_then(|start| digits.get(start..))
            .map_or_else(|| Self::MASKED.to_owned(), |tail| tail.iter().collect());

        Self {
            card_holder_name: card_holder_name.unwrap_or_default().trim().to_owned(),
            last_four_digits,
        }
    }
}
