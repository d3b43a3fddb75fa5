//! Plain text message builders.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use honor_culture_core::Order;

use crate::services::contact::ContactForm;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Message announcing a newly placed order.
///
/// Payment data is limited to what the order stores (holder name and last
/// four digits), and neither is included.
#[must_use]
pub fn order_placed(order: &Order) -> String {
    let ship = &order.shipping_info;
    let mut text = String::new();

    let _ = writeln!(text, "🛒 NEW ORDER RECEIVED");
    let _ = writeln!(text);
    let _ = writeln!(text, "Order ID: {}", order.id);
    let _ = writeln!(text, "Customer: {}", ship.full_name);
    let _ = writeln!(text, "Email: {}", ship.email);
    let _ = writeln!(text, "Phone: {}", ship.phone);
    let _ = writeln!(text);
    let _ = writeln!(text, "Shipping Address:");
    let _ = writeln!(text, "{}", ship.street_address);
    let _ = writeln!(text, "{}, {} {}", ship.city, ship.state, ship.postal_code);
    let _ = writeln!(text, "{}", ship.country);
    let _ = writeln!(text);
    let _ = writeln!(text, "Items ({}):", order.items.len());
    for item in &order.items {
        let _ = writeln!(
            text,
            "• {} x{} - ${:.2}",
            item.name,
            item.quantity,
            item.line_total()
        );
    }
    let _ = writeln!(text);
    let _ = writeln!(text, "Total: ${:.2}", order.total);
    let _ = write!(text, "{}", order.created_at.format(TIMESTAMP_FORMAT));

    text
}

/// Message relaying a contact form submission.
#[must_use]
pub fn contact_form(form: &ContactForm, submitted_at: DateTime<Utc>) -> String {
    let mut text = String::new();

    let _ = writeln!(text, "🆕 New form submission");
    let _ = writeln!(text);
    let _ = writeln!(text, "Full Name: {}", form.full_name);
    let _ = writeln!(text, "Email: {}", form.email);
    if let Some(message) = &form.message {
        let _ = writeln!(text);
        let _ = writeln!(text, "Message: {message}");
    }
    let _ = writeln!(text);
    let _ = write!(text, "Submitted: {}", submitted_at.format(TIMESTAMP_FORMAT));

    text
}

/// Message sent by the manual smoke test.
#[must_use]
pub fn smoke_test(now: DateTime<Utc>) -> String {
    format!("Telegram test: {}", now.format(TIMESTAMP_FORMAT))
}
