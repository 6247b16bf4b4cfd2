//! Order list export as CSV

use crate::core::error::{StorefrontError, StorefrontResult};
use crate::entities::order::Order;
use csv::Writer;
use serde::Serialize;

/// One CSV row; field order is column order
#[derive(Debug, Serialize)]
struct OrderRow {
    #[serde(rename = "Order ID")]
    id: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "Customer")]
    customer: String,
    #[serde(rename = "Phone")]
    phone: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Items")]
    items: u32,
    #[serde(rename = "Subtotal")]
    subtotal: String,
    #[serde(rename = "Discount")]
    discount: String,
    #[serde(rename = "Shipping")]
    shipping: String,
    #[serde(rename = "Total")]
    total: String,
    #[serde(rename = "Payment")]
    payment: &'static str,
}

impl OrderRow {
    fn from_order(order: &Order) -> Self {
        Self {
            id: harden(&order.id),
            date: order.created_at.format("%Y-%m-%d %H:%M").to_string(),
            status: order.status.as_str(),
            customer: harden(&order.customer.name),
            phone: harden(&order.customer.phone),
            city: harden(&order.customer.city),
            items: order.item_count(),
            subtotal: order.subtotal().to_string(),
            discount: order.discount().to_string(),
            shipping: order.shipping_fee.to_string(),
            total: order.total().to_string(),
            payment: order.payment.label(),
        }
    }
}

/// Render orders as CSV with a header row
///
/// Amounts are plain numbers so spreadsheets can sum them. An empty slice
/// still produces the header.
pub fn orders_csv(orders: &[Order]) -> StorefrontResult<String> {
    let mut wtr = Writer::from_writer(vec![]);
    if orders.is_empty() {
        wtr.write_record(HEADERS).map_err(csv_error)?;
    }
    for order in orders {
        wtr.serialize(OrderRow::from_order(order)).map_err(csv_error)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| StorefrontError::Internal(format!("Failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| StorefrontError::Internal(format!("CSV is not UTF-8: {}", e)))
}

const HEADERS: [&str; 12] = [
    "Order ID", "Date", "Status", "Customer", "Phone", "City", "Items", "Subtotal", "Discount",
    "Shipping", "Total", "Payment",
];

/// Keep spreadsheet apps from evaluating user text as a formula
fn harden(value: &str) -> String {
    match value.trim_start().chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{}", value),
        _ => value.to_string(),
    }
}

fn csv_error(err: csv::Error) -> StorefrontError {
    StorefrontError::Internal(format!("Failed to write CSV: {}", err))
}
