//! Printable HTML invoice for one order

use crate::config::StorefrontConfig;
use crate::core::error::{StorefrontError, StorefrontResult};
use crate::entities::order::{Customer, Order, Payment};
use crate::pricing::money::format_amount;
use serde::Serialize;
use tera::{Context, Tera};

const INVOICE_TEMPLATE: &str = include_str!("templates/invoice.html");

#[derive(Serialize)]
struct InvoiceView<'a> {
    store_name: &'a str,
    order_id: &'a str,
    date: String,
    status: &'static str,
    customer: &'a Customer,
    payment: PaymentView<'a>,
    lines: Vec<LineView<'a>>,
    subtotal: String,
    discount: Option<String>,
    coupon_code: Option<&'a str>,
    shipping: String,
    total: String,
    note: Option<&'a str>,
}

#[derive(Serialize)]
struct PaymentView<'a> {
    method: &'static str,
    bank_name: Option<&'a str>,
    account_title: Option<&'a str>,
    account_number: Option<&'a str>,
    transaction_ref: Option<&'a str>,
}

#[derive(Serialize)]
struct LineView<'a> {
    name: &'a str,
    quantity: u32,
    unit_price: String,
    total: String,
}

/// File name offered for the downloaded invoice
pub fn invoice_file_name(order: &Order) -> String {
    format!("invoice-{}.html", order.id)
}

/// Render a standalone HTML invoice
///
/// All order text is HTML-escaped. An order without items renders with an
/// empty item table.
pub fn render_invoice(order: &Order, config: &StorefrontConfig) -> StorefrontResult<String> {
    let money = |amount| format_amount(amount, &config.currency_label);
    let discount = order.discount();

    let view = InvoiceView {
        store_name: &config.store_name,
        order_id: &order.id,
        date: order.created_at.format("%d %b %Y").to_string(),
        status: order.status.label(),
        customer: &order.customer,
        payment: payment_view(&order.payment),
        lines: order
            .items
            .iter()
            .map(|item| LineView {
                name: &item.name,
                quantity: item.quantity,
                unit_price: money(item.unit_price),
                total: money(item.line_total()),
            })
            .collect(),
        subtotal: money(order.subtotal()),
        discount: (!discount.is_zero()).then(|| money(discount)),
        coupon_code: order.coupon.as_ref().map(|c| c.code.as_str()),
        shipping: money(order.shipping_fee),
        total: money(order.total()),
        note: order.note.as_deref(),
    };

    let context = Context::from_serialize(&view).map_err(render_error)?;
    let html = Tera::one_off(INVOICE_TEMPLATE, &context, true).map_err(render_error)?;
    tracing::debug!(order_id = %order.id, bytes = html.len(), "Invoice rendered");
    Ok(html)
}

fn payment_view(payment: &Payment) -> PaymentView<'_> {
    match payment {
        Payment::CashOnDelivery => PaymentView {
            method: payment.label(),
            bank_name: None,
            account_title: None,
            account_number: None,
            transaction_ref: None,
        },
        Payment::BankTransfer {
            bank_name,
            account_title,
            account_number,
            transaction_ref,
            ..
        } => PaymentView {
            method: payment.label(),
            bank_name: Some(bank_name),
            account_title: Some(account_title),
            account_number: Some(account_number),
            transaction_ref: transaction_ref.as_deref(),
        },
    }
}

fn render_error(err: tera::Error) -> StorefrontError {
    StorefrontError::Internal(format!("Failed to render invoice: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::order::{AppliedCoupon, LineItem};
    use rust_decimal::Decimal;

    fn order() -> Order {
        Order::new(
            "ORD-1712000000000",
            Customer {
                name: "Ali <script>".to_string(),
                phone: "0300-1234567".to_string(),
                address: "House 12, Street 4".to_string(),
                city: "Lahore".to_string(),
            },
            vec![LineItem::new("p1", "Lawn Suit", 3, Decimal::from(3_500))],
            Payment::CashOnDelivery,
        )
        .unwrap()
        .with_coupon(Some(AppliedCoupon {
            code: "SAVE10".to_string(),
            label: "10% off".to_string(),
            discount: Decimal::from(1_050),
        }))
        .with_shipping_fee(Decimal::from(250))
    }

    #[test]
    fn test_invoice_contains_totals() {
        let html = render_invoice(&order(), &StorefrontConfig::default()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("ORD-1712000000000"));
        assert!(html.contains("Rs. 10,500"));
        assert!(html.contains("-Rs. 1,050"));
        assert!(html.contains("SAVE10"));
        assert!(html.contains("Rs. 9,700"));
        assert!(html.contains("Cash on Delivery"));
    }

    #[test]
    fn test_invoice_escapes_customer_text() {
        let html = render_invoice(&order(), &StorefrontConfig::default()).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("Ali &lt;script&gt;"));
    }

    #[test]
    fn test_invoice_uses_currency_label_and_bank_details() {
        let config = StorefrontConfig {
            currency_label: "PKR".to_string(),
            ..StorefrontConfig::default()
        };
        let mut order = order();
        order.payment = Payment::BankTransfer {
            bank_name: config.bank.bank_name.clone(),
            account_title: config.bank.account_title.clone(),
            account_number: config.bank.account_number.clone(),
            transaction_ref: Some("TX-99".to_string()),
            proof_image: None,
        };
        let html = render_invoice(&order, &config).unwrap();
        assert!(html.contains("PKR 9,700"));
        assert!(html.contains("Bank Transfer"));
        assert!(html.contains("TX-99"));
        assert!(html.contains(&config.bank.bank_name));
    }

    #[test]
    fn test_invoice_without_items() {
        let mut order = order();
        order.items.clear();
        order.coupon = None;
        let html = render_invoice(&order, &StorefrontConfig::default()).unwrap();
        assert!(html.contains("<tbody>"));
        assert!(!html.contains("Lawn Suit"));
        assert!(!html.contains("Discount"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(invoice_file_name(&order()), "invoice-ORD-1712000000000.html");
    }
}
