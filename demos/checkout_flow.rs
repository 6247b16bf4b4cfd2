//! Walk a shopper through checkout, then run the admin side of the order
//!
//! ```sh
//! RUST_LOG=storefront=debug cargo run --example checkout_flow
//! ```

use rust_decimal::Decimal;
use storefront::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("storefront=info")),
        )
        .init();

    let store = StorefrontBuilder::new()
        .with_config(StorefrontConfig {
            store_name: "Dukaan".to_string(),
            shipping_fee: Decimal::from(200),
            ..StorefrontConfig::default()
        })
        .build()?;

    // Admin stocks the shop
    let admin = store.admin();
    admin.login("admin", "admin123").await?;
    let catalog = store.catalog();
    let suit = catalog
        .add_product(
            Product::new("Lawn Suit", "women", Decimal::from(3_500))
                .with_description("Three-piece printed lawn"),
        )
        .await?;
    catalog
        .add_product(Product::new("Running Shoes", "shoes", Decimal::from(7_800)))
        .await?;
    admin.logout().await?;

    // A second tab follows the cart
    let other_tab = store.open_tab();
    let mut cart_feed = other_tab.watch(Collection::Cart);

    // Shopper fills the cart and applies a coupon
    let cart = store.cart();
    catalog.record_view(&suit).await?;
    cart.add(&suit, 3).await?;
    if let Some(change) = cart_feed.try_recv() {
        println!("other tab saw cart {}", change.event.action());
    }
    println!("subtotal: {}", format_rs(cart.subtotal().await));

    for code in ["BIGSALE", "EID25", "save10"] {
        let outcome = cart.apply_coupon(code).await?;
        println!("{:>8}: {}", code, outcome.message());
    }

    let order = store
        .orders()
        .place_order(&CheckoutForm {
            name: "Ayesha Khan".to_string(),
            phone: "0300-1234567".to_string(),
            address: "House 12, Street 4, Gulberg".to_string(),
            city: "Lahore".to_string(),
            payment: PaymentChoice::BankTransfer {
                transaction_ref: Some("TX-88421".to_string()),
                proof_image: None,
            },
            note: Some("Please call before delivery".to_string()),
        })
        .await?;
    println!(
        "placed {} total {} ({})",
        order.id,
        format_rs(order.total()),
        order.payment.label()
    );

    // Tracking page
    match store.orders().track(&order.id, "03001234567").await {
        Some(found) => println!("tracking {}: {}", found.id, found.status.label()),
        None => println!("order not found"),
    }

    // Admin moves the order along
    let orders = store.orders();
    while let Transition::Advanced { from, to } = orders.advance(&order.id).await? {
        println!("{} -> {}", from.label(), to.label());
    }

    let stored: Vec<&str> = store
        .stored_collections()
        .await?
        .into_iter()
        .map(Collection::key)
        .collect();
    println!("stored: {}", stored.join(", "));

    let stats = orders.stats().await;
    println!(
        "{} order(s), delivered revenue {}",
        stats.total_orders,
        format_rs(stats.delivered_revenue)
    );

    let delivered = orders
        .get(&order.id)
        .await
        .ok_or_else(|| anyhow::anyhow!("order {} vanished", order.id))?;
    let html = render_invoice(&delivered, store.config())?;
    println!("{}: {} bytes", invoice_file_name(&delivered), html.len());
    print!("{}", orders_csv(&orders.list().await)?);

    Ok(())
}
