//! Macro-generated end-to-end shopping flows over a `KvBackend`.
//!
//! # Generated Tests
//!
//! - `test_checkout_with_save10` — 3 × Rs. 3,500 with SAVE10 totals Rs. 9,450
//! - `test_lifecycle_reaches_shipped_then_delivered` — three advances reach
//!   SHIPPED; advancing DELIVERED is a no-op
//! - `test_checkout_clears_cart_and_coupon`
//! - `test_tracking_requires_matching_phone`
//! - `test_admin_cannot_move_backwards`
//! - `test_malformed_stored_orders_read_as_empty`
//! - `test_second_tab_sees_writes`
//! - `test_exports_for_placed_order`

/// Generate end-to-end storefront tests.
///
/// `$factory` must evaluate to a fresh backend; it is re-evaluated per test.
/// The backend must be `Clone` so a second tab can share it.
#[macro_export]
macro_rules! storefront_flow_tests {
    ($factory:expr) => {
        mod storefront_flow_contract_tests {
            use super::*;
            use rust_decimal::Decimal;
            use storefront::prelude::*;

            async fn store_with_catalog() -> (Storefront, Vec<Product>) {
                let store = storefront_on($factory);
                let mut saved = Vec::new();
                for product in sample_catalog() {
                    saved.push(store.catalog().add_product(product).await.unwrap());
                }
                (store, saved)
            }

            #[tokio::test]
            async fn test_checkout_with_save10() {
                let (store, catalog) = store_with_catalog().await;
                let suit = &catalog[0];

                store.cart().add(suit, 3).await.unwrap();
                assert_eq!(store.cart().subtotal().await, Decimal::from(10_500));

                let outcome = store.cart().apply_coupon("SAVE10").await.unwrap();
                assert_eq!(outcome.discount(), Decimal::from(1_050));

                let order = store.orders().place_order(&checkout_form()).await.unwrap();
                assert_eq!(order.status, OrderStatus::Placed);
                assert_eq!(order.subtotal(), Decimal::from(10_500));
                assert_eq!(order.discount(), Decimal::from(1_050));
                assert_eq!(order.total(), Decimal::from(9_450));
                assert_eq!(order.coupon.as_ref().map(|c| c.code.as_str()), Some("SAVE10"));
            }

            #[tokio::test]
            async fn test_lifecycle_reaches_shipped_then_delivered() {
                let (store, catalog) = store_with_catalog().await;
                store.cart().add(&catalog[1], 1).await.unwrap();
                let order = store.orders().place_order(&checkout_form()).await.unwrap();
                let orders = store.orders();

                for _ in 0..3 {
                    orders.advance(&order.id).await.unwrap();
                }
                assert_eq!(
                    orders.get(&order.id).await.unwrap().status,
                    OrderStatus::Shipped
                );

                for _ in 0..2 {
                    orders.advance(&order.id).await.unwrap();
                }
                let delivered = orders.get(&order.id).await.unwrap();
                assert_eq!(delivered.status, OrderStatus::Delivered);

                let transition = orders.advance(&order.id).await.unwrap();
                assert_eq!(transition, Transition::Terminal(OrderStatus::Delivered));
                assert_eq!(orders.get(&order.id).await.unwrap(), delivered);
            }

            #[tokio::test]
            async fn test_checkout_clears_cart_and_coupon() {
                let (store, catalog) = store_with_catalog().await;
                store.cart().add(&catalog[1], 1).await.unwrap();
                store.cart().apply_coupon("SHOES15").await.unwrap();

                let order = store.orders().place_order(&checkout_form()).await.unwrap();
                assert_eq!(order.discount(), Decimal::from(1_170));
                assert!(store.cart().items().await.is_empty());
                assert!(store.cart().applied_coupon().await.is_none());

                let err = store.orders().place_order(&checkout_form()).await.unwrap_err();
                assert_eq!(err.error_code(), "EMPTY_CART");
            }

            #[tokio::test]
            async fn test_tracking_requires_matching_phone() {
                let (store, catalog) = store_with_catalog().await;
                store.cart().add(&catalog[3], 2).await.unwrap();
                let order = store.orders().place_order(&checkout_form()).await.unwrap();

                let found = store.orders().track(&order.id, "0300 1234567").await;
                assert_eq!(found.map(|o| o.id), Some(order.id.clone()));
                assert!(store.orders().track(&order.id, "0311-1234567").await.is_none());
            }

            #[tokio::test]
            async fn test_admin_cannot_move_backwards() {
                let (store, catalog) = store_with_catalog().await;
                store.cart().add(&catalog[2], 1).await.unwrap();
                let order = store.orders().place_order(&checkout_form()).await.unwrap();
                let orders = store.orders();

                assert!(orders.set_status(&order.id, OrderStatus::Packed).await.unwrap());
                let err = orders
                    .set_status(&order.id, OrderStatus::Placed)
                    .await
                    .unwrap_err();
                assert!(matches!(
                    err,
                    StorefrontError::Order(OrderError::InvalidTransition { .. })
                ));
                assert!(orders.set_status(&order.id, OrderStatus::Cancelled).await.unwrap());
                assert_eq!(
                    orders.advance(&order.id).await.unwrap(),
                    Transition::Terminal(OrderStatus::Cancelled)
                );
            }

            #[tokio::test]
            async fn test_malformed_stored_orders_read_as_empty() {
                let backend = $factory;
                backend
                    .set(Collection::Orders.key(), "{ definitely not json".to_string())
                    .await
                    .unwrap();
                let store = storefront_on(backend);

                assert!(store.orders().list().await.is_empty());
                assert!(store.orders().get("ORD-1").await.is_none());
            }

            #[tokio::test]
            async fn test_second_tab_sees_writes() {
                let (store, catalog) = store_with_catalog().await;
                let tab = store.open_tab();
                let mut feed = tab.watch(Collection::Cart);

                store.cart().add(&catalog[0], 1).await.unwrap();

                let event = feed.recv().await.unwrap();
                assert_eq!(event.origin, store.origin());
                assert_eq!(event.event.action(), "written");
                assert_eq!(tab.cart().count().await, 1);
            }

            #[tokio::test]
            async fn test_exports_for_placed_order() {
                let (store, catalog) = store_with_catalog().await;
                store.cart().add(&catalog[0], 3).await.unwrap();
                let order = store.orders().place_order(&checkout_form()).await.unwrap();

                let html = render_invoice(&order, store.config()).unwrap();
                assert!(html.contains(&order.id));
                assert!(html.contains("Rs. 10,500"));
                assert_eq!(invoice_file_name(&order), format!("invoice-{}.html", order.id));

                let csv = orders_csv(&store.orders().list().await).unwrap();
                assert_eq!(csv.lines().count(), 2);
                assert!(csv.contains(&order.id));
            }
        }
    };
}
