//! Checkout, tracking and the admin order workflow

use crate::config::StorefrontConfig;
use crate::core::error::{OrderError, StorefrontResult};
use crate::core::validation::{CheckoutForm, PaymentChoice};
use crate::entities::order::{Order, OrderIdGenerator, OrderStatus, Payment, Transition};
use crate::pricing::sum_saturating;
use crate::services::cart::CartService;
use crate::storage::Repository;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Order counts and revenue for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderStats {
    pub total_orders: usize,
    /// One entry per status, in lifecycle order
    pub by_status: Vec<StatusCount>,
    /// Sum of totals over DELIVERED orders
    pub delivered_revenue: Decimal,
}

impl OrderStats {
    pub fn count(&self, status: OrderStatus) -> usize {
        self.by_status
            .iter()
            .find(|s| s.status == status)
            .map(|s| s.count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

#[derive(Clone)]
pub struct OrderService {
    orders: Repository<Vec<Order>>,
    cart: CartService,
    config: Arc<StorefrontConfig>,
    ids: Arc<OrderIdGenerator>,
}

impl OrderService {
    pub fn new(
        orders: Repository<Vec<Order>>,
        cart: CartService,
        config: Arc<StorefrontConfig>,
        ids: Arc<OrderIdGenerator>,
    ) -> Self {
        Self {
            orders,
            cart,
            config,
            ids,
        }
    }

    /// Turn the current cart into a PLACED order
    ///
    /// The cart and applied coupon are cleared once the order is stored.
    pub async fn place_order(&self, form: &CheckoutForm) -> StorefrontResult<Order> {
        form.check()?;
        let form = form.trimmed();

        let items = self.cart.items().await;
        if items.is_empty() {
            return Err(OrderError::EmptyCart.into());
        }
        let lines = items.iter().map(|i| i.to_line_item()).collect();
        let coupon = self
            .cart
            .applied_coupon()
            .await
            .and_then(|outcome| outcome.to_applied());
        let payment = self.payment_for(&form.payment);

        let order = self
            .orders
            .try_update(|orders| {
                self.ids.observe(orders.iter().map(|o| o.id.as_str()));
                let order = Order::new(self.ids.next_id(), form.customer(), lines, payment)?
                    .with_shipping_fee(self.config.shipping_fee)
                    .with_coupon(coupon)
                    .with_note(form.note.clone());
                orders.push(order.clone());
                Ok(order)
            })
            .await?;

        self.cart.clear().await?;

        info!(
            order_id = %order.id,
            total = %order.total(),
            items = order.item_count(),
            payment = order.payment.label(),
            "Order placed"
        );
        Ok(order)
    }

    fn payment_for(&self, choice: &PaymentChoice) -> Payment {
        match choice {
            PaymentChoice::CashOnDelivery => Payment::CashOnDelivery,
            PaymentChoice::BankTransfer {
                transaction_ref,
                proof_image,
            } => {
                let bank = &self.config.bank;
                Payment::BankTransfer {
                    bank_name: bank.bank_name.clone(),
                    account_title: bank.account_title.clone(),
                    account_number: bank.account_number.clone(),
                    transaction_ref: transaction_ref.clone(),
                    proof_image: proof_image.clone(),
                }
            }
        }
    }

    pub async fn get(&self, id: &str) -> Option<Order> {
        self.orders.find(id).await
    }

    /// Every order, newest first
    pub async fn list(&self) -> Vec<Order> {
        let mut orders = self.orders.read().await;
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        orders
    }

    /// Look up an order for the tracking page
    ///
    /// The phone number must match the one on the order once everything but
    /// digits is stripped from both.
    pub async fn track(&self, id: &str, phone: &str) -> Option<Order> {
        let wanted = digits(phone);
        if wanted.is_empty() {
            return None;
        }
        self.get(id.trim())
            .await
            .filter(|order| digits(&order.customer.phone) == wanted)
    }

    /// Move an order one step along the lifecycle
    ///
    /// At DELIVERED or CANCELLED nothing is written and `Transition::Terminal`
    /// is returned.
    pub async fn advance(&self, id: &str) -> StorefrontResult<Transition> {
        let mut orders = self.orders.load().await?;
        let order = find_mut(&mut orders, id)?;
        let transition = order.advance();

        if let Transition::Advanced { from, to } = transition {
            self.orders.write(&orders).await?;
            info!(order_id = %id, from = from.as_str(), to = to.as_str(), "Order advanced");
        }
        Ok(transition)
    }

    /// Admin jump to any later status; returns `false` if already there
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> StorefrontResult<bool> {
        let mut orders = self.orders.load().await?;
        let order = find_mut(&mut orders, id)?;
        let from = order.status;
        let changed = order.set_status(status)?;

        if changed {
            self.orders.write(&orders).await?;
            info!(order_id = %id, from = from.as_str(), to = status.as_str(), "Order status set");
        }
        Ok(changed)
    }

    pub async fn cancel(&self, id: &str) -> StorefrontResult<()> {
        self.orders
            .try_update(|orders| {
                find_mut(orders, id)?.cancel()?;
                Ok(())
            })
            .await?;
        info!(order_id = %id, "Order cancelled");
        Ok(())
    }

    pub async fn stats(&self) -> OrderStats {
        let orders = self.orders.read().await;
        let by_status = OrderStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: orders.iter().filter(|o| o.status == status).count(),
            })
            .collect();
        let delivered_revenue = sum_saturating(
            orders
                .iter()
                .filter(|o| o.status == OrderStatus::Delivered)
                .map(Order::total),
        );

        OrderStats {
            total_orders: orders.len(),
            by_status,
            delivered_revenue,
        }
    }
}

fn find_mut<'a>(orders: &'a mut [Order], id: &str) -> Result<&'a mut Order, OrderError> {
    orders
        .iter_mut()
        .find(|o| o.id == id)
        .ok_or_else(|| OrderError::NotFound { id: id.to_string() })
}

fn digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Storefront;
    use crate::core::error::StorefrontError;
    use crate::entities::catalog::Product;

    fn form() -> CheckoutForm {
        CheckoutForm {
            name: "Ayesha Khan".to_string(),
            phone: "0300-1234567".to_string(),
            address: "House 12, Street 4".to_string(),
            city: "Lahore".to_string(),
            ..CheckoutForm::default()
        }
    }

    async fn placed(store: &Storefront) -> Order {
        let suit = Product::new("Lawn Suit", "women", Decimal::from(3_500));
        store.cart().add(&suit, 3).await.unwrap();
        store.orders().place_order(&form()).await.unwrap()
    }

    #[tokio::test]
    async fn test_place_order_snapshots_cart() {
        let store = Storefront::in_memory();
        let order = placed(&store).await;

        assert_eq!(order.status, OrderStatus::Placed);
        assert!(order.id.starts_with("ORD-"));
        assert_eq!(order.subtotal(), Decimal::from(10_500));
        assert_eq!(order.payment, Payment::CashOnDelivery);
        assert!(store.cart().items().await.is_empty());
        assert_eq!(store.orders().get(&order.id).await, Some(order));
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let store = Storefront::in_memory();
        let err = store.orders().place_order(&form()).await.unwrap_err();
        assert!(matches!(err, StorefrontError::Order(OrderError::EmptyCart)));
        assert!(store.orders().list().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected_before_anything_is_written() {
        let store = Storefront::in_memory();
        let suit = Product::new("Lawn Suit", "women", Decimal::from(3_500));
        store.cart().add(&suit, 1).await.unwrap();

        let bad = CheckoutForm {
            address: " ".to_string(),
            ..form()
        };
        let err = store.orders().place_order(&bad).await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(store.cart().count().await, 1);
    }

    #[tokio::test]
    async fn test_bank_transfer_uses_configured_account() {
        let store = Storefront::in_memory();
        store
            .cart()
            .add(&Product::new("Shawl", "women", Decimal::from(900)), 1)
            .await
            .unwrap();
        let order = store
            .orders()
            .place_order(&CheckoutForm {
                payment: PaymentChoice::BankTransfer {
                    transaction_ref: Some("TX-42".to_string()),
                    proof_image: None,
                },
                ..form()
            })
            .await
            .unwrap();

        match order.payment {
            Payment::BankTransfer {
                bank_name,
                transaction_ref,
                ..
            } => {
                assert_eq!(bank_name, store.config().bank.bank_name);
                assert_eq!(transaction_ref.as_deref(), Some("TX-42"));
            }
            other => panic!("unexpected payment {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_track_compares_phone_digits() {
        let store = Storefront::in_memory();
        let order = placed(&store).await;
        let orders = store.orders();

        assert!(orders.track(&order.id, "03001234567").await.is_some());
        assert!(orders.track(&order.id, "0300 123 4567").await.is_some());
        assert!(orders.track(&order.id, "0300-7654321").await.is_none());
        assert!(orders.track(&order.id, "").await.is_none());
        assert!(orders.track("ORD-0", "03001234567").await.is_none());
    }

    #[tokio::test]
    async fn test_advance_and_terminal_noop() {
        let store = Storefront::in_memory();
        let order = placed(&store).await;
        let orders = store.orders();

        for _ in 0..5 {
            orders.advance(&order.id).await.unwrap();
        }
        assert_eq!(
            orders.advance(&order.id).await.unwrap(),
            Transition::Terminal(OrderStatus::Delivered)
        );
        assert_eq!(
            orders.get(&order.id).await.unwrap().status,
            OrderStatus::Delivered
        );
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let store = Storefront::in_memory();
        let err = store.orders().advance("ORD-404").await.unwrap_err();
        assert_eq!(err.error_code(), "ORDER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_set_status_rejects_backwards_moves() {
        let store = Storefront::in_memory();
        let order = placed(&store).await;
        let orders = store.orders();

        assert!(orders.set_status(&order.id, OrderStatus::Shipped).await.unwrap());
        let err = orders
            .set_status(&order.id, OrderStatus::Confirmed)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_STATUS_TRANSITION");
        assert_eq!(
            orders.get(&order.id).await.unwrap().status,
            OrderStatus::Shipped
        );
    }

    #[tokio::test]
    async fn test_cancel_and_stats() {
        let store = Storefront::in_memory();
        let first = placed(&store).await;
        let second = placed(&store).await;
        let orders = store.orders();

        orders.cancel(&first.id).await.unwrap();
        orders
            .set_status(&second.id, OrderStatus::Delivered)
            .await
            .unwrap();
        assert_eq!(
            orders.cancel(&first.id).await.unwrap_err().error_code(),
            "ORDER_TERMINAL"
        );

        let stats = orders.stats().await;
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.count(OrderStatus::Cancelled), 1);
        assert_eq!(stats.count(OrderStatus::Delivered), 1);
        assert_eq!(stats.count(OrderStatus::Placed), 0);
        assert_eq!(stats.delivered_revenue, second.total());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = Storefront::in_memory();
        let first = placed(&store).await;
        let second = placed(&store).await;
        assert!(second.id > first.id);

        let ids: Vec<String> = store.orders().list().await.into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
