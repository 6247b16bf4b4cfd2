//! Shopping cart and the applied coupon

use crate::core::error::StorefrontResult;
use crate::entities::catalog::{CartItem, Product};
use crate::pricing::coupon::{CouponOutcome, apply_coupon, normalize_code, subtotal};
use crate::storage::Repository;
use rust_decimal::Decimal;

/// Cart operations for one handle
#[derive(Clone)]
pub struct CartService {
    items: Repository<Vec<CartItem>>,
    coupon: Repository<Option<String>>,
}

impl CartService {
    pub fn new(items: Repository<Vec<CartItem>>, coupon: Repository<Option<String>>) -> Self {
        Self { items, coupon }
    }

    pub async fn items(&self) -> Vec<CartItem> {
        self.items.read().await
    }

    /// Add `quantity` of a product, merging with an existing line
    ///
    /// A quantity of zero is treated as one.
    pub async fn add(&self, product: &Product, quantity: u32) -> StorefrontResult<Vec<CartItem>> {
        let quantity = quantity.max(1);
        self.items
            .update(|items| {
                match items.iter_mut().find(|i| i.product_id == product.id) {
                    Some(line) => line.quantity = line.quantity.saturating_add(quantity),
                    None => items.push(CartItem::from_product(product, quantity)),
                }
                items.clone()
            })
            .await
    }

    /// Set a line's quantity; zero removes the line. Returns whether the
    /// product was in the cart.
    pub async fn set_quantity(&self, product_id: &str, quantity: u32) -> StorefrontResult<bool> {
        if quantity == 0 {
            return self.remove(product_id).await;
        }
        self.items
            .update(|items| match items.iter_mut().find(|i| i.product_id == product_id) {
                Some(line) => {
                    line.quantity = quantity;
                    true
                }
                None => false,
            })
            .await
    }

    pub async fn remove(&self, product_id: &str) -> StorefrontResult<bool> {
        self.items.remove(product_id).await
    }

    /// Empty the cart and forget the applied coupon
    pub async fn clear(&self) -> StorefrontResult<()> {
        self.items.clear().await?;
        self.coupon.clear().await
    }

    pub async fn subtotal(&self) -> Decimal {
        subtotal(&self.items().await)
    }

    /// Number of units in the cart
    pub async fn count(&self) -> u32 {
        self.items().await.iter().map(|i| i.quantity).sum()
    }

    /// Evaluate `code` against the cart and remember it when it applies
    ///
    /// A rejected code leaves any previously applied coupon in place.
    pub async fn apply_coupon(&self, code: &str) -> StorefrontResult<CouponOutcome> {
        let outcome = apply_coupon(&self.items().await, code);
        if outcome.is_applied() {
            self.coupon.write(&Some(normalize_code(code))).await?;
            tracing::debug!(code = outcome.code(), discount = %outcome.discount(), "Coupon applied");
        }
        Ok(outcome)
    }

    /// Re-evaluate the remembered coupon against the current cart
    pub async fn applied_coupon(&self) -> Option<CouponOutcome> {
        let code = self.coupon.read().await?;
        Some(apply_coupon(&self.items().await, &code))
    }

    pub async fn remove_coupon(&self) -> StorefrontResult<()> {
        self.coupon.clear().await
    }
}
