//! Order record and its status lifecycle
//!
//! An order moves forward through a fixed sequence:
//!
//! ```text
//! PLACED → CONFIRMED → PACKED → SHIPPED → OUT_FOR_DELIVERY → DELIVERED
//!    └──────────┴─────────┴─────────┴──────────────┴──────▶ CANCELLED
//! ```
//!
//! DELIVERED and CANCELLED are absorbing. There is no rollback.

use crate::core::error::OrderError;
use crate::core::record::Record;
use crate::pricing::sum_saturating;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// Lifecycle state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Placed,
    Confirmed,
    Packed,
    Shipped,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The forward sequence, in order. CANCELLED is not part of it.
    pub const SEQUENCE: [OrderStatus; 6] = [
        OrderStatus::Placed,
        OrderStatus::Confirmed,
        OrderStatus::Packed,
        OrderStatus::Shipped,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    /// Every status, sequence first then CANCELLED
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Placed,
        OrderStatus::Confirmed,
        OrderStatus::Packed,
        OrderStatus::Shipped,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Position in the forward sequence; `None` for CANCELLED
    pub fn position(self) -> Option<usize> {
        Self::SEQUENCE.iter().position(|s| *s == self)
    }

    /// The next status in the sequence, or `None` at a terminal status
    pub fn next(self) -> Option<OrderStatus> {
        let pos = self.position()?;
        Self::SEQUENCE.get(pos + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether an admin may move an order from `self` to `target`
    ///
    /// Forward moves of any distance are allowed, as is cancelling a
    /// non-terminal order. Staying put is not a transition.
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        if self.is_terminal() || self == target {
            return false;
        }
        match (self.position(), target.position()) {
            (_, None) => true,
            (Some(from), Some(to)) => to > from,
            (None, Some(_)) => false,
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Placed => "Placed",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Packed => "Packed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Wire name as stored (`OUT_FOR_DELIVERY`)
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Packed => "PACKED",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Result of [`Order::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Advanced { from: OrderStatus, to: OrderStatus },
    /// No further transition; the order is unchanged
    Terminal(OrderStatus),
}

/// Who the order ships to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
}

/// One product line, copied from the cart at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl LineItem {
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            quantity,
            unit_price,
            category: None,
            image: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// How the customer pays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Payment {
    CashOnDelivery,
    BankTransfer {
        bank_name: String,
        account_title: String,
        account_number: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transaction_ref: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        proof_image: Option<String>,
    },
}

impl Payment {
    pub fn label(&self) -> &'static str {
        match self {
            Payment::CashOnDelivery => "Cash on Delivery",
            Payment::BankTransfer { .. } => "Bank Transfer",
        }
    }
}

/// Coupon snapshot taken at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    pub code: String,
    pub label: String,
    pub discount: Decimal,
}

/// One entry of the tracking timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: OrderStatus,
    pub at: DateTime<Utc>,
}

/// A placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub shipping_fee: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon: Option<AppliedCoupon>,
    pub payment: Payment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
}

impl Order {
    /// Create a PLACED order. Fails when `items` is empty.
    pub fn new(
        id: impl Into<String>,
        customer: Customer,
        items: Vec<LineItem>,
        payment: Payment,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyCart);
        }
        let now = Utc::now();
        Ok(Self {
            id: id.into(),
            status: OrderStatus::Placed,
            created_at: now,
            updated_at: now,
            customer,
            items,
            shipping_fee: Decimal::ZERO,
            coupon: None,
            payment,
            note: None,
            status_history: vec![StatusChange {
                status: OrderStatus::Placed,
                at: now,
            }],
        })
    }

    pub fn with_shipping_fee(mut self, fee: Decimal) -> Self {
        self.shipping_fee = fee.max(Decimal::ZERO);
        self
    }

    pub fn with_coupon(mut self, coupon: Option<AppliedCoupon>) -> Self {
        self.coupon = coupon;
        self
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note.filter(|n| !n.trim().is_empty());
        self
    }

    /// Σ quantity × unit price
    pub fn subtotal(&self) -> Decimal {
        sum_saturating(self.items.iter().map(LineItem::line_total))
    }

    /// Coupon discount, never more than the subtotal
    pub fn discount(&self) -> Decimal {
        self.coupon
            .as_ref()
            .map(|c| c.discount.min(self.subtotal()).max(Decimal::ZERO))
            .unwrap_or(Decimal::ZERO)
    }

    /// subtotal − discount + shipping fee
    pub fn total(&self) -> Decimal {
        self.subtotal()
            .saturating_sub(self.discount())
            .saturating_add(self.shipping_fee)
    }

    /// Number of units across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Move to the next status in the sequence
    pub fn advance(&mut self) -> Transition {
        match self.status.next() {
            Some(next) => {
                let from = self.status;
                self.apply(next);
                Transition::Advanced { from, to: next }
            }
            None => Transition::Terminal(self.status),
        }
    }

    /// Cancel a non-terminal order
    pub fn cancel(&mut self) -> Result<(), OrderError> {
        if self.is_terminal() {
            return Err(OrderError::AlreadyTerminal {
                id: self.id.clone(),
                status: self.status,
            });
        }
        self.apply(OrderStatus::Cancelled);
        Ok(())
    }

    /// Jump to `target`. Returns `false` when `target` is already current.
    pub fn set_status(&mut self, target: OrderStatus) -> Result<bool, OrderError> {
        if self.status == target {
            return Ok(false);
        }
        if self.is_terminal() {
            return Err(OrderError::AlreadyTerminal {
                id: self.id.clone(),
                status: self.status,
            });
        }
        if !self.status.can_transition_to(target) {
            return Err(OrderError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to: target,
            });
        }
        self.apply(target);
        Ok(true)
    }

    fn apply(&mut self, status: OrderStatus) {
        let now = Utc::now();
        self.status = status;
        self.updated_at = now;
        self.status_history.push(StatusChange { status, at: now });
    }
}

crate::impl_record!(Order, id);

/// Issues timestamp-derived order ids (`ORD-<unix millis>`)
///
/// Ids are strictly increasing within a generator: when the clock has not
/// moved past the last issued value, the next id is `last + 1`.
#[derive(Debug, Default)]
pub struct OrderIdGenerator {
    last: AtomicI64,
}

impl OrderIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        self.next_id_at(Utc::now().timestamp_millis())
    }

    pub fn next_id_at(&self, now_millis: i64) -> String {
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now_millis.max(last + 1);
            match self
                .last
                .compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return format!("ORD-{}", candidate),
                Err(actual) => last = actual,
            }
        }
    }

    /// Make sure future ids sort after every id in `existing`
    pub fn observe<'a>(&self, existing: impl IntoIterator<Item = &'a str>) {
        let max = existing
            .into_iter()
            .filter_map(|id| id.strip_prefix("ORD-")?.parse::<i64>().ok())
            .max();
        if let Some(max) = max {
            self.last.fetch_max(max, Ordering::SeqCst);
        }
    }
}
