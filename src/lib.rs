//! # Storefront Core
//!
//! Domain core of a small single-vendor online shop: catalog, cart, coupon
//! pricing, checkout, order tracking and the admin order workflow, persisted
//! as JSON documents in a key-value store.
//!
//! ## Features
//!
//! - **Order Lifecycle**: PLACED → CONFIRMED → PACKED → SHIPPED →
//!   OUT_FOR_DELIVERY → DELIVERED, with CANCELLED reachable from any
//!   non-terminal status
//! - **Coupons**: percentage and fixed discounts with minimum subtotal,
//!   category restriction, caps and expiry
//! - **Pluggable Storage**: in-memory or LMDB (`lmdb` feature) behind one
//!   key-value trait
//! - **Change Notification**: handles sharing a backend receive each other's
//!   writes as events, like browser tabs sharing local storage
//! - **Exports**: HTML invoices and an order CSV
//! - **Configuration-Based**: store settings loaded from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use storefront::prelude::*;
//!
//! let store = Storefront::in_memory();
//! let suit = store
//!     .catalog()
//!     .add_product(Product::new("Lawn Suit", "women", Decimal::from(3500)))
//!     .await?;
//!
//! store.cart().add(&suit, 3).await?;
//! store.cart().apply_coupon("SAVE10").await?;
//!
//! let order = store.orders().place_order(&CheckoutForm {
//!     name: "Ayesha Khan".into(),
//!     phone: "0300-1234567".into(),
//!     address: "House 12, Street 4".into(),
//!     city: "Lahore".into(),
//!     ..CheckoutForm::default()
//! }).await?;
//!
//! assert_eq!(order.total(), Decimal::from(9450));
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod entities;
pub mod export;
pub mod pricing;
pub mod services;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Host ===
    pub use crate::app::{Storefront, StorefrontBuilder};

    // === Core ===
    pub use crate::core::{
        error::{
            AuthError, ConfigError, ErrorResponse, OrderError, StorageError, StorefrontError,
            StorefrontResult, ValidationError,
        },
        events::{ChangeEvent, EventBus, EventEnvelope},
        query::{CatalogQuery, Page, PaginationMeta, SortOrder},
        record::Record,
        service::KvBackend,
        validation::{CheckoutForm, ContactForm, PaymentChoice},
    };

    // === Macros ===
    pub use crate::{impl_record, new_record_id};

    // === Records ===
    pub use crate::entities::{
        AppliedCoupon, CartItem, ContactMessage, Customer, LineItem, NewsletterSignup, Order,
        OrderIdGenerator, OrderStatus, Payment, Product, ProductSummary, RatingSummary, Review,
        Session, SiteConfig, Slide, SocialLinks, StatusChange, Transition, WishlistItem,
    };

    // === Pricing ===
    pub use crate::pricing::{
        Coupon, CouponBook, CouponOutcome, DiscountRule, Ineligibility, PricedLine, Rupees,
        apply_coupon, format_rs,
    };

    // === Services ===
    pub use crate::services::{
        AdminService, CartService, CatalogService, ContentService, OrderService, OrderStats,
    };

    // === Storage ===
    pub use crate::storage::{ChangeFeed, Collection, InMemoryKv, Repository};
    #[cfg(feature = "lmdb")]
    pub use crate::storage::LmdbKv;

    // === Export ===
    pub use crate::export::{invoice_file_name, orders_csv, render_invoice};

    // === Config ===
    pub use crate::config::{AdminCredentials, BankDetails, StorageConfig, StorefrontConfig};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
