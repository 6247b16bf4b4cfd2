//! Shared test harness for storage backend testing
//!
//! Provides sample catalog data, a filled-in checkout form, and two macro
//! suites that every `KvBackend` must pass:
//!
//! - `kv_backend_tests!` checks the raw key-value contract
//! - `storefront_flow_tests!` runs whole shopping flows on top of a backend
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//!
//! kv_backend_tests!(InMemoryKv::new());
//! storefront_flow_tests!(InMemoryKv::new());
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod kv_backend_tests;
#[macro_use]
pub mod storefront_flow_tests;

use rust_decimal::Decimal;
use storefront::prelude::*;

/// A product at a whole-rupee price
pub fn product(name: &str, category: &str, price: i64) -> Product {
    Product::new(name, category, Decimal::from(price))
}

/// Catalog used by the flow tests
pub fn sample_catalog() -> Vec<Product> {
    vec![
        product("Lawn Suit", "women", 3_500),
        product("Running Shoes", "shoes", 7_800),
        product("Leather Sandals", "shoes", 3_200),
        product("Tote Bag", "bags", 2_100),
    ]
}

/// A complete cash-on-delivery checkout form
pub fn checkout_form() -> CheckoutForm {
    CheckoutForm {
        name: "Ayesha Khan".to_string(),
        phone: "0300-1234567".to_string(),
        address: "House 12, Street 4, Gulberg".to_string(),
        city: "Lahore".to_string(),
        ..CheckoutForm::default()
    }
}

/// Storefront over `backend` with default configuration
pub fn storefront_on(backend: impl KvBackend + 'static) -> Storefront {
    StorefrontBuilder::new()
        .with_backend(backend)
        .build()
        .expect("Failed to build storefront")
}
