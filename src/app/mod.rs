//! Storefront host and builder

pub mod builder;
pub mod host;

pub use builder::StorefrontBuilder;
pub use host::Storefront;
