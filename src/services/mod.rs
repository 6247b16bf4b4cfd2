//! Storefront operations built on typed repositories
//!
//! Services are cheap handles: each one holds repositories bound to the
//! handle (tab) that created it. Obtain them from [`Storefront`](crate::app::Storefront).

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod content;
pub mod orders;

pub use admin::AdminService;
pub use cart::CartService;
pub use catalog::CatalogService;
pub use content::ContentService;
pub use orders::{OrderService, OrderStats, StatusCount};
