//! Stored records: orders and everything the catalog and content pages show

pub mod catalog;
pub mod macros;
pub mod order;

pub use catalog::{
    CartItem, ContactMessage, NewsletterSignup, Product, ProductSummary, RatingSummary, Review,
    Session, SiteConfig, Slide, SocialLinks, WishlistItem,
};
pub use order::{
    AppliedCoupon, Customer, LineItem, Order, OrderIdGenerator, OrderStatus, Payment,
    StatusChange, Transition,
};
