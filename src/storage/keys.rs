//! Fixed storage layout: one key per logical collection

use serde::{Deserialize, Serialize};

/// Every collection the storefront persists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Orders,
    Products,
    Slides,
    SiteConfig,
    Reviews,
    Wishlist,
    RecentlyViewed,
    Newsletter,
    ContactMessages,
    AppliedCoupon,
    Session,
    Cart,
}

impl Collection {
    pub const ALL: [Collection; 12] = [
        Collection::Orders,
        Collection::Products,
        Collection::Slides,
        Collection::SiteConfig,
        Collection::Reviews,
        Collection::Wishlist,
        Collection::RecentlyViewed,
        Collection::Newsletter,
        Collection::ContactMessages,
        Collection::AppliedCoupon,
        Collection::Session,
        Collection::Cart,
    ];

    /// The storage key holding this collection
    pub fn key(self) -> &'static str {
        match self {
            Collection::Orders => "storefront:orders",
            Collection::Products => "storefront:products",
            Collection::Slides => "storefront:slides",
            Collection::SiteConfig => "storefront:site_config",
            Collection::Reviews => "storefront:reviews",
            Collection::Wishlist => "storefront:wishlist",
            Collection::RecentlyViewed => "storefront:recently_viewed",
            Collection::Newsletter => "storefront:newsletter",
            Collection::ContactMessages => "storefront:contact_messages",
            Collection::AppliedCoupon => "storefront:applied_coupon",
            Collection::Session => "storefront:session",
            Collection::Cart => "storefront:cart",
        }
    }

    pub fn from_key(key: &str) -> Option<Collection> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}
