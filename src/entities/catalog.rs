//! Catalog and storefront content records
//!
//! These are plain records. Cart, wishlist and order lines copy the product
//! fields they need at add time; nothing links them back to the catalog.

use crate::entities::order::LineItem;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    /// Original price shown struck through, if on sale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Decimal>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
}

fn default_in_stock() -> bool {
    true
}

impl Product {
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: crate::new_record_id!(),
            name: name.into(),
            price,
            compare_at_price: None,
            category: category.into(),
            image: None,
            description: String::new(),
            in_stock: true,
            created_at: Utc::now(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whole-percent saving against the compare-at price, if any
    pub fn discount_percent(&self) -> Option<u32> {
        let was = self.compare_at_price?;
        if was <= self.price || was.is_zero() {
            return None;
        }
        let pct = (was - self.price).checked_mul(Decimal::ONE_HUNDRED)? / was;
        pct.round().to_u32()
    }

    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            category: self.category.clone(),
            image: self.image.clone(),
        }
    }
}

crate::impl_record!(Product, id);

/// Product fields copied into wishlist and recently-viewed lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

crate::impl_record!(ProductSummary, id);

/// A saved-for-later product
pub type WishlistItem = ProductSummary;

/// A line in the shopping cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            category: product.category.clone(),
            image: product.image.clone(),
            quantity,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Snapshot this cart line as an order line
    pub fn to_line_item(&self) -> LineItem {
        LineItem {
            product_id: self.product_id.clone(),
            name: self.name.clone(),
            quantity: self.quantity,
            unit_price: self.price,
            category: Some(self.category.clone()),
            image: self.image.clone(),
        }
    }
}

crate::impl_record!(CartItem, product_id);

/// A customer review of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub product_id: String,
    pub author: String,
    /// 1 to 5 stars
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

crate::impl_record!(Review, id);

/// Average rating and count for one product
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    pub count: usize,
    pub average: f64,
}

/// A home page carousel slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub position: u32,
}

crate::impl_record!(Slide, id);

/// Links shown in the footer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
}

/// Admin-editable storefront settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub store_name: String,
    pub tagline: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub address: String,
    /// Banner text across the top of every page; empty hides it
    pub announcement: String,
    pub social: SocialLinks,
}

/// A newsletter subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsletterSignup {
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
}

crate::impl_record!(NewsletterSignup, email);

/// A message sent from the contact form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

crate::impl_record!(ContactMessage, id);

/// The signed-in user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub is_admin: bool,
    pub signed_in_at: DateTime<Utc>,
}
