//! Products, reviews, wishlist and recently viewed

use crate::core::error::{StorefrontResult, ValidationError};
use crate::core::query::{CatalogQuery, Page};
use crate::entities::catalog::{Product, ProductSummary, RatingSummary, Review, WishlistItem};
use crate::pricing::{MAX_PRICE, format_rs};
use crate::storage::Repository;
use chrono::Utc;
use std::collections::BTreeMap;

#[derive(Clone)]
pub struct CatalogService {
    products: Repository<Vec<Product>>,
    reviews: Repository<Vec<Review>>,
    wishlist: Repository<Vec<WishlistItem>>,
    recent: Repository<Vec<ProductSummary>>,
    recent_limit: usize,
}

impl CatalogService {
    pub fn new(
        products: Repository<Vec<Product>>,
        reviews: Repository<Vec<Review>>,
        wishlist: Repository<Vec<WishlistItem>>,
        recent: Repository<Vec<ProductSummary>>,
        recent_limit: usize,
    ) -> Self {
        Self {
            products,
            reviews,
            wishlist,
            recent,
            recent_limit,
        }
    }

    // === Products ===

    pub async fn add_product(&self, product: Product) -> StorefrontResult<Product> {
        check_product(&product)?;
        self.products.upsert(product.clone()).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "Product saved");
        Ok(product)
    }

    /// Replace an existing product; returns `false` when the id is unknown
    pub async fn update_product(&self, product: Product) -> StorefrontResult<bool> {
        check_product(&product)?;
        self.products
            .update(|products| match products.iter_mut().find(|p| p.id == product.id) {
                Some(existing) => {
                    *existing = product;
                    true
                }
                None => false,
            })
            .await
    }

    /// Delete a product and drop it from the wishlist and recently viewed
    pub async fn delete_product(&self, id: &str) -> StorefrontResult<bool> {
        let existed = self.products.remove(id).await?;
        if existed {
            self.wishlist.remove(id).await?;
            self.recent.remove(id).await?;
            tracing::info!(product_id = %id, "Product deleted");
        }
        Ok(existed)
    }

    pub async fn get(&self, id: &str) -> Option<Product> {
        self.products.find(id).await
    }

    pub async fn search(&self, query: &CatalogQuery) -> Page<Product> {
        query.apply(self.products.read().await)
    }

    /// Distinct categories, sorted, first spelling wins
    pub async fn categories(&self) -> Vec<String> {
        let mut seen: BTreeMap<String, String> = BTreeMap::new();
        for product in self.products.read().await {
            seen.entry(product.category.to_lowercase())
                .or_insert(product.category);
        }
        seen.into_values().collect()
    }

    /// Other products in the same category, newest first
    pub async fn related(&self, product: &Product, limit: usize) -> Vec<Product> {
        let mut related: Vec<Product> = self
            .products
            .read()
            .await
            .into_iter()
            .filter(|p| p.id != product.id && p.category.eq_ignore_ascii_case(&product.category))
            .collect();
        related.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        related.truncate(limit);
        related
    }

    // === Reviews ===

    pub async fn add_review(
        &self,
        product_id: &str,
        author: &str,
        rating: u8,
        comment: &str,
    ) -> StorefrontResult<Review> {
        if !(1..=5).contains(&rating) {
            return Err(ValidationError::FieldError {
                field: "rating".to_string(),
                message: "Rating must be between 1 and 5".to_string(),
            }
            .into());
        }
        let author = author.trim();
        let review = Review {
            id: crate::new_record_id!(),
            product_id: product_id.to_string(),
            author: if author.is_empty() {
                "Anonymous".to_string()
            } else {
                author.to_string()
            },
            rating,
            comment: comment.trim().to_string(),
            created_at: Utc::now(),
        };
        self.reviews.upsert(review.clone()).await?;
        Ok(review)
    }

    /// Reviews of one product, newest first
    pub async fn reviews_for(&self, product_id: &str) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .reviews
            .read()
            .await
            .into_iter()
            .filter(|r| r.product_id == product_id)
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews
    }

    pub async fn rating_summary(&self, product_id: &str) -> RatingSummary {
        let reviews = self.reviews_for(product_id).await;
        let count = reviews.len();
        let average = if count == 0 {
            0.0
        } else {
            let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
            f64::from(total) / count as f64
        };
        RatingSummary { count, average }
    }

    // === Wishlist ===

    /// Add or remove a product; returns whether it is now in the wishlist
    pub async fn toggle_wishlist(&self, product: &Product) -> StorefrontResult<bool> {
        self.wishlist
            .update(|items| {
                let before = items.len();
                items.retain(|i| i.id != product.id);
                if items.len() == before {
                    items.push(product.summary());
                    true
                } else {
                    false
                }
            })
            .await
    }

    pub async fn wishlist(&self) -> Vec<WishlistItem> {
        self.wishlist.read().await
    }

    pub async fn in_wishlist(&self, product_id: &str) -> bool {
        self.wishlist.find(product_id).await.is_some()
    }

    // === Recently viewed ===

    /// Move a product to the front of the recently viewed list
    pub async fn record_view(&self, product: &Product) -> StorefrontResult<()> {
        let limit = self.recent_limit;
        self.recent
            .update(|items| {
                items.retain(|i| i.id != product.id);
                items.insert(0, product.summary());
                items.truncate(limit);
            })
            .await
    }

    pub async fn recently_viewed(&self) -> Vec<ProductSummary> {
        self.recent.read().await
    }
}

fn check_product(product: &Product) -> Result<(), ValidationError> {
    if product.name.trim().is_empty() {
        return Err(ValidationError::FieldError {
            field: "name".to_string(),
            message: "Product name is required".to_string(),
        });
    }
    if product.price.is_sign_negative() && !product.price.is_zero() {
        return Err(ValidationError::FieldError {
            field: "price".to_string(),
            message: "Price must not be negative".to_string(),
        });
    }
    if product.price > MAX_PRICE {
        return Err(ValidationError::FieldError {
            field: "price".to_string(),
            message: format!("Price must not exceed {}", format_rs(MAX_PRICE)),
        });
    }
    if product
        .compare_at_price
        .is_some_and(|was| was.is_sign_negative() || was > MAX_PRICE)
    {
        return Err(ValidationError::FieldError {
            field: "compare_at_price".to_string(),
            message: format!(
                "Compare-at price must be between Rs. 0 and {}",
                format_rs(MAX_PRICE)
            ),
        });
    }
    Ok(())
}
