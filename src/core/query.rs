//! Catalog filtering, sorting and pagination

use crate::entities::catalog::Product;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sort order for catalog listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    PriceLowHigh,
    PriceHighLow,
    NameAsc,
}

/// Filters and paging for a product listing
///
/// All filters are optional and combine with AND. Typical shop page:
///
/// ```rust,ignore
/// let query = CatalogQuery {
///     category: Some("shoes".into()),
///     sort: SortOrder::PriceLowHigh,
///     ..CatalogQuery::default()
/// };
/// let page = storefront.catalog().search(&query).await;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogQuery {
    /// Exact category, case-insensitive
    pub category: Option<String>,

    /// Case-insensitive substring of name or category
    pub search: Option<String>,

    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock_only: bool,
    pub sort: SortOrder,

    /// Page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            min_price: None,
            max_price: None,
            in_stock_only: false,
            sort: SortOrder::default(),
            page: 1,
            limit: 12,
        }
    }
}

impl CatalogQuery {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, clamped to 1..=100
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, 100)
    }

    /// Whether a product passes every filter
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category.as_deref().filter(|c| !c.trim().is_empty()) {
            if !product.category.eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            if !product.name.to_lowercase().contains(&term)
                && !product.category.to_lowercase().contains(&term)
            {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        !self.in_stock_only || product.in_stock
    }

    /// Filter, sort and paginate
    pub fn apply(&self, products: Vec<Product>) -> Page<Product> {
        let mut matching: Vec<Product> = products.into_iter().filter(|p| self.matches(p)).collect();

        match self.sort {
            SortOrder::Newest => matching.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::PriceLowHigh => matching.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceHighLow => matching.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::NameAsc => {
                matching.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            }
        }

        Page::paginate(matching, self.page(), self.limit())
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> Page<T> {
    pub fn paginate(items: Vec<T>, page: usize, limit: usize) -> Self {
        let page = page.max(1);
        let pagination = PaginationMeta::new(page, limit, items.len());
        let data = items
            .into_iter()
            .skip((page - 1).saturating_mul(pagination.limit))
            .take(pagination.limit)
            .collect();
        Self { data, pagination }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationMeta {
    pub page: usize,
    pub limit: usize,
    /// Total number of items (after filters)
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let limit = limit.max(1);
        let page = page.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = (page - 1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }
}
