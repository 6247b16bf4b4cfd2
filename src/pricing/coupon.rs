//! Coupon table and the discount evaluator
//!
//! Evaluation is a pure function of (lines, code, date). Remembering which
//! coupon the shopper applied is a separate write done by the cart service.

use crate::entities::catalog::CartItem;
use crate::entities::order::{AppliedCoupon, LineItem};
use crate::pricing::money::{Rupees, round_rupees};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Anything with a price, a quantity and a category
pub trait PricedLine {
    fn unit_price(&self) -> Decimal;
    fn quantity(&self) -> u32;
    fn category(&self) -> Option<&str>;

    fn line_total(&self) -> Decimal {
        self.unit_price().saturating_mul(Decimal::from(self.quantity()))
    }
}

impl PricedLine for CartItem {
    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }
}

impl PricedLine for LineItem {
    fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// Σ quantity × unit price
pub fn subtotal<L: PricedLine>(lines: &[L]) -> Decimal {
    sum_saturating(lines.iter().map(PricedLine::line_total))
}

/// Sum amounts, pinning at `Decimal::MAX` / `Decimal::MIN` instead of panicking
pub fn sum_saturating(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

/// How a coupon computes its discount
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DiscountRule {
    /// Percentage of the eligible subtotal
    Percent(Decimal),
    /// Flat amount off
    Fixed(Decimal),
}

/// A coupon definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coupon {
    pub code: String,
    pub label: String,
    pub rule: DiscountRule,
    pub min_subtotal: Option<Decimal>,
    /// Restrict the coupon to lines of this category
    pub category: Option<String>,
    pub max_discount: Option<Decimal>,
    /// Last day the coupon can be used
    pub expires_on: Option<NaiveDate>,
}

impl Coupon {
    pub fn percent(code: &str, label: &str, percent: i64) -> Self {
        Self::with_rule(code, label, DiscountRule::Percent(Decimal::from(percent)))
    }

    pub fn fixed(code: &str, label: &str, amount: i64) -> Self {
        Self::with_rule(code, label, DiscountRule::Fixed(Decimal::from(amount)))
    }

    fn with_rule(code: &str, label: &str, rule: DiscountRule) -> Self {
        Self {
            code: normalize_code(code),
            label: label.to_string(),
            rule,
            min_subtotal: None,
            category: None,
            max_discount: None,
            expires_on: None,
        }
    }

    pub fn min_subtotal(mut self, amount: i64) -> Self {
        self.min_subtotal = Some(Decimal::from(amount));
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn max_discount(mut self, amount: i64) -> Self {
        self.max_discount = Some(Decimal::from(amount));
        self
    }

    pub fn expires_on(mut self, date: Option<NaiveDate>) -> Self {
        self.expires_on = date;
        self
    }

    /// Compute the discount for `lines` on `today`, or say why not
    pub fn evaluate<L: PricedLine>(
        &self,
        lines: &[L],
        today: NaiveDate,
    ) -> Result<Decimal, Ineligibility> {
        let subtotal = subtotal(lines);
        if lines.iter().all(|l| l.quantity() == 0) {
            return Err(Ineligibility::EmptyCart);
        }

        if let Some(expired_on) = self.expires_on {
            if today > expired_on {
                return Err(Ineligibility::Expired { expired_on });
            }
        }

        if let Some(minimum) = self.min_subtotal {
            if subtotal < minimum {
                return Err(Ineligibility::BelowMinimum {
                    minimum: Rupees(minimum),
                    shortfall: Rupees(minimum - subtotal),
                });
            }
        }

        let base = match &self.category {
            Some(category) => {
                let matching: Vec<&L> = lines
                    .iter()
                    .filter(|l| {
                        l.quantity() > 0
                            && l.category()
                                .is_some_and(|c| c.eq_ignore_ascii_case(category))
                    })
                    .collect();
                if matching.is_empty() {
                    return Err(Ineligibility::CategoryMismatch {
                        category: category.clone(),
                    });
                }
                sum_saturating(matching.iter().map(|l| l.line_total()))
            }
            None => subtotal,
        };

        let mut discount = match self.rule {
            DiscountRule::Percent(pct) => {
                round_rupees(base.saturating_mul(pct) / Decimal::ONE_HUNDRED)
            }
            DiscountRule::Fixed(amount) => amount,
        };
        if let Some(cap) = self.max_discount {
            discount = discount.min(cap);
        }
        Ok(discount.min(subtotal).max(Decimal::ZERO))
    }
}

/// Why an existing coupon did not apply
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ineligibility {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("This coupon expired on {expired_on}")]
    Expired { expired_on: NaiveDate },

    #[error("Minimum order for this coupon is {minimum}. Add {shortfall} more to use it")]
    BelowMinimum { minimum: Rupees, shortfall: Rupees },

    #[error("This coupon only applies to {category} items")]
    CategoryMismatch { category: String },
}

/// Result of evaluating a coupon code against a cart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CouponOutcome {
    Applied {
        code: String,
        label: String,
        discount: Decimal,
    },
    NotFound {
        code: String,
    },
    NotEligible {
        code: String,
        reason: Ineligibility,
    },
}

impl CouponOutcome {
    /// Discount granted; zero unless applied
    pub fn discount(&self) -> Decimal {
        match self {
            CouponOutcome::Applied { discount, .. } => *discount,
            _ => Decimal::ZERO,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, CouponOutcome::Applied { .. })
    }

    pub fn code(&self) -> &str {
        match self {
            CouponOutcome::Applied { code, .. }
            | CouponOutcome::NotFound { code }
            | CouponOutcome::NotEligible { code, .. } => code,
        }
    }

    /// Message shown next to the coupon field
    pub fn message(&self) -> String {
        match self {
            CouponOutcome::Applied {
                label, discount, ..
            } => format!("{} applied. You save {}", label, Rupees(*discount)),
            CouponOutcome::NotFound { .. } => "Invalid coupon code".to_string(),
            CouponOutcome::NotEligible { reason, .. } => reason.to_string(),
        }
    }

    /// Snapshot for the order record, when applied
    pub fn to_applied(&self) -> Option<AppliedCoupon> {
        match self {
            CouponOutcome::Applied {
                code,
                label,
                discount,
            } => Some(AppliedCoupon {
                code: code.clone(),
                label: label.clone(),
                discount: *discount,
            }),
            _ => None,
        }
    }
}

/// Trimmed, upper-cased coupon code
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// An immutable set of coupons
#[derive(Debug, Clone, Default)]
pub struct CouponBook {
    coupons: Vec<Coupon>,
}

impl CouponBook {
    pub fn new(coupons: Vec<Coupon>) -> Self {
        Self { coupons }
    }

    /// The coupons offered by the storefront
    pub fn standard() -> &'static CouponBook {
        static STANDARD: OnceLock<CouponBook> = OnceLock::new();
        STANDARD.get_or_init(|| {
            CouponBook::new(vec![
                Coupon::percent("SAVE10", "10% off orders above Rs. 5,000", 10).min_subtotal(5_000),
                Coupon::fixed("WELCOME500", "Rs. 500 off your first order", 500)
                    .min_subtotal(2_000),
                Coupon::percent("BIG20", "20% off orders above Rs. 20,000", 20)
                    .min_subtotal(20_000)
                    .max_discount(5_000),
                Coupon::percent("SHOES15", "15% off all shoes", 15).category("shoes"),
                Coupon::percent("EID25", "Eid special 25% off", 25)
                    .min_subtotal(3_000)
                    .expires_on(NaiveDate::from_ymd_opt(2024, 4, 30)),
            ])
        })
    }

    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    /// Look up a coupon; the code is matched case-insensitively
    pub fn find(&self, code: &str) -> Option<&Coupon> {
        let code = normalize_code(code);
        self.coupons.iter().find(|c| c.code == code)
    }

    /// Evaluate `code` against `lines` as of `today`
    pub fn apply<L: PricedLine>(&self, lines: &[L], code: &str, today: NaiveDate) -> CouponOutcome {
        let Some(coupon) = self.find(code) else {
            return CouponOutcome::NotFound {
                code: normalize_code(code),
            };
        };

        match coupon.evaluate(lines, today) {
            Ok(discount) => CouponOutcome::Applied {
                code: coupon.code.clone(),
                label: coupon.label.clone(),
                discount,
            },
            Err(reason) => CouponOutcome::NotEligible {
                code: coupon.code.clone(),
                reason,
            },
        }
    }
}

/// Evaluate `code` against the standard coupon table as of today
pub fn apply_coupon<L: PricedLine>(lines: &[L], code: &str) -> CouponOutcome {
    CouponBook::standard().apply(lines, code, Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::catalog::Product;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn cart(lines: &[(&str, i64, u32)]) -> Vec<CartItem> {
        lines
            .iter()
            .map(|(category, price, qty)| {
                CartItem::from_product(&Product::new("item", *category, Decimal::from(*price)), *qty)
            })
            .collect()
    }

    #[test]
    fn test_save10_on_10500() {
        let items = cart(&[("women", 7_000, 1), ("women", 3_500, 1)]);
        let outcome = CouponBook::standard().apply(&items, "SAVE10", today());
        assert_eq!(outcome.discount(), Decimal::from(1_050));
        assert_eq!(subtotal(&items) - outcome.discount(), Decimal::from(9_450));
        assert!(outcome.message().contains("Rs. 1,050"));
    }

    #[test]
    fn test_code_is_case_insensitive() {
        let items = cart(&[("women", 6_000, 1)]);
        let outcome = CouponBook::standard().apply(&items, "  save10 ", today());
        assert!(outcome.is_applied());
        assert_eq!(outcome.code(), "SAVE10");
    }

    #[test]
    fn test_unknown_code() {
        let items = cart(&[("women", 6_000, 1)]);
        let outcome = CouponBook::standard().apply(&items, "FREESTUFF", today());
        assert_eq!(
            outcome,
            CouponOutcome::NotFound {
                code: "FREESTUFF".to_string()
            }
        );
        assert_eq!(outcome.discount(), Decimal::ZERO);
        assert_eq!(outcome.message(), "Invalid coupon code");
    }

    #[test]
    fn test_empty_cart_gets_nothing() {
        let items: Vec<CartItem> = Vec::new();
        for coupon in CouponBook::standard().coupons() {
            let outcome = CouponBook::standard().apply(&items, &coupon.code, today());
            assert_eq!(outcome.discount(), Decimal::ZERO);
            assert!(!outcome.is_applied());
        }
    }

    #[test]
    fn test_below_minimum_reports_shortfall() {
        let items = cart(&[("women", 4_000, 1)]);
        let outcome = CouponBook::standard().apply(&items, "SAVE10", today());
        match &outcome {
            CouponOutcome::NotEligible {
                reason: Ineligibility::BelowMinimum { shortfall, .. },
                ..
            } => assert_eq!(shortfall.0, Decimal::from(1_000)),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(
            outcome.message(),
            "Minimum order for this coupon is Rs. 5,000. Add Rs. 1,000 more to use it"
        );
    }

    #[test]
    fn test_category_restriction() {
        let outcome = CouponBook::standard().apply(&cart(&[("bags", 3_000, 1)]), "SHOES15", today());
        assert!(matches!(
            outcome,
            CouponOutcome::NotEligible {
                reason: Ineligibility::CategoryMismatch { .. },
                ..
            }
        ));

        // Only the shoe lines count toward the discount base
        let items = cart(&[("Shoes", 4_000, 2), ("bags", 10_000, 1)]);
        let outcome = CouponBook::standard().apply(&items, "SHOES15", today());
        assert_eq!(outcome.discount(), Decimal::from(1_200));
    }

    #[test]
    fn test_max_discount_cap() {
        let items = cart(&[("women", 40_000, 1)]);
        let outcome = CouponBook::standard().apply(&items, "BIG20", today());
        assert_eq!(outcome.discount(), Decimal::from(5_000));
    }

    #[test]
    fn test_fixed_discount_never_exceeds_subtotal() {
        let book = CouponBook::new(vec![Coupon::fixed("BIGFLAT", "flat", 10_000)]);
        let items = cart(&[("women", 2_500, 1)]);
        let outcome = book.apply(&items, "bigflat", today());
        assert_eq!(outcome.discount(), Decimal::from(2_500));
    }

    #[test]
    fn test_expired_coupon() {
        let items = cart(&[("women", 5_000, 1)]);
        let before = CouponBook::standard().apply(&items, "EID25", today());
        assert_eq!(before.discount(), Decimal::from(1_250));

        let after = CouponBook::standard().apply(
            &items,
            "EID25",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        );
        assert!(matches!(
            after,
            CouponOutcome::NotEligible {
                reason: Ineligibility::Expired { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let items = cart(&[("women", 12_345, 1)]);
        let first = CouponBook::standard().apply(&items, "SAVE10", today());
        let second = CouponBook::standard().apply(&items, "SAVE10", today());
        assert_eq!(first, second);
        // 1234.5 rounds half away from zero
        assert_eq!(first.discount(), Decimal::from(1_235));
    }

    #[test]
    fn test_works_on_order_lines() {
        let lines = vec![LineItem::new("p1", "Kurta", 3, Decimal::from(2_000))];
        let outcome = CouponBook::standard().apply(&lines, "WELCOME500", today());
        assert_eq!(outcome.to_applied().unwrap().discount, Decimal::from(500));
    }
}
