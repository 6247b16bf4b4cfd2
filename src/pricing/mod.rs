//! Coupon evaluation and money formatting

pub mod coupon;
pub mod money;

pub use coupon::{
    Coupon, CouponBook, CouponOutcome, DiscountRule, Ineligibility, PricedLine, apply_coupon,
    normalize_code, subtotal, sum_saturating,
};
pub use money::{MAX_PRICE, Rupees, format_amount, format_rs, round_rupees};
