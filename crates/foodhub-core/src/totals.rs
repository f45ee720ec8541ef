//! # Order Total Calculator
//!
//! Combines subtotal, shipping fee and voucher discount into the amount the
//! customer pays.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Tạm tính (subtotal)          80,000         │
//! │  Phí giao hàng (shipping)   + 15,000         │
//! │  Giảm giá (voucher)         −  5,000         │
//! │  ────────────────────────────────────        │
//! │  Tổng cộng (final total)      90,000         │
//! └──────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::validation::validate_non_negative;

/// The customer-facing totals of an order.
///
/// Every field is a non-negative amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderTotals {
    #[ts(as = "f64")]
    pub subtotal: Money,
    #[ts(as = "f64")]
    pub shipping_fee: Money,
    #[ts(as = "f64")]
    pub discount_amount: Money,
    #[ts(as = "f64")]
    pub final_total: Money,
}

/// Computes `max(0, subtotal + shipping_fee - discount_amount)`.
///
/// ## Errors
/// Any negative input is an invalid-input error. A discount larger than
/// subtotal plus shipping is accepted and floors the total at zero.
///
/// ## Example
/// ```rust
/// use foodhub_core::money::Money;
/// use foodhub_core::totals::compute_total;
///
/// let totals = compute_total(
///     Money::from_minor(80_000),
///     Money::from_minor(15_000),
///     Money::from_minor(5_000),
/// )
/// .unwrap();
/// assert_eq!(totals.final_total.minor_units(), 90_000);
/// ```
pub fn compute_total(
    subtotal: Money,
    shipping_fee: Money,
    discount_amount: Money,
) -> CoreResult<OrderTotals> {
    validate_non_negative(subtotal, "subtotal")?;
    validate_non_negative(shipping_fee, "shippingFee")?;
    validate_non_negative(discount_amount, "discountAmount")?;

    Ok(OrderTotals {
        subtotal,
        shipping_fee,
        discount_amount,
        final_total: (subtotal + shipping_fee - discount_amount).floor_zero(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
