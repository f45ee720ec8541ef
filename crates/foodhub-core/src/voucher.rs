//! # Voucher Evaluator
//!
//! Decides whether a voucher applies to a subtotal and what it takes off.
//!
//! ## Evaluation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  evaluate(voucher, subtotal, now)                                       │
//! │                                                                         │
//! │  no voucher ─────────────────────────────► NoVoucher          (0)      │
//! │  active == false ────────────────────────► Inactive           (0)      │
//! │  now < startDate ────────────────────────► NotStarted         (0)      │
//! │  now > endDate ──────────────────────────► Expired            (0)      │
//! │  usedCount >= usageLimit ────────────────► UsageLimitReached  (0)      │
//! │  subtotal < minOrderAmount ──────────────► BelowMinimum       (0)      │
//! │  otherwise ──────────────────────────────► Applied                     │
//! │      PERCENT:      subtotal × value%, capped by maxDiscount            │
//! │      FIXED_AMOUNT: value                                                │
//! │      then clamped to [0, subtotal]                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ineligibility is a result, not an error: the UI shows "voucher does not
//! apply" from [`Eligibility`] and keeps the order flowing. The caller
//! supplies `now`; nothing here reads the clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Voucher, VoucherDiscount};

/// Why a voucher did or did not apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Eligibility {
    Applied,
    NoVoucher,
    Inactive,
    NotStarted,
    Expired,
    UsageLimitReached,
    BelowMinimum,
}

/// Outcome of evaluating one voucher against one subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VoucherEvaluation {
    /// Code of the evaluated voucher, `None` when there was none.
    pub code: Option<String>,
    pub eligibility: Eligibility,
    /// Discount granted; zero unless `eligibility` is `Applied`.
    #[ts(as = "f64")]
    pub discount: Money,
    /// For `BelowMinimum`: how much more the customer must order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<f64>")]
    pub shortfall: Option<Money>,
}

impl VoucherEvaluation {
    fn ineligible(code: Option<&str>, eligibility: Eligibility) -> Self {
        VoucherEvaluation {
            code: code.map(str::to_string),
            eligibility,
            discount: Money::zero(),
            shortfall: None,
        }
    }

    /// Whether the voucher applied.
    #[inline]
    pub fn is_applied(&self) -> bool {
        self.eligibility == Eligibility::Applied
    }
}

/// Evaluates a voucher against a subtotal at time `now`.
///
/// ## Boundaries
/// - The validity window is inclusive: `now == end_date` still applies
/// - `used_count == usage_limit` is already exhausted
///
/// ## Example
/// ```rust
/// use chrono::{Duration, Utc};
/// use foodhub_core::money::Money;
/// use foodhub_core::types::{Percentage, Voucher, VoucherDiscount};
/// use foodhub_core::voucher::evaluate;
///
/// let now = Utc::now();
/// let voucher = Voucher {
///     code: "GIAM10".to_string(),
///     discount: VoucherDiscount::Percent {
///         rate: Percentage::from_bps(1000),
///         max_discount: Some(Money::from_minor(5_000)),
///     },
///     min_order_amount: Money::from_minor(50_000),
///     start_date: now - Duration::days(1),
///     end_date: now + Duration::days(1),
///     usage_limit: 100,
///     used_count: 0,
///     active: true,
/// };
///
/// // 10% of 100,000 = 10,000, capped at 5,000
/// let result = evaluate(Some(&voucher), Money::from_minor(100_000), now);
/// assert_eq!(result.discount.minor_units(), 5_000);
///
/// // Below the 50,000 minimum
/// let result = evaluate(Some(&voucher), Money::from_minor(30_000), now);
/// assert!(result.discount.is_zero());
/// ```
pub fn evaluate(voucher: Option<&Voucher>, subtotal: Money, now: DateTime<Utc>) -> VoucherEvaluation {
    let Some(voucher) = voucher else {
        return VoucherEvaluation::ineligible(None, Eligibility::NoVoucher);
    };
    let code = Some(voucher.code.as_str());

    let eligibility = if !voucher.active {
        Eligibility::Inactive
    } else if now < voucher.start_date {
        Eligibility::NotStarted
    } else if now > voucher.end_date {
        Eligibility::Expired
    } else if voucher.used_count >= voucher.usage_limit {
        Eligibility::UsageLimitReached
    } else if subtotal < voucher.min_order_amount {
        Eligibility::BelowMinimum
    } else {
        Eligibility::Applied
    };

    if eligibility == Eligibility::BelowMinimum {
        debug!(code = %voucher.code, %subtotal, "voucher below minimum order");
        let mut result = VoucherEvaluation::ineligible(code, eligibility);
        result.shortfall = Some(voucher.min_order_amount - subtotal);
        return result;
    }

    if eligibility != Eligibility::Applied {
        debug!(code = %voucher.code, ?eligibility, "voucher not applicable");
        return VoucherEvaluation::ineligible(code, eligibility);
    }

    let raw = match voucher.discount {
        VoucherDiscount::Percent { rate, max_discount } => {
            let raw = subtotal.percentage_of(rate);
            match max_discount {
                Some(cap) => raw.min(cap),
                None => raw,
            }
        }
        VoucherDiscount::FixedAmount(amount) => amount,
    };

    // Never negative, never more than the order itself
    let discount = raw.min(subtotal.floor_zero()).floor_zero();
    debug!(code = %voucher.code, %subtotal, %discount, "voucher applied");

    VoucherEvaluation {
        code: code.map(str::to_string),
        eligibility,
        discount,
        shortfall: None,
    }
}

/// Picks the voucher granting the largest discount.
///
/// Ties go to the earlier voucher in the list. Returns `None` when no
/// voucher applies.
pub fn best_voucher(vouchers: &[Voucher], subtotal: Money, now: DateTime<Utc>) -> Option<VoucherEvaluation> {
    let mut best: Option<VoucherEvaluation> = None;

    for voucher in vouchers {
        let result = evaluate(Some(voucher), subtotal, now);
        if !result.is_applied() {
            continue;
        }
        match &best {
            Some(current) if current.discount >= result.discount => {}
            _ => best = Some(result),
        }
    }

    best
}

// =============================================================================
// Unit Tests
// =============================================================================
