//! # Shipping Policy
//!
//! Turns a subtotal into a shipping fee. The fee is an opaque input to
//! [`compute_total`](crate::totals::compute_total); this module is the
//! default rule the cart page applies before the API quotes a real fee.

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::money::Money;
use crate::validation::validate_money;

/// Flat delivery fee used by the cart page.
pub const DEFAULT_SHIPPING_FEE: Money = Money::from_minor(15_000);

/// Flat fee with an optional free-shipping threshold.
///
/// ## Rules
/// - Nothing selected (subtotal 0): no fee
/// - Subtotal at or above `free_shipping_threshold`: no fee
/// - Otherwise: `base_fee`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingPolicy {
    pub base_fee: Money,
    #[serde(default)]
    pub free_shipping_threshold: Option<Money>,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        ShippingPolicy {
            base_fee: DEFAULT_SHIPPING_FEE,
            free_shipping_threshold: None,
        }
    }
}

impl ShippingPolicy {
    /// Creates a validated policy.
    pub fn new(base_fee: Money, free_shipping_threshold: Option<Money>) -> CoreResult<Self> {
        validate_money(base_fee, "baseFee")?;
        if let Some(threshold) = free_shipping_threshold {
            validate_money(threshold, "freeShippingThreshold")?;
        }
        Ok(ShippingPolicy {
            base_fee,
            free_shipping_threshold,
        })
    }

    /// Fee charged for an order with this subtotal.
    ///
    /// ## Example
    /// ```rust
    /// use foodhub_core::money::Money;
    /// use foodhub_core::shipping::ShippingPolicy;
    ///
    /// let policy = ShippingPolicy::default();
    /// assert_eq!(policy.fee_for(Money::zero()), Money::zero());
    /// assert_eq!(policy.fee_for(Money::from_minor(55_000)).minor_units(), 15_000);
    /// ```
    pub fn fee_for(&self, subtotal: Money) -> Money {
        if !subtotal.is_positive() {
            return Money::zero();
        }
        match self.free_shipping_threshold {
            Some(threshold) if subtotal >= threshold => Money::zero(),
            _ => self.base_fee,
        }
    }
}
