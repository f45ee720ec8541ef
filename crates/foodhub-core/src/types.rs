//! # Domain Types
//!
//! Records shared between the cart engine and the web client.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │   Wire (from API)            Domain (validated)        Output           │
//! │  ┌─────────────────┐  TryFrom  ┌─────────────────┐   ┌──────────────┐   │
//! │  │   FoodInput     │ ────────► │      Food       │──►│   LineItem   │   │
//! │  │  price: f64     │           │  price: Money   │   │  (snapshot)  │   │
//! │  └─────────────────┘           └─────────────────┘   └──────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────┐  TryFrom  ┌─────────────────┐                      │
//! │  │  VoucherInput   │ ────────► │     Voucher     │                      │
//! │  │  "PERCENT", f64 │           │ VoucherDiscount │                      │
//! │  └─────────────────┘           └─────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A [`LineItem`] copies name, price and discount from the [`Food`] at the
//! moment it is first added. Later catalog changes do not reach the cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    validate_amount, validate_count, validate_key, validate_money, validate_name,
    validate_percent, ValidationResult,
};

// =============================================================================
// Percentage
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 2000 bps = 20% off
///
/// On the wire it is the plain 0–100 number the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percentage(u32);

impl Percentage {
    /// Creates a percentage from basis points, capped at 100%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > 10000 {
            Percentage(10000)
        } else {
            Percentage(bps)
        }
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// 0%.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(0)
    }

    /// 100%.
    #[inline]
    pub const fn full() -> Self {
        Percentage(10000)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<f64> for Percentage {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        validate_percent(value, "percent")
    }
}

impl From<Percentage> for f64 {
    fn from(rate: Percentage) -> f64 {
        rate.percent()
    }
}

// =============================================================================
// Food (product being added)
// =============================================================================

/// A food item as returned by the menu API.
///
/// Numbers are kept as the raw JSON `f64` so that malformed values can be
/// reported instead of failing deserialization outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FoodInput {
    pub item_key: String,
    #[serde(default)]
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub discount_percent: Option<f64>,
    #[serde(default)]
    pub shop_id: Option<String>,
}

/// A validated food item, ready to be added to a cart.
///
/// ## Example
/// ```rust
/// use foodhub_core::money::Money;
/// use foodhub_core::types::{Food, Percentage};
///
/// let food = Food::new("f2", "Cơm tấm", Money::from_minor(100_000))
///     .unwrap()
///     .with_discount(Percentage::from_bps(2000));
/// assert_eq!(food.discount(), Some(Percentage::from_bps(2000)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    item_key: String,
    name: String,
    price: Money,
    discount: Option<Percentage>,
    shop_id: Option<String>,
}

impl Food {
    /// Creates a food item with no discount and no shop.
    ///
    /// ## Errors
    /// - blank or overlong `item_key`
    /// - overlong `name`
    /// - negative `price`
    pub fn new(
        item_key: impl Into<String>,
        name: impl Into<String>,
        price: Money,
    ) -> ValidationResult<Self> {
        let item_key = item_key.into();
        let name = name.into();

        validate_key(&item_key, "itemKey")?;
        validate_name(&name)?;
        validate_money(price, "price")?;

        Ok(Food {
            item_key,
            name,
            price,
            discount: None,
            shop_id: None,
        })
    }

    /// Sets the catalog discount. A zero discount is stored as none.
    pub fn with_discount(mut self, discount: Percentage) -> Self {
        self.discount = if discount.is_zero() { None } else { Some(discount) };
        self
    }

    /// Sets the shop this item is sold by.
    pub fn with_shop(mut self, shop_id: impl Into<String>) -> Self {
        self.shop_id = Some(shop_id.into());
        self
    }

    #[inline]
    pub fn item_key(&self) -> &str {
        &self.item_key
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }

    #[inline]
    pub fn discount(&self) -> Option<Percentage> {
        self.discount
    }

    #[inline]
    pub fn shop_id(&self) -> Option<&str> {
        self.shop_id.as_deref()
    }
}

impl TryFrom<FoodInput> for Food {
    type Error = ValidationError;

    fn try_from(input: FoodInput) -> Result<Self, Self::Error> {
        let price = validate_amount(input.price, "price")?;
        let mut food = Food::new(input.item_key, input.name, price)?;

        if let Some(pct) = input.discount_percent {
            food = food.with_discount(validate_percent(pct, "discountPercent")?);
        }

        if let Some(shop_id) = input.shop_id {
            validate_key(&shop_id, "shopId")?;
            food = food.with_shop(shop_id);
        }

        Ok(food)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product entry in a cart, with its own quantity and price snapshot.
///
/// ## Invariants
/// - `quantity >= 1` (a line that would drop to zero is removed instead)
/// - `price`, `discount_percent`, `name` are frozen at first add
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    pub item_key: String,

    /// Display name at time of adding (frozen)
    pub name: String,

    /// Unit base price at time of adding (frozen)
    #[ts(as = "f64")]
    pub price: Money,

    /// Catalog discount at time of adding (frozen)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<f64>")]
    pub discount_percent: Option<Percentage>,

    pub quantity: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<String>,

    /// Kitchen instruction ("ít hành", "no chili")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LineItem {
    /// Creates a line from a food snapshot.
    pub fn from_food(food: &Food, quantity: i64) -> Self {
        LineItem {
            item_key: food.item_key.clone(),
            name: food.name.clone(),
            price: food.price,
            discount_percent: food.discount,
            quantity,
            shop_id: food.shop_id.clone(),
            note: None,
        }
    }
}

// =============================================================================
// Voucher
// =============================================================================

/// How a voucher's `discountValue` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum DiscountType {
    /// `discountValue` is a 0–100 percentage of the subtotal.
    Percent,
    /// `discountValue` is an amount in minor units.
    FixedAmount,
}

/// A voucher as returned by the shop voucher API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VoucherInput {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(default)]
    pub max_discount: Option<f64>,
    #[serde(default)]
    pub min_order_amount: f64,
    #[ts(as = "String")]
    pub start_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub end_date: DateTime<Utc>,
    pub usage_limit: i64,
    #[serde(default)]
    pub used_count: i64,
    pub active: bool,
}

/// The discount formula of a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoucherDiscount {
    /// Percentage of the subtotal, optionally capped.
    Percent {
        rate: Percentage,
        max_discount: Option<Money>,
    },
    /// Flat amount off.
    FixedAmount(Money),
}

/// A validated voucher definition.
///
/// The cart engine only reads vouchers; `used_count` is maintained by the
/// shop back office.
#[derive(Debug, Clone, PartialEq)]
pub struct Voucher {
    pub code: String,
    pub discount: VoucherDiscount,
    pub min_order_amount: Money,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub usage_limit: u32,
    pub used_count: u32,
    pub active: bool,
}

impl TryFrom<VoucherInput> for Voucher {
    type Error = ValidationError;

    fn try_from(input: VoucherInput) -> Result<Self, Self::Error> {
        validate_key(&input.code, "code")?;

        // maxDiscount only caps percentage vouchers
        let discount = match input.discount_type {
            DiscountType::Percent => VoucherDiscount::Percent {
                rate: validate_percent(input.discount_value, "discountValue")?,
                max_discount: input
                    .max_discount
                    .map(|cap| validate_amount(cap, "maxDiscount"))
                    .transpose()?,
            },
            DiscountType::FixedAmount => VoucherDiscount::FixedAmount(validate_amount(
                input.discount_value,
                "discountValue",
            )?),
        };

        if input.start_date > input.end_date {
            return Err(ValidationError::InvalidFormat {
                field: "endDate".to_string(),
                reason: "must not be before startDate".to_string(),
            });
        }

        Ok(Voucher {
            code: input.code,
            discount,
            min_order_amount: validate_amount(input.min_order_amount, "minOrderAmount")?,
            start_date: input.start_date,
            end_date: input.end_date,
            usage_limit: validate_count(input.usage_limit, "usageLimit")?,
            used_count: validate_count(input.used_count, "usedCount")?,
            active: input.active,
        })
    }
}

impl Voucher {
    /// Returns the wire type of this voucher's discount.
    pub fn discount_type(&self) -> DiscountType {
        match self.discount {
            VoucherDiscount::Percent { .. } => DiscountType::Percent,
            VoucherDiscount::FixedAmount(_) => DiscountType::FixedAmount,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn voucher_input() -> VoucherInput {
        VoucherInput {
            code: "GIAM10".to_string(),
            discount_type: DiscountType::Percent,
            discount_value: 10.0,
            max_discount: Some(5_000.0),
            min_order_amount: 50_000.0,
            start_date: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap(),
            usage_limit: 100,
            used_count: 0,
            active: true,
        }
    }

    #[test]
    fn test_percentage_caps_at_full() {
        assert_eq!(Percentage::from_bps(12_000), Percentage::full());
        assert!((Percentage::from_bps(825).percent() - 8.25).abs() < 0.001);
    }

    #[test]
    fn test_percentage_wire_format() {
        let json = serde_json::to_string(&Percentage::from_bps(2000)).unwrap();
        assert_eq!(json, "20.0");

        let parsed: Percentage = serde_json::from_str("12.5").unwrap();
        assert_eq!(parsed.bps(), 1250);

        assert!(serde_json::from_str::<Percentage>("101").is_err());
    }

    #[test]
    fn test_food_from_input() {
        let input: FoodInput = serde_json::from_str(
            r#"{"itemKey":"f2","price":100000,"discountPercent":20,"shopId":"s1"}"#,
        )
        .unwrap();
        let food = Food::try_from(input).unwrap();

        assert_eq!(food.item_key(), "f2");
        assert_eq!(food.name(), "");
        assert_eq!(food.price().minor_units(), 100_000);
        assert_eq!(food.discount(), Some(Percentage::from_bps(2000)));
        assert_eq!(food.shop_id(), Some("s1"));
    }

    #[test]
    fn test_food_rejects_malformed_numbers() {
        let mut input = FoodInput {
            item_key: "f1".to_string(),
            name: "Phở".to_string(),
            price: f64::NAN,
            discount_percent: None,
            shop_id: None,
        };
        assert!(matches!(
            Food::try_from(input.clone()),
            Err(ValidationError::NotANumber { .. })
        ));

        input.price = -10.0;
        assert!(Food::try_from(input.clone()).is_err());

        input.price = 10.0;
        input.discount_percent = Some(150.0);
        assert!(Food::try_from(input).is_err());
    }

    #[test]
    fn test_zero_discount_stored_as_none() {
        let food = Food::new("f1", "Phở", Money::from_minor(50_000))
            .unwrap()
            .with_discount(Percentage::zero());
        assert_eq!(food.discount(), None);
    }

    #[test]
    fn test_line_item_wire_format() {
        let food = Food::new("f1", "Phở", Money::from_minor(50_000)).unwrap();
        let line = LineItem::from_food(&food, 2);
        let json = serde_json::to_value(&line).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "itemKey": "f1",
                "name": "Phở",
                "price": 50000,
                "quantity": 2
            })
        );
    }

    #[test]
    fn test_voucher_from_input() {
        let voucher = Voucher::try_from(voucher_input()).unwrap();
        assert_eq!(voucher.discount_type(), DiscountType::Percent);
        assert_eq!(
            voucher.discount,
            VoucherDiscount::Percent {
                rate: Percentage::from_bps(1000),
                max_discount: Some(Money::from_minor(5_000)),
            }
        );
        assert_eq!(voucher.min_order_amount.minor_units(), 50_000);
    }

    #[test]
    fn test_voucher_wire_names() {
        let json = r#"{
            "code": "FREESHIP",
            "discountType": "FIXED_AMOUNT",
            "discountValue": 15000,
            "minOrderAmount": 0,
            "startDate": "2026-01-01T00:00:00Z",
            "endDate": "2026-02-01T00:00:00Z",
            "usageLimit": 10,
            "usedCount": 3,
            "active": true
        }"#;
        let input: VoucherInput = serde_json::from_str(json).unwrap();
        let voucher = Voucher::try_from(input).unwrap();

        assert_eq!(
            voucher.discount,
            VoucherDiscount::FixedAmount(Money::from_minor(15_000))
        );
        assert_eq!(voucher.used_count, 3);
    }

    #[test]
    fn test_voucher_rejects_bad_input() {
        let mut input = voucher_input();
        input.discount_value = f64::NAN;
        assert!(Voucher::try_from(input).is_err());

        let mut input = voucher_input();
        input.used_count = -1;
        assert!(Voucher::try_from(input).is_err());

        let mut input = voucher_input();
        std::mem::swap(&mut input.start_date, &mut input.end_date);
        assert!(Voucher::try_from(input).is_err());
    }
}
