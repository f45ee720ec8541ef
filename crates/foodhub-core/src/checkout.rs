//! # Checkout
//!
//! Turns the customer's selection into an order draft: the payload the web
//! client posts to the order-creation API.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart page                                                              │
//! │  ┌──────────────────────────────┐                                       │
//! │  │ ☑ Quán A: Phở bò        ×2   │  customer ticks items of ONE shop     │
//! │  │ ☑ Quán A: Quẩy          ×1   │                                       │
//! │  │ ☐ Quán B: Bánh mì       ×1   │                                       │
//! │  └──────────────┬───────────────┘                                       │
//! │                 ▼                                                       │
//! │  prepare_order(cart, request, voucher, shipping, now)                   │
//! │     1. resolve selected keys against the cart                          │
//! │     2. reject empty / mixed-shop selections                             │
//! │     3. subtotal → shipping fee → voucher evaluation → totals            │
//! │                 ▼                                                       │
//! │  OrderDraft { clientOrderId, shopId, items, voucher, totals }           │
//! │                 ▼                                                       │
//! │  POST /orders/create  (web client, not this crate)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::shipping::ShippingPolicy;
use crate::totals::{compute_total, OrderTotals};
use crate::types::{LineItem, Voucher};
use crate::voucher::{evaluate, VoucherEvaluation};

/// Items the customer ticked on the cart page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutRequest {
    /// When set, every selected item must belong to this shop.
    #[serde(default)]
    pub shop_id: Option<String>,
    pub item_keys: Vec<String>,
}

impl CheckoutRequest {
    /// Selects every line of one shop.
    pub fn whole_shop(cart: &Cart, shop_id: &str) -> Self {
        CheckoutRequest {
            shop_id: Some(shop_id.to_string()),
            item_keys: cart
                .items_for_shop(shop_id)
                .map(|i| i.item_key.clone())
                .collect(),
        }
    }
}

/// Order payload ready for submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderDraft {
    /// Generated client-side; lets the API deduplicate double submits.
    #[ts(as = "String")]
    pub client_order_id: Uuid,
    pub shop_id: Option<String>,
    pub items: Vec<LineItem>,
    /// Set only when the voucher actually took something off.
    pub voucher_code: Option<String>,
    pub voucher: VoucherEvaluation,
    pub totals: OrderTotals,
}

/// Builds an order draft from the selected cart lines.
///
/// Selected keys that are not in the cart are ignored.
///
/// ## Errors
/// - `EmptySelection` when no selected key is in the cart
/// - `MixedShops` when selected lines come from different shops, or from a
///   shop other than `request.shop_id`
pub fn prepare_order(
    cart: &Cart,
    request: &CheckoutRequest,
    voucher: Option<&Voucher>,
    shipping: &ShippingPolicy,
    now: DateTime<Utc>,
) -> CoreResult<OrderDraft> {
    let items: Vec<LineItem> = cart
        .items()
        .iter()
        .filter(|i| request.item_keys.iter().any(|k| *k == i.item_key))
        .cloned()
        .collect();

    let Some(first) = items.first() else {
        return Err(CoreError::EmptySelection);
    };

    let shop_id = match request.shop_id.as_deref() {
        Some(requested) => Some(requested),
        None => first.shop_id.as_deref(),
    };
    if let Some(stray) = items.iter().find(|i| i.shop_id.as_deref() != shop_id) {
        return Err(CoreError::MixedShops {
            first: shop_label(shop_id),
            second: shop_label(stray.shop_id.as_deref()),
        });
    }
    let shop_id = shop_id.map(str::to_string);

    let subtotal: Money = items.iter().map(LineItem::line_total).sum();
    let shipping_fee = shipping.fee_for(subtotal);
    let evaluation = evaluate(voucher, subtotal, now);
    let totals = compute_total(subtotal, shipping_fee, evaluation.discount)?;

    let voucher_code = if evaluation.discount.is_positive() {
        evaluation.code.clone()
    } else {
        None
    };

    let draft = OrderDraft {
        client_order_id: Uuid::new_v4(),
        shop_id,
        items,
        voucher_code,
        voucher: evaluation,
        totals,
    };

    info!(
        order_id = %draft.client_order_id,
        lines = draft.items.len(),
        final_total = %draft.totals.final_total,
        "order draft prepared"
    );

    Ok(draft)
}

fn shop_label(shop_id: Option<&str>) -> String {
    shop_id.unwrap_or("(no shop)").to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Food, Percentage, VoucherDiscount};
    use crate::voucher::Eligibility;
    use chrono::Duration;

    fn cart() -> Cart {
        let mut cart = Cart::new();
        let pho = Food::new("a1", "Phở bò", Money::from_minor(50_000))
            .unwrap()
            .with_shop("shop-a");
        let quay = Food::new("a2", "Quẩy", Money::from_minor(10_000))
            .unwrap()
            .with_shop("shop-a")
            .with_discount(Percentage::from_bps(5000));
        let banh_mi = Food::new("b1", "Bánh mì", Money::from_minor(25_000))
            .unwrap()
            .with_shop("shop-b");

        cart.add_item(&pho, 2).unwrap();
        cart.add_one(&quay).unwrap();
        cart.add_one(&banh_mi).unwrap();
        cart
    }

    fn voucher(now: DateTime<Utc>) -> Voucher {
        Voucher {
            code: "GIAM10".to_string(),
            discount: VoucherDiscount::Percent {
                rate: Percentage::from_bps(1000),
                max_discount: Some(Money::from_minor(5_000)),
            },
            min_order_amount: Money::from_minor(50_000),
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(1),
            usage_limit: 100,
            used_count: 0,
            active: true,
        }
    }

    fn request(keys: &[&str]) -> CheckoutRequest {
        CheckoutRequest {
            shop_id: None,
            item_keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn test_prepare_order_with_voucher() {
        let now = Utc::now();
        let cart = cart();
        let draft = prepare_order(
            &cart,
            &request(&["a1", "a2"]),
            Some(&voucher(now)),
            &ShippingPolicy::default(),
            now,
        )
        .unwrap();

        // 2 × 50,000 + 1 × 5,000 (50% off 10,000)
        assert_eq!(draft.totals.subtotal.minor_units(), 105_000);
        assert_eq!(draft.totals.shipping_fee.minor_units(), 15_000);
        assert_eq!(draft.totals.discount_amount.minor_units(), 5_000);
        assert_eq!(draft.totals.final_total.minor_units(), 115_000);
        assert_eq!(draft.shop_id.as_deref(), Some("shop-a"));
        assert_eq!(draft.voucher_code.as_deref(), Some("GIAM10"));
        assert_eq!(draft.items.len(), 2);
    }

    #[test]
    fn test_ineligible_voucher_not_attached() {
        let now = Utc::now();
        let cart = cart();
        let draft = prepare_order(
            &cart,
            &request(&["b1"]),
            Some(&voucher(now)),
            &ShippingPolicy::default(),
            now,
        )
        .unwrap();

        assert_eq!(draft.voucher.eligibility, Eligibility::BelowMinimum);
        assert_eq!(draft.voucher_code, None);
        assert_eq!(draft.totals.final_total.minor_units(), 40_000);
    }

    #[test]
    fn test_empty_selection() {
        let now = Utc::now();
        let result = prepare_order(
            &cart(),
            &request(&["missing"]),
            None,
            &ShippingPolicy::default(),
            now,
        );
        assert!(matches!(result, Err(CoreError::EmptySelection)));
    }

    #[test]
    fn test_mixed_shops() {
        let now = Utc::now();
        let result = prepare_order(
            &cart(),
            &request(&["a1", "b1"]),
            None,
            &ShippingPolicy::default(),
            now,
        );
        assert!(matches!(result, Err(CoreError::MixedShops { .. })));

        let mut req = request(&["b1"]);
        req.shop_id = Some("shop-a".to_string());
        let result = prepare_order(&cart(), &req, None, &ShippingPolicy::default(), now);
        assert!(matches!(
            result,
            Err(CoreError::MixedShops { ref first, ref second }) if first == "shop-a" && second == "shop-b"
        ));
    }

    #[test]
    fn test_whole_shop_request() {
        let cart = cart();
        let req = CheckoutRequest::whole_shop(&cart, "shop-a");
        assert_eq!(req.item_keys, vec!["a1".to_string(), "a2".to_string()]);

        let draft = prepare_order(&cart, &req, None, &ShippingPolicy::default(), Utc::now()).unwrap();
        assert_eq!(draft.voucher.eligibility, Eligibility::NoVoucher);
        assert_eq!(draft.totals.final_total.minor_units(), 120_000);
    }

    #[test]
    fn test_checkout_above_price_bound() {
        let mut cart = Cart::new();
        let banquet = Food::new("f1", "Tiệc", Money::from_minor(crate::MAX_AMOUNT)).unwrap();
        cart.add_item(&banquet, 2).unwrap();

        let draft = prepare_order(
            &cart,
            &request(&["f1"]),
            None,
            &ShippingPolicy::default(),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(draft.totals.subtotal.minor_units(), 2 * crate::MAX_AMOUNT);
        assert_eq!(
            draft.totals.final_total.minor_units(),
            2 * crate::MAX_AMOUNT + 15_000
        );
    }

    #[test]
    fn test_draft_ids_are_unique() {
        let cart = cart();
        let req = request(&["b1"]);
        let policy = ShippingPolicy::default();
        let a = prepare_order(&cart, &req, None, &policy, Utc::now()).unwrap();
        let b = prepare_order(&cart, &req, None, &policy, Utc::now()).unwrap();
        assert_ne!(a.client_order_id, b.client_order_id);
    }
}
