//! # Cart Aggregate
//!
//! The authoritative in-memory representation of what the customer intends
//! to buy.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  UI Action              Operation              Cart Change              │
//! │  ─────────              ─────────              ───────────              │
//! │                                                                         │
//! │  "Thêm" on a dish ────► add_item(food, 1) ───► push / qty += 1          │
//! │                                                                         │
//! │  +/- stepper ─────────► set_quantity(k, n) ──► qty = n, or remove       │
//! │                                                 when n <= 0             │
//! │                                                                         │
//! │  Trash icon ──────────► remove_item(k) ──────► retain(k != key)         │
//! │                                                                         │
//! │  After order placed ──► clear() ─────────────► items.clear()            │
//! │                                                                         │
//! │  Header badge ────────► total_item_count() ──► (read only)              │
//! │  Cart summary ────────► subtotal() ──────────► (read only)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart never persists itself. The application saves a snapshot after
//! each mutation (see `foodhub-session`).

use tracing::debug;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Food, LineItem, Percentage};
use crate::validation::{validate_key, validate_money, validate_name, validate_note};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Per-Item Pricing
// =============================================================================

/// Unit price after applying a catalog discount.
///
/// `price × (1 − discount/100)` when a discount is present and greater than
/// zero, otherwise `price`. Rounded half up to the minor unit.
///
/// ## Example
/// ```rust
/// use foodhub_core::cart::effective_price;
/// use foodhub_core::money::Money;
/// use foodhub_core::types::Percentage;
///
/// let price = Money::from_minor(100_000);
/// assert_eq!(effective_price(price, Some(Percentage::from_bps(2000))).minor_units(), 80_000);
/// assert_eq!(effective_price(price, None), price);
/// ```
pub fn effective_price(price: Money, discount: Option<Percentage>) -> Money {
    match discount {
        Some(rate) if !rate.is_zero() => price.apply_percentage_discount(rate),
        _ => price,
    }
}

impl LineItem {
    /// Unit price after the frozen catalog discount.
    #[inline]
    pub fn effective_price(&self) -> Money {
        effective_price(self.price, self.discount_percent)
    }

    /// Effective price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.effective_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Limits
// =============================================================================

/// Size limits enforced on add / set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLimits {
    /// Maximum distinct line items.
    pub max_items: usize,
    /// Maximum quantity of a single line.
    pub max_quantity: i64,
}

impl Default for CartLimits {
    fn default() -> Self {
        CartLimits {
            max_items: MAX_CART_ITEMS,
            max_quantity: MAX_ITEM_QUANTITY,
        }
    }
}

impl CartLimits {
    /// Caps both limits at the crate maximums.
    ///
    /// `MAX_AMOUNT × MAX_ITEM_QUANTITY × MAX_CART_ITEMS` fits in `i64`, so a
    /// cart built with clamped limits cannot overflow its subtotal.
    pub fn clamped(self) -> Self {
        CartLimits {
            max_items: self.max_items.min(MAX_CART_ITEMS),
            max_quantity: self.max_quantity.min(MAX_ITEM_QUANTITY),
        }
    }

    /// Checks a line quantity against these limits.
    fn check_quantity(&self, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return Err(CoreError::InvalidQuantity { quantity });
        }
        if quantity > self.max_quantity {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: self.max_quantity,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `item_key` (adding the same food increases quantity)
/// - Every quantity is in `1..=limits.max_quantity`
/// - At most `limits.max_items` lines
/// - Lines keep insertion order for display
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
    limits: CartLimits,
}

impl Cart {
    /// Creates a new empty cart with default limits.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Creates a new empty cart with custom limits.
    ///
    /// Limits above [`MAX_CART_ITEMS`] / [`MAX_ITEM_QUANTITY`] are clamped.
    pub fn with_limits(limits: CartLimits) -> Self {
        Cart {
            items: Vec::new(),
            limits: limits.clamped(),
        }
    }

    /// Rebuilds a cart from previously saved lines.
    ///
    /// Every line is re-validated; a snapshot edited by hand (or written by
    /// an older client) cannot smuggle in a zero quantity or a negative price.
    pub fn from_items(items: Vec<LineItem>, limits: CartLimits) -> CoreResult<Self> {
        let limits = limits.clamped();
        if items.len() > limits.max_items {
            return Err(CoreError::CartTooLarge {
                max: limits.max_items,
            });
        }

        for (i, item) in items.iter().enumerate() {
            validate_key(&item.item_key, "itemKey")?;
            validate_name(&item.name)?;
            validate_money(item.price, "price")?;
            limits.check_quantity(item.quantity)?;
            if let Some(note) = &item.note {
                validate_note(note)?;
            }
            if items[..i].iter().any(|prev| prev.item_key == item.item_key) {
                return Err(ValidationError::InvalidFormat {
                    field: "itemKey".to_string(),
                    reason: format!("duplicate line for {}", item.item_key),
                }
                .into());
            }
        }

        Ok(Cart { items, limits })
    }

    /// Adds `quantity` of a food, or increases quantity if already present.
    ///
    /// ## Behavior
    /// - Already in cart: quantity increases; the frozen snapshot is kept
    /// - Not in cart: a new line captures name / price / discount now
    ///
    /// ## Errors
    /// - `InvalidQuantity` when `quantity <= 0` (the cart is left untouched)
    /// - `QuantityTooLarge` when the line would exceed the per-line maximum
    /// - `CartTooLarge` when a new line would exceed the line limit
    pub fn add_item(&mut self, food: &Food, quantity: i64) -> CoreResult<()> {
        debug!(item_key = %food.item_key(), quantity, "add_item");

        let limits = self.limits;
        limits.check_quantity(quantity)?;

        if let Some(item) = self.find_mut(food.item_key()) {
            let new_qty = item.quantity.saturating_add(quantity);
            limits.check_quantity(new_qty)?;
            item.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= self.limits.max_items {
            return Err(CoreError::CartTooLarge {
                max: self.limits.max_items,
            });
        }

        self.items.push(LineItem::from_food(food, quantity));
        Ok(())
    }

    /// Adds a single unit, the default for a tap on "add".
    pub fn add_one(&mut self, food: &Food) -> CoreResult<()> {
        self.add_item(food, 1)
    }

    /// Removes a line by key.
    ///
    /// Absent keys are a no-op. Returns whether a line was removed.
    pub fn remove_item(&mut self, item_key: &str) -> bool {
        debug!(item_key, "remove_item");

        let initial_len = self.items.len();
        self.items.retain(|i| i.item_key != item_key);
        self.items.len() != initial_len
    }

    /// Sets the quantity of a line.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: removes the line
    /// - Key not in cart: no-op
    ///
    /// ## Errors
    /// - `QuantityTooLarge` when above the per-line maximum
    pub fn set_quantity(&mut self, item_key: &str, quantity: i64) -> CoreResult<()> {
        debug!(item_key, quantity, "set_quantity");

        if quantity <= 0 {
            self.remove_item(item_key);
            return Ok(());
        }

        self.limits.check_quantity(quantity)?;

        if let Some(item) = self.find_mut(item_key) {
            item.quantity = quantity;
        }
        Ok(())
    }

    /// Sets or clears (blank string) the kitchen note of a line.
    ///
    /// Key not in cart: no-op.
    pub fn set_note(&mut self, item_key: &str, note: &str) -> CoreResult<()> {
        debug!(item_key, "set_note");

        let note = validate_note(note)?;
        if let Some(item) = self.find_mut(item_key) {
            item.note = note;
        }
        Ok(())
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        debug!(lines = self.items.len(), "clear");
        self.items.clear();
    }

    /// Sum of effective price × quantity. Empty cart → 0.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of quantities. Empty cart → 0.
    pub fn total_item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_in_cart(&self, item_key: &str) -> bool {
        self.get(item_key).is_some()
    }

    /// Quantity of a line, 0 when absent.
    pub fn item_quantity(&self, item_key: &str) -> i64 {
        self.get(item_key).map_or(0, |i| i.quantity)
    }

    pub fn get(&self, item_key: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.item_key == item_key)
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn limits(&self) -> CartLimits {
        self.limits
    }

    /// Distinct shop ids in first-seen order.
    pub fn shop_ids(&self) -> Vec<&str> {
        let mut shops: Vec<&str> = Vec::new();
        for shop in self.items.iter().filter_map(|i| i.shop_id.as_deref()) {
            if !shops.contains(&shop) {
                shops.push(shop);
            }
        }
        shops
    }

    /// Lines sold by one shop.
    pub fn items_for_shop<'a>(&'a self, shop_id: &'a str) -> impl Iterator<Item = &'a LineItem> {
        self.items
            .iter()
            .filter(move |i| i.shop_id.as_deref() == Some(shop_id))
    }

    fn find_mut(&mut self, item_key: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|i| i.item_key == item_key)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn food(key: &str, price: i64) -> Food {
        Food::new(key, format!("Món {}", key), Money::from_minor(price)).unwrap()
    }

    #[test]
    fn test_add_same_food_twice_increments() {
        let mut cart = Cart::new();
        let pho = Food::new("f1", "Phở", Money::from_minor(50_000)).unwrap();

        cart.add_one(&pho).unwrap();
        cart.add_one(&pho).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_quantity("f1"), 2);
        assert_eq!(cart.subtotal().minor_units(), 100_000);
    }

    #[test]
    fn test_discounted_item_subtotal() {
        let mut cart = Cart::new();
        let com_tam = food("f2", 100_000).with_discount(Percentage::from_bps(2000));

        cart.add_one(&com_tam).unwrap();

        assert_eq!(cart.subtotal().minor_units(), 80_000);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        let item = food("f1", 10_000);

        assert!(matches!(
            cart.add_item(&item, 0),
            Err(CoreError::InvalidQuantity { quantity: 0 })
        ));
        assert!(matches!(
            cart.add_item(&item, -3),
            Err(CoreError::InvalidQuantity { quantity: -3 })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_price_is_frozen_at_first_add() {
        let mut cart = Cart::new();
        cart.add_one(&food("f1", 50_000)).unwrap();

        // Catalog price changed after the item was added
        let repriced = food("f1", 65_000).with_discount(Percentage::from_bps(5000));
        cart.add_one(&repriced).unwrap();

        let line = cart.get("f1").unwrap();
        assert_eq!(line.price.minor_units(), 50_000);
        assert_eq!(line.discount_percent, None);
        assert_eq!(cart.subtotal().minor_units(), 100_000);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&food("f1", 10_000), 2).unwrap();
        let before = cart.clone();

        assert!(!cart.remove_item("missing"));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_then_remove_leaves_empty() {
        let mut cart = Cart::new();
        cart.add_one(&food("f1", 10_000)).unwrap();

        assert!(cart.remove_item("f1"));
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::zero());
        assert_eq!(cart.total_item_count(), 0);
    }

    #[test]
    fn test_set_quantity_floor_removes() {
        let mut cart = Cart::new();
        cart.add_one(&food("f1", 10_000)).unwrap();
        cart.add_one(&food("f2", 20_000)).unwrap();

        cart.set_quantity("f1", 0).unwrap();
        cart.set_quantity("f2", -5).unwrap();

        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_updates_and_ignores_absent() {
        let mut cart = Cart::new();
        cart.add_one(&food("f1", 10_000)).unwrap();

        cart.set_quantity("f1", 4).unwrap();
        cart.set_quantity("missing", 3).unwrap();

        assert_eq!(cart.item_quantity("f1"), 4);
        assert!(!cart.is_in_cart("missing"));
        assert_eq!(cart.item_quantity("missing"), 0);
        assert_eq!(cart.total_item_count(), 4);
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = Cart::with_limits(CartLimits {
            max_items: 10,
            max_quantity: 5,
        });
        let item = food("f1", 10_000);

        cart.add_item(&item, 4).unwrap();
        assert!(matches!(
            cart.add_item(&item, 2),
            Err(CoreError::QuantityTooLarge { requested: 6, max: 5 })
        ));
        assert!(cart.set_quantity("f1", 6).is_err());
        assert_eq!(cart.item_quantity("f1"), 4);
    }

    #[test]
    fn test_line_limit() {
        let mut cart = Cart::with_limits(CartLimits {
            max_items: 2,
            max_quantity: 99,
        });
        cart.add_one(&food("f1", 1)).unwrap();
        cart.add_one(&food("f2", 1)).unwrap();

        assert!(matches!(
            cart.add_one(&food("f3", 1)),
            Err(CoreError::CartTooLarge { max: 2 })
        ));
        // Existing lines can still grow
        cart.add_one(&food("f1", 1)).unwrap();
    }

    #[test]
    fn test_oversized_limits_are_clamped() {
        let huge = CartLimits {
            max_items: usize::MAX,
            max_quantity: i64::MAX,
        };
        let mut cart = Cart::with_limits(huge);
        assert_eq!(cart.limits(), CartLimits::default());

        let priciest = food("f1", crate::MAX_AMOUNT);
        assert!(matches!(
            cart.add_item(&priciest, 10_000_000),
            Err(CoreError::QuantityTooLarge { max: MAX_ITEM_QUANTITY, .. })
        ));

        // Largest cart the clamped limits allow still sums without overflow
        for i in 0..MAX_CART_ITEMS {
            let dish = food(&format!("f{}", i), crate::MAX_AMOUNT);
            cart.add_item(&dish, MAX_ITEM_QUANTITY).unwrap();
        }
        let expected = crate::MAX_AMOUNT * MAX_ITEM_QUANTITY * MAX_CART_ITEMS as i64;
        assert_eq!(cart.subtotal().minor_units(), expected);

        let restored = Cart::from_items(cart.items().to_vec(), huge).unwrap();
        assert_eq!(restored.limits(), CartLimits::default());
    }

    #[test]
    fn test_notes() {
        let mut cart = Cart::new();
        cart.add_one(&food("f1", 10_000)).unwrap();

        cart.set_note("f1", " không hành ").unwrap();
        assert_eq!(cart.get("f1").unwrap().note.as_deref(), Some("không hành"));

        cart.set_note("f1", "").unwrap();
        assert_eq!(cart.get("f1").unwrap().note, None);

        cart.set_note("missing", "ignored").unwrap();
        assert!(cart.set_note("f1", &"x".repeat(300)).is_err());
    }

    #[test]
    fn test_shop_grouping() {
        let mut cart = Cart::new();
        cart.add_one(&food("a1", 10_000).with_shop("shop-a")).unwrap();
        cart.add_one(&food("b1", 20_000).with_shop("shop-b")).unwrap();
        cart.add_one(&food("a2", 30_000).with_shop("shop-a")).unwrap();

        assert_eq!(cart.shop_ids(), vec!["shop-a", "shop-b"]);
        let keys: Vec<&str> = cart
            .items_for_shop("shop-a")
            .map(|i| i.item_key.as_str())
            .collect();
        assert_eq!(keys, vec!["a1", "a2"]);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(&food("f1", 999), 2).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_items_validates() {
        let mut line = LineItem::from_food(&food("f1", 10_000), 1);
        let cart = Cart::from_items(vec![line.clone()], CartLimits::default()).unwrap();
        assert_eq!(cart.total_item_count(), 1);

        let duplicate = vec![line.clone(), line.clone()];
        assert!(Cart::from_items(duplicate, CartLimits::default()).is_err());

        line.quantity = 0;
        assert!(matches!(
            Cart::from_items(vec![line.clone()], CartLimits::default()),
            Err(CoreError::InvalidQuantity { quantity: 0 })
        ));

        line.quantity = 1;
        line.price = Money::from_minor(-1);
        assert!(Cart::from_items(vec![line], CartLimits::default()).is_err());
    }
}
