//! # foodhub-core: Cart & Pricing Logic for FoodHub
//!
//! This crate is the pricing **heart** of the FoodHub web client. It holds
//! the cart, voucher and order-total rules as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        FoodHub Client Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Client (React)                           │   │
//! │  │    Menu ──► Cart page ──► Checkout page ──► Order history       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               foodhub-session                                   │   │
//! │  │    SharedCart, persistence hooks, config, tracing               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ foodhub-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │   cart   │ │ voucher  │ │  totals  │ │ checkout/shipping│  │   │
//! │  │   │ Cart     │ │ evaluate │ │ compute_ │ │ prepare_order    │  │   │
//! │  │   │ LineItem │ │ best_    │ │ total    │ │ ShippingPolicy   │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK READS IN EVALUATORS • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Remote REST API: menu, vouchers, orders (called by the web client)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire and domain records (Food, LineItem, Voucher)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart aggregate and per-item effective price
//! - [`voucher`] - Voucher eligibility and discount
//! - [`totals`] - Order total calculator
//! - [`shipping`] - Default shipping fee rule
//! - [`checkout`] - Selection → order draft
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use foodhub_core::{compute_total, Cart, Food, Money};
//!
//! let mut cart = Cart::new();
//! let pho = Food::new("f1", "Phở", Money::from_minor(50_000)).unwrap();
//! cart.add_one(&pho).unwrap();
//! cart.add_one(&pho).unwrap();
//! assert_eq!(cart.subtotal().minor_units(), 100_000);
//!
//! let totals = compute_total(cart.subtotal(), Money::from_minor(15_000), Money::zero()).unwrap();
//! assert_eq!(totals.final_total.minor_units(), 115_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod shipping;
pub mod totals;
pub mod types;
pub mod validation;
pub mod voucher;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{effective_price, Cart, CartLimits};
pub use checkout::{prepare_order, CheckoutRequest, OrderDraft};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use shipping::ShippingPolicy;
pub use totals::{compute_total, OrderTotals};
pub use types::*;
pub use voucher::{best_voucher, evaluate, Eligibility, VoucherEvaluation};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Catches typos on the quantity stepper (1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Largest accepted amount in minor units (1,000 billion đồng).
///
/// Keeps `price × MAX_ITEM_QUANTITY × MAX_CART_ITEMS` well inside `i64`.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;
