//! # Error Types
//!
//! Domain-specific error types for foodhub-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  foodhub-core errors (this file)                                       │
//! │  ├── CoreError        - Cart / checkout rule violations                │
//! │  └── ValidationError  - Malformed input (NaN, negative price, ...)     │
//! │                                                                         │
//! │  foodhub-session errors (separate crate)                               │
//! │  ├── SessionError     - Config, snapshot store failures                │
//! │  └── ApiError         - What the web client sees (serialized)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → ApiError → UI      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! - Removing or updating an item that is not in the cart: a no-op.
//! - A voucher that does not apply: a zero-discount
//!   [`VoucherEvaluation`](crate::voucher::VoucherEvaluation) carrying the
//!   reason. Ineligibility is an expected outcome, not an exceptional one.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and checkout errors.
///
/// Every variant is raised synchronously by the offending call; nothing in
/// the core retries or partially applies an operation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Quantity to add was zero or negative.
    ///
    /// ## When This Occurs
    /// - `add_item` called with `quantity <= 0`
    ///
    /// `set_quantity` never raises this: a non-positive target quantity
    /// removes the line instead.
    #[error("Quantity must be positive, got {quantity}")]
    InvalidQuantity { quantity: i64 },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Cart has exceeded maximum allowed distinct items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Checkout was requested with nothing selected.
    #[error("Select at least one item from a shop to check out")]
    EmptySelection,

    /// Checkout selection spans more than one shop.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart page: customer ticks "Phở" (shop A) and "Bánh mì" (shop B)
    ///      │
    ///      ▼
    /// checkout::prepare_order(...)
    ///      │
    ///      ▼
    /// MixedShops { first: "A", second: "B" }
    ///      │
    ///      ▼
    /// UI shows: "Choose items from one shop"
    /// ```
    #[error("Selected items belong to different shops ({first} and {second})")]
    MixedShops { first: String, second: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns true for malformed-input failures.
    ///
    /// The UI uses this to tell "invalid operation" apart from rule
    /// violations such as a mixed-shop checkout.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidQuantity { .. }
                | CoreError::QuantityTooLarge { .. }
                | CoreError::Validation(_)
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised when a wire record (food, voucher, snapshot line) is converted
/// into a domain type. Values are never silently coerced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotANumber { field: String },

    /// Invalid format (fractional currency unit, reversed date range, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
