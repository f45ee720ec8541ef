//! # Validation Module
//!
//! Input validation for records arriving from the web client and the
//! remote API.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web client forms                                             │
//! │  ├── Quantity steppers, note length counters                           │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Wire record → domain type (THIS MODULE)                      │
//! │  ├── JSON numbers arrive as f64: NaN, ∞, negatives, fractions          │
//! │  └── Rejected with ValidationError, never coerced                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart / voucher rules                                         │
//! │  └── Limits, eligibility, clamping                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use foodhub_core::validation::{validate_amount, validate_percent};
//!
//! let price = validate_amount(50_000.0, "price").unwrap();
//! assert_eq!(price.minor_units(), 50_000);
//!
//! assert!(validate_amount(f64::NAN, "price").is_err());
//! assert!(validate_percent(120.0, "discountPercent").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Percentage;
use crate::MAX_AMOUNT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted item key / shop id / voucher code.
const MAX_KEY_LEN: usize = 64;

/// Longest accepted display name.
const MAX_NAME_LEN: usize = 200;

/// Longest accepted kitchen note.
pub const MAX_NOTE_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an identifier (item key, shop id, voucher code).
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 64 characters
///
/// ## Example
/// ```rust
/// use foodhub_core::validation::validate_key;
///
/// assert!(validate_key("6650f1c2a9", "itemKey").is_ok());
/// assert!(validate_key("  ", "itemKey").is_err());
/// ```
pub fn validate_key(key: &str, field: &str) -> ValidationResult<()> {
    if key.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if key.chars().count() > MAX_KEY_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_KEY_LEN,
        });
    }

    Ok(())
}

/// Validates a display name.
///
/// Names may be empty (the API sometimes omits them); only length is
/// checked.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a kitchen note and returns it trimmed.
///
/// A blank note becomes `None`.
pub fn validate_note(note: &str) -> ValidationResult<Option<String>> {
    let note = note.trim();

    if note.chars().count() > MAX_NOTE_LEN {
        return Err(ValidationError::TooLong {
            field: "note".to_string(),
            max: MAX_NOTE_LEN,
        });
    }

    if note.is_empty() {
        Ok(None)
    } else {
        Ok(Some(note.to_string()))
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a currency amount sent as a JSON number.
///
/// ## Rules
/// - Must be finite (NaN and ±∞ rejected)
/// - Must be non-negative; zero is allowed (free items, free shipping)
/// - Must be a whole number of minor units
/// - Must not exceed [`MAX_AMOUNT`]
pub fn validate_amount(value: f64, field: &str) -> ValidationResult<Money> {
    if !value.is_finite() {
        return Err(ValidationError::NotANumber {
            field: field.to_string(),
        });
    }

    if value < 0.0 || value > MAX_AMOUNT as f64 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT,
        });
    }

    if value.fract() != 0.0 {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a whole number of the smallest currency unit".to_string(),
        });
    }

    Ok(Money::from_minor(value as i64))
}

/// Validates a derived amount (subtotal, fee, discount).
///
/// Only the sign is checked: a subtotal may legitimately exceed the
/// per-price bound.
pub fn validate_non_negative(amount: Money, field: &str) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates an already-typed amount (non-negative, within bounds).
pub fn validate_money(amount: Money, field: &str) -> ValidationResult<()> {
    if amount.is_negative() || amount.minor_units() > MAX_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT,
        });
    }

    Ok(())
}

/// Validates a percentage in the 0–100 range and converts it to basis
/// points.
///
/// Precision beyond 0.01% is rounded to the nearest basis point.
///
/// ## Example
/// ```rust
/// use foodhub_core::validation::validate_percent;
///
/// assert_eq!(validate_percent(12.5, "discountValue").unwrap().bps(), 1250);
/// assert!(validate_percent(-1.0, "discountValue").is_err());
/// ```
pub fn validate_percent(value: f64, field: &str) -> ValidationResult<Percentage> {
    if !value.is_finite() {
        return Err(ValidationError::NotANumber {
            field: field.to_string(),
        });
    }

    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(Percentage::from_bps((value * 100.0).round() as u32))
}

/// Validates a non-negative counter (usage limit, used count).
pub fn validate_count(value: i64, field: &str) -> ValidationResult<u32> {
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: u32::MAX as i64,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
