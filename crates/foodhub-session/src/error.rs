//! # Session Error Types
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow                                           │
//! │                                                                         │
//! │  Web client                  Rust                                       │
//! │  ──────────                  ────                                       │
//! │                                                                         │
//! │  add to cart ───────► CoreError::InvalidQuantity ──┐                    │
//! │  load snapshot ─────► SessionError::Io ────────────┤                    │
//! │  bad config ────────► SessionError::InvalidConfig ─┤                    │
//! │                                                    ▼                    │
//! │                                       ApiError { code, message }        │
//! │                                                    │                    │
//! │  catch (e) { switch (e.code) } ◄───────────────────┘                    │
//! │                                                                         │
//! │  NOTE: an inapplicable voucher never shows up here. It is a             │
//! │        VoucherEvaluation with a zero discount.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use foodhub_core::CoreError;
use serde::Serialize;
use thiserror::Error;

/// Errors raised by the session layer.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A cart or checkout rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Reading or writing a snapshot / config file failed.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot could not be encoded or decoded.
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The TOML config file is malformed.
    #[error("Config file is malformed: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A config value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SessionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SessionError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience type alias for Results with SessionError.
pub type SessionResult<T> = Result<T, SessionError>;

// =============================================================================
// API Error (what the web client receives)
// =============================================================================

/// Serializable error for the web client.
///
/// ```json
/// { "code": "VALIDATION_ERROR", "message": "Quantity must be positive, got 0" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for the web client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed input (NaN, negative price, zero quantity)
    ValidationError,

    /// Cart limit reached
    CartError,

    /// Checkout selection rejected (empty, mixed shops)
    CheckoutError,

    /// Snapshot could not be read or written
    StorageError,

    /// Configuration problem
    ConfigError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = if err.is_invalid_input() {
            ErrorCode::ValidationError
        } else {
            match err {
                CoreError::CartTooLarge { .. } => ErrorCode::CartError,
                _ => ErrorCode::CheckoutError,
            }
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Core(core) => ApiError::from(core),
            SessionError::Io { .. } | SessionError::Serialization(_) => {
                ApiError::new(ErrorCode::StorageError, err.to_string())
            }
            SessionError::ConfigParse(_) | SessionError::InvalidConfig(_) => {
                ApiError::new(ErrorCode::ConfigError, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodhub_core::ValidationError;

    #[test]
    fn test_core_errors_map_to_codes() {
        let err = ApiError::from(CoreError::InvalidQuantity { quantity: 0 });
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Quantity must be positive, got 0");

        let err = ApiError::from(CoreError::CartTooLarge { max: 100 });
        assert_eq!(err.code, ErrorCode::CartError);

        let err = ApiError::from(CoreError::EmptySelection);
        assert_eq!(err.code, ErrorCode::CheckoutError);

        let err = ApiError::from(CoreError::from(ValidationError::NotANumber {
            field: "price".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_session_errors_map_to_codes() {
        let io = SessionError::io(
            "/tmp/cart.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(ApiError::from(io).code, ErrorCode::StorageError);

        let cfg = SessionError::InvalidConfig("max_items must be positive".to_string());
        assert_eq!(ApiError::from(cfg).code, ErrorCode::ConfigError);
    }

    #[test]
    fn test_api_error_serialization() {
        let err = ApiError::new(ErrorCode::CheckoutError, "Select at least one item");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": "CHECKOUT_ERROR", "message": "Select at least one item" })
        );
    }
}
