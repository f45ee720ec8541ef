//! # Session Configuration
//!
//! Settings for the cart session, loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`FOODHUB_*`)
//! 2. Config file (`session.toml`)
//! 3. Defaults (this file)
//!
//! ## Example `session.toml`
//! ```toml
//! currency_code = "VND"
//! snapshot_path = "/var/lib/foodhub/cart.json"
//!
//! [cart]
//! max_items = 50
//! max_quantity = 99
//!
//! [shipping]
//! base_fee = 15000
//! free_shipping_threshold = 300000
//! ```

use std::path::{Path, PathBuf};

use foodhub_core::money::Money;
use foodhub_core::{CartLimits, ShippingPolicy, MAX_CART_ITEMS, MAX_ITEM_QUANTITY};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Currency code (ISO 4217). Display only; amounts are minor units.
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Cart size limits.
    #[serde(default)]
    pub cart: CartSettings,

    /// Default shipping rule.
    #[serde(default)]
    pub shipping: ShippingSettings,

    /// Where the cart snapshot lives. `None` means the platform data dir.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

/// Cart size limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSettings {
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    #[serde(default = "default_max_quantity")]
    pub max_quantity: i64,
}

/// Shipping fee settings, in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingSettings {
    #[serde(default = "default_base_fee")]
    pub base_fee: i64,
    #[serde(default)]
    pub free_shipping_threshold: Option<i64>,
}

fn default_currency_code() -> String {
    "VND".to_string()
}

fn default_max_items() -> usize {
    MAX_CART_ITEMS
}

fn default_max_quantity() -> i64 {
    MAX_ITEM_QUANTITY
}

fn default_base_fee() -> i64 {
    ShippingPolicy::default().base_fee.minor_units()
}

impl Default for CartSettings {
    fn default() -> Self {
        CartSettings {
            max_items: default_max_items(),
            max_quantity: default_max_quantity(),
        }
    }
}

impl Default for ShippingSettings {
    fn default() -> Self {
        ShippingSettings {
            base_fee: default_base_fee(),
            free_shipping_threshold: None,
        }
    }
}

impl Default for SessionConfig {
    /// Returns defaults matching the web client.
    ///
    /// ## Default Values
    /// - Currency: VND
    /// - Cart: 100 lines, 999 per line
    /// - Shipping: 15,000 flat, no free-shipping threshold
    /// - Snapshot: platform data dir
    fn default() -> Self {
        SessionConfig {
            currency_code: default_currency_code(),
            cart: CartSettings::default(),
            shipping: ShippingSettings::default(),
            snapshot_path: None,
        }
    }
}

impl SessionConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`session.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading session config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load session config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> SessionResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SessionError::io(path, e))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SessionResult<()> {
        if self.currency_code.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "currency_code must not be empty".into(),
            ));
        }
        if self.cart.max_items == 0 || self.cart.max_items > MAX_CART_ITEMS {
            return Err(SessionError::InvalidConfig(format!(
                "cart.max_items must be between 1 and {}, got {}",
                MAX_CART_ITEMS, self.cart.max_items
            )));
        }
        if self.cart.max_quantity <= 0 || self.cart.max_quantity > MAX_ITEM_QUANTITY {
            return Err(SessionError::InvalidConfig(format!(
                "cart.max_quantity must be between 1 and {}, got {}",
                MAX_ITEM_QUANTITY, self.cart.max_quantity
            )));
        }
        self.shipping_policy()?;
        Ok(())
    }

    /// Applies `FOODHUB_*` overrides read through `lookup`.
    ///
    /// ## Environment Variables
    /// - `FOODHUB_CURRENCY`: Currency code
    /// - `FOODHUB_MAX_CART_ITEMS`: Max distinct lines
    /// - `FOODHUB_MAX_ITEM_QUANTITY`: Max quantity per line
    /// - `FOODHUB_SHIPPING_FEE`: Base shipping fee (minor units)
    /// - `FOODHUB_FREE_SHIPPING_THRESHOLD`: Free shipping from this subtotal
    /// - `FOODHUB_SNAPSHOT_PATH`: Cart snapshot file
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(code) = lookup("FOODHUB_CURRENCY") {
            debug!(currency = %code, "Overriding currency from environment");
            self.currency_code = code;
        }

        if let Some(value) = parsed(&lookup, "FOODHUB_MAX_CART_ITEMS") {
            self.cart.max_items = value;
        }

        if let Some(value) = parsed(&lookup, "FOODHUB_MAX_ITEM_QUANTITY") {
            self.cart.max_quantity = value;
        }

        if let Some(value) = parsed(&lookup, "FOODHUB_SHIPPING_FEE") {
            self.shipping.base_fee = value;
        }

        if let Some(value) = parsed(&lookup, "FOODHUB_FREE_SHIPPING_THRESHOLD") {
            self.shipping.free_shipping_threshold = Some(value);
        }

        if let Some(path) = lookup("FOODHUB_SNAPSHOT_PATH") {
            debug!(path = %path, "Overriding snapshot path from environment");
            self.snapshot_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("vn", "foodhub", "foodhub")
            .map(|dirs| dirs.config_dir().join("session.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Cart limits for new carts.
    pub fn cart_limits(&self) -> CartLimits {
        CartLimits {
            max_items: self.cart.max_items,
            max_quantity: self.cart.max_quantity,
        }
    }

    /// Validated shipping policy.
    pub fn shipping_policy(&self) -> SessionResult<ShippingPolicy> {
        let policy = ShippingPolicy::new(
            Money::from_minor(self.shipping.base_fee),
            self.shipping.free_shipping_threshold.map(Money::from_minor),
        )?;
        Ok(policy)
    }

    /// Snapshot file: the configured path or `<data dir>/cart.json`.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.snapshot_path.clone().or_else(|| {
            directories::ProjectDirs::from("vn", "foodhub", "foodhub")
                .map(|dirs| dirs.data_dir().join("cart.json"))
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => {
            debug!(key, value = %raw, "Overriding config from environment");
            Some(value)
        }
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}
