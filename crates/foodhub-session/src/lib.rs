//! # foodhub-session: Cart Session Context
//!
//! Wires the pure cart engine in `foodhub-core` to the outside world:
//! configuration, a shared cart with persistence hooks, a snapshot store and
//! tracing.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session::open(config)                                │
//! │                                                                         │
//! │  1. Resolve Snapshot Path ─────────────────────────────────────────────►│
//! │     • FOODHUB_SNAPSHOT_PATH / snapshot_path in session.toml             │
//! │     • else <platform data dir>/cart.json                                │
//! │                                                                         │
//! │  2. Restore Cart ──────────────────────────────────────────────────────►│
//! │     • Lines re-validated against the configured limits                  │
//! │     • Unreadable or invalid snapshot → empty cart (warn!)               │
//! │                                                                         │
//! │  3. Register Persistence Hook ─────────────────────────────────────────►│
//! │     • Every cart mutation writes a new snapshot                         │
//! │                                                                         │
//! │  4. Ready ─────────────────────────────────────────────────────────────►│
//! │     • session.cart().with_cart_mut(|c| c.add_one(&food))                │
//! │     • session.checkout(&request, voucher.as_ref())                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use foodhub_core::{Food, Money};
//! use foodhub_session::{MemoryStore, Session, SessionConfig};
//!
//! let session = Session::with_store(SessionConfig::default(), Arc::new(MemoryStore::new())).unwrap();
//! let pho = Food::new("f1", "Phở", Money::from_minor(50_000)).unwrap();
//! session.cart().with_cart_mut(|c| c.add_one(&pho)).unwrap();
//! assert_eq!(session.cart().with_cart(|c| c.subtotal()).minor_units(), 50_000);
//! ```

pub mod config;
pub mod error;
pub mod state;
pub mod store;
pub mod telemetry;

use std::sync::Arc;

use chrono::Utc;
use foodhub_core::{CheckoutRequest, OrderDraft, ShippingPolicy, Voucher};
use tracing::info;

pub use config::SessionConfig;
pub use error::{ApiError, ErrorCode, SessionError, SessionResult};
pub use state::{PersistHook, SharedCart};
pub use store::{CartSnapshot, CartStore, JsonFileStore, MemoryStore};
pub use telemetry::init_tracing;

/// A customer's cart session.
pub struct Session {
    config: SessionConfig,
    shipping: ShippingPolicy,
    cart: SharedCart,
    store: Arc<dyn CartStore>,
}

impl Session {
    /// Opens a session backed by the configured snapshot file.
    pub fn open(config: SessionConfig) -> SessionResult<Self> {
        let path = config.snapshot_path().ok_or_else(|| {
            SessionError::InvalidConfig("No snapshot path available".into())
        })?;
        info!(?path, "Opening cart session");
        Self::with_store(config, Arc::new(JsonFileStore::new(path)))
    }

    /// Opens a session backed by `store`.
    pub fn with_store(config: SessionConfig, store: Arc<dyn CartStore>) -> SessionResult<Self> {
        config.validate()?;
        let shipping = config.shipping_policy()?;

        let cart = SharedCart::restore(store.as_ref(), config.cart_limits());
        cart.persist_to(Arc::clone(&store));

        Ok(Session {
            config,
            shipping,
            cart,
            store,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn shipping(&self) -> &ShippingPolicy {
        &self.shipping
    }

    pub fn cart(&self) -> &SharedCart {
        &self.cart
    }

    pub fn store(&self) -> &Arc<dyn CartStore> {
        &self.store
    }

    /// Builds an order draft for the selected lines, at the current time.
    pub fn checkout(
        &self,
        request: &CheckoutRequest,
        voucher: Option<&Voucher>,
    ) -> SessionResult<OrderDraft> {
        Ok(self
            .cart
            .checkout(request, voucher, &self.shipping, Utc::now())?)
    }
}
