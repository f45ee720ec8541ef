//! # Shared Cart State
//!
//! The session's single cart, shared between UI handlers.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Several handlers may read or modify the cart
//! 2. Only one of them should modify it at a time
//! 3. The last completed mutation wins
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    SharedCart Operations                                │
//! │                                                                         │
//! │  UI Action             SharedCart                 Side Effect           │
//! │  ─────────             ──────────                 ───────────           │
//! │                                                                         │
//! │  Tap "add" ──────────► with_cart_mut(add_one) ──► hooks(&snapshot)      │
//! │                                                                         │
//! │  Stepper −/+ ────────► with_cart_mut(set_qty) ──► hooks(&snapshot)      │
//! │                                                                         │
//! │  Open cart page ─────► with_cart(subtotal) ─────► (read only)           │
//! │                                                                         │
//! │  Checkout ───────────► checkout(request) ───────► OrderDraft            │
//! │                                                                         │
//! │  NOTE: hooks run while the lock is held, so snapshots reach the store   │
//! │        in mutation order. A hook must not call back into SharedCart.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use chrono::{DateTime, Utc};
use foodhub_core::{
    prepare_order, Cart, CartLimits, CheckoutRequest, CoreResult, OrderDraft, ShippingPolicy,
    Voucher,
};
use tracing::{debug, error, warn};

use crate::store::{CartSnapshot, CartStore};

/// Callback invoked with the new cart contents after every mutation.
pub type PersistHook = Box<dyn Fn(&CartSnapshot) + Send + Sync>;

/// Cart shared across the session.
#[derive(Clone, Default)]
pub struct SharedCart {
    cart: Arc<Mutex<Cart>>,
    hooks: Arc<Mutex<Vec<PersistHook>>>,
}

impl std::fmt::Debug for SharedCart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("SharedCart");
        match self.cart.try_lock() {
            Ok(cart) => out.field("cart", &*cart),
            Err(TryLockError::Poisoned(poisoned)) => out.field("cart", &*poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => out.field("cart", &"<locked>"),
        };
        out.finish_non_exhaustive()
    }
}

impl SharedCart {
    /// Creates an empty shared cart.
    pub fn new(limits: CartLimits) -> Self {
        SharedCart::from_cart(Cart::with_limits(limits))
    }

    /// Wraps an existing cart.
    pub fn from_cart(cart: Cart) -> Self {
        SharedCart {
            cart: Arc::new(Mutex::new(cart)),
            hooks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Loads the saved cart from `store`.
    ///
    /// A missing, unreadable or invalid snapshot yields an empty cart; the
    /// customer loses the old cart but the session still starts.
    pub fn restore(store: &dyn CartStore, limits: CartLimits) -> Self {
        let cart = match store.load() {
            Ok(Some(snapshot)) => snapshot.into_cart(limits).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding invalid cart snapshot");
                Cart::with_limits(limits)
            }),
            Ok(None) => Cart::with_limits(limits),
            Err(e) => {
                warn!(error = %e, "Cart snapshot unreadable, starting empty");
                Cart::with_limits(limits)
            }
        };
        debug!(lines = cart.len(), "Cart restored");
        SharedCart::from_cart(cart)
    }

    /// Registers a hook called after every mutation.
    pub fn on_change<F>(&self, hook: F)
    where
        F: Fn(&CartSnapshot) + Send + Sync + 'static,
    {
        self.lock_hooks().push(Box::new(hook));
    }

    /// Saves every mutation to `store`. Save failures are logged.
    pub fn persist_to(&self, store: Arc<dyn CartStore>) {
        self.on_change(move |snapshot| {
            if let Err(e) = store.save(snapshot) {
                error!(error = %e, "Failed to save cart snapshot");
            }
        });
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.lock_cart();
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// Hooks run only when the cart actually changed.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.lock_cart();
        let before = cart.clone();
        let result = f(&mut cart);

        if *cart != before {
            let snapshot = CartSnapshot::capture(&cart, Utc::now());
            for hook in self.lock_hooks().iter() {
                hook(&snapshot);
            }
        }

        result
    }

    /// Current contents as a snapshot.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::capture(&self.lock_cart(), Utc::now())
    }

    /// Builds an order draft from the selected lines.
    pub fn checkout(
        &self,
        request: &CheckoutRequest,
        voucher: Option<&Voucher>,
        shipping: &ShippingPolicy,
        now: DateTime<Utc>,
    ) -> CoreResult<OrderDraft> {
        self.with_cart(|cart| prepare_order(cart, request, voucher, shipping, now))
    }

    /// Removes the lines of a submitted order.
    pub fn complete_order(&self, draft: &OrderDraft) {
        self.with_cart_mut(|cart| {
            for item in &draft.items {
                cart.remove_item(&item.item_key);
            }
        });
    }

    fn lock_cart(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_hooks(&self) -> MutexGuard<'_, Vec<PersistHook>> {
        self.hooks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use foodhub_core::money::Money;
    use foodhub_core::{CoreError, Food};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn pho() -> Food {
        Food::new("f1", "Phở", Money::from_minor(50_000))
            .unwrap()
            .with_shop("shop-a")
    }

    #[test]
    fn test_hooks_fire_on_change_only() {
        let shared = SharedCart::new(CartLimits::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        shared.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        shared.with_cart_mut(|c| c.add_one(&pho())).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Rejected add leaves the cart untouched
        let err = shared.with_cart_mut(|c| c.add_item(&pho(), 0));
        assert!(matches!(err, Err(CoreError::InvalidQuantity { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Absent key
        assert!(!shared.with_cart_mut(|c| c.remove_item("missing")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        shared.with_cart_mut(|c| c.clear());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_debug_inside_mutation_does_not_block() {
        let shared = SharedCart::new(CartLimits::default());
        let inner = shared.clone();
        let rendered = shared.with_cart_mut(|c| {
            c.add_one(&pho()).unwrap();
            format!("{:?}", inner)
        });
        assert!(rendered.contains("<locked>"));
        assert!(format!("{:?}", shared).contains("item_key: \"f1\""));
    }

    #[test]
    fn test_persist_and_restore() {
        let store = Arc::new(MemoryStore::new());
        let shared = SharedCart::new(CartLimits::default());
        shared.persist_to(store.clone());

        shared.with_cart_mut(|c| c.add_item(&pho(), 3)).unwrap();
        assert_eq!(store.saved_lines(), Some(1));

        let restored = SharedCart::restore(store.as_ref(), CartLimits::default());
        assert_eq!(restored.with_cart(|c| c.item_quantity("f1")), 3);
    }

    #[test]
    fn test_restore_discards_invalid_snapshot() {
        let store = MemoryStore::new();
        let mut snapshot = SharedCart::new(CartLimits::default()).snapshot();
        let mut line = foodhub_core::LineItem::from_food(&pho(), 1);
        line.quantity = 5_000;
        snapshot.items.push(line);
        store.save(&snapshot).unwrap();

        let restored = SharedCart::restore(&store, CartLimits::default());
        assert!(restored.with_cart(|c| c.is_empty()));
    }

    #[test]
    fn test_concurrent_adds() {
        let shared = SharedCart::new(CartLimits::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..10 {
                        shared.with_cart_mut(|c| c.add_one(&pho())).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.with_cart(|c| c.item_quantity("f1")), 80);
    }

    #[test]
    fn test_checkout_and_complete() {
        let shared = SharedCart::new(CartLimits::default());
        shared.with_cart_mut(|c| c.add_item(&pho(), 2)).unwrap();
        let banh_mi = Food::new("b1", "Bánh mì", Money::from_minor(25_000))
            .unwrap()
            .with_shop("shop-b");
        shared.with_cart_mut(|c| c.add_one(&banh_mi)).unwrap();

        let request = shared.with_cart(|c| CheckoutRequest::whole_shop(c, "shop-a"));
        let draft = shared
            .checkout(&request, None, &ShippingPolicy::default(), Utc::now())
            .unwrap();
        assert_eq!(draft.totals.final_total.minor_units(), 115_000);

        shared.complete_order(&draft);
        assert!(!shared.with_cart(|c| c.is_in_cart("f1")));
        assert!(shared.with_cart(|c| c.is_in_cart("b1")));
    }
}
