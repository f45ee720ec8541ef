//! # Cart Persistence
//!
//! Keeps the cart across page reloads and restarts.
//!
//! ## Snapshot Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  startup ──► store.load() ──► CartSnapshot ──► Cart::from_items()       │
//! │                                   (lines re-validated, bad file → empty)│
//! │                                                                         │
//! │  with_cart_mut(..) ──► hook(&CartSnapshot) ──► store.save()             │
//! │                                                                         │
//! │  JsonFileStore::save                                                    │
//! │     cart.json.tmp ◄── serde_json::to_vec_pretty                         │
//! │     rename(cart.json.tmp → cart.json)   readers never see half a file   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use foodhub_core::{Cart, CartLimits, CoreResult, LineItem};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{SessionError, SessionResult};

/// Snapshot format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Persisted cart contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub items: Vec<LineItem>,
    pub saved_at: DateTime<Utc>,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl CartSnapshot {
    /// Captures the cart lines.
    pub fn capture(cart: &Cart, saved_at: DateTime<Utc>) -> Self {
        CartSnapshot {
            version: SNAPSHOT_VERSION,
            items: cart.items().to_vec(),
            saved_at,
        }
    }

    /// Rebuilds a cart, re-validating every line.
    pub fn into_cart(self, limits: CartLimits) -> CoreResult<Cart> {
        Cart::from_items(self.items, limits)
    }
}

/// Where cart snapshots are kept.
pub trait CartStore: Send + Sync {
    /// Returns the last saved snapshot, or `None` if nothing was saved.
    fn load(&self) -> SessionResult<Option<CartSnapshot>>;

    /// Replaces the saved snapshot.
    fn save(&self, snapshot: &CartSnapshot) -> SessionResult<()>;
}

// =============================================================================
// JSON File Store
// =============================================================================

/// Stores the snapshot as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cart.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CartStore for JsonFileStore {
    fn load(&self) -> SessionResult<Option<CartSnapshot>> {
        let contents = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "No cart snapshot on disk");
                return Ok(None);
            }
            Err(e) => return Err(SessionError::io(&self.path, e)),
        };

        let snapshot: CartSnapshot = serde_json::from_slice(&contents)?;
        debug!(path = ?self.path, lines = snapshot.items.len(), "Cart snapshot loaded");
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &CartSnapshot) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| SessionError::io(parent, e))?;
            }
        }

        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let temp = self.temp_path();
        fs::write(&temp, bytes).map_err(|e| SessionError::io(&temp, e))?;
        fs::rename(&temp, &self.path).map_err(|e| SessionError::io(&self.path, e))?;

        info!(path = ?self.path, lines = snapshot.items.len(), "Cart snapshot saved");
        Ok(())
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-process store, for tests and for sessions that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<CartSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Number of lines in the stored snapshot.
    pub fn saved_lines(&self) -> Option<usize> {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.items.len())
    }
}

impl CartStore for MemoryStore {
    fn load(&self) -> SessionResult<Option<CartSnapshot>> {
        Ok(self
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, snapshot: &CartSnapshot) -> SessionResult<()> {
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        Ok(())
    }
}
