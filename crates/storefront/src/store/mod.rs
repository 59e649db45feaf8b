//! Persistent key-value storage for storefront state.
//!
//! Cart, wishlist and account state are stored as JSON documents under
//! per-site keys (`"<site>Cart"`, `"<site>Wishlist"`, `"<site>User"`).
//!
//! # Backends
//!
//! - [`MemoryStore`] - In-process map, used by tests and ephemeral sessions
//! - [`FileStore`] - One JSON file per key under a state directory
//!
//! # Write semantics
//!
//! Managers treat writes as fire-and-forget: a failed write is logged and the
//! in-memory state stays authoritative. Reads are validated against the
//! expected schema and fail with [`StoreError::Corrupt`] on mismatch.

mod file;
mod memory;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors that can occur when reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Stored value does not match the expected shape.
    #[error("corrupt state under {key}: {reason}")]
    Corrupt { key: String, reason: String },

    /// Key contains characters the backend cannot store.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Backend is unusable (e.g. a poisoned lock or a simulated outage).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Build a [`StoreError::Corrupt`] for a key.
    pub fn corrupt(key: &str, reason: impl fmt::Display) -> Self {
        Self::Corrupt {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error means the stored data is unreadable and should be reset.
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// A durable key-value store of JSON documents.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails or the stored bytes are not JSON.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Delete the value under `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Shared handle to a store, held by every manager of one session.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// The state slots persisted per site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Cart,
    Wishlist,
    User,
}

impl Slot {
    const fn suffix(self) -> &'static str {
        match self {
            Self::Cart => "Cart",
            Self::Wishlist => "Wishlist",
            Self::User => "User",
        }
    }
}

/// Per-site key prefix keeping each storefront's state isolated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    /// Create a namespace from a site name (e.g. `detrend`).
    #[must_use]
    pub fn new(site: impl Into<String>) -> Self {
        Self(site.into())
    }

    /// The site name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key for a slot, e.g. `detrendCart`.
    #[must_use]
    pub fn key(&self, slot: Slot) -> String {
        format!("{}{}", self.0, slot.suffix())
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new("detrend")
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read and decode a typed value.
///
/// # Errors
///
/// Returns `StoreError::Corrupt` if the stored JSON does not decode as `T`,
/// or any backend error.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| StoreError::corrupt(key, e)),
    }
}

/// Encode and write a typed value.
///
/// # Errors
///
/// Returns `StoreError` if encoding or the backend write fails.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(value)?;
    store.set(key, value)
}

/// Fire-and-forget write: failures are logged, never surfaced.
pub(crate) fn persist<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    if let Err(e) = save_json(store, key, value) {
        tracing::warn!(key, error = %e, "Failed to persist state");
    }
}

/// Fire-and-forget delete.
pub(crate) fn forget(store: &dyn KeyValueStore, key: &str) {
    if let Err(e) = store.remove(key) {
        tracing::warn!(key, error = %e, "Failed to remove persisted state");
    }
}
