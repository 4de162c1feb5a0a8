//! Durable key-value storage.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use serde_json::Value;

/// Key names as constants.
pub mod keys {
    /// JSON array of favorited unit IDs
    pub const FAVORITES: &str = "favorites";
    /// Last-known map viewport
    pub const MAP_VIEWPORT: &str = "map_viewport";
}

/// Key-value store that survives process restarts.
///
/// Writes are synchronous: once `set` returns `Ok`, the value is durable.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn set(&self, key: &str, value: Value) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}
