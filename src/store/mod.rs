//! Local persistence used when the backend is unavailable and for
//! collections the backend does not serve.
//!
//! Every collection is one JSON array under one key; writes replace the
//! whole array.

use async_trait::async_trait;

use crate::error::AppResult;

pub mod file;
pub mod keys;
pub mod local;
pub mod memory;

pub use file::FileStore;
pub use keys::{ArtifactKind, StorageKey};
pub use local::LocalStore;
pub use memory::MemoryStore;

/// Raw string key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the raw value, `None` when the key is absent.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Overwrite the value.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Delete the key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> AppResult<()>;
}
