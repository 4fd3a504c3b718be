//! Whole-collection JSON access on top of a [`KeyValueStore`].

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{ArtifactKind, KeyValueStore, StorageKey};
use crate::error::AppResult;
use crate::models::EntityId;

/// Collection-level access to local storage.
///
/// Read-modify-write cycles through one `LocalStore` (and its clones) are
/// serialised. Separate processes sharing a data directory are last write wins.
#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl LocalStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        LocalStore {
            backend,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Underlying raw store, shared with the token persistence.
    pub fn backend(&self) -> Arc<dyn KeyValueStore> {
        self.backend.clone()
    }

    /// Read a collection. Absent, unreadable or unparsable data yields an
    /// empty collection.
    pub async fn read_collection<T: DeserializeOwned>(&self, key: &StorageKey) -> Vec<T> {
        let key = key.to_string();
        let raw = match self.backend.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read local collection '{}': {}", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!("Discarding unparsable local collection '{}': {}", key, e);
                Vec::new()
            }
        }
    }

    /// Serialise the full collection and overwrite the key.
    pub async fn write_collection<T: Serialize>(
        &self,
        key: &StorageKey,
        items: &[T],
    ) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write_unlocked(key, items).await
    }

    async fn write_unlocked<T: Serialize>(&self, key: &StorageKey, items: &[T]) -> AppResult<()> {
        let raw = serde_json::to_string(items)?;
        self.backend.set(&key.to_string(), &raw).await?;
        debug!("Wrote {} record(s) to '{}'", items.len(), key);
        Ok(())
    }

    /// Read, change and write back a collection as one step. Nothing is
    /// written when `change` fails.
    pub async fn modify_collection<T, R, F>(&self, key: &StorageKey, change: F) -> AppResult<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> AppResult<R>,
    {
        let _guard = self.write_lock.lock().await;
        let mut items = self.read_collection::<T>(key).await;
        let result = change(&mut items)?;
        self.write_unlocked(key, &items).await?;
        Ok(result)
    }

    /// Remove every child collection of a project.
    pub async fn remove_project_data(&self, project_id: EntityId) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        for kind in ArtifactKind::ALL {
            self.backend
                .remove(&StorageKey::artifacts(kind, project_id).to_string())
                .await?;
        }
        info!("Removed local collections of project {}", project_id);
        Ok(())
    }
}
