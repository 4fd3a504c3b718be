//! Per-project artifact collections: remote first, local storage otherwise.
//!
//! Reads fall back to local storage on any backend error. Writes fall back
//! only when the backend could not be reached; an error response from the
//! backend is returned to the caller.

use std::collections::BTreeSet;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::ids::IdGenerator;
use super::source::{DataSource, Sourced};
use crate::api::{ApiClient, ApiError, ApiResult};
use crate::error::{AppError, AppResult};
use crate::models::{Draft, EntityId, Record, RecordContext, Selection};
use crate::store::{ArtifactKind, LocalStore, StorageKey};

/// A record type stored per project.
///
/// The `remote_*` hooks return `None` when the backend has no endpoint for
/// that verb, in which case the local collection is authoritative.
#[async_trait]
pub trait Artifact: Record + Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: ArtifactKind;

    /// Create/edit form for this record.
    type Form: Draft<Record = Self> + Send + Sync;

    /// Prefill an edit form from the stored record.
    fn to_form(&self) -> Self::Form;

    async fn remote_list(_api: &ApiClient, _project: EntityId) -> Option<ApiResult<Vec<Self>>> {
        None
    }

    async fn remote_get(
        _api: &ApiClient,
        _project: EntityId,
        _id: EntityId,
    ) -> Option<ApiResult<Self>> {
        None
    }

    async fn remote_create(
        _api: &ApiClient,
        _project: EntityId,
        _form: &Self::Form,
    ) -> Option<ApiResult<Self>> {
        None
    }

    async fn remote_update(
        _api: &ApiClient,
        _project: EntityId,
        _id: EntityId,
        _form: &Self::Form,
    ) -> Option<ApiResult<Self>> {
        None
    }

    async fn remote_delete(
        _api: &ApiClient,
        _project: EntityId,
        _id: EntityId,
    ) -> Option<ApiResult<()>> {
        None
    }
}

/// List/get/create/update/delete for one artifact kind.
pub struct ArtifactRepository<E> {
    api: ApiClient,
    store: LocalStore,
    ids: Arc<IdGenerator>,
    author: String,
    _kind: PhantomData<fn() -> E>,
}

impl<E> Clone for ArtifactRepository<E> {
    fn clone(&self) -> Self {
        ArtifactRepository {
            api: self.api.clone(),
            store: self.store.clone(),
            ids: self.ids.clone(),
            author: self.author.clone(),
            _kind: PhantomData,
        }
    }
}

impl<E: Artifact> ArtifactRepository<E> {
    pub fn new(
        api: ApiClient,
        store: LocalStore,
        ids: Arc<IdGenerator>,
        author: impl Into<String>,
    ) -> Self {
        ArtifactRepository {
            api,
            store,
            ids,
            author: author.into(),
            _kind: PhantomData,
        }
    }

    fn key(&self, project: EntityId) -> StorageKey {
        StorageKey::artifacts(E::KIND, project)
    }

    fn not_found(id: EntityId) -> AppError {
        AppError::NotFound(format!("{} {}", E::KIND.label(), id))
    }

    /// The local collection as stored.
    pub async fn local_list(&self, project: EntityId) -> Vec<E> {
        self.store.read_collection(&self.key(project)).await
    }

    pub async fn list(&self, project: EntityId) -> Sourced<Vec<E>> {
        match E::remote_list(&self.api, project).await {
            Some(Ok(items)) => Sourced::remote(items),
            Some(Err(e)) => {
                warn!(
                    "Listing {} of project {} from local storage: {}",
                    E::KIND,
                    project,
                    e
                );
                Sourced::fallback(self.local_list(project).await, &e)
            }
            None => Sourced::local(self.local_list(project).await),
        }
    }

    pub async fn get(&self, project: EntityId, id: EntityId) -> AppResult<Sourced<E>> {
        let listed = match E::remote_get(&self.api, project, id).await {
            Some(Ok(item)) => return Ok(Sourced::remote(item)),
            Some(Err(e)) => {
                warn!("Loading {} {} from local storage: {}", E::KIND, id, e);
                Sourced::fallback(self.local_list(project).await, &e)
            }
            None => self.list(project).await,
        };
        let Sourced { value, source } = listed;
        value
            .into_iter()
            .find(|item| item.id() == id)
            .map(|value| Sourced { value, source })
            .ok_or_else(|| Self::not_found(id))
    }

    /// Validate and store a new record.
    pub async fn create(&self, project: EntityId, form: E::Form) -> AppResult<Sourced<E>> {
        form.validate()?;
        match E::remote_create(&self.api, project, &form).await {
            Some(Ok(item)) => {
                info!("Created {} {} in project {}", E::KIND, item.id(), project);
                Ok(Sourced::remote(item))
            }
            Some(Err(e)) if e.is_transport() => {
                warn!("Creating {} locally: {}", E::KIND, e);
                let item = self.create_local(project, form).await?;
                Ok(Sourced::fallback(item, &e))
            }
            Some(Err(e)) => Err(e.into()),
            None => Ok(Sourced::local(self.create_local(project, form).await?)),
        }
    }

    async fn create_local(&self, project: EntityId, form: E::Form) -> AppResult<E> {
        let ctx = RecordContext {
            id: self.ids.next_id(),
            now: Utc::now(),
            author: self.author.clone(),
        };
        let item = form.build(&ctx);
        let stored = item.clone();
        self.store
            .modify_collection(&self.key(project), move |items: &mut Vec<E>| {
                items.push(stored);
                Ok(())
            })
            .await?;
        debug!("Stored {} {} locally", E::KIND, item.id());
        Ok(item)
    }

    /// Validate and apply `form` to an existing record.
    pub async fn update(
        &self,
        project: EntityId,
        id: EntityId,
        form: E::Form,
    ) -> AppResult<Sourced<E>> {
        form.validate()?;
        match E::remote_update(&self.api, project, id, &form).await {
            Some(Ok(item)) => Ok(Sourced::remote(item)),
            Some(Err(e)) if e.is_transport() => {
                warn!("Updating {} {} locally: {}", E::KIND, id, e);
                let item = self
                    .update_local(project, id, form)
                    .await?
                    .ok_or_else(|| Self::not_found(id))?;
                Ok(Sourced::fallback(item, &e))
            }
            Some(Err(e)) => Err(e.into()),
            None => match self.update_local(project, id, form).await? {
                Some(item) => Ok(Sourced::local(item)),
                None => Err(self.missing_one(project, id).await),
            },
        }
    }

    async fn update_local(
        &self,
        project: EntityId,
        id: EntityId,
        form: E::Form,
    ) -> AppResult<Option<E>> {
        self.store
            .modify_collection(&self.key(project), move |items: &mut Vec<E>| {
                Ok(items.iter_mut().find(|item| item.id() == id).map(|item| {
                    form.apply(item, Utc::now());
                    item.clone()
                }))
            })
            .await
    }

    /// Load a record, prefill its form, let `change` edit it and save.
    pub async fn edit<F>(&self, project: EntityId, id: EntityId, change: F) -> AppResult<Sourced<E>>
    where
        F: FnOnce(&mut E::Form),
    {
        let current = self.get(project, id).await?.into_inner();
        let mut form = current.to_form();
        change(&mut form);
        self.update(project, id, form).await
    }

    /// Delete one record. Fails with `NotFound` when nothing was removed, and
    /// with `ReadOnly` for a backend record of a kind the backend only lists.
    pub async fn delete(&self, project: EntityId, id: EntityId) -> AppResult<Sourced<()>> {
        match E::remote_delete(&self.api, project, id).await {
            Some(Ok(())) => {
                info!("Deleted {} {} from project {}", E::KIND, id, project);
                Ok(Sourced::remote(()))
            }
            Some(Err(e)) if e.is_transport() => {
                warn!("Deleting {} {} locally: {}", E::KIND, id, e);
                if self.remove_local(project, &BTreeSet::from([id])).await?.is_empty() {
                    return Err(Self::not_found(id));
                }
                Ok(Sourced::fallback((), &e))
            }
            Some(Err(e)) => Err(e.into()),
            None => {
                if self.remove_local(project, &BTreeSet::from([id])).await?.is_empty() {
                    return Err(self.missing_one(project, id).await);
                }
                Ok(Sourced::local(()))
            }
        }
    }

    /// Delete several records. Every id is attempted; ids the backend cannot
    /// take are removed from local storage in a single rewrite. Ids that
    /// could not be deleted are reported with their error.
    pub async fn delete_many(
        &self,
        project: EntityId,
        ids: &[EntityId],
    ) -> AppResult<Sourced<BulkDeletion>> {
        let mut remote_deleted = BTreeSet::new();
        let mut local_ids = BTreeSet::new();
        let mut rejected = Vec::new();
        let mut fallback: Option<ApiError> = None;

        for &id in ids {
            match E::remote_delete(&self.api, project, id).await {
                Some(Ok(())) => {
                    remote_deleted.insert(id);
                }
                Some(Err(e)) if e.is_transport() => {
                    local_ids.insert(id);
                    fallback.get_or_insert(e);
                }
                Some(Err(e)) => {
                    warn!("Backend refused to delete {} {}: {}", E::KIND, id, e);
                    rejected.push((id, AppError::from(e)));
                }
                None => {
                    local_ids.insert(id);
                }
            }
        }

        let removed = if local_ids.is_empty() {
            BTreeSet::new()
        } else {
            self.remove_local(project, &local_ids).await?
        };
        let absent: Vec<EntityId> = local_ids.difference(&removed).copied().collect();
        let mut failed = if absent.is_empty() {
            Vec::new()
        } else {
            self.missing(project, &absent).await
        };
        failed.append(&mut rejected);
        failed.sort_by_key(|(id, _)| ids.iter().position(|candidate| candidate == id));

        let deleted: Vec<EntityId> = ids
            .iter()
            .copied()
            .filter(|id| remote_deleted.contains(id) || removed.contains(id))
            .collect();
        info!(
            "Deleted {} of {} {} from project {}",
            deleted.len(),
            ids.len(),
            E::KIND,
            project
        );

        let source = match fallback {
            Some(e) => DataSource::Fallback {
                reason: e.to_string(),
            },
            None if local_ids.is_empty() && !ids.is_empty() => DataSource::Remote,
            None => DataSource::Local,
        };
        Ok(Sourced {
            value: BulkDeletion { deleted, failed },
            source,
        })
    }

    /// Delete everything in `selection`. Deleted ids are deselected; ids
    /// that failed stay selected.
    pub async fn delete_selected(
        &self,
        project: EntityId,
        selection: &mut Selection,
    ) -> AppResult<Sourced<BulkDeletion>> {
        let ids: Vec<EntityId> = selection.ids().collect();
        let result = self.delete_many(project, &ids).await?;
        for &id in &result.value.deleted {
            selection.remove(id);
        }
        Ok(result)
    }

    /// Removes `ids` from the local collection and returns those that were present.
    async fn remove_local(
        &self,
        project: EntityId,
        ids: &BTreeSet<EntityId>,
    ) -> AppResult<BTreeSet<EntityId>> {
        self.store
            .modify_collection(&self.key(project), |items: &mut Vec<E>| {
                let mut removed = BTreeSet::new();
                items.retain(|item| {
                    let hit = ids.contains(&item.id());
                    if hit {
                        removed.insert(item.id());
                    }
                    !hit
                });
                Ok(removed)
            })
            .await
    }

    async fn missing_one(&self, project: EntityId, id: EntityId) -> AppError {
        self.missing(project, &[id])
            .await
            .pop()
            .map_or_else(|| Self::not_found(id), |(_, err)| err)
    }

    /// Errors for ids absent from the local collection. A record the backend
    /// lists but cannot change is read-only rather than missing.
    async fn missing(&self, project: EntityId, ids: &[EntityId]) -> Vec<(EntityId, AppError)> {
        let served: BTreeSet<EntityId> = match E::remote_list(&self.api, project).await {
            Some(Ok(items)) => items.iter().map(Record::id).collect(),
            _ => BTreeSet::new(),
        };
        ids.iter()
            .map(|&id| {
                let err = if served.contains(&id) {
                    AppError::ReadOnly(format!("{} {}", E::KIND.label(), id))
                } else {
                    Self::not_found(id)
                };
                (id, err)
            })
            .collect()
    }
}

/// Outcome of a bulk delete.
#[derive(Debug, Default)]
pub struct BulkDeletion {
    /// Deleted ids, in request order
    pub deleted: Vec<EntityId>,
    /// Ids left in place, with the reason
    pub failed: Vec<(EntityId, AppError)>,
}

impl BulkDeletion {
    pub fn count(&self) -> usize {
        self.deleted.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
