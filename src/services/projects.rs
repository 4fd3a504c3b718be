//! Project list, detail and edit flows.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::ids::IdGenerator;
use super::repository::{Artifact, ArtifactRepository};
use super::source::Sourced;
use crate::api::ApiClient;
use crate::error::{AppError, AppResult};
use crate::models::{Draft, EntityId, Project, ProjectDraft, RecordContext, StepGroup, TestCase};
use crate::store::{LocalStore, StorageKey};

/// Project detail page data.
#[derive(Debug, Clone)]
pub struct ProjectOverview {
    pub project: Sourced<Project>,
    pub test_case_count: usize,
    pub step_groups: Vec<StepGroup>,
}

#[derive(Clone)]
pub struct ProjectService {
    api: ApiClient,
    store: LocalStore,
    ids: Arc<IdGenerator>,
    author: String,
}

impl ProjectService {
    pub fn new(
        api: ApiClient,
        store: LocalStore,
        ids: Arc<IdGenerator>,
        author: impl Into<String>,
    ) -> Self {
        ProjectService {
            api,
            store,
            ids,
            author: author.into(),
        }
    }

    fn not_found(id: EntityId) -> AppError {
        AppError::NotFound(format!("Project {}", id))
    }

    pub async fn local_list(&self) -> Vec<Project> {
        self.store.read_collection(&StorageKey::Projects).await
    }

    pub async fn list(&self) -> Sourced<Vec<Project>> {
        match self.api.list_projects().await {
            Ok(projects) => Sourced::remote(projects),
            Err(e) => {
                warn!("Listing projects from local storage: {}", e);
                Sourced::fallback(self.local_list().await, &e)
            }
        }
    }

    pub async fn get(&self, id: EntityId) -> AppResult<Sourced<Project>> {
        match self.api.get_project(id).await {
            Ok(project) => Ok(Sourced::remote(project)),
            Err(e) => {
                warn!("Loading project {} from local storage: {}", id, e);
                self.local_list()
                    .await
                    .into_iter()
                    .find(|p| p.id == id)
                    .map(|project| Sourced::fallback(project, &e))
                    .ok_or_else(|| Self::not_found(id))
            }
        }
    }

    /// Validate and create a project. When the backend is unreachable the
    /// project is stored locally with a generated id.
    pub async fn create(&self, draft: ProjectDraft) -> AppResult<Sourced<Project>> {
        draft.validate()?;
        match self.api.create_project(&draft).await {
            Ok(project) => {
                info!("Created project {} ({})", project.name, project.id);
                Ok(Sourced::remote(project))
            }
            Err(e) if e.is_transport() => {
                warn!("Creating project '{}' locally: {}", draft.name, e);
                let ctx = RecordContext {
                    id: self.ids.next_id(),
                    now: Utc::now(),
                    author: self.author.clone(),
                };
                let project = draft.build(&ctx);
                let stored = project.clone();
                self.store
                    .modify_collection(&StorageKey::Projects, move |items: &mut Vec<Project>| {
                        items.push(stored);
                        Ok(())
                    })
                    .await?;
                Ok(Sourced::fallback(project, &e))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn update(&self, id: EntityId, draft: ProjectDraft) -> AppResult<Sourced<Project>> {
        draft.validate()?;
        match self.api.update_project(id, &draft).await {
            Ok(project) => Ok(Sourced::remote(project)),
            Err(e) if e.is_transport() => {
                warn!("Updating project {} locally: {}", id, e);
                let project = self
                    .store
                    .modify_collection(&StorageKey::Projects, move |items: &mut Vec<Project>| {
                        let project = items
                            .iter_mut()
                            .find(|p| p.id == id)
                            .ok_or_else(|| Self::not_found(id))?;
                        draft.apply(project, Utc::now());
                        Ok(project.clone())
                    })
                    .await?;
                Ok(Sourced::fallback(project, &e))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load a project, prefill its form, let `change` edit it and save.
    pub async fn edit<F>(&self, id: EntityId, change: F) -> AppResult<Sourced<Project>>
    where
        F: FnOnce(&mut ProjectDraft),
    {
        let project = self.get(id).await?.into_inner();
        let mut draft = ProjectDraft {
            name: project.name,
            description: project.description,
            application_name: project.application_name,
            version: project.version,
            color: Some(project.color),
        };
        change(&mut draft);
        self.update(id, draft).await
    }

    /// Delete a project. Local child collections are removed either way; an
    /// offline delete of a project unknown locally is `NotFound`.
    pub async fn delete(&self, id: EntityId) -> AppResult<Sourced<()>> {
        let result = match self.api.delete_project(id).await {
            Ok(()) => Sourced::remote(()),
            Err(e) if e.is_transport() => {
                warn!("Deleting project {} locally: {}", id, e);
                let removed = self
                    .store
                    .modify_collection(&StorageKey::Projects, |items: &mut Vec<Project>| {
                        let before = items.len();
                        items.retain(|p| p.id != id);
                        Ok(before - items.len())
                    })
                    .await?;
                if removed == 0 {
                    return Err(Self::not_found(id));
                }
                Sourced::fallback((), &e)
            }
            Err(e) => return Err(e.into()),
        };
        self.store.remove_project_data(id).await?;
        info!("Deleted project {} ({})", id, result.source);
        Ok(result)
    }

    /// Project with its test case count and step groups.
    pub async fn overview(&self, id: EntityId) -> AppResult<ProjectOverview> {
        let project = self.get(id).await?;
        let test_cases: ArtifactRepository<TestCase> = self.repository();
        let step_groups: ArtifactRepository<StepGroup> = self.repository();

        Ok(ProjectOverview {
            project,
            test_case_count: test_cases.list(id).await.value.len(),
            step_groups: step_groups.list(id).await.into_inner(),
        })
    }

    fn repository<E: Artifact>(&self) -> ArtifactRepository<E> {
        ArtifactRepository::new(
            self.api.clone(),
            self.store.clone(),
            self.ids.clone(),
            self.author.clone(),
        )
    }
}
