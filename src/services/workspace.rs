//! Everything a caller needs to work with one backend and one data directory.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::info;

use super::ids::IdGenerator;
use super::projects::ProjectService;
use super::repository::{Artifact, ArtifactRepository};
use crate::api::{ApiClient, ApiResult, HealthResponse, LoginResponse};
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{
    Element, Environment, RunResult, StepGroup, TestCase, TestDataProfile, TestPlan, TestSuite,
    WikiPage,
};
use crate::store::{FileStore, KeyValueStore, LocalStore};

/// Shared client, store and id source with one repository per artifact kind.
#[derive(Clone)]
pub struct Workspace {
    config: Config,
    api: ApiClient,
    store: LocalStore,
    ids: Arc<IdGenerator>,
    pub projects: ProjectService,
    pub elements: ArtifactRepository<Element>,
    pub test_cases: ArtifactRepository<TestCase>,
    pub test_suites: ArtifactRepository<TestSuite>,
    pub test_plans: ArtifactRepository<TestPlan>,
    pub test_data: ArtifactRepository<TestDataProfile>,
    pub environments: ArtifactRepository<Environment>,
    pub wiki: ArtifactRepository<WikiPage>,
    pub run_results: ArtifactRepository<RunResult>,
    pub step_groups: ArtifactRepository<StepGroup>,
}

impl Workspace {
    /// Open the file store under `config.data_dir` and restore any saved token.
    pub async fn open(config: Config) -> AppResult<Self> {
        let backend = FileStore::open(&config.data_dir).await?;
        let workspace = Self::with_backend(config, Arc::new(backend))?;
        workspace.api.load_token().await;
        Ok(workspace)
    }

    /// Build on an arbitrary key-value backend. The token is mirrored to the
    /// same backend.
    pub fn with_backend(config: Config, backend: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let api = ApiClient::new(&config)?.with_token_store(backend.clone());
        let store = LocalStore::new(backend);
        let ids = Arc::new(IdGenerator::new());
        let author = config.user.full_name.clone();

        info!(
            "Workspace ready (api={}, data_dir={}, user={})",
            config.api_url,
            config.data_dir.display(),
            config.user.email
        );

        Ok(Workspace {
            projects: ProjectService::new(api.clone(), store.clone(), ids.clone(), author.clone()),
            elements: repository(&api, &store, &ids, &author),
            test_cases: repository(&api, &store, &ids, &author),
            test_suites: repository(&api, &store, &ids, &author),
            test_plans: repository(&api, &store, &ids, &author),
            test_data: repository(&api, &store, &ids, &author),
            environments: repository(&api, &store, &ids, &author),
            wiki: repository(&api, &store, &ids, &author),
            run_results: repository(&api, &store, &ids, &author),
            step_groups: repository(&api, &store, &ids, &author),
            config,
            api,
            store,
            ids,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    pub async fn health(&self) -> ApiResult<HealthResponse> {
        self.api.health().await
    }

    pub async fn login(&self, email: &str, password: &SecretString) -> ApiResult<LoginResponse> {
        self.api.login(email, password).await
    }

    pub async fn logout(&self) {
        self.api.clear_token().await;
        info!("Logged out");
    }
}

fn repository<E: Artifact>(
    api: &ApiClient,
    store: &LocalStore,
    ids: &Arc<IdGenerator>,
    author: &str,
) -> ArtifactRepository<E> {
    ArtifactRepository::new(api.clone(), store.clone(), ids.clone(), author)
}
