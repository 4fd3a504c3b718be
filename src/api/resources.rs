//! Typed calls for each backend resource.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::info;

use super::ai::{AiContent, output_text};
use super::types::{
    AuthUser, ElementPayload, ElementResponse, EnvironmentPayload, EnvironmentResponse,
    HealthResponse, LoginBody, LoginResponse, ProjectPayload, ProjectResponse, TestCasePayload,
    TestCaseResponse, TestDataPayload, TestDataResponse, TestPlanPayload, TestPlanResponse,
    TestSuitePayload, TestSuiteResponse,
};
use super::{ApiClient, ApiError, ApiResult};
use crate::models::{
    Element, ElementDraft, EntityId, Environment, EnvironmentDraft, Project, ProjectDraft,
    TestCase, TestCaseDraft, TestDataDraft, TestDataProfile, TestPlan, TestPlanDraft, TestSuite,
    TestSuiteDraft,
};

fn body<T: Serialize>(payload: &T) -> ApiResult<Value> {
    serde_json::to_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}

fn project_path(project_id: EntityId, resource: &str) -> String {
    format!("/api/projects/{}/{}", project_id, resource)
}

impl ApiClient {
    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.request(Method::GET, endpoint, None).await
    }

    async fn list<R, M>(&self, endpoint: &str) -> ApiResult<Vec<M>>
    where
        R: DeserializeOwned,
        M: From<R>,
    {
        let items: Vec<R> = self.get(endpoint).await?;
        Ok(items.into_iter().map(M::from).collect())
    }

    async fn send<R, M>(&self, method: Method, endpoint: &str, payload: Value) -> ApiResult<M>
    where
        R: DeserializeOwned,
        M: From<R>,
    {
        let item: R = self.request(method, endpoint, Some(payload)).await?;
        Ok(M::from(item))
    }

    // Health / auth

    pub async fn health(&self) -> ApiResult<HealthResponse> {
        self.get("/api/health").await
    }

    /// Log in and install the returned token.
    pub async fn login(&self, email: &str, password: &SecretString) -> ApiResult<LoginResponse> {
        let response: LoginBody = self
            .request(
                Method::POST,
                "/api/auth/login",
                Some(json!({ "email": email, "password": password.expose_secret() })),
            )
            .await?;
        self.set_token(SecretString::from(response.access_token.clone()))
            .await;
        let response = LoginResponse::from(response);
        info!("Logged in as {}", response.user.email);
        Ok(response)
    }

    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &SecretString,
    ) -> ApiResult<AuthUser> {
        self.request(
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "full_name": full_name,
                "email": email,
                "password": password.expose_secret(),
            })),
        )
        .await
    }

    // Projects

    pub async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        self.list::<ProjectResponse, _>("/api/projects").await
    }

    pub async fn get_project(&self, id: EntityId) -> ApiResult<Project> {
        let project: ProjectResponse = self.get(&format!("/api/projects/{}", id)).await?;
        Ok(project.into())
    }

    pub async fn create_project(&self, draft: &ProjectDraft) -> ApiResult<Project> {
        let payload = body(&ProjectPayload::from(draft))?;
        self.send::<ProjectResponse, _>(Method::POST, "/api/projects", payload)
            .await
    }

    pub async fn update_project(&self, id: EntityId, draft: &ProjectDraft) -> ApiResult<Project> {
        let payload = body(&ProjectPayload::from(draft))?;
        self.send::<ProjectResponse, _>(Method::PUT, &format!("/api/projects/{}", id), payload)
            .await
    }

    pub async fn delete_project(&self, id: EntityId) -> ApiResult<()> {
        let _: Value = self
            .request(Method::DELETE, &format!("/api/projects/{}", id), None)
            .await?;
        Ok(())
    }

    // Test cases

    pub async fn list_test_cases(&self, project_id: EntityId) -> ApiResult<Vec<TestCase>> {
        self.list::<TestCaseResponse, _>(&project_path(project_id, "test-cases"))
            .await
    }

    pub async fn get_test_case(&self, project_id: EntityId, id: EntityId) -> ApiResult<TestCase> {
        let case: TestCaseResponse = self
            .get(&format!("{}/{}", project_path(project_id, "test-cases"), id))
            .await?;
        Ok(case.into())
    }

    pub async fn create_test_case(
        &self,
        project_id: EntityId,
        draft: &TestCaseDraft,
    ) -> ApiResult<TestCase> {
        let payload = body(&TestCasePayload::from(draft))?;
        self.send::<TestCaseResponse, _>(
            Method::POST,
            &project_path(project_id, "test-cases"),
            payload,
        )
        .await
    }

    pub async fn update_test_case(
        &self,
        project_id: EntityId,
        id: EntityId,
        draft: &TestCaseDraft,
    ) -> ApiResult<TestCase> {
        let payload = body(&TestCasePayload::from(draft))?;
        self.send::<TestCaseResponse, _>(
            Method::PUT,
            &format!("{}/{}", project_path(project_id, "test-cases"), id),
            payload,
        )
        .await
    }

    pub async fn delete_test_case(&self, project_id: EntityId, id: EntityId) -> ApiResult<()> {
        let _: Value = self
            .request(
                Method::DELETE,
                &format!("{}/{}", project_path(project_id, "test-cases"), id),
                None,
            )
            .await?;
        Ok(())
    }

    // Elements

    pub async fn list_elements(&self, project_id: EntityId) -> ApiResult<Vec<Element>> {
        self.list::<ElementResponse, _>(&project_path(project_id, "elements"))
            .await
    }

    pub async fn create_element(
        &self,
        project_id: EntityId,
        draft: &ElementDraft,
    ) -> ApiResult<Element> {
        let payload = body(&ElementPayload::from(draft))?;
        self.send::<ElementResponse, _>(Method::POST, &project_path(project_id, "elements"), payload)
            .await
    }

    // Test suites

    pub async fn list_test_suites(&self, project_id: EntityId) -> ApiResult<Vec<TestSuite>> {
        self.list::<TestSuiteResponse, _>(&project_path(project_id, "test-suites"))
            .await
    }

    pub async fn create_test_suite(
        &self,
        project_id: EntityId,
        draft: &TestSuiteDraft,
    ) -> ApiResult<TestSuite> {
        let payload = body(&TestSuitePayload::from(draft))?;
        self.send::<TestSuiteResponse, _>(
            Method::POST,
            &project_path(project_id, "test-suites"),
            payload,
        )
        .await
    }

    // Test plans

    pub async fn list_test_plans(&self, project_id: EntityId) -> ApiResult<Vec<TestPlan>> {
        self.list::<TestPlanResponse, _>(&project_path(project_id, "test-plans"))
            .await
    }

    pub async fn create_test_plan(
        &self,
        project_id: EntityId,
        draft: &TestPlanDraft,
    ) -> ApiResult<TestPlan> {
        let payload = body(&TestPlanPayload::from(draft))?;
        self.send::<TestPlanResponse, _>(
            Method::POST,
            &project_path(project_id, "test-plans"),
            payload,
        )
        .await
    }

    // Test data

    pub async fn list_test_data(&self, project_id: EntityId) -> ApiResult<Vec<TestDataProfile>> {
        self.list::<TestDataResponse, _>(&project_path(project_id, "test-data"))
            .await
    }

    pub async fn create_test_data(
        &self,
        project_id: EntityId,
        draft: &TestDataDraft,
    ) -> ApiResult<TestDataProfile> {
        let payload = body(&TestDataPayload::from(draft))?;
        self.send::<TestDataResponse, _>(
            Method::POST,
            &project_path(project_id, "test-data"),
            payload,
        )
        .await
    }

    // Environments

    pub async fn list_environments(&self, project_id: EntityId) -> ApiResult<Vec<Environment>> {
        self.list::<EnvironmentResponse, _>(&project_path(project_id, "environments"))
            .await
    }

    pub async fn create_environment(
        &self,
        project_id: EntityId,
        draft: &EnvironmentDraft,
    ) -> ApiResult<Environment> {
        let payload = body(&EnvironmentPayload::from(draft))?;
        self.send::<EnvironmentResponse, _>(
            Method::POST,
            &project_path(project_id, "environments"),
            payload,
        )
        .await
    }

    // AI

    /// Free-form assistant call. Returns the raw answer body.
    pub async fn ai_assistant(
        &self,
        project_id: EntityId,
        input: &str,
        chat_history: &[Value],
    ) -> ApiResult<Value> {
        self.request(
            Method::POST,
            &project_path(project_id, "ai-assistant"),
            Some(json!({ "input": input, "chat_history": chat_history })),
        )
        .await
    }

    /// Generated test plan outline as markdown.
    pub async fn ai_test_plans(&self, project_id: EntityId) -> ApiResult<String> {
        let raw: Value = self.get(&project_path(project_id, "ai-test-plans")).await?;
        Ok(output_text(&raw))
    }

    /// Generated test cases, as a table when the answer contains one.
    pub async fn ai_test_cases(&self, project_id: EntityId) -> ApiResult<AiContent> {
        let raw: Value = self.get(&project_path(project_id, "ai-test-cases")).await?;
        Ok(AiContent::from_response(&raw))
    }
}
