//! Backend wire types (snake_case) and their mapping onto the local models.

use chrono::{DateTime, NaiveDateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::models::{
    Browser, DataSourceType, Element, ElementDraft, ElementStatus, EntityId, Environment,
    EnvironmentDraft, EnvironmentStatus, HealthStatus, Priority, Project, ProjectDraft,
    SelectorKind, StepAction, StepList, TestCase, TestCaseDraft, TestCaseStatus, TestDataDraft,
    TestDataProfile, TestDataStatus, TestPlan, TestPlanDraft, TestPlanStatus, TestStep,
    TestSuite, TestSuiteDraft, TestSuiteStatus, DEFAULT_PROJECT_COLOR,
};

/// Parse a backend timestamp. Accepts RFC 3339 and the naive ISO form the
/// backend emits for UTC columns.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn timestamp_or_now(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(parse_timestamp).unwrap_or_else(Utc::now)
}

fn modified_at(updated_at: &Option<String>, created_at: &Option<String>) -> DateTime<Utc> {
    timestamp_or_now(updated_at.as_deref().or(created_at.as_deref()))
}

// ---------------------------------------------------------------------------
// Health / auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: EntityId,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginBody {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Successful login. The token is also installed on the client.
#[derive(Debug)]
pub struct LoginResponse {
    pub access_token: SecretString,
    pub token_type: String,
    pub user: AuthUser,
}

impl From<LoginBody> for LoginResponse {
    fn from(body: LoginBody) -> Self {
        LoginResponse {
            access_token: SecretString::from(body.access_token),
            token_type: body.token_type,
            user: body.user,
        }
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ProjectPayload {
    pub name: String,
    pub description: Option<String>,
    pub application_name: Option<String>,
    pub version: Option<String>,
    pub color: String,
}

impl From<&ProjectDraft> for ProjectPayload {
    fn from(draft: &ProjectDraft) -> Self {
        ProjectPayload {
            name: draft.name.trim().to_string(),
            description: Some(draft.description.clone()),
            application_name: Some(draft.application_name.clone()),
            version: Some(draft.version.clone()),
            color: draft
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_PROJECT_COLOR.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectResponse {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub application_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_run: Option<String>,
}

impl From<ProjectResponse> for Project {
    fn from(r: ProjectResponse) -> Self {
        Project {
            id: r.id,
            name: r.name,
            description: r.description.unwrap_or_default(),
            application_name: r.application_name.unwrap_or_default(),
            version: r.version.unwrap_or_default(),
            created_at: timestamp_or_now(r.created_at.as_deref()),
            last_run: r.last_run.as_deref().and_then(parse_timestamp),
            status: r
                .status
                .as_deref()
                .map(HealthStatus::parse)
                .unwrap_or_default(),
            color: r
                .color
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROJECT_COLOR.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Test cases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct StepPayload {
    pub step_number: usize,
    pub action: String,
    pub element: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestCasePayload {
    pub name: String,
    pub description: Option<String>,
    pub status: TestCaseStatus,
    pub priority: Priority,
    pub assignee: Option<String>,
    pub reviewer: Option<String>,
    pub browsers: Vec<String>,
    pub environment: Option<String>,
    pub steps: Vec<StepPayload>,
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl From<&TestCaseDraft> for TestCasePayload {
    fn from(draft: &TestCaseDraft) -> Self {
        TestCasePayload {
            name: draft.name.clone(),
            description: non_empty(&draft.description),
            status: draft.status,
            priority: draft.priority,
            assignee: non_empty(&draft.assignee),
            reviewer: non_empty(&draft.reviewer),
            browsers: draft.browsers.iter().map(|b| b.as_str().to_string()).collect(),
            environment: non_empty(&draft.environment),
            steps: draft
                .steps
                .iter()
                .enumerate()
                .map(|(index, step)| StepPayload {
                    step_number: index + 1,
                    action: step.action.map(|a| a.as_str().to_string()).unwrap_or_default(),
                    element: non_empty(&step.element),
                    value: non_empty(&step.value),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StepResponse {
    pub id: EntityId,
    pub step_number: i64,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub element: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestCaseResponse {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub reviewer: Option<String>,
    #[serde(default)]
    pub browsers: Vec<String>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepResponse>,
}

impl From<TestCaseResponse> for TestCase {
    fn from(r: TestCaseResponse) -> Self {
        let last_modified = modified_at(&r.updated_at, &r.created_at);
        let mut steps = r.steps;
        steps.sort_by_key(|s| s.step_number);
        let steps: StepList = steps
            .into_iter()
            .map(|s| TestStep {
                id: s.id,
                action: StepAction::parse(&s.action),
                element: s.element.unwrap_or_default(),
                value: s.value.unwrap_or_default(),
            })
            .collect::<Vec<_>>()
            .into();

        TestCase {
            id: r.id,
            name: r.name,
            description: r.description.unwrap_or_default(),
            status: r
                .status
                .as_deref()
                .map(TestCaseStatus::parse)
                .unwrap_or_default(),
            priority: r.priority.as_deref().map(Priority::parse).unwrap_or_default(),
            assignee: r.assignee.unwrap_or_default(),
            reviewer: r.reviewer.unwrap_or_default(),
            browsers: r.browsers.iter().filter_map(|b| Browser::parse(b)).collect(),
            environment: r.environment.unwrap_or_default(),
            last_modified,
            created_by: r.created_by.unwrap_or_default(),
            steps,
        }
    }
}

// ---------------------------------------------------------------------------
// Elements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ElementPayload {
    pub name: String,
    pub selector: String,
    #[serde(rename = "type")]
    pub kind: SelectorKind,
    pub status: ElementStatus,
}

impl From<&ElementDraft> for ElementPayload {
    fn from(draft: &ElementDraft) -> Self {
        ElementPayload {
            name: draft.name.clone(),
            selector: draft.selector.clone(),
            kind: draft.kind,
            status: draft.status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementResponse {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub selector: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl From<ElementResponse> for Element {
    fn from(r: ElementResponse) -> Self {
        Element {
            id: r.id,
            name: r.name,
            selector: r.selector,
            kind: SelectorKind::parse(&r.kind),
            status: r.status.as_deref().map(ElementStatus::parse).unwrap_or_default(),
            last_modified: modified_at(&r.updated_at, &r.created_at),
            created_by: r.created_by.unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Test suites / plans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TestSuitePayload {
    pub name: String,
    pub description: Option<String>,
    pub status: TestSuiteStatus,
    pub test_case_ids: Vec<EntityId>,
}

impl From<&TestSuiteDraft> for TestSuitePayload {
    fn from(draft: &TestSuiteDraft) -> Self {
        TestSuitePayload {
            name: draft.name.clone(),
            description: non_empty(&draft.description),
            status: draft.status,
            test_case_ids: draft.test_case_ids.iter().copied().collect(),
        }
    }
}

/// Nested member reference; only the id is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberRef {
    pub id: EntityId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestSuiteResponse {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub test_cases: Vec<MemberRef>,
}

impl From<TestSuiteResponse> for TestSuite {
    fn from(r: TestSuiteResponse) -> Self {
        let test_case_ids: Vec<EntityId> = r.test_cases.iter().map(|m| m.id).collect();
        TestSuite {
            id: r.id,
            name: r.name,
            description: r.description.unwrap_or_default(),
            test_cases: test_case_ids.len(),
            test_case_ids,
            status: r
                .status
                .as_deref()
                .map(TestSuiteStatus::parse)
                .unwrap_or_default(),
            last_run: None,
            last_modified: modified_at(&r.updated_at, &r.created_at),
            created_by: r.created_by.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TestPlanPayload {
    pub name: String,
    pub description: Option<String>,
    pub status: TestPlanStatus,
    pub test_suite_ids: Vec<EntityId>,
}

impl From<&TestPlanDraft> for TestPlanPayload {
    fn from(draft: &TestPlanDraft) -> Self {
        TestPlanPayload {
            name: draft.name.clone(),
            description: non_empty(&draft.description),
            status: draft.status,
            test_suite_ids: draft.test_suite_ids.iter().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestPlanResponse {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub test_suites: Vec<MemberRef>,
}

impl From<TestPlanResponse> for TestPlan {
    fn from(r: TestPlanResponse) -> Self {
        let test_suite_ids: Vec<EntityId> = r.test_suites.iter().map(|m| m.id).collect();
        TestPlan {
            id: r.id,
            name: r.name,
            description: r.description.unwrap_or_default(),
            test_suites: test_suite_ids.len(),
            test_suite_ids,
            status: r
                .status
                .as_deref()
                .map(TestPlanStatus::parse)
                .unwrap_or_default(),
            last_run: None,
            last_modified: modified_at(&r.updated_at, &r.created_at),
            created_by: r.created_by.unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Test data / environments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TestDataPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: DataSourceType,
    pub description: Option<String>,
    pub records: i64,
    pub status: TestDataStatus,
}

impl From<&TestDataDraft> for TestDataPayload {
    fn from(draft: &TestDataDraft) -> Self {
        TestDataPayload {
            name: draft.name.trim().to_string(),
            source_type: draft.source_type,
            description: non_empty(draft.description.trim()),
            records: draft.records,
            status: draft.status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestDataResponse {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub source_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub records: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl From<TestDataResponse> for TestDataProfile {
    fn from(r: TestDataResponse) -> Self {
        TestDataProfile {
            id: r.id,
            name: r.name,
            source_type: DataSourceType::parse(&r.source_type),
            description: r.description.unwrap_or_default(),
            records: r.records.max(0) as u64,
            status: r.status.as_deref().map(TestDataStatus::parse).unwrap_or_default(),
            last_modified: modified_at(&r.updated_at, &r.created_at),
            created_by: r.created_by.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentPayload {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub status: EnvironmentStatus,
}

impl From<&EnvironmentDraft> for EnvironmentPayload {
    fn from(draft: &EnvironmentDraft) -> Self {
        EnvironmentPayload {
            name: draft.name.trim().to_string(),
            description: non_empty(&draft.description),
            url: draft.url.trim().to_string(),
            status: draft.status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentResponse {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl From<EnvironmentResponse> for Environment {
    fn from(r: EnvironmentResponse) -> Self {
        Environment {
            id: r.id,
            name: r.name,
            description: r.description.unwrap_or_default(),
            url: r.url.unwrap_or_default(),
            status: r
                .status
                .as_deref()
                .map(EnvironmentStatus::parse)
                .unwrap_or_default(),
            last_modified: modified_at(&r.updated_at, &r.created_at),
            created_by: r.created_by.unwrap_or_default(),
        }
    }
}
