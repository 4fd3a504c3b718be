//! Which backend endpoints serve each artifact kind.
//!
//! Test cases have the full set of verbs; elements, suites, plans, test data
//! and environments can be listed and created; wiki pages, run results and
//! step groups live in local storage only.

use async_trait::async_trait;

use super::repository::Artifact;
use crate::api::{ApiClient, ApiResult};
use crate::models::{
    Element, ElementDraft, EntityId, Environment, EnvironmentDraft, RunResult, RunResultDraft,
    StepGroup, StepGroupDraft, TestCase, TestCaseDraft, TestDataDraft, TestDataProfile, TestPlan,
    TestPlanDraft, TestSuite, TestSuiteDraft, WikiPage, WikiPageDraft,
};
use crate::store::ArtifactKind;

#[async_trait]
impl Artifact for TestCase {
    const KIND: ArtifactKind = ArtifactKind::TestCases;
    type Form = TestCaseDraft;

    fn to_form(&self) -> TestCaseDraft {
        TestCaseDraft::from_record(self)
    }

    async fn remote_list(api: &ApiClient, project: EntityId) -> Option<ApiResult<Vec<Self>>> {
        Some(api.list_test_cases(project).await)
    }

    async fn remote_get(api: &ApiClient, project: EntityId, id: EntityId) -> Option<ApiResult<Self>> {
        Some(api.get_test_case(project, id).await)
    }

    async fn remote_create(
        api: &ApiClient,
        project: EntityId,
        form: &TestCaseDraft,
    ) -> Option<ApiResult<Self>> {
        Some(api.create_test_case(project, form).await)
    }

    async fn remote_update(
        api: &ApiClient,
        project: EntityId,
        id: EntityId,
        form: &TestCaseDraft,
    ) -> Option<ApiResult<Self>> {
        Some(api.update_test_case(project, id, form).await)
    }

    async fn remote_delete(api: &ApiClient, project: EntityId, id: EntityId) -> Option<ApiResult<()>> {
        Some(api.delete_test_case(project, id).await)
    }
}

#[async_trait]
impl Artifact for Element {
    const KIND: ArtifactKind = ArtifactKind::Elements;
    type Form = ElementDraft;

    fn to_form(&self) -> ElementDraft {
        ElementDraft {
            name: self.name.clone(),
            selector: self.selector.clone(),
            kind: self.kind,
            status: self.status,
        }
    }

    async fn remote_list(api: &ApiClient, project: EntityId) -> Option<ApiResult<Vec<Self>>> {
        Some(api.list_elements(project).await)
    }

    async fn remote_create(
        api: &ApiClient,
        project: EntityId,
        form: &ElementDraft,
    ) -> Option<ApiResult<Self>> {
        Some(api.create_element(project, form).await)
    }
}

#[async_trait]
impl Artifact for TestSuite {
    const KIND: ArtifactKind = ArtifactKind::TestSuites;
    type Form = TestSuiteDraft;

    fn to_form(&self) -> TestSuiteDraft {
        TestSuiteDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            test_case_ids: self.test_case_ids.iter().copied().collect(),
        }
    }

    async fn remote_list(api: &ApiClient, project: EntityId) -> Option<ApiResult<Vec<Self>>> {
        Some(api.list_test_suites(project).await)
    }

    async fn remote_create(
        api: &ApiClient,
        project: EntityId,
        form: &TestSuiteDraft,
    ) -> Option<ApiResult<Self>> {
        Some(api.create_test_suite(project, form).await)
    }
}

#[async_trait]
impl Artifact for TestPlan {
    const KIND: ArtifactKind = ArtifactKind::TestPlans;
    type Form = TestPlanDraft;

    fn to_form(&self) -> TestPlanDraft {
        TestPlanDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            test_suite_ids: self.test_suite_ids.iter().copied().collect(),
        }
    }

    async fn remote_list(api: &ApiClient, project: EntityId) -> Option<ApiResult<Vec<Self>>> {
        Some(api.list_test_plans(project).await)
    }

    async fn remote_create(
        api: &ApiClient,
        project: EntityId,
        form: &TestPlanDraft,
    ) -> Option<ApiResult<Self>> {
        Some(api.create_test_plan(project, form).await)
    }
}

#[async_trait]
impl Artifact for TestDataProfile {
    const KIND: ArtifactKind = ArtifactKind::TestData;
    type Form = TestDataDraft;

    fn to_form(&self) -> TestDataDraft {
        TestDataDraft {
            name: self.name.clone(),
            source_type: self.source_type,
            description: self.description.clone(),
            records: i64::try_from(self.records).unwrap_or(i64::MAX),
            status: self.status,
        }
    }

    async fn remote_list(api: &ApiClient, project: EntityId) -> Option<ApiResult<Vec<Self>>> {
        Some(api.list_test_data(project).await)
    }

    async fn remote_create(
        api: &ApiClient,
        project: EntityId,
        form: &TestDataDraft,
    ) -> Option<ApiResult<Self>> {
        Some(api.create_test_data(project, form).await)
    }
}

#[async_trait]
impl Artifact for Environment {
    const KIND: ArtifactKind = ArtifactKind::Environments;
    type Form = EnvironmentDraft;

    fn to_form(&self) -> EnvironmentDraft {
        EnvironmentDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            url: self.url.clone(),
            status: self.status,
        }
    }

    async fn remote_list(api: &ApiClient, project: EntityId) -> Option<ApiResult<Vec<Self>>> {
        Some(api.list_environments(project).await)
    }

    async fn remote_create(
        api: &ApiClient,
        project: EntityId,
        form: &EnvironmentDraft,
    ) -> Option<ApiResult<Self>> {
        Some(api.create_environment(project, form).await)
    }
}

impl Artifact for WikiPage {
    const KIND: ArtifactKind = ArtifactKind::Wiki;
    type Form = WikiPageDraft;

    fn to_form(&self) -> WikiPageDraft {
        WikiPageDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            tags: self.tags.iter().cloned().collect::<Vec<_>>().join(", "),
        }
    }
}

impl Artifact for RunResult {
    const KIND: ArtifactKind = ArtifactKind::RunResults;
    type Form = RunResultDraft;

    fn to_form(&self) -> RunResultDraft {
        RunResultDraft {
            test_plan: self.test_plan.clone(),
            status: Some(self.status),
            duration_ms: self.duration_ms,
            passed: self.passed,
            failed: self.failed,
            skipped: self.skipped,
        }
    }
}

impl Artifact for StepGroup {
    const KIND: ArtifactKind = ArtifactKind::StepGroups;
    type Form = StepGroupDraft;

    fn to_form(&self) -> StepGroupDraft {
        StepGroupDraft {
            name: self.name.clone(),
            steps: self.steps.clone(),
        }
    }
}
