//! E2E tests: project flows, remote and fallback.

use testgenie_lib::error::AppError;
use testgenie_lib::models::{EntityId, HealthStatus, ProjectDraft, WikiPageDraft};
use testgenie_lib::services::DataSource;
use testgenie_lib::store::KeyValueStore;

use super::mock_backend::MockBackend;
use super::test_helpers::*;

#[actix_rt::test]
async fn test_create_and_list_remote() {
    let mock = MockBackend::start().await;
    let (memory, workspace) = memory_workspace(&mock.base_url);

    let created = workspace.projects.create(checkout_flow()).await.unwrap();
    assert_eq!(created.source, DataSource::Remote);
    assert_eq!(created.value.name, "Checkout Flow");
    assert_eq!(created.value.color, "#F54927");

    let listed = workspace.projects.list().await;
    assert_eq!(listed.source, DataSource::Remote);
    assert_eq!(listed.value.len(), 1);
    assert_eq!(listed.value[0].id, created.value.id);

    // Remote results are not mirrored locally
    assert!(memory.get("testgenie-projects").await.unwrap().is_none());
}

#[actix_rt::test]
async fn test_checkout_flow_with_unreachable_backend() {
    let (memory, workspace) = memory_workspace(&unreachable_url());

    let created = workspace.projects.create(checkout_flow()).await.unwrap();
    assert!(created.source.is_fallback());
    assert_eq!(created.value.status, HealthStatus::Healthy);
    assert_eq!(created.value.last_run_label(), "Never");
    assert!(created.value.id.value() > 0);

    let stored = stored_json(&memory, "testgenie-projects").await;
    let stored = stored.as_array().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["name"], "Checkout Flow");
    assert_eq!(stored[0]["applicationName"], "WebApp");
    assert_eq!(stored[0]["version"], "1.0.0");
    assert_eq!(stored[0]["status"], "healthy");
    assert_eq!(stored[0]["id"], created.value.id.value());

    let listed = workspace.projects.list().await;
    assert!(listed.source.is_fallback());
    assert_eq!(listed.value, vec![created.value]);
}

#[actix_rt::test]
async fn test_each_valid_create_appends_exactly_one() {
    let (_, workspace) = memory_workspace(&unreachable_url());

    for n in 1..=3 {
        workspace
            .projects
            .create(ProjectDraft::new(format!("P{}", n), "d", "App", "1"))
            .await
            .unwrap();
        assert_eq!(workspace.projects.local_list().await.len(), n);
    }
    let ids: Vec<_> = workspace
        .projects
        .local_list()
        .await
        .iter()
        .map(|p| p.id)
        .collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[actix_rt::test]
async fn test_invalid_project_is_rejected_without_calls() {
    let mock = MockBackend::start().await;
    let (_, workspace) = memory_workspace(&mock.base_url);

    let err = workspace
        .projects
        .create(ProjectDraft::new("", "d", "", "1"))
        .await
        .unwrap_err();
    let errors = err.validation_errors().unwrap();
    assert_eq!(errors.get("name"), Some("Project name is required"));
    assert_eq!(errors.get("applicationName"), Some("Application name is required"));
    assert!(mock.requests().is_empty());
}

#[actix_rt::test]
async fn test_backend_rejection_is_not_a_fallback() {
    let mock = MockBackend::start().await;
    let (memory, workspace) = memory_workspace(&mock.base_url);

    let err = workspace
        .projects
        .create(ProjectDraft::new("Duplicate", "d", "App", "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Api(_)));
    assert_eq!(err.to_string(), "API error: Project already exists");
    assert!(memory.keys().is_empty());
}

#[actix_rt::test]
async fn test_get_falls_back_then_not_found() {
    let (_, workspace) = memory_workspace(&unreachable_url());
    let created = workspace.projects.create(checkout_flow()).await.unwrap().value;

    let loaded = workspace.projects.get(created.id).await.unwrap();
    assert!(loaded.source.is_fallback());
    assert_eq!(loaded.value.name, "Checkout Flow");

    let err = workspace.projects.get(EntityId(12345)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[actix_rt::test]
async fn test_edit_locally_keeps_identity() {
    let (_, workspace) = memory_workspace(&unreachable_url());
    let created = workspace.projects.create(checkout_flow()).await.unwrap().value;

    let edited = workspace
        .projects
        .edit(created.id, |draft| draft.version = "1.1.0".to_string())
        .await
        .unwrap()
        .value;
    assert_eq!(edited.id, created.id);
    assert_eq!(edited.version, "1.1.0");
    assert_eq!(edited.created_at, created.created_at);
    assert_eq!(workspace.projects.local_list().await, vec![edited]);
}

#[actix_rt::test]
async fn test_delete_fallback_cascades_children() {
    let (memory, workspace) = memory_workspace(&unreachable_url());
    let keep = workspace.projects.create(checkout_flow()).await.unwrap().value;
    let gone = workspace
        .projects
        .create(ProjectDraft::new("Old", "d", "App", "1"))
        .await
        .unwrap()
        .value;

    for project in [keep.id, gone.id] {
        workspace
            .wiki
            .create(
                project,
                WikiPageDraft {
                    title: "Notes".to_string(),
                    content: "x".to_string(),
                    tags: String::new(),
                },
            )
            .await
            .unwrap();
    }

    let deleted = workspace.projects.delete(gone.id).await.unwrap();
    assert!(deleted.source.is_fallback());

    let remaining: Vec<_> = workspace.projects.local_list().await.iter().map(|p| p.id).collect();
    assert_eq!(remaining, vec![keep.id]);
    assert!(memory.get(&format!("testgenie-wiki-{}", gone.id)).await.unwrap().is_none());
    assert!(memory.get(&format!("testgenie-wiki-{}", keep.id)).await.unwrap().is_some());
}

#[actix_rt::test]
async fn test_delete_remote() {
    let mock = MockBackend::start().await;
    mock.seed_project(7, "Seeded");
    let (_, workspace) = memory_workspace(&mock.base_url);

    let deleted = workspace.projects.delete(EntityId(7)).await.unwrap();
    assert_eq!(deleted.source, DataSource::Remote);
    assert!(workspace.projects.list().await.value.is_empty());

    let err = workspace.projects.delete(EntityId(7)).await.unwrap_err();
    assert_eq!(err.to_string(), "API error: Project not found");
}

#[actix_rt::test]
async fn test_overview_counts_children() {
    let mock = MockBackend::start().await;
    mock.seed_project(3, "Shop");
    let (_, workspace) = memory_workspace(&mock.base_url);

    workspace
        .test_cases
        .create(EntityId(3), login_case("Login"))
        .await
        .unwrap();

    let overview = workspace.projects.overview(EntityId(3)).await.unwrap();
    assert_eq!(overview.project.value.name, "Shop");
    assert_eq!(overview.project.source, DataSource::Remote);
    assert_eq!(overview.test_case_count, 1);
    assert!(overview.step_groups.is_empty());
}

#[actix_rt::test]
async fn test_edit_remote_sends_put_and_returns_backend_record() {
    let mock = MockBackend::start().await;
    mock.seed_project(7, "Seeded");
    let (memory, workspace) = memory_workspace(&mock.base_url);

    let edited = workspace
        .projects
        .edit(EntityId(7), |draft| draft.name = "Renamed".to_string())
        .await
        .unwrap();
    assert_eq!(edited.source, DataSource::Remote);
    assert_eq!(edited.value.id, EntityId(7));
    assert_eq!(edited.value.name, "Renamed");
    assert_eq!(edited.value.version, "1.0.0");

    let request = mock.last_request();
    assert_eq!(request.method, "PUT");
    assert_eq!(request.path, "/api/projects/7");
    let sent = request.body.unwrap();
    assert_eq!(sent["name"], "Renamed");
    assert_eq!(sent["application_name"], "WebApp");
    assert_eq!(sent["color"], "#123456");

    let listed = workspace.projects.list().await.value;
    assert_eq!(listed[0].name, "Renamed");
    assert!(memory.keys().is_empty());
}

#[actix_rt::test]
async fn test_update_unknown_remote_project_is_surfaced() {
    let mock = MockBackend::start().await;
    let (memory, workspace) = memory_workspace(&mock.base_url);

    let err = workspace
        .projects
        .update(EntityId(99), checkout_flow())
        .await
        .unwrap_err();
    match err {
        AppError::Api(api) => assert_eq!(api.status(), Some(404)),
        other => panic!("expected API error, got {:?}", other),
    }
    assert!(memory.keys().is_empty());
}

#[actix_rt::test]
async fn test_offline_delete_of_unknown_project_is_not_found() {
    let (_, workspace) = memory_workspace(&unreachable_url());
    let kept = workspace.projects.create(checkout_flow()).await.unwrap().value;

    let err = workspace.projects.delete(EntityId(424242)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(workspace.projects.local_list().await, vec![kept]);
}
