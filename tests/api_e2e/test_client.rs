//! E2E tests: request plumbing, auth token and error normalisation.

use std::sync::Arc;

use reqwest::Method;
use secrecy::SecretString;
use serde_json::Value;
use testgenie_lib::api::{ApiClient, ApiError};
use testgenie_lib::models::{ElementDraft, EntityId, SelectorKind};
use testgenie_lib::store::{KeyValueStore, MemoryStore};

use super::mock_backend::{ISSUED_TOKEN, MockBackend, VALID_PASSWORD};
use super::test_helpers::*;

#[actix_rt::test]
async fn test_health() {
    let mock = MockBackend::start().await;
    let client = ApiClient::new(&config_for(&mock.base_url)).unwrap();

    let health = client.health().await.unwrap();
    assert!(health.is_ok());
    assert_eq!(health.message, "TestGenie API is running");
}

#[actix_rt::test]
async fn test_requests_carry_json_content_type_and_no_auth_without_token() {
    let mock = MockBackend::start().await;
    let client = ApiClient::new(&config_for(&mock.base_url)).unwrap();

    client.list_projects().await.unwrap();
    let request = mock.last_request();
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/api/projects");
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    assert_eq!(request.authorization, None);
}

#[actix_rt::test]
async fn test_login_installs_and_persists_token() {
    let mock = MockBackend::start().await;
    let memory = Arc::new(MemoryStore::new());
    let client = ApiClient::new(&config_for(&mock.base_url))
        .unwrap()
        .with_token_store(memory.clone());

    let password = SecretString::from(VALID_PASSWORD.to_string());
    let login = client.login("admin@superwise.ai", &password).await.unwrap();
    assert_eq!(login.user.email, "admin@superwise.ai");
    assert!(client.has_token());
    assert_eq!(
        memory.get("auth_token").await.unwrap().as_deref(),
        Some(ISSUED_TOKEN)
    );

    client.list_projects().await.unwrap();
    assert_eq!(
        mock.last_request().authorization,
        Some(format!("Bearer {}", ISSUED_TOKEN))
    );

    client.clear_token().await;
    client.list_projects().await.unwrap();
    assert_eq!(mock.last_request().authorization, None);
    assert_eq!(memory.get("auth_token").await.unwrap(), None);
}

#[actix_rt::test]
async fn test_failed_login_surfaces_detail() {
    let mock = MockBackend::start().await;
    let client = ApiClient::new(&config_for(&mock.base_url)).unwrap();

    let password = SecretString::from("wrong".to_string());
    let err = client.login("admin@superwise.ai", &password).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Http {
            status: 401,
            message: "Invalid email or password".to_string()
        }
    );
    assert!(!client.has_token());
}

#[actix_rt::test]
async fn test_workspace_login_sends_password_and_logout_clears() {
    let mock = MockBackend::start().await;
    let (memory, workspace) = memory_workspace(&mock.base_url);

    let password = SecretString::from(VALID_PASSWORD.to_string());
    workspace.login("qa@example.com", &password).await.unwrap();
    assert!(workspace.api().has_token());
    let sent = mock.last_body().unwrap();
    assert_eq!(sent["email"], "qa@example.com");
    assert_eq!(sent["password"], VALID_PASSWORD);

    workspace.logout().await;
    assert!(!workspace.api().has_token());
    assert_eq!(memory.get("auth_token").await.unwrap(), None);
}

#[actix_rt::test]
async fn test_manual_token_is_sent() {
    let mock = MockBackend::start().await;
    let client = ApiClient::new(&config_for(&mock.base_url)).unwrap();
    client
        .set_token(SecretString::from("manual".to_string()))
        .await;

    let _: Value = client
        .request(Method::GET, "/api/health", None)
        .await
        .unwrap();
    assert_eq!(
        mock.last_request().authorization.as_deref(),
        Some("Bearer manual")
    );
}

#[actix_rt::test]
async fn test_not_found_detail() {
    let mock = MockBackend::start().await;
    let client = ApiClient::new(&config_for(&mock.base_url)).unwrap();

    let err = client.get_project(EntityId(404)).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Project not found");
}

#[actix_rt::test]
async fn test_non_json_error_body_gets_generic_message() {
    let mock = MockBackend::start().await;
    let client = ApiClient::new(&config_for(&mock.base_url)).unwrap();

    let err = client.list_elements(EntityId(1)).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Http {
            status: 500,
            message: "HTTP 500: Internal Server Error".to_string()
        }
    );
}

#[actix_rt::test]
async fn test_structured_detail_is_kept_as_json_text() {
    let mock = MockBackend::start().await;
    let client = ApiClient::new(&config_for(&mock.base_url)).unwrap();

    let draft = ElementDraft::new(
        "Submit",
        "#submit",
        SelectorKind::Id,
    );
    let err = client.create_element(EntityId(1), &draft).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert!(err.to_string().contains("invalid element type"));
}

#[actix_rt::test]
async fn test_unreachable_backend_is_a_network_error() {
    let client = ApiClient::new(&config_for(&unreachable_url())).unwrap();

    let err = client.list_projects().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(ref msg) if !msg.is_empty()));
    assert!(err.is_transport());
}

#[actix_rt::test]
async fn test_unexpected_success_body_is_a_decode_error() {
    let mock = MockBackend::start().await;
    let client = ApiClient::new(&config_for(&mock.base_url)).unwrap();

    // Health answers an object, not a list
    let err = client
        .request::<Vec<Value>>(Method::GET, "/api/health", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}
