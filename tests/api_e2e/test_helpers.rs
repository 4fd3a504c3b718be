//! Shared test helpers for the API E2E tests.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use testgenie_lib::config::Config;
use testgenie_lib::models::{
    Browser, EntityId, ProjectDraft, StepAction, StepList, TestCaseDraft, TestStep,
};
use testgenie_lib::services::Workspace;
use testgenie_lib::store::MemoryStore;

/// Config pointing at `api_url` with short timeouts.
pub fn config_for(api_url: &str) -> Config {
    Config {
        api_url: api_url.to_string(),
        connect_timeout: Duration::from_secs(2),
        request_timeout: Duration::from_secs(5),
        ..Config::default()
    }
}

/// A URL nothing listens on: bind an ephemeral port, then release it.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Workspace over an in-memory store.
pub fn memory_workspace(api_url: &str) -> (Arc<MemoryStore>, Workspace) {
    let memory = Arc::new(MemoryStore::new());
    let workspace =
        Workspace::with_backend(config_for(api_url), memory.clone()).expect("workspace");
    (memory, workspace)
}

pub fn checkout_flow() -> ProjectDraft {
    ProjectDraft::new("Checkout Flow", "Checkout regression", "WebApp", "1.0.0")
}

/// A test case form that passes validation.
pub fn login_case(name: &str) -> TestCaseDraft {
    TestCaseDraft {
        name: name.to_string(),
        description: "Valid credentials reach the dashboard".to_string(),
        assignee: "Alice".to_string(),
        reviewer: "Bob".to_string(),
        browsers: [Browser::Chrome, Browser::Firefox].into_iter().collect(),
        environment: "Staging".to_string(),
        steps: StepList::from(vec![
            TestStep::with(EntityId(1), StepAction::Navigate, "login-page", "/login"),
            TestStep::with(EntityId(2), StepAction::Type, "email", "a@b.c"),
            TestStep::with(EntityId(3), StepAction::Click, "submit", ""),
        ]),
        ..TestCaseDraft::default()
    }
}

/// Read a raw stored collection as JSON.
pub async fn stored_json(memory: &MemoryStore, key: &str) -> serde_json::Value {
    use testgenie_lib::store::KeyValueStore;
    let raw = memory
        .get(key)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("key {} not stored", key));
    serde_json::from_str(&raw).unwrap()
}
