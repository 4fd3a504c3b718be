//! E2E tests: AI content interpretation.

use serde_json::json;
use testgenie_lib::api::{AiContent, ApiClient};
use testgenie_lib::models::{Draft, EntityId};

use super::mock_backend::MockBackend;
use super::test_helpers::*;

#[actix_rt::test]
async fn test_markdown_answer_is_not_an_error() {
    let mock = MockBackend::start().await;
    let markdown = "## Suggested coverage\n\n- Guest checkout\n- Saved cards";
    mock.set_ai_body(json!({ "output": markdown }));
    let client = ApiClient::new(&config_for(&mock.base_url)).unwrap();

    let content = client.ai_test_cases(EntityId(1)).await.unwrap();
    assert_eq!(content, AiContent::Markdown(markdown.to_string()));
    assert_eq!(mock.last_request().path, "/api/projects/1/ai-test-cases");
}

#[actix_rt::test]
async fn test_table_answer_becomes_test_cases() {
    let mock = MockBackend::start().await;
    mock.set_ai_body(json!({
        "output": "Generated:\n```json\n[{\"Test Case Name\": \"Guest checkout\", \
                   \"Description\": \"Buy without an account\", \"Priority\": \"Critical\", \
                   \"Browsers\": [\"Chrome\"], \"Environment\": [\"Staging\"], \
                   \"Test Steps\": [\"Add item\", \"Pay\"]}]\n```"
    }));
    let client = ApiClient::new(&config_for(&mock.base_url)).unwrap();

    let AiContent::TestCases(cases) = client.ai_test_cases(EntityId(1)).await.unwrap() else {
        panic!("expected a test case table");
    };
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].name, "Guest checkout");

    // Suggestions prefill a form; the user still has to pick step actions
    let draft = cases[0].to_draft(EntityId(10));
    let errors = draft.validate().unwrap_err();
    assert!(errors.contains("step_0_action"));
    assert!(!errors.contains("name"));
}

#[actix_rt::test]
async fn test_test_plans_answer_is_text() {
    let mock = MockBackend::start().await;
    mock.set_ai_body(json!({ "output": "# Plan\n1. Smoke" }));
    let client = ApiClient::new(&config_for(&mock.base_url)).unwrap();

    let text = client.ai_test_plans(EntityId(2)).await.unwrap();
    assert_eq!(text, "# Plan\n1. Smoke");
}

#[actix_rt::test]
async fn test_ai_unreachable_is_an_error_not_a_panic() {
    let client = ApiClient::new(&config_for(&unreachable_url())).unwrap();
    assert!(client.ai_test_cases(EntityId(1)).await.is_err());
}
