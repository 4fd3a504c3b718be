//! Interpretation of AI assistant responses.
//!
//! The assistant answers either with a JSON table of test cases embedded in
//! free text, or with plain markdown.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Browser, EntityId, Priority, StepList, TestCaseDraft, TestStep};

/// One row of an AI generated test case table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiTestCase {
    #[serde(rename = "Test Case Name")]
    pub name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Priority", default)]
    pub priority: String,
    #[serde(rename = "Browsers", default)]
    pub browsers: Vec<String>,
    #[serde(rename = "Environment", default)]
    pub environments: Vec<String>,
    #[serde(rename = "Test Steps", default)]
    pub steps: Vec<String>,
}

impl AiTestCase {
    /// Prefill a test case form from this suggestion. Step texts land in the
    /// step value; action and element are left for the user to pick.
    pub fn to_draft(&self, first_step_id: EntityId) -> TestCaseDraft {
        let browsers: BTreeSet<Browser> = self
            .browsers
            .iter()
            .filter_map(|b| Browser::parse(&b.trim().to_lowercase()))
            .collect();

        let mut steps = StepList::new();
        for (offset, text) in self.steps.iter().enumerate() {
            let mut step = TestStep::new(EntityId(first_step_id.value() + offset as i64));
            step.value = text.clone();
            steps.push(step);
        }

        let defaults = TestCaseDraft::default();
        TestCaseDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            priority: Priority::parse(&self.priority.trim().to_lowercase()),
            browsers: if browsers.is_empty() {
                defaults.browsers.clone()
            } else {
                browsers
            },
            environment: self.environments.first().cloned().unwrap_or_default(),
            steps,
            ..defaults
        }
    }
}

/// Parsed AI answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiContent {
    Markdown(String),
    TestCases(Vec<AiTestCase>),
}

impl AiContent {
    /// Interpret a raw response body. Never fails: anything that is not a
    /// non-empty test case table is markdown.
    pub fn from_response(body: &Value) -> Self {
        let text = output_text(body);
        match parse_table(&text) {
            Some(cases) => AiContent::TestCases(cases),
            None => AiContent::Markdown(text),
        }
    }

    pub fn is_markdown(&self) -> bool {
        matches!(self, AiContent::Markdown(_))
    }
}

/// The `output` field when present, otherwise the body itself.
pub fn output_text(body: &Value) -> String {
    let output = match body {
        Value::Object(map) => match map.get("output") {
            Some(Value::Null) | None => body,
            Some(output) => output,
        },
        _ => body,
    };
    match output {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn parse_table(text: &str) -> Option<Vec<AiTestCase>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    let cases: Vec<AiTestCase> = serde_json::from_str(&text[start..=end]).ok()?;
    if cases.is_empty() { None } else { Some(cases) }
}
