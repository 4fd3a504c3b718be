//! Test case model with its ordered steps.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, EntityId, Record, RecordContext};
use crate::error::ValidationErrors;

/// Review lifecycle of a test case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestCaseStatus {
    #[default]
    Draft,
    InReview,
    Ready,
    Obsolete,
    Rework,
}

impl TestCaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InReview => "in-review",
            Self::Ready => "ready",
            Self::Obsolete => "obsolete",
            Self::Rework => "rework",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "in-review" => Self::InReview,
            "ready" => Self::Ready,
            "obsolete" => Self::Obsolete,
            "rework" => Self::Rework,
            _ => Self::Draft,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    Major,
    #[default]
    Medium,
    Minor,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Major => "major",
            Self::Medium => "medium",
            Self::Minor => "minor",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "critical" => Self::Critical,
            "major" | "high" => Self::Major,
            "minor" | "low" => Self::Minor,
            _ => Self::Medium,
        }
    }
}

/// Target browser for a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Chrome,
    Firefox,
    Edge,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Edge => "edge",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chrome" => Some(Self::Chrome),
            "firefox" => Some(Self::Firefox),
            "edge" => Some(Self::Edge),
            _ => None,
        }
    }
}

/// Action performed by a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepAction {
    Click,
    Type,
    Select,
    Verify,
    Wait,
    Navigate,
}

impl StepAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Type => "type",
            Self::Select => "select",
            Self::Verify => "verify",
            Self::Wait => "wait",
            Self::Navigate => "navigate",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "click" => Some(Self::Click),
            "type" => Some(Self::Type),
            "select" => Some(Self::Select),
            "verify" => Some(Self::Verify),
            "wait" => Some(Self::Wait),
            "navigate" => Some(Self::Navigate),
            _ => None,
        }
    }
}

/// One step of a test case. `action` stays unset until the user picks one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStep {
    pub id: EntityId,
    #[serde(default)]
    pub action: Option<StepAction>,
    /// Referenced element name or id
    #[serde(default)]
    pub element: String,
    #[serde(default)]
    pub value: String,
}

impl TestStep {
    pub fn new(id: EntityId) -> Self {
        TestStep {
            id,
            action: None,
            element: String::new(),
            value: String::new(),
        }
    }

    pub fn with(
        id: EntityId,
        action: StepAction,
        element: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        TestStep {
            id,
            action: Some(action),
            element: element.into(),
            value: value.into(),
        }
    }
}

/// User-ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepList(Vec<TestStep>);

impl StepList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty step.
    pub fn add(&mut self, id: EntityId) -> &mut TestStep {
        self.0.push(TestStep::new(id));
        let last = self.0.len() - 1;
        &mut self.0[last]
    }

    pub fn push(&mut self, step: TestStep) {
        self.0.push(step);
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut TestStep> {
        self.0.iter_mut().find(|step| step.id == id)
    }

    /// Remove a step; returns whether it existed.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let before = self.0.len();
        self.0.retain(|step| step.id != id);
        self.0.len() != before
    }

    /// Drop `dragged` onto `target`: the dragged step is taken out and
    /// re-inserted at the index the target occupied before the move.
    ///
    /// Returns false (and leaves the order untouched) when either id is
    /// unknown or both are the same step.
    pub fn move_step(&mut self, dragged: EntityId, target: EntityId) -> bool {
        if dragged == target {
            return false;
        }
        let Some(from) = self.position(dragged) else {
            return false;
        };
        let Some(to) = self.position(target) else {
            return false;
        };
        let step = self.0.remove(from);
        self.0.insert(to, step);
        true
    }

    pub fn position(&self, id: EntityId) -> Option<usize> {
        self.0.iter().position(|step| step.id == id)
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.0.iter().map(|step| step.id).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestStep> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Record per-step errors under `step_<index>_action` / `step_<index>_element`.
    pub(crate) fn validate_into(&self, errors: &mut ValidationErrors) {
        if self.0.is_empty() {
            errors.add("steps", "At least one test step is required");
        }
        for (index, step) in self.0.iter().enumerate() {
            if step.action.is_none() {
                errors.add(format!("step_{}_action", index), "Action is required");
            }
            if step.element.trim().is_empty() {
                errors.add(format!("step_{}_element", index), "Element is required");
            }
        }
    }
}

impl From<Vec<TestStep>> for StepList {
    fn from(steps: Vec<TestStep>) -> Self {
        StepList(steps)
    }
}

impl<'a> IntoIterator for &'a StepList {
    type Item = &'a TestStep;
    type IntoIter = std::slice::Iter<'a, TestStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn default_browsers() -> BTreeSet<Browser> {
    BTreeSet::from([Browser::Chrome])
}

/// Stored test case record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TestCaseStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub reviewer: String,
    #[serde(default = "default_browsers")]
    pub browsers: BTreeSet<Browser>,
    /// Referenced environment
    #[serde(default)]
    pub environment: String,
    pub last_modified: DateTime<Utc>,
    pub created_by: String,
    #[serde(default)]
    pub steps: StepList,
}

impl Record for TestCase {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = now;
    }
}

/// Create/edit test case form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseDraft {
    pub name: String,
    pub description: String,
    pub status: TestCaseStatus,
    pub priority: Priority,
    pub assignee: String,
    pub reviewer: String,
    pub browsers: BTreeSet<Browser>,
    pub environment: String,
    pub steps: StepList,
}

impl Default for TestCaseDraft {
    fn default() -> Self {
        TestCaseDraft {
            name: String::new(),
            description: String::new(),
            status: TestCaseStatus::Draft,
            priority: Priority::Medium,
            assignee: String::new(),
            reviewer: String::new(),
            browsers: default_browsers(),
            environment: String::new(),
            steps: StepList::new(),
        }
    }
}

impl TestCaseDraft {
    /// Pre-fill an edit form from a stored record.
    pub fn from_record(record: &TestCase) -> Self {
        TestCaseDraft {
            name: record.name.clone(),
            description: record.description.clone(),
            status: record.status,
            priority: record.priority,
            assignee: record.assignee.clone(),
            reviewer: record.reviewer.clone(),
            browsers: record.browsers.clone(),
            environment: record.environment.clone(),
            steps: record.steps.clone(),
        }
    }
}

impl Draft for TestCaseDraft {
    type Record = TestCase;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name, "Test case name is required");
        errors.require("assignee", &self.assignee, "Assignee is required");
        errors.require("reviewer", &self.reviewer, "Reviewer is required");
        if self.browsers.is_empty() {
            errors.add("browsers", "Please select a browser");
        }
        errors.require("environment", &self.environment, "Environment is required");
        self.steps.validate_into(&mut errors);
        errors.into_result()
    }

    fn build(self, ctx: &RecordContext) -> TestCase {
        TestCase {
            id: ctx.id,
            name: self.name,
            description: self.description,
            status: self.status,
            priority: self.priority,
            assignee: self.assignee,
            reviewer: self.reviewer,
            browsers: self.browsers,
            environment: self.environment,
            last_modified: ctx.now,
            created_by: ctx.author.clone(),
            steps: self.steps,
        }
    }

    fn apply(self, record: &mut TestCase, now: DateTime<Utc>) {
        record.name = self.name;
        record.description = self.description;
        record.status = self.status;
        record.priority = self.priority;
        record.assignee = self.assignee;
        record.reviewer = self.reviewer;
        record.browsers = self.browsers;
        record.environment = self.environment;
        record.steps = self.steps;
        record.touch(now);
    }
}
