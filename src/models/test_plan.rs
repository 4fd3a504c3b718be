//! Test plan model, a named grouping of test suites that produces run results.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, EntityId, Record, RecordContext};
use crate::error::ValidationErrors;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestPlanStatus {
    #[default]
    Draft,
    Active,
    Completed,
}

impl TestPlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::Draft,
        }
    }
}

/// Stored test plan record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPlan {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub test_suite_ids: Vec<EntityId>,
    /// Number of referenced test suites
    #[serde(default)]
    pub test_suites: usize,
    #[serde(default)]
    pub status: TestPlanStatus,
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
    pub last_modified: DateTime<Utc>,
    pub created_by: String,
}

impl Record for TestPlan {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = now;
    }
}

/// Create/edit test plan form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestPlanDraft {
    pub name: String,
    pub description: String,
    /// Only honoured on edit; new plans start as drafts
    pub status: TestPlanStatus,
    pub test_suite_ids: BTreeSet<EntityId>,
}

impl Draft for TestPlanDraft {
    type Record = TestPlan;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name, "Test plan name is required");
        if self.test_suite_ids.is_empty() {
            errors.add("testSuites", "Please select at least one test suite");
        }
        errors.into_result()
    }

    fn build(self, ctx: &RecordContext) -> TestPlan {
        let test_suite_ids: Vec<EntityId> = self.test_suite_ids.into_iter().collect();
        TestPlan {
            id: ctx.id,
            name: self.name,
            description: self.description,
            test_suites: test_suite_ids.len(),
            test_suite_ids,
            status: TestPlanStatus::Draft,
            last_run: None,
            last_modified: ctx.now,
            created_by: ctx.author.clone(),
        }
    }

    fn apply(self, record: &mut TestPlan, now: DateTime<Utc>) {
        record.name = self.name;
        record.description = self.description;
        record.status = self.status;
        record.test_suite_ids = self.test_suite_ids.into_iter().collect();
        record.test_suites = record.test_suite_ids.len();
        record.touch(now);
    }
}
