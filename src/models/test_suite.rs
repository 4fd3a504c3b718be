//! Test suite model, a named grouping of test cases.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, EntityId, Record, RecordContext};
use crate::error::ValidationErrors;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestSuiteStatus {
    Active,
    #[default]
    Draft,
}

impl TestSuiteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Draft => "draft",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            _ => Self::Draft,
        }
    }
}

/// Stored test suite record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSuite {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub test_case_ids: Vec<EntityId>,
    /// Number of referenced test cases
    #[serde(default)]
    pub test_cases: usize,
    #[serde(default)]
    pub status: TestSuiteStatus,
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
    pub last_modified: DateTime<Utc>,
    pub created_by: String,
}

impl Record for TestSuite {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = now;
    }
}

/// Create/edit test suite form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestSuiteDraft {
    pub name: String,
    pub description: String,
    /// Only honoured on edit; new suites start as drafts
    pub status: TestSuiteStatus,
    pub test_case_ids: BTreeSet<EntityId>,
}

impl Draft for TestSuiteDraft {
    type Record = TestSuite;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name, "Test suite name is required");
        if self.test_case_ids.is_empty() {
            errors.add("testCases", "Please select at least one test case");
        }
        errors.into_result()
    }

    fn build(self, ctx: &RecordContext) -> TestSuite {
        let test_case_ids: Vec<EntityId> = self.test_case_ids.into_iter().collect();
        TestSuite {
            id: ctx.id,
            name: self.name,
            description: self.description,
            test_cases: test_case_ids.len(),
            test_case_ids,
            status: TestSuiteStatus::Draft,
            last_run: None,
            last_modified: ctx.now,
            created_by: ctx.author.clone(),
        }
    }

    fn apply(self, record: &mut TestSuite, now: DateTime<Utc>) {
        record.name = self.name;
        record.description = self.description;
        record.status = self.status;
        record.test_case_ids = self.test_case_ids.into_iter().collect();
        record.test_cases = record.test_case_ids.len();
        record.touch(now);
    }
}
