//! Domain models for TestGenie projects and their test artifacts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;

pub mod element;
pub mod environment;
pub mod project;
pub mod run_result;
pub mod selection;
pub mod step_group;
pub mod test_case;
pub mod test_data;
pub mod test_plan;
pub mod test_suite;
pub mod wiki;

// Re-export commonly used types
pub use element::{Element, ElementDraft, ElementStatus, SelectorKind};
pub use environment::{Environment, EnvironmentDraft, EnvironmentStatus};
pub use project::{HealthStatus, Project, ProjectDraft, DEFAULT_PROJECT_COLOR};
pub use run_result::{RunResult, RunResultDraft, RunStatus};
pub use selection::Selection;
pub use step_group::{StepGroup, StepGroupDraft};
pub use test_case::{
    Browser, Priority, StepAction, StepList, TestCase, TestCaseDraft, TestCaseStatus, TestStep,
};
pub use test_data::{DataSourceType, TestDataDraft, TestDataProfile, TestDataStatus};
pub use test_plan::{TestPlan, TestPlanDraft, TestPlanStatus};
pub use test_suite::{TestSuite, TestSuiteDraft, TestSuiteStatus};
pub use wiki::{WikiPage, WikiPageDraft, all_tags, filter_pages};

/// Numeric record id, unique within the owning project.
///
/// Locally created records use the creation time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl EntityId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(EntityId)
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId(value)
    }
}

/// Values stamped onto a record when a draft becomes a stored record.
#[derive(Debug, Clone)]
pub struct RecordContext {
    pub id: EntityId,
    pub now: DateTime<Utc>,
    pub author: String,
}

/// A stored record with an id and a modification stamp.
pub trait Record {
    fn id(&self) -> EntityId;

    /// Stamp the record as modified at `now`.
    fn touch(&mut self, now: DateTime<Utc>);
}

/// Unvalidated form input for a record type.
pub trait Draft {
    type Record: Record;

    /// Check required fields and formats, collecting one message per field.
    fn validate(&self) -> Result<(), ValidationErrors>;

    /// Build a new record. Callers validate first.
    fn build(self, ctx: &RecordContext) -> Self::Record;

    /// Overwrite the editable fields of an existing record and touch it.
    fn apply(self, record: &mut Self::Record, now: DateTime<Utc>);
}
