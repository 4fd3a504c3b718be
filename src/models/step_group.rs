//! Reusable named step sequences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::test_case::StepList;
use super::{Draft, EntityId, Record, RecordContext};
use crate::error::ValidationErrors;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepGroup {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub steps: StepList,
    pub last_modified: DateTime<Utc>,
    pub created_by: String,
}

impl Record for StepGroup {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = now;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepGroupDraft {
    pub name: String,
    pub steps: StepList,
}

impl Draft for StepGroupDraft {
    type Record = StepGroup;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name, "Step group name is required");
        self.steps.validate_into(&mut errors);
        errors.into_result()
    }

    fn build(self, ctx: &RecordContext) -> StepGroup {
        StepGroup {
            id: ctx.id,
            name: self.name,
            steps: self.steps,
            last_modified: ctx.now,
            created_by: ctx.author.clone(),
        }
    }

    fn apply(self, record: &mut StepGroup, now: DateTime<Utc>) {
        record.name = self.name;
        record.steps = self.steps;
        record.touch(now);
    }
}
