//! Test data profiles describing where parameterised input comes from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, EntityId, Record, RecordContext};
use crate::error::ValidationErrors;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceType {
    #[default]
    Csv,
    Json,
    Excel,
    Database,
    Api,
}

impl DataSourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Excel => "excel",
            Self::Database => "database",
            Self::Api => "api",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "excel" => Self::Excel,
            "database" => Self::Database,
            "api" => Self::Api,
            _ => Self::Csv,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestDataStatus {
    #[default]
    Active,
    Inactive,
    Error,
}

impl TestDataStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "inactive" => Self::Inactive,
            "error" => Self::Error,
            _ => Self::Active,
        }
    }
}

/// Stored test data profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDataProfile {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: DataSourceType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub records: u64,
    #[serde(default)]
    pub status: TestDataStatus,
    pub last_modified: DateTime<Utc>,
    pub created_by: String,
}

impl Record for TestDataProfile {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = now;
    }
}

/// Create/edit test data form. `records` is signed because it comes
/// straight from a numeric input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestDataDraft {
    pub name: String,
    pub source_type: DataSourceType,
    pub description: String,
    pub records: i64,
    pub status: TestDataStatus,
}

impl Draft for TestDataDraft {
    type Record = TestDataProfile;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name, "Name is required");
        errors.require("description", &self.description, "Description is required");
        if self.records < 0 {
            errors.add("records", "Records count must be non-negative");
        }
        errors.into_result()
    }

    fn build(self, ctx: &RecordContext) -> TestDataProfile {
        TestDataProfile {
            id: ctx.id,
            name: self.name.trim().to_string(),
            source_type: self.source_type,
            description: self.description.trim().to_string(),
            records: self.records.max(0) as u64,
            status: self.status,
            last_modified: ctx.now,
            created_by: ctx.author.clone(),
        }
    }

    fn apply(self, record: &mut TestDataProfile, now: DateTime<Utc>) {
        record.name = self.name.trim().to_string();
        record.source_type = self.source_type;
        record.description = self.description.trim().to_string();
        record.records = self.records.max(0) as u64;
        record.status = self.status;
        record.touch(now);
    }
}
