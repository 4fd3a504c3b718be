//! Target environments test cases run against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, EntityId, Record, RecordContext};
use crate::error::ValidationErrors;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentStatus {
    #[default]
    Active,
    Inactive,
}

impl EnvironmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "inactive" => Self::Inactive,
            _ => Self::Active,
        }
    }
}

/// Stored environment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub status: EnvironmentStatus,
    pub last_modified: DateTime<Utc>,
    pub created_by: String,
}

impl Record for Environment {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = now;
    }
}

/// Create/edit environment form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentDraft {
    pub name: String,
    pub description: String,
    pub url: String,
    pub status: EnvironmentStatus,
}

/// Whether `value` parses as an absolute URL.
pub fn is_valid_url(value: &str) -> bool {
    reqwest::Url::parse(value.trim()).is_ok()
}

impl Draft for EnvironmentDraft {
    type Record = Environment;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name, "Environment name is required");
        if self.url.trim().is_empty() {
            errors.add("url", "URL is required");
        } else if !is_valid_url(&self.url) {
            errors.add("url", "Please enter a valid URL");
        }
        errors.into_result()
    }

    fn build(self, ctx: &RecordContext) -> Environment {
        Environment {
            id: ctx.id,
            name: self.name,
            description: self.description,
            url: self.url.trim().to_string(),
            status: self.status,
            last_modified: ctx.now,
            created_by: ctx.author.clone(),
        }
    }

    fn apply(self, record: &mut Environment, now: DateTime<Utc>) {
        record.name = self.name;
        record.description = self.description;
        record.url = self.url.trim().to_string();
        record.status = self.status;
        record.touch(now);
    }
}
