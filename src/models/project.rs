//! Project model, the top-level container for all test artifacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, EntityId, Record, RecordContext};
use crate::error::ValidationErrors;

/// Color tag assigned when none is chosen.
pub const DEFAULT_PROJECT_COLOR: &str = "#F54927";

/// Project health indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    #[default]
    Healthy,
    Warning,
    Error,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Parse from string representation.
    pub fn parse(s: &str) -> Self {
        match s {
            "warning" => Self::Warning,
            "error" => Self::Error,
            _ => Self::Healthy, // Backend default for new projects
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stored project record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub application_name: String,
    #[serde(default)]
    pub version: String,
    pub created_at: DateTime<Utc>,
    /// `None` renders as "Never"
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: HealthStatus,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_PROJECT_COLOR.to_string()
}

impl Project {
    /// Human readable last-run label.
    pub fn last_run_label(&self) -> String {
        match self.last_run {
            Some(at) => at.format("%Y-%m-%d").to_string(),
            None => "Never".to_string(),
        }
    }
}

impl Record for Project {
    fn id(&self) -> EntityId {
        self.id
    }

    // Projects carry no modification stamp
    fn touch(&mut self, _now: DateTime<Utc>) {}
}

/// Create/edit project form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub application_name: String,
    pub version: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl ProjectDraft {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        application_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        ProjectDraft {
            name: name.into(),
            description: description.into(),
            application_name: application_name.into(),
            version: version.into(),
            color: None,
        }
    }
}

impl Draft for ProjectDraft {
    type Record = Project;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name, "Project name is required");
        errors.require("description", &self.description, "Description is required");
        errors.require(
            "applicationName",
            &self.application_name,
            "Application name is required",
        );
        errors.require("version", &self.version, "Version is required");
        errors.into_result()
    }

    fn build(self, ctx: &RecordContext) -> Project {
        Project {
            id: ctx.id,
            name: self.name,
            description: self.description,
            application_name: self.application_name,
            version: self.version,
            created_at: ctx.now,
            last_run: None,
            status: HealthStatus::Healthy,
            color: self.color.unwrap_or_else(default_color),
        }
    }

    fn apply(self, record: &mut Project, now: DateTime<Utc>) {
        record.name = self.name;
        record.description = self.description;
        record.application_name = self.application_name;
        record.version = self.version;
        if let Some(color) = self.color {
            record.color = color;
        }
        record.touch(now);
    }
}
