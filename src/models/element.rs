//! UI element locators usable inside test steps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, EntityId, Record, RecordContext};
use crate::error::ValidationErrors;

/// How the selector string is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    #[default]
    Id,
    Class,
    Xpath,
    Css,
}

impl SelectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Class => "class",
            Self::Xpath => "xpath",
            Self::Css => "css",
        }
    }

    /// Parse from string representation.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "id" => Self::Id,
            "class" => Self::Class,
            "xpath" => Self::Xpath,
            _ => Self::Css, // Anything else is treated as a CSS selector
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementStatus {
    #[default]
    Active,
    Inactive,
    Deprecated,
}

impl ElementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Deprecated => "deprecated",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "inactive" => Self::Inactive,
            "deprecated" => Self::Deprecated,
            _ => Self::Active,
        }
    }
}

/// Stored element record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: EntityId,
    pub name: String,
    pub selector: String,
    #[serde(rename = "type")]
    pub kind: SelectorKind,
    #[serde(default)]
    pub status: ElementStatus,
    pub last_modified: DateTime<Utc>,
    pub created_by: String,
}

impl Record for Element {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = now;
    }
}

/// Create/edit element form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementDraft {
    pub name: String,
    pub selector: String,
    pub kind: SelectorKind,
    pub status: ElementStatus,
}

impl ElementDraft {
    pub fn new(name: impl Into<String>, selector: impl Into<String>, kind: SelectorKind) -> Self {
        ElementDraft {
            name: name.into(),
            selector: selector.into(),
            kind,
            status: ElementStatus::Active,
        }
    }
}

impl Draft for ElementDraft {
    type Record = Element;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name, "Element name is required");
        errors.require("selector", &self.selector, "Selector is required");
        errors.into_result()
    }

    fn build(self, ctx: &RecordContext) -> Element {
        Element {
            id: ctx.id,
            name: self.name,
            selector: self.selector,
            kind: self.kind,
            status: self.status,
            last_modified: ctx.now,
            created_by: ctx.author.clone(),
        }
    }

    fn apply(self, record: &mut Element, now: DateTime<Utc>) {
        record.name = self.name;
        record.selector = self.selector;
        record.kind = self.kind;
        record.status = self.status;
        record.touch(now);
    }
}
