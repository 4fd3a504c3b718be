//! Project wiki pages.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, EntityId, Record, RecordContext};
use crate::error::ValidationErrors;

/// Stored wiki page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiPage {
    pub id: EntityId,
    pub title: String,
    /// Free text or markdown
    pub content: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub last_modified: DateTime<Utc>,
    pub created_by: String,
}

impl Record for WikiPage {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = now;
    }
}

/// Create/edit wiki form. Tags are entered as one comma-separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikiPageDraft {
    pub title: String,
    pub content: String,
    pub tags: String,
}

/// Split a comma-separated tag input, trimming and dropping empties.
pub fn parse_tags(input: &str) -> BTreeSet<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

impl WikiPage {
    /// Case-insensitive match on title or content. An empty term matches.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term) || self.content.to_lowercase().contains(&term)
    }
}

/// Pages matching `search` and, when `tag` is non-empty, carrying that tag.
pub fn filter_pages<'a>(pages: &'a [WikiPage], search: &str, tag: &str) -> Vec<&'a WikiPage> {
    pages
        .iter()
        .filter(|page| page.matches_search(search))
        .filter(|page| tag.is_empty() || page.tags.contains(tag))
        .collect()
}

/// Every tag used by any page, sorted.
pub fn all_tags(pages: &[WikiPage]) -> BTreeSet<String> {
    pages.iter().flat_map(|page| page.tags.iter().cloned()).collect()
}

impl Draft for WikiPageDraft {
    type Record = WikiPage;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title, "Title is required");
        errors.require("content", &self.content, "Content is required");
        errors.into_result()
    }

    fn build(self, ctx: &RecordContext) -> WikiPage {
        WikiPage {
            id: ctx.id,
            title: self.title,
            content: self.content,
            tags: parse_tags(&self.tags),
            last_modified: ctx.now,
            created_by: ctx.author.clone(),
        }
    }

    fn apply(self, record: &mut WikiPage, now: DateTime<Utc>) {
        record.title = self.title;
        record.content = self.content;
        record.tags = parse_tags(&self.tags);
        record.touch(now);
    }
}
