//! Storage key layout shared with the browser frontend.

use std::fmt;

use crate::models::EntityId;

/// Per-project child collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Elements,
    TestCases,
    TestSuites,
    TestPlans,
    TestData,
    Environments,
    Wiki,
    RunResults,
    StepGroups,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 9] = [
        ArtifactKind::Elements,
        ArtifactKind::TestCases,
        ArtifactKind::TestSuites,
        ArtifactKind::TestPlans,
        ArtifactKind::TestData,
        ArtifactKind::Environments,
        ArtifactKind::Wiki,
        ArtifactKind::RunResults,
        ArtifactKind::StepGroups,
    ];

    /// Key segment, also the backend path segment where one exists.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Elements => "elements",
            Self::TestCases => "test-cases",
            Self::TestSuites => "test-suites",
            Self::TestPlans => "test-plans",
            Self::TestData => "test-data",
            Self::Environments => "environments",
            Self::Wiki => "wiki",
            Self::RunResults => "run-results",
            Self::StepGroups => "step-groups",
        }
    }

    /// Singular name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Elements => "Element",
            Self::TestCases => "Test case",
            Self::TestSuites => "Test suite",
            Self::TestPlans => "Test plan",
            Self::TestData => "Test data profile",
            Self::Environments => "Environment",
            Self::Wiki => "Wiki page",
            Self::RunResults => "Run result",
            Self::StepGroups => "Step group",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// A persisted key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// `testgenie-projects`
    Projects,
    /// `auth_token`
    AuthToken,
    /// `testgenie-<kind>-<projectId>`
    Artifacts(ArtifactKind, EntityId),
}

impl StorageKey {
    pub fn artifacts(kind: ArtifactKind, project_id: EntityId) -> Self {
        StorageKey::Artifacts(kind, project_id)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKey::Projects => write!(f, "testgenie-projects"),
            StorageKey::AuthToken => write!(f, "auth_token"),
            StorageKey::Artifacts(kind, project_id) => {
                write!(f, "testgenie-{}-{}", kind.slug(), project_id)
            }
        }
    }
}
