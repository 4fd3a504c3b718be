//! Page-level flows: list, create, edit and delete with local fallback.

pub mod artifacts;
pub mod ids;
pub mod projects;
pub mod repository;
pub mod source;
pub mod workspace;

pub use ids::IdGenerator;
pub use projects::{ProjectOverview, ProjectService};
pub use repository::{Artifact, ArtifactRepository, BulkDeletion};
pub use source::{DataSource, Sourced};
pub use workspace::Workspace;
