//! HTTP client for the TestGenie backend.
//!
//! Every call goes through [`ApiClient::request`], which normalises failures
//! into [`ApiError`]. Typed per-resource calls live in `resources`.

pub mod ai;
pub mod client;
pub mod resources;
pub mod types;

pub use ai::{AiContent, AiTestCase};
pub use client::ApiClient;
pub use types::{AuthUser, HealthResponse, LoginResponse};

/// Failure of a single backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Backend answered with a non-2xx status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Request never produced a response (refused, DNS, timeout)
    #[error("{0}")]
    Network(String),

    /// 2xx response whose body did not match the expected shape
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// True when the backend could not be reached or understood, as opposed
    /// to a deliberate error response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Decode(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
