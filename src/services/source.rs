//! Where a service result came from.

use std::fmt;

use crate::api::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Served by the backend
    Remote,
    /// Kept in local storage only; the backend has no such endpoint
    Local,
    /// Backend call failed and local storage answered instead
    Fallback { reason: String },
}

impl DataSource {
    pub fn is_remote(&self) -> bool {
        matches!(self, DataSource::Remote)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, DataSource::Fallback { .. })
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Remote => write!(f, "remote"),
            DataSource::Local => write!(f, "local"),
            DataSource::Fallback { reason } => write!(f, "local fallback ({})", reason),
        }
    }
}

/// A value tagged with its [`DataSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: DataSource,
}

impl<T> Sourced<T> {
    pub fn remote(value: T) -> Self {
        Sourced {
            value,
            source: DataSource::Remote,
        }
    }

    pub fn local(value: T) -> Self {
        Sourced {
            value,
            source: DataSource::Local,
        }
    }

    pub fn fallback(value: T, error: &ApiError) -> Self {
        Sourced {
            value,
            source: DataSource::Fallback {
                reason: error.to_string(),
            },
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            source: self.source,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}
