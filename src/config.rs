//! Client configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Development default values.
pub mod defaults {
    pub const DEV_API_URL: &str = "http://localhost:5000";
    pub const DEV_DATA_DIR: &str = ".testgenie";
    pub const DEV_CONNECT_TIMEOUT_SECS: u64 = 5;
    pub const DEV_REQUEST_TIMEOUT_SECS: u64 = 30;

    // Display-only profile of the signed-in user
    pub const USER_EMAIL: &str = "admin@superwise.ai";
    pub const USER_FULL_NAME: &str = "Admin";
    pub const USER_INITIALS: &str = "ADM";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Profile shown in the UI and stamped into `createdBy` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub email: String,
    pub full_name: String,
    pub initials: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        UserProfile {
            email: defaults::USER_EMAIL.to_string(),
            full_name: defaults::USER_FULL_NAME.to_string(),
            initials: defaults::USER_INITIALS.to_string(),
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Backend base URL (no trailing slash)
    pub api_url: String,
    /// Directory holding the local fallback collections
    pub data_dir: PathBuf,
    /// Signed-in user profile
    pub user: UserProfile,
    /// TCP connect timeout for backend calls
    pub connect_timeout: Duration,
    /// Total timeout for a single backend call
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            environment: Environment::Development,
            api_url: defaults::DEV_API_URL.to_string(),
            data_dir: PathBuf::from(defaults::DEV_DATA_DIR),
            user: UserProfile::default(),
            connect_timeout: Duration::from_secs(defaults::DEV_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(defaults::DEV_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production, default: development)
    /// - `TESTGENIE_API_URL` or `NEXT_PUBLIC_API_URL`: Backend URL (default: http://localhost:5000)
    /// - `TESTGENIE_DATA_DIR`: Local fallback directory (default: .testgenie)
    /// - `TESTGENIE_USER_EMAIL` / `NEXT_PUBLIC_USER_EMAIL`
    /// - `TESTGENIE_USER_FULL_NAME` / `NEXT_PUBLIC_USER_FULL_NAME`
    /// - `TESTGENIE_USER_INITIALS` / `NEXT_PUBLIC_USER_INITIALS`
    /// - `TESTGENIE_CONNECT_TIMEOUT_SECS`: Connect timeout (default: 5)
    /// - `TESTGENIE_REQUEST_TIMEOUT_SECS`: Request timeout (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("RUST_ENV") {
            Some(value) => Environment::parse(&value).ok_or(ConfigError::InvalidValue(
                "RUST_ENV must be 'development' or 'production'",
            ))?,
            None => Environment::Development,
        };

        let api_url = lookup("TESTGENIE_API_URL")
            .or_else(|| lookup("NEXT_PUBLIC_API_URL"))
            .unwrap_or_else(|| defaults::DEV_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let data_dir = lookup("TESTGENIE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(defaults::DEV_DATA_DIR));

        let user = UserProfile {
            email: lookup("TESTGENIE_USER_EMAIL")
                .or_else(|| lookup("NEXT_PUBLIC_USER_EMAIL"))
                .unwrap_or_else(|| defaults::USER_EMAIL.to_string()),
            full_name: lookup("TESTGENIE_USER_FULL_NAME")
                .or_else(|| lookup("NEXT_PUBLIC_USER_FULL_NAME"))
                .unwrap_or_else(|| defaults::USER_FULL_NAME.to_string()),
            initials: lookup("TESTGENIE_USER_INITIALS")
                .or_else(|| lookup("NEXT_PUBLIC_USER_INITIALS"))
                .unwrap_or_else(|| defaults::USER_INITIALS.to_string()),
        };

        let connect_timeout_secs = lookup("TESTGENIE_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|| defaults::DEV_CONNECT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("TESTGENIE_CONNECT_TIMEOUT_SECS must be a valid number")
            })?;

        let request_timeout_secs = lookup("TESTGENIE_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| defaults::DEV_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("TESTGENIE_REQUEST_TIMEOUT_SECS must be a valid number")
            })?;

        let config = Config {
            environment,
            api_url,
            data_dir,
            user,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            request_timeout: Duration::from_secs(request_timeout_secs),
        };

        config.validate_url()?;

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    fn validate_url(&self) -> Result<(), ConfigError> {
        match reqwest::Url::parse(&self.api_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
            _ => Err(ConfigError::InvalidValue(
                "TESTGENIE_API_URL must be an absolute http(s) URL",
            )),
        }
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.api_url == defaults::DEV_API_URL {
            errors.push(format!(
                "TESTGENIE_API_URL is using development default '{}'. Set the production backend URL.",
                defaults::DEV_API_URL
            ));
        }

        if self.request_timeout.is_zero() || self.connect_timeout.is_zero() {
            errors.push("Backend timeouts must be greater than zero.".to_string());
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
