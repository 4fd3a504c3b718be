//! Low-level request plumbing: base URL, headers, bearer token and error
//! normalisation.

use std::fmt;
use std::sync::{Arc, RwLock};

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{ApiError, ApiResult};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::store::{KeyValueStore, StorageKey};

/// Backend client. Cheap to clone; clones share the token.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http_client: reqwest::Client,
    token: Arc<RwLock<Option<SecretString>>>,
    /// Where the token is mirrored. `None` in headless contexts.
    token_store: Option<Arc<dyn KeyValueStore>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.has_token())
            .field("token_store", &self.token_store.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create a client for the configured backend.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Client(format!("Failed to build HTTP client: {}", e)))?;

        info!("API client initialized (base_url={})", config.api_url);

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            http_client,
            token: Arc::new(RwLock::new(None)),
            token_store: None,
        })
    }

    /// Mirror the token to `store` under `auth_token`.
    pub fn with_token_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Restore a previously persisted token. Returns whether one was found.
    pub async fn load_token(&self) -> bool {
        let Some(store) = &self.token_store else {
            return false;
        };
        match store.get(&StorageKey::AuthToken.to_string()).await {
            Ok(Some(raw)) if !raw.trim().is_empty() => {
                self.replace_token(Some(SecretString::from(raw.trim().to_string())));
                debug!("Restored persisted auth token");
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!("Failed to read persisted auth token: {}", e);
                false
            }
        }
    }

    /// Set the bearer token for subsequent calls and persist it.
    pub async fn set_token(&self, token: SecretString) {
        let raw = token.expose_secret().to_string();
        self.replace_token(Some(token));
        if let Some(store) = &self.token_store
            && let Err(e) = store.set(&StorageKey::AuthToken.to_string(), &raw).await
        {
            warn!("Failed to persist auth token: {}", e);
        }
    }

    /// Forget the bearer token, in memory and in storage.
    pub async fn clear_token(&self) {
        self.replace_token(None);
        if let Some(store) = &self.token_store
            && let Err(e) = store.remove(&StorageKey::AuthToken.to_string()).await
        {
            warn!("Failed to remove persisted auth token: {}", e);
        }
    }

    pub fn has_token(&self) -> bool {
        match self.token.read() {
            Ok(token) => token.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        }
    }

    fn replace_token(&self, token: Option<SecretString>) {
        match self.token.write() {
            Ok(mut slot) => *slot = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    fn current_token(&self) -> Option<String> {
        let guard = match self.token.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.as_ref().map(|t| t.expose_secret().to_string())
    }

    /// Perform one call against `endpoint` (a path beginning with `/api`).
    ///
    /// An empty success body decodes as JSON `null`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("{} {}", method, url);

        let mut builder = self
            .http_client
            .request(method.clone(), &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(token) = self.current_token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(network_error)?;
        let status = response.status();
        let text = response.text().await.map_err(network_error)?;

        if !status.is_success() {
            let message = error_message(status, &text);
            debug!("{} {} failed: {}", method, endpoint, message);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return serde_json::from_value(Value::Null)
                .map_err(|e| ApiError::Decode(e.to_string()));
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn network_error(e: reqwest::Error) -> ApiError {
    let text = e.to_string();
    if text.trim().is_empty() {
        ApiError::Network("Network error".to_string())
    } else {
        ApiError::Network(text)
    }
}

/// The backend's `detail` field, or a generic status line.
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) if !detail.trim().is_empty() => detail.clone(),
            Some(Value::String(_)) | Some(Value::Null) | None => generic_message(status),
            Some(detail) => detail.to_string(),
        },
        _ => generic_message(status),
    }
}

fn generic_message(status: StatusCode) -> String {
    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )
}
