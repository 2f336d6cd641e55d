//! # Config Sources
//!
//! Boundary trait for retrieving the partial configuration document, with an
//! HTTP implementation for the well-known hosted `config.json` and a static
//! implementation for embedded deployments and tests.

use async_trait::async_trait;
use log::debug;
use std::time::Duration;

use shared::config::ConfigOverlay;

pub mod env;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Why the configuration resource could not be fetched.
///
/// Consumed by the config service's default-substitution fallback; callers
/// only ever see it in the warning log.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("config resource not found at {url}")]
    NotFound { url: String },
    #[error("config fetch failed with status {status}")]
    Status { status: u16 },
    #[error("config fetch failed: {0}")]
    Network(String),
    #[error("config document is not valid JSON: {0}")]
    Malformed(String),
}

/// A place the partial configuration document can be fetched from.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn fetch(&self) -> Result<ConfigOverlay, FetchError>;

    /// Human-readable description for log lines.
    fn describe(&self) -> String;
}

/// Fetches the configuration document from a fixed URL.
pub struct HttpConfigSource {
    client: reqwest::Client,
    url: String,
}

impl HttpConfigSource {
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ConfigSource for HttpConfigSource {
    async fn fetch(&self) -> Result<ConfigOverlay, FetchError> {
        debug!("Fetching config document from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: self.url.clone(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Serves a canned overlay. Useful for deployments that compile their
/// configuration in, and for tests.
pub struct StaticConfigSource {
    overlay: ConfigOverlay,
}

impl StaticConfigSource {
    pub fn new(overlay: ConfigOverlay) -> Self {
        Self { overlay }
    }

    /// An empty overlay: the built-in defaults pass through unchanged.
    pub fn empty() -> Self {
        Self::new(ConfigOverlay::default())
    }
}

#[async_trait]
impl ConfigSource for StaticConfigSource {
    async fn fetch(&self) -> Result<ConfigOverlay, FetchError> {
        Ok(self.overlay.clone())
    }

    fn describe(&self) -> String {
        "static overlay".to_string()
    }
}
