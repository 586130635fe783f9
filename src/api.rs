use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:9090";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to log backend failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("log backend answered with status {0}")]
    Status(StatusCode),
    #[error("could not decode log backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The two operations the log-analysis backend exposes to the client.
#[async_trait]
pub trait LogBackend: Send + Sync {
    /// Ask the backend to (re)ingest its log sources.
    async fn ingest(&self) -> Result<(), ApiError>;

    /// Run a free-text query and return the matching log lines, in order.
    async fn query(&self, text: &str) -> Result<Vec<String>, ApiError>;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    strict_ingest: bool,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            strict_ingest: false,
        }
    }

    /// Treat a non-2xx answer from the ingest endpoint as a failure.
    pub fn with_strict_ingest(mut self, strict: bool) -> Self {
        self.strict_ingest = strict;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl LogBackend for HttpBackend {
    async fn ingest(&self) -> Result<(), ApiError> {
        let url = format!("{}/api/logs/ingest", self.base_url);

        let response = self.client.post(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            if self.strict_ingest {
                return Err(ApiError::Status(status));
            }
            tracing::warn!(%status, "ingest endpoint answered with a non-success status");
        }

        Ok(())
    }

    async fn query(&self, text: &str) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/api/logs/query", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, "query endpoint answered with a non-success status");
        }

        let body = response.bytes().await?;
        let value: Value = serde_json::from_slice(&body)?;
        Ok(extract_results(&value))
    }
}

/// Pull the `results` array out of a query response.
///
/// Anything other than an object with a `results` array means "no results".
/// Non-string elements are kept in their JSON text form.
pub fn extract_results(body: &Value) -> Vec<String> {
    match body.get("results") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}
