use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::EmbeddingClient;
use super::error::{EmbeddingError, EmbeddingResult};
use crate::constants::DEFAULT_EMBEDDING_DIM;

pub const DEFAULT_EMBEDDING_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpEmbedderConfig {
    /// Base URL of the OpenAI-compatible API, without the `/embeddings` suffix.
    pub base_url: String,

    pub api_key: Option<String>,

    pub model: String,

    /// Expected vector dimension; responses with any other length are rejected.
    pub dimension: usize,

    pub timeout: Duration,
}

impl Default for HttpEmbedderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EMBEDDING_URL.to_string(),
            api_key: None,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimension: DEFAULT_EMBEDDING_DIM,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl HttpEmbedderConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url cannot be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model cannot be empty".to_string());
        }
        if self.dimension == 0 {
            return Err("dimension must be greater than zero".to_string());
        }
        if self.timeout.is_zero() {
            return Err("timeout must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("RELMAP_EMBEDDING_URL").unwrap_or(defaults.base_url);

        let api_key = std::env::var("RELMAP_EMBEDDING_API_KEY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let model = std::env::var("RELMAP_EMBEDDING_MODEL").unwrap_or(defaults.model);

        let dimension = std::env::var("RELMAP_EMBEDDING_DIM")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.dimension);

        let timeout = std::env::var("RELMAP_EMBEDDING_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            base_url,
            api_key,
            model,
            dimension,
            timeout,
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingEntry>,
}

#[derive(Deserialize)]
struct EmbeddingEntry {
    embedding: Vec<f32>,
}

/// Embedding client speaking an OpenAI-compatible `/embeddings` endpoint.
#[derive(Debug)]
pub struct HttpEmbeddingClient {
    http: HttpClient,
    config: HttpEmbedderConfig,
}

impl HttpEmbeddingClient {
    /// Creates a client after validating `config`.
    pub fn new(config: HttpEmbedderConfig) -> EmbeddingResult<Self> {
        config
            .validate()
            .map_err(|reason| EmbeddingError::InvalidConfig { reason })?;

        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| HttpClient::new());

        Ok(Self { http, config })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &HttpEmbedderConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.config.base_url.trim_end_matches('/'))
    }
}

impl EmbeddingClient for HttpEmbeddingClient {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let url = self.endpoint();

        let mut request = self.http.post(&url).json(&EmbeddingRequest {
            model: &self.config.model,
            input: text,
        });
        if let Some(ref api_key) = self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed {
                url: url.clone(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(EmbeddingError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingResponse =
            resp.json()
                .await
                .map_err(|e| EmbeddingError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        let vector = body
            .data
            .into_iter()
            .next()
            .map(|entry| entry.embedding)
            .ok_or_else(|| EmbeddingError::MalformedResponse {
                reason: "empty data array".to_string(),
            })?;

        if vector.len() != self.config.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.config.dimension,
                actual: vector.len(),
            });
        }

        debug!(chars = text.len(), dim = vector.len(), "embedded text");
        Ok(vector)
    }
}
