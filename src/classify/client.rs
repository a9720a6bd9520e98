use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::debug;

use super::error::{ClassifyError, ClassifyResult};

pub const DEFAULT_CLASSIFIER_MODEL: &str = "gpt-4o-mini";

const DEFAULT_TEMPERATURE: f64 = 0.1;

#[async_trait]
/// Language-model seam used by the assessment phase.
///
/// Implementations return the model's raw text; parsing and contract
/// validation belong to the caller.
pub trait RelevanceClassifier: Send + Sync {
    /// Runs one classification request.
    async fn classify(&self, system_prompt: &str, user_prompt: &str) -> ClassifyResult<String>;
}

#[derive(Debug, Clone)]
pub struct GenaiClassifierConfig {
    pub model: String,

    /// Sampling temperature; kept low so tier assignments stay stable.
    pub temperature: f64,
}

impl Default for GenaiClassifierConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_CLASSIFIER_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl GenaiClassifierConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();

        let model = std::env::var("RELMAP_CLASSIFIER_MODEL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.model);

        let temperature = std::env::var("RELMAP_CLASSIFIER_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.temperature);

        Self { model, temperature }
    }
}

/// Classifier backed by the `genai` multi-provider chat client.
///
/// Provider credentials come from the environment variables `genai` reads
/// for the configured model (e.g. `OPENAI_API_KEY`).
pub struct GenaiClassifier {
    client: Client,
    config: GenaiClassifierConfig,
}

impl Default for GenaiClassifier {
    fn default() -> Self {
        Self::new(GenaiClassifierConfig::default())
    }
}

impl GenaiClassifier {
    pub fn new(config: GenaiClassifierConfig) -> Self {
        Self {
            client: Client::default(),
            config,
        }
    }

    /// Returns the classifier configuration.
    pub fn config(&self) -> &GenaiClassifierConfig {
        &self.config
    }
}

#[async_trait]
impl RelevanceClassifier for GenaiClassifier {
    async fn classify(&self, system_prompt: &str, user_prompt: &str) -> ClassifyResult<String> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_prompt),
        ]);
        let options = ChatOptions::default().with_temperature(self.config.temperature);

        let resp = self
            .client
            .exec_chat(&self.config.model, request, Some(&options))
            .await
            .map_err(|e| ClassifyError::Provider {
                reason: e.to_string(),
            })?;

        let text = resp.first_text().ok_or(ClassifyError::EmptyResponse)?;
        debug!(
            model = %self.config.model,
            chars = text.len(),
            "classification response received"
        );
        Ok(text.to_string())
    }
}
