use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::client::RelevanceClassifier;
use super::error::{ClassifyError, ClassifyResult};

/// Scriptable classifier for tests.
///
/// Responses are served in push order. An exhausted queue answers with a
/// provider error so under-scripted tests fail loudly.
#[derive(Default)]
pub struct MockClassifier {
    queue: Mutex<VecDeque<ClassifyResult<String>>>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful raw-text response.
    pub fn push_response(&self, text: impl Into<String>) {
        self.queue.lock().push_back(Ok(text.into()));
    }

    /// Queues a provider failure.
    pub fn push_failure(&self, reason: impl Into<String>) {
        self.queue.lock().push_back(Err(ClassifyError::Provider {
            reason: reason.into(),
        }));
    }

    /// Number of classify calls made so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    /// `(system, user)` prompt pairs seen so far, in call order.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl RelevanceClassifier for MockClassifier {
    async fn classify(&self, system_prompt: &str, user_prompt: &str) -> ClassifyResult<String> {
        self.prompts
            .lock()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        self.queue.lock().pop_front().unwrap_or_else(|| {
            Err(ClassifyError::Provider {
                reason: "mock response queue exhausted".to_string(),
            })
        })
    }
}
