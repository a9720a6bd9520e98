use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use super::EmbeddingClient;
use super::error::{EmbeddingError, EmbeddingResult};
use crate::constants::DEFAULT_EMBEDDING_DIM;

/// Deterministic in-memory embedder for tests.
///
/// Unknown texts hash to stable pseudo-random unit vectors, so equal texts
/// always produce equal embeddings. Tests that need controlled similarities
/// pin exact vectors to text substrings with
/// [`with_vector_for`](MockEmbeddingClient::with_vector_for); the first
/// pinned substring contained in the text wins.
pub struct MockEmbeddingClient {
    dimension: usize,
    pinned: Vec<(String, Vec<f32>)>,
    failing: Vec<String>,
    texts: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for MockEmbeddingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbeddingClient {
    pub fn new() -> Self {
        Self {
            dimension: DEFAULT_EMBEDDING_DIM,
            pinned: Vec::new(),
            failing: Vec::new(),
            texts: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Sets the dimension of generated stub vectors.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Pins `vector` for every text containing `needle`.
    pub fn with_vector_for(mut self, needle: impl Into<String>, vector: Vec<f32>) -> Self {
        self.pinned.push((needle.into(), vector));
        self
    }

    /// Scripts a provider failure for every text containing `needle`.
    pub fn fail_on_substring(mut self, needle: impl Into<String>) -> Self {
        self.failing.push(needle.into());
        self
    }

    /// Number of embed calls made so far.
    pub fn call_count(&self) -> usize {
        self.texts.lock().len()
    }

    /// Every text embedded so far, in completion order.
    pub fn embedded_texts(&self) -> Vec<String> {
        self.texts.lock().clone()
    }

    /// Highest number of concurrently in-flight embed calls observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl EmbeddingClient for MockEmbeddingClient {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let active = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(active, Ordering::SeqCst);

        // Yield once so overlapping calls are observable in concurrency tests.
        tokio::time::sleep(Duration::from_millis(1)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.texts.lock().push(text.to_string());

        for needle in &self.failing {
            if text.contains(needle) {
                return Err(EmbeddingError::Provider {
                    status: 503,
                    message: format!("scripted failure for '{needle}'"),
                });
            }
        }

        for (needle, vector) in &self.pinned {
            if text.contains(needle) {
                return Ok(vector.clone());
            }
        }

        Ok(stub_vector(text, self.dimension))
    }
}

/// Deterministic pseudo-random unit vector derived from a text hash.
pub fn stub_vector(text: &str, dimension: usize) -> Vec<f32> {
    use std::hash::{DefaultHasher, Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    let seed = hasher.finish();

    let mut embedding = Vec::with_capacity(dimension);
    let mut state = seed;

    for _ in 0..dimension {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
        embedding.push(value);
    }

    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut embedding {
            *x /= norm;
        }
    }

    embedding
}
