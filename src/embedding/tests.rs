use super::http::{DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_URL};
use super::mock::stub_vector;
use super::*;
use crate::similarity::cosine_similarity;
use serial_test::serial;
use std::env;
use std::time::Duration;

#[test]
fn test_stub_vector_is_deterministic() {
    let a = stub_vector("def create_delivery():", 64);
    let b = stub_vector("def create_delivery():", 64);
    assert_eq!(a, b);
}

#[test]
fn test_stub_vector_distinguishes_texts() {
    let a = stub_vector("delivery controller", 64);
    let b = stub_vector("payment gateway", 64);
    assert_ne!(a, b);
    assert!(cosine_similarity(&a, &b) < 0.99);
}

#[test]
fn test_stub_vector_is_unit_norm() {
    let v = stub_vector("anything", 128);
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn test_mock_returns_pinned_vector_for_matching_text() {
    let mock = MockEmbeddingClient::new()
        .with_dimension(4)
        .with_vector_for("delivery", vec![1.0, 0.0, 0.0, 0.0]);

    let v = mock.embed("File: delivery.py\n\ncontent").await.unwrap();
    assert_eq!(v, vec![1.0, 0.0, 0.0, 0.0]);

    let other = mock.embed("File: users.py\n\ncontent").await.unwrap();
    assert_eq!(other.len(), 4);
    assert_ne!(other, vec![1.0, 0.0, 0.0, 0.0]);
}

#[tokio::test]
async fn test_mock_first_pinned_match_wins() {
    let mock = MockEmbeddingClient::new()
        .with_vector_for("delivery", vec![1.0, 0.0])
        .with_vector_for("delivery.py", vec![0.0, 1.0]);

    let v = mock.embed("delivery.py").await.unwrap();
    assert_eq!(v, vec![1.0, 0.0]);
}

#[tokio::test]
async fn test_mock_scripted_failure() {
    let mock = MockEmbeddingClient::new().fail_on_substring("poison");

    let err = mock.embed("File: poison.py\n\nx").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::Provider { status: 503, .. }));

    assert!(mock.embed("File: fine.py\n\nx").await.is_ok());
}

#[tokio::test]
async fn test_mock_records_calls() {
    let mock = MockEmbeddingClient::new().with_dimension(4);

    mock.embed("first").await.unwrap();
    mock.embed("second").await.unwrap();

    assert_eq!(mock.call_count(), 2);
    assert_eq!(mock.embedded_texts(), vec!["first", "second"]);
}

#[test]
fn test_http_config_defaults() {
    let config = HttpEmbedderConfig::default();
    assert_eq!(config.base_url, DEFAULT_EMBEDDING_URL);
    assert_eq!(config.model, DEFAULT_EMBEDDING_MODEL);
    assert_eq!(config.dimension, 1536);
    assert!(config.api_key.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_http_config_builders() {
    let config = HttpEmbedderConfig::new("http://localhost:9999/v1")
        .with_api_key("sk-test")
        .with_model("custom-embed")
        .with_dimension(768)
        .with_timeout(Duration::from_secs(5));

    assert_eq!(config.base_url, "http://localhost:9999/v1");
    assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.model, "custom-embed");
    assert_eq!(config.dimension, 768);
    assert_eq!(config.timeout, Duration::from_secs(5));
}

#[test]
fn test_http_config_validate_rejects_bad_values() {
    assert!(HttpEmbedderConfig::new("").validate().is_err());
    assert!(
        HttpEmbedderConfig::default()
            .with_model("  ")
            .validate()
            .is_err()
    );
    assert!(
        HttpEmbedderConfig::default()
            .with_dimension(0)
            .validate()
            .is_err()
    );
    assert!(
        HttpEmbedderConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err()
    );
}

#[test]
fn test_http_client_rejects_invalid_config() {
    let result = HttpEmbeddingClient::new(HttpEmbedderConfig::new(""));
    assert!(matches!(
        result.unwrap_err(),
        EmbeddingError::InvalidConfig { .. }
    ));
}

#[test]
#[serial]
fn test_http_config_from_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::set_var("RELMAP_EMBEDDING_URL", "http://embedder.local/v1");
        env::set_var("RELMAP_EMBEDDING_MODEL", "nomic-embed-text");
        env::set_var("RELMAP_EMBEDDING_DIM", "768");
        env::set_var("RELMAP_EMBEDDING_TIMEOUT_SECS", "10");
    }

    let config = HttpEmbedderConfig::from_env();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("RELMAP_EMBEDDING_URL");
        env::remove_var("RELMAP_EMBEDDING_MODEL");
        env::remove_var("RELMAP_EMBEDDING_DIM");
        env::remove_var("RELMAP_EMBEDDING_TIMEOUT_SECS");
    }

    assert_eq!(config.base_url, "http://embedder.local/v1");
    assert_eq!(config.model, "nomic-embed-text");
    assert_eq!(config.dimension, 768);
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert!(config.api_key.is_none());
}
