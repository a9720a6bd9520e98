//! Embedding retrieval phase.
//!
//! Embeds one query per requirement category and one text per file, scores
//! every (category, file) pair by cosine similarity, and selects top
//! candidates per domain. A file's domain score is the maximum similarity
//! across the domain's categories, not the average; a file only needs to
//! match one category well to be worth assessing.

pub mod error;


pub use error::{RetrievalError, RetrievalResult};

use std::collections::{HashMap, HashSet};

use futures_util::future::join_all;
use tracing::{debug, instrument};

use crate::config::MapperConfig;
use crate::constants::{CHARS_PER_TOKEN, QUERY_MAX_CHARS, QUERY_REQUIREMENT_LIMIT};
use crate::embedding::EmbeddingClient;
use crate::model::{Domain, DomainMap, FileCandidate, NormalizedRequirements, RequirementCategory};
use crate::similarity::cosine_similarity;

/// Retrieval output for one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainRetrieval {
    /// Selected candidates, descending by score (ties broken by path).
    pub candidates: Vec<FileCandidate>,
    /// Similarity cutoff that actually produced the selection.
    pub threshold_used: f32,
}

/// Complete Phase-1 output.
pub type RetrievalOutput = DomainMap<DomainRetrieval>;

/// Runs the retrieval phase over every file and requirement category.
///
/// File embedding runs in fixed-size parallel batches; each batch joins
/// before the next is issued, so at most `parallel_batch_size` embed calls
/// are in flight. The three domains embed their category queries
/// concurrently, categories sequential within a domain. Any embedding
/// failure aborts the phase.
#[instrument(skip_all, fields(files = files.len()))]
pub async fn retrieve<E: EmbeddingClient>(
    embedder: &E,
    files: &HashMap<String, String>,
    requirements: &NormalizedRequirements,
    config: &MapperConfig,
) -> RetrievalResult<RetrievalOutput> {
    let query_results = join_all(Domain::ALL.map(|domain| {
        embed_domain_queries(embedder, domain, requirements.get(domain).as_slice())
    }))
    .await;

    let mut query_vectors: DomainMap<Vec<Vec<f32>>> = DomainMap::default();
    for (domain, result) in Domain::ALL.into_iter().zip(query_results) {
        *query_vectors.get_mut(domain) = result?;
    }

    // Sorted paths keep batch composition and tie handling reproducible
    // across runs regardless of map iteration order.
    let mut paths: Vec<&String> = files.keys().collect();
    paths.sort();

    // Byte-identical contents share one embedding call; the first path in
    // sort order supplies the embedded text.
    let mut seen = HashSet::new();
    let mut unique: Vec<([u8; 32], String, String)> = Vec::new();
    let mut path_hashes = Vec::with_capacity(paths.len());
    for path in &paths {
        let content = &files[*path];
        let hash = *blake3::hash(content.as_bytes()).as_bytes();
        path_hashes.push(hash);
        if seen.insert(hash) {
            unique.push((
                hash,
                (*path).clone(),
                build_file_text(path, content, config.max_tokens_per_file),
            ));
        }
    }

    debug!(
        unique_contents = unique.len(),
        batch_size = config.parallel_batch_size,
        "embedding files"
    );

    let mut vectors_by_hash: HashMap<[u8; 32], Vec<f32>> = HashMap::with_capacity(unique.len());
    for batch in unique.chunks(config.parallel_batch_size) {
        let batch_futures: Vec<_> = batch
            .iter()
            .map(|(hash, path, text)| async move {
                let result = embedder.embed(text).await;
                (*hash, path, result)
            })
            .collect();

        for (hash, path, result) in join_all(batch_futures).await {
            let vector = result.map_err(|e| RetrievalError::FileEmbedFailed {
                path: path.clone(),
                source: e,
            })?;
            vectors_by_hash.insert(hash, vector);
        }
    }

    let output = DomainMap::from_fn(|domain| {
        let queries = query_vectors.get(domain);
        if queries.is_empty() {
            debug!(domain = %domain, "no categories, skipping domain");
            return DomainRetrieval {
                candidates: Vec::new(),
                threshold_used: config.embedding_threshold,
            };
        }

        let scores: Vec<(String, f32)> = paths
            .iter()
            .zip(&path_hashes)
            .map(|(path, hash)| {
                let file_vector = &vectors_by_hash[hash];
                let best = queries.iter().fold(f32::NEG_INFINITY, |acc, query| {
                    acc.max(cosine_similarity(query, file_vector))
                });
                ((*path).clone(), best)
            })
            .collect();

        let (candidates, threshold_used) = select_with_adaptive_threshold(&scores, config);
        debug!(
            domain = %domain,
            candidates = candidates.len(),
            threshold = threshold_used,
            "domain retrieval complete"
        );

        DomainRetrieval {
            candidates,
            threshold_used,
        }
    });

    Ok(output)
}

async fn embed_domain_queries<E: EmbeddingClient>(
    embedder: &E,
    domain: Domain,
    categories: &[RequirementCategory],
) -> RetrievalResult<Vec<Vec<f32>>> {
    let mut vectors = Vec::with_capacity(categories.len());
    for category in categories {
        let query = build_category_query(category);
        debug!(
            domain = %domain,
            category = %category.title,
            chars = query.len(),
            "embedding category query"
        );
        let vector =
            embedder
                .embed(&query)
                .await
                .map_err(|e| RetrievalError::QueryEmbedFailed {
                    domain,
                    category: category.title.clone(),
                    source: e,
                })?;
        vectors.push(vector);
    }
    Ok(vectors)
}

/// Builds the query string embedded for one category: title, keywords, and
/// the first [`QUERY_REQUIREMENT_LIMIT`] requirement statements, capped at
/// [`QUERY_MAX_CHARS`].
pub fn build_category_query(category: &RequirementCategory) -> String {
    let mut query = category.title.clone();

    if !category.keywords.is_empty() {
        query.push('\n');
        query.push_str(&category.keywords.join(", "));
    }

    for requirement in category.requirements.iter().take(QUERY_REQUIREMENT_LIMIT) {
        query.push('\n');
        query.push_str(requirement);
    }

    truncate_chars(&query, QUERY_MAX_CHARS).to_string()
}

/// Builds the text embedded for one file.
pub fn build_file_text(path: &str, content: &str, max_tokens: usize) -> String {
    let budget = max_tokens * CHARS_PER_TOKEN;
    format!("File: {path}\n\n{}", truncate_chars(content, budget))
}

/// Truncates to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Filters `scores` by `threshold`, sorts descending (ties by path), and
/// keeps the best `top_k`.
pub fn select_candidates(
    scores: &[(String, f32)],
    threshold: f32,
    top_k: usize,
) -> Vec<FileCandidate> {
    let mut selected: Vec<FileCandidate> = scores
        .iter()
        .filter(|(_, score)| *score >= threshold)
        .map(|(path, score)| FileCandidate {
            path: path.clone(),
            embedding_score: *score,
        })
        .collect();

    selected.sort_by(|a, b| {
        b.embedding_score
            .partial_cmp(&a.embedding_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.path.cmp(&b.path))
    });
    selected.truncate(top_k);
    selected
}

/// Selects candidates at the primary threshold, then walks the retry ladder
/// until `min_candidates_for_phase2` is reached.
///
/// Stops at the first (highest) ladder threshold that reaches the minimum;
/// if none does, the last (lowest) threshold's selection stands. Returns the
/// selection and the threshold that produced it.
pub fn select_with_adaptive_threshold(
    scores: &[(String, f32)],
    config: &MapperConfig,
) -> (Vec<FileCandidate>, f32) {
    let mut selected =
        select_candidates(scores, config.embedding_threshold, config.embedding_top_k);
    let mut threshold_used = config.embedding_threshold;

    if selected.len() >= config.min_candidates_for_phase2 {
        return (selected, threshold_used);
    }

    for &retry_threshold in &config.embedding_retry_thresholds {
        selected = select_candidates(scores, retry_threshold, config.embedding_top_k);
        threshold_used = retry_threshold;
        if selected.len() >= config.min_candidates_for_phase2 {
            break;
        }
    }

    (selected, threshold_used)
}
