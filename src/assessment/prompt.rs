//! Prompt construction for the tier classifier.
//!
//! The system prompt fixes the tier definitions and the JSON contract;
//! the user prompt carries the per-domain candidate lists with their
//! requirement categories and file-summary context.

use std::collections::HashMap;

use crate::model::{DomainMap, FileCandidate, FileSummary, NormalizedRequirements};
use crate::retrieval::truncate_chars;

use super::retry::PromptVariant;

/// Character cap for the `head` excerpt of one file in the user prompt.
const HEAD_CONTEXT_CHARS: usize = 600;

/// Character cap for the `body_sample` excerpt of one file.
const SAMPLE_CONTEXT_CHARS: usize = 400;

const FULL_SYSTEM_PROMPT: &str = r#"You assess how relevant source files are to software requirements.

Requirements come in three domains: best_practices, functional, and
non_functional. For every candidate file listed under a domain, assign
exactly one relevance tier:

- PRIMARY: directly implements a requirement of the domain.
- SECONDARY: supports an implementation (helpers, wiring, shared types).
- SUPPORTING: peripheral context (configuration, fixtures, scaffolding).
- IRRELEVANT: unrelated to the domain.

Embedding scores are advisory hints, not verdicts. Judge by the file
context provided.

Respond with a single JSON object of this exact shape:

{"best_practices":[{"path":"...","tier":"PRIMARY"}],"functional":[],"non_functional":[]}

Every candidate listed for a domain must appear exactly once in that
domain's array, with its path copied verbatim. Do not add files that
were not listed. Do not wrap the JSON in Markdown fences."#;

const JSON_ONLY_DIRECTIVE: &str = r#"STRICT OUTPUT: return ONLY the JSON object. No prose, no explanation,
no Markdown fences, no trailing text. The response must start with '{'
and end with '}'."#;

const MINIMAL_SYSTEM_PROMPT: &str = r#"Classify each listed file per domain as PRIMARY, SECONDARY, SUPPORTING,
or IRRELEVANT. Return only JSON:
{"best_practices":[{"path":"...","tier":"..."}],"functional":[],"non_functional":[]}
Cover every listed file exactly once in its domain. No other text."#;

/// System prompt for one classification attempt.
pub fn system_prompt(variant: PromptVariant) -> String {
    match variant {
        PromptVariant::Full => FULL_SYSTEM_PROMPT.to_string(),
        PromptVariant::JsonOnly => format!("{FULL_SYSTEM_PROMPT}\n\n{JSON_ONLY_DIRECTIVE}"),
        PromptVariant::Minimal => MINIMAL_SYSTEM_PROMPT.to_string(),
    }
}

/// User prompt covering every sent candidate, grouped by domain.
///
/// Domains with no candidates are omitted; the contract tolerates their
/// keys being absent or empty in the response.
pub fn user_prompt(
    candidates: &DomainMap<Vec<FileCandidate>>,
    summaries: &HashMap<String, FileSummary>,
    requirements: &NormalizedRequirements,
) -> String {
    let mut out = String::from("Assess the relevance of each candidate file listed below.\n");

    for (domain, domain_candidates) in candidates.iter() {
        if domain_candidates.is_empty() {
            continue;
        }

        out.push_str(&format!("\n## Domain: {domain}\n"));

        let categories = requirements.get(domain);
        if !categories.is_empty() {
            out.push_str("\nRequirement categories:\n");
            for category in categories {
                if category.keywords.is_empty() {
                    out.push_str(&format!("- {}\n", category.title));
                } else {
                    out.push_str(&format!(
                        "- {} (keywords: {})\n",
                        category.title,
                        category.keywords.join(", ")
                    ));
                }
            }
        }

        out.push_str("\nCandidate files:\n");
        for candidate in domain_candidates {
            out.push_str(&format!(
                "\n### {}\nembedding_score: {:.3}\n",
                candidate.path, candidate.embedding_score
            ));
            if let Some(summary) = summaries.get(&candidate.path) {
                push_file_context(&mut out, summary);
            }
        }
    }

    out
}

fn push_file_context(out: &mut String, summary: &FileSummary) {
    out.push_str(&format!(
        "kind: {} | size: {} bytes\n",
        summary.kind.as_str(),
        summary.size
    ));
    if !summary.imports.is_empty() {
        out.push_str(&format!("imports: {}\n", summary.imports.join(", ")));
    }
    if !summary.head.is_empty() {
        out.push_str("head:\n");
        out.push_str(truncate_chars(&summary.head, HEAD_CONTEXT_CHARS));
        out.push('\n');
    }
    if !summary.body_sample.is_empty() {
        out.push_str("sample:\n");
        out.push_str(truncate_chars(&summary.body_sample, SAMPLE_CONTEXT_CHARS));
        out.push('\n');
    }
}
