use super::*;

fn scored(path: &str, hybrid: f32, included: bool) -> HybridScoredFile {
    HybridScoredFile {
        path: path.to_string(),
        embedding_score: hybrid,
        tier: RelevanceTier::Primary,
        source: AssessmentSource::Model,
        hybrid_score: hybrid,
        included,
    }
}

#[test]
fn test_domain_names_are_stable() {
    assert_eq!(Domain::BestPractices.as_str(), "best_practices");
    assert_eq!(Domain::Functional.as_str(), "functional");
    assert_eq!(Domain::NonFunctional.as_str(), "non_functional");
    assert_eq!(Domain::Functional.to_string(), "functional");
}

#[test]
fn test_domain_serde_uses_snake_case() {
    let json = serde_json::to_string(&Domain::BestPractices).unwrap();
    assert_eq!(json, "\"best_practices\"");

    let back: Domain = serde_json::from_str("\"non_functional\"").unwrap();
    assert_eq!(back, Domain::NonFunctional);
}

#[test]
fn test_domain_map_slots_match_domains() {
    let mut map = DomainMap {
        best_practices: 1,
        functional: 2,
        non_functional: 3,
    };
    assert_eq!(*map.get(Domain::BestPractices), 1);
    assert_eq!(*map.get(Domain::Functional), 2);
    assert_eq!(*map.get(Domain::NonFunctional), 3);

    *map.get_mut(Domain::Functional) = 20;
    assert_eq!(*map.get(Domain::Functional), 20);
}

#[test]
fn test_domain_map_iter_follows_fixed_order() {
    let map = DomainMap::from_fn(|d| d.as_str());
    let order: Vec<Domain> = map.iter().map(|(d, _)| d).collect();
    assert_eq!(order, Domain::ALL.to_vec());
    for (domain, value) in map.iter() {
        assert_eq!(*value, domain.as_str());
    }
}

#[test]
fn test_domain_map_map_transforms_every_slot() {
    let lens = DomainMap {
        best_practices: vec![1, 2],
        functional: vec![3],
        non_functional: Vec::new(),
    }
    .map(|_, v| v.len());
    assert_eq!(lens.best_practices, 2);
    assert_eq!(lens.functional, 1);
    assert_eq!(lens.non_functional, 0);
}

#[test]
fn test_tier_weights_are_fixed() {
    assert_eq!(RelevanceTier::Primary.weight(), 1.0);
    assert_eq!(RelevanceTier::Secondary.weight(), 0.75);
    assert_eq!(RelevanceTier::Supporting.weight(), 0.5);
    assert_eq!(RelevanceTier::Irrelevant.weight(), 0.0);
}

#[test]
fn test_tier_wire_form_is_uppercase() {
    let json = serde_json::to_string(&RelevanceTier::Secondary).unwrap();
    assert_eq!(json, "\"SECONDARY\"");

    let back: RelevanceTier = serde_json::from_str("\"IRRELEVANT\"").unwrap();
    assert_eq!(back, RelevanceTier::Irrelevant);
    assert_eq!(RelevanceTier::Primary.to_string(), "PRIMARY");
}

#[test]
fn test_tier_rejects_lowercase_wire_form() {
    let result: Result<RelevanceTier, _> = serde_json::from_str("\"primary\"");
    assert!(result.is_err());
}

#[test]
fn test_assessment_source_serde() {
    let json = serde_json::to_string(&AssessmentSource::Heuristic).unwrap();
    assert_eq!(json, "\"heuristic\"");
}

#[test]
fn test_file_summary_optional_fields_default() {
    let json = r#"{"path":"src/app.py","size":120,"kind":"source","head":"import os"}"#;
    let summary: FileSummary = serde_json::from_str(json).unwrap();
    assert_eq!(summary.kind, FileKind::Source);
    assert!(summary.imports.is_empty());
    assert!(summary.body_sample.is_empty());
}

#[test]
fn test_requirement_category_optional_fields_default() {
    let json = r#"{"title":"Authentication"}"#;
    let category: RequirementCategory = serde_json::from_str(json).unwrap();
    assert_eq!(category.title, "Authentication");
    assert!(category.keywords.is_empty());
    assert!(category.requirements.is_empty());
}

#[test]
fn test_result_included_view_filters_flagged_entries() {
    let result = RelevanceMappingResult {
        files: DomainMap {
            best_practices: vec![scored("a.py", 0.8, true), scored("b.py", 0.1, false)],
            functional: vec![scored("c.py", 0.5, true)],
            non_functional: Vec::new(),
        },
        metadata: MappingMetadata {
            run_id: Uuid::nil(),
            phase1_total_candidates: 3,
            phase2_assessed_files: 3,
            final_included_files: 2,
            degraded_domains: Vec::new(),
            phase1_ms: 0,
            phase2_ms: 0,
            phase3_ms: 0,
            processing_time_ms: 0,
            completed_at: Utc::now(),
        },
    };

    let included: Vec<&str> = result
        .included_files(Domain::BestPractices)
        .map(|f| f.path.as_str())
        .collect();
    assert_eq!(included, vec!["a.py"]);
    assert_eq!(result.for_domain(Domain::BestPractices).len(), 2);
    assert_eq!(result.total_included(), 2);
}
