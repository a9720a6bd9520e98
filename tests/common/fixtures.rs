//! Shared fixtures: a small synthetic delivery-management repository,
//! its summaries and requirements, and an embedder steered to produce
//! known similarity scores.

use std::collections::HashMap;

use relmap::{
    DomainMap, FileKind, FileSummary, MapperConfig, MockEmbeddingClient, NormalizedRequirements,
    RequirementCategory,
};

/// Installs the fmt subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Unit vector with cosine `a` against the best-practices query axis,
/// `b` against the functional axis and `c` against the non-functional
/// axis.
fn unit_with(a: f32, b: f32, c: f32) -> Vec<f32> {
    let rest = (1.0 - a * a - b * b - c * c).max(0.0).sqrt();
    vec![a, b, c, rest]
}

/// Nine files; two (`index.ts`) share byte-identical contents to
/// exercise content deduplication.
pub fn sample_repository() -> HashMap<String, String> {
    HashMap::from([
        (
            "src/services/DeliveryService.ts".to_string(),
            "export class DeliveryService {\n  create(order: Order) { /* persist */ }\n}\n"
                .to_string(),
        ),
        (
            "src/controllers/CreateDeliveryController.ts".to_string(),
            "import { DeliveryService } from '../services/DeliveryService';\n\
             export class CreateDeliveryController {\n  handle(req: Request) {}\n}\n"
                .to_string(),
        ),
        (
            "src/shared/LoggerFactory.ts".to_string(),
            "export const logger = pino({ level: process.env.LOG_LEVEL });\n".to_string(),
        ),
        (
            "src/domain/DeliveryEntity.ts".to_string(),
            "export interface Delivery {\n  id: string;\n  status: Status;\n}\n".to_string(),
        ),
        (
            "src/cache/CacheLayer.ts".to_string(),
            "const store = new Map<string, CachedValue>();\n".to_string(),
        ),
        (
            "migrations/IndexMigration.sql".to_string(),
            "CREATE INDEX idx_delivery_client ON deliveries (client_id);\n".to_string(),
        ),
        ("README.md".to_string(), "# Delivery API\n".to_string()),
        (
            "src/types/index.ts".to_string(),
            "export * from './shared';\n".to_string(),
        ),
        (
            "src/models/index.ts".to_string(),
            "export * from './shared';\n".to_string(),
        ),
    ])
}

/// Summaries for the six classifiable files. `README.md` and the two
/// `index.ts` barrels deliberately have none.
pub fn sample_summaries() -> HashMap<String, FileSummary> {
    let entries = [
        (
            "src/services/DeliveryService.ts",
            FileKind::Source,
            "export class DeliveryService",
            vec!["typeorm"],
        ),
        (
            "src/controllers/CreateDeliveryController.ts",
            FileKind::Source,
            "export class CreateDeliveryController",
            vec!["express"],
        ),
        (
            "src/shared/LoggerFactory.ts",
            FileKind::Source,
            "export const logger = pino(...)",
            vec!["pino"],
        ),
        (
            "src/domain/DeliveryEntity.ts",
            FileKind::Source,
            "export interface Delivery",
            vec![],
        ),
        (
            "src/cache/CacheLayer.ts",
            FileKind::Source,
            "const store = new Map<string, CachedValue>()",
            vec![],
        ),
        (
            "migrations/IndexMigration.sql",
            FileKind::Schema,
            "CREATE INDEX idx_delivery_client",
            vec![],
        ),
    ];

    entries
        .into_iter()
        .map(|(path, kind, head, imports)| {
            (
                path.to_string(),
                FileSummary {
                    path: path.to_string(),
                    size: 256,
                    kind,
                    head: head.to_string(),
                    imports: imports.into_iter().map(str::to_string).collect(),
                    body_sample: String::new(),
                },
            )
        })
        .collect()
}

pub fn sample_requirements() -> NormalizedRequirements {
    DomainMap {
        best_practices: vec![RequirementCategory {
            title: "Clean Architecture".to_string(),
            keywords: vec!["layers".to_string(), "solid".to_string()],
            requirements: vec![
                "Separate controllers from domain logic".to_string(),
                "Centralize logging".to_string(),
            ],
        }],
        functional: vec![RequirementCategory {
            title: "Gestão de Entregas".to_string(),
            keywords: vec!["delivery".to_string(), "entrega".to_string()],
            requirements: vec![
                "Criar entrega".to_string(),
                "Listar entregas do cliente".to_string(),
            ],
        }],
        non_functional: vec![RequirementCategory {
            title: "Performance".to_string(),
            keywords: vec!["cache".to_string(), "latency".to_string()],
            requirements: vec![
                "Cache hot read paths".to_string(),
                "Index delivery queries".to_string(),
            ],
        }],
    }
}

/// Embedder pinned so every file has a known score per domain.
///
/// With `min_candidates_for_phase2 = 2` (see [`e2e_config`]) the
/// functional and non-functional domains each relax once to 0.45:
///
/// - best_practices: LoggerFactory 0.70, DeliveryEntity 0.58 at 0.55
/// - functional: DeliveryService 0.72 at 0.55, CreateDeliveryController
///   0.46 after relaxing
/// - non_functional: CacheLayer 0.66 at 0.55, IndexMigration 0.48 after
///   relaxing
pub fn steered_embedder() -> MockEmbeddingClient {
    MockEmbeddingClient::new()
        .with_dimension(4)
        .with_vector_for("Clean Architecture", vec![1.0, 0.0, 0.0, 0.0])
        .with_vector_for("Gestão de Entregas", vec![0.0, 1.0, 0.0, 0.0])
        .with_vector_for("Performance", vec![0.0, 0.0, 1.0, 0.0])
        .with_vector_for("DeliveryService.ts", unit_with(0.30, 0.72, 0.20))
        .with_vector_for("CreateDeliveryController.ts", unit_with(0.20, 0.46, 0.10))
        .with_vector_for("LoggerFactory.ts", unit_with(0.70, 0.25, 0.30))
        .with_vector_for("DeliveryEntity.ts", unit_with(0.58, 0.40, 0.10))
        .with_vector_for("CacheLayer.ts", unit_with(0.30, 0.35, 0.66))
        .with_vector_for("IndexMigration.sql", unit_with(0.20, 0.10, 0.48))
        .with_vector_for("README", vec![0.0, 0.0, 0.0, 1.0])
        .with_vector_for("index.ts", vec![0.0, 0.0, 0.0, 1.0])
}

pub fn e2e_config() -> MapperConfig {
    MapperConfig {
        min_candidates_for_phase2: 2,
        ..Default::default()
    }
}
