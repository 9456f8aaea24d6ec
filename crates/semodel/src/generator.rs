//! Main ModelGenerator struct and public API.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::KeyPrefixConfig;
use crate::error::Result;
use crate::inference::{Relationship, UnmatchedKey, classify_tables, infer_relationships};
use crate::schema::{Classification, TableMetadata};
use crate::tmdl::{ModelMetadata, emit_model};

/// Configuration for a generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Semantic model name, used for `.platform` and `definition.pbism`.
    pub model_name: String,
    /// Fabric catalog (lakehouse/warehouse) name for the DirectLake source.
    pub catalog_name: String,
    /// Key-prefix configuration.
    pub prefixes: KeyPrefixConfig,
    /// Turn unmatched fact keys into fatal errors.
    pub strict: bool,
    /// Descriptive metadata for `definition.pbism`.
    pub metadata: ModelMetadata,
}

/// Result of generating a semantic model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Document path -> content, in emission order.
    pub documents: IndexMap<String, String>,
    /// Classification per (schema, table).
    pub classifications: BTreeMap<(String, String), Classification>,
    /// Inferred relationships in their final order.
    pub relationships: Vec<Relationship>,
    /// Fact key columns that produced no relationship.
    pub unmatched: Vec<UnmatchedKey>,
    /// Summary counts.
    pub summary: GenerationSummary,
}

/// Summary of a generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Total input tables.
    pub total_tables: usize,
    /// Tables classified as dimensions.
    pub dimension_count: usize,
    /// Tables classified as facts.
    pub fact_count: usize,
    /// Tables left unclassified.
    pub unclassified_count: usize,
    /// Total relationships.
    pub relationship_count: usize,
    /// Relationships marked inactive (role-playing extras).
    pub inactive_relationship_count: usize,
    /// Unmatched fact key columns.
    pub unmatched_count: usize,
    /// Emitted documents.
    pub document_count: usize,
}

/// The semantic model generation engine.
///
/// Runs the full pipeline over immutable input metadata: classification,
/// relationship inference, TMDL emission. Every run recomputes the model
/// from scratch; there is no cached state.
pub struct ModelGenerator {
    config: GeneratorConfig,
}

impl ModelGenerator {
    /// Create a generator with the given configuration.
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// The generator's configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the semantic model for the given tables.
    pub fn generate(&self, tables: &[TableMetadata]) -> Result<GenerationResult> {
        let classifications = classify_tables(tables, &self.config.prefixes);

        let outcome = infer_relationships(
            tables,
            &classifications,
            &self.config.prefixes,
            self.config.strict,
        )?;

        let documents = emit_model(
            &self.config.model_name,
            &self.config.catalog_name,
            tables,
            &classifications,
            &outcome.relationships,
            &self.config.prefixes,
            &self.config.metadata,
        )?;

        let summary = Self::compute_summary(
            tables,
            &classifications,
            &outcome.relationships,
            &outcome.unmatched,
            &documents,
        );

        Ok(GenerationResult {
            documents,
            classifications,
            relationships: outcome.relationships,
            unmatched: outcome.unmatched,
            summary,
        })
    }

    fn compute_summary(
        tables: &[TableMetadata],
        classifications: &BTreeMap<(String, String), Classification>,
        relationships: &[Relationship],
        unmatched: &[UnmatchedKey],
        documents: &IndexMap<String, String>,
    ) -> GenerationSummary {
        let count_class = |c: Classification| {
            classifications.values().filter(|v| **v == c).count()
        };

        GenerationSummary {
            total_tables: tables.len(),
            dimension_count: count_class(Classification::Dimension),
            fact_count: count_class(Classification::Fact),
            unclassified_count: count_class(Classification::Unclassified),
            relationship_count: relationships.len(),
            inactive_relationship_count: relationships.iter().filter(|r| !r.is_active).count(),
            unmatched_count: unmatched.len(),
            document_count: documents.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnMetadata;

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            model_name: "SalesModel".to_string(),
            catalog_name: "SalesLake".to_string(),
            prefixes: KeyPrefixConfig::new(["SK_"]).unwrap(),
            strict: false,
            metadata: ModelMetadata::default(),
        }
    }

    fn sample_tables() -> Vec<TableMetadata> {
        vec![
            TableMetadata::new(
                "dbo",
                "Customer",
                vec![
                    ColumnMetadata::new("SK_Customer", "bigint", false, 1),
                    ColumnMetadata::new("Name", "varchar", true, 2),
                ],
            ),
            TableMetadata::new(
                "dbo",
                "Sales",
                vec![
                    ColumnMetadata::new("SK_Customer", "bigint", false, 1),
                    ColumnMetadata::new("SK_Unknown", "bigint", false, 2),
                    ColumnMetadata::new("Amount", "decimal", false, 3),
                ],
            ),
            TableMetadata::new(
                "dbo",
                "AuditLog",
                vec![ColumnMetadata::new("Message", "varchar", true, 1)],
            ),
        ]
    }

    #[test]
    fn test_generate_full_pipeline() {
        let generator = ModelGenerator::with_config(config());
        let result = generator.generate(&sample_tables()).unwrap();

        assert_eq!(result.summary.total_tables, 3);
        assert_eq!(result.summary.dimension_count, 1);
        assert_eq!(result.summary.fact_count, 1);
        assert_eq!(result.summary.unclassified_count, 1);
        assert_eq!(result.summary.relationship_count, 1);
        assert_eq!(result.summary.inactive_relationship_count, 0);
        assert_eq!(result.summary.unmatched_count, 1);
        assert_eq!(result.summary.document_count, result.documents.len());

        assert!(result.documents.contains_key(".platform"));
        assert!(result.documents.contains_key("definition/tables/Sales.tmdl"));
        assert!(result.documents.contains_key("definition/tables/AuditLog.tmdl"));
    }

    #[test]
    fn test_strict_mode_fails_on_unmatched() {
        let mut cfg = config();
        cfg.strict = true;
        let generator = ModelGenerator::with_config(cfg);

        assert!(generator.generate(&sample_tables()).is_err());
    }

    #[test]
    fn test_generate_empty_input() {
        let generator = ModelGenerator::with_config(config());
        let result = generator.generate(&[]).unwrap();

        assert!(result.relationships.is_empty());
        assert!(result.classifications.is_empty());
        // Top-level documents are still produced
        assert!(result.documents.contains_key("definition/model.tmdl"));
        assert_eq!(result.documents["definition/relationships.tmdl"], "");
    }
}
