//! Semodel: star-schema semantic model generation for warehouse metadata.
//!
//! Semodel turns introspected table/column metadata plus a key-prefix
//! configuration into a classified star-schema model with inferred
//! relationships, and serializes it deterministically into TMDL documents.
//!
//! # Core Principles
//!
//! - **Deterministic**: identical input reproduces byte-identical documents
//!   and identifiers, across runs and machines
//! - **Pure**: no network, filesystem, or process boundary inside the core
//! - **Convention-driven**: classification and relationships follow the
//!   user's key-prefix convention, never live data
//!
//! # Example
//!
//! ```
//! use semodel::{
//!     ColumnMetadata, GeneratorConfig, KeyPrefixConfig, ModelGenerator, ModelMetadata,
//!     TableMetadata,
//! };
//!
//! let tables = vec![
//!     TableMetadata::new(
//!         "dbo",
//!         "Customer",
//!         vec![
//!             ColumnMetadata::new("SK_Customer", "bigint", false, 1),
//!             ColumnMetadata::new("Name", "varchar", true, 2),
//!         ],
//!     ),
//!     TableMetadata::new(
//!         "dbo",
//!         "Sales",
//!         vec![
//!             ColumnMetadata::new("SK_Customer", "bigint", false, 1),
//!             ColumnMetadata::new("SK_Product", "bigint", false, 2),
//!         ],
//!     ),
//! ];
//!
//! let generator = ModelGenerator::with_config(GeneratorConfig {
//!     model_name: "SalesModel".to_string(),
//!     catalog_name: "SalesLake".to_string(),
//!     prefixes: KeyPrefixConfig::new(["SK_"]).unwrap(),
//!     strict: false,
//!     metadata: ModelMetadata::default(),
//! });
//!
//! let result = generator.generate(&tables).unwrap();
//! assert!(result.documents.contains_key("definition/model.tmdl"));
//! ```

pub mod config;
pub mod error;
pub mod ident;
pub mod inference;
pub mod schema;
pub mod tmdl;

mod generator;

pub use config::{ExactMatchPolicy, KeyPrefixConfig};
pub use error::{Result, SemodelError};
pub use generator::{GenerationResult, GenerationSummary, GeneratorConfig, ModelGenerator};
pub use inference::{
    CrossFilterDirection, InferenceOutcome, Relationship, UnmatchedKey, UnmatchedReason,
    classify_table, classify_tables, infer_relationships,
};
pub use schema::{Classification, ColumnMetadata, TableMetadata, TmdlType};
pub use tmdl::{ModelMetadata, emit_model};
