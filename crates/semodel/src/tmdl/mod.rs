//! TMDL emitter: serializes the semantic model into a map of document path
//! to UTF-8 text, matching the Fabric semantic-model folder layout.
//!
//! The emitter performs no I/O; the caller persists or deploys the returned
//! documents verbatim.

mod generate;
mod metadata;
mod quote;
mod whitespace;

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::config::KeyPrefixConfig;
use crate::error::{Result, SemodelError};
use crate::inference::Relationship;
use crate::schema::{Classification, TableMetadata};

pub use generate::{
    database_tmdl, expressions_tmdl, model_tmdl, relationships_tmdl, table_document_path,
    table_tmdl,
};
pub use metadata::{ModelMetadata, definition_pbism_json, diagram_layout_json, platform_json};
pub use quote::{quote_identifier, unquote_identifier};
pub use whitespace::{indent, validate_indentation};

/// Emit the complete semantic model as a document map.
///
/// Keys are relative paths in the expected folder layout:
/// `.platform`, `definition.pbism`, `definition/*.tmdl`,
/// `definition/tables/<Table>.tmdl`, and `diagramLayout.json`.
/// Map insertion order is the emission order and is deterministic.
#[allow(clippy::too_many_arguments)]
pub fn emit_model(
    model_name: &str,
    catalog_name: &str,
    tables: &[TableMetadata],
    classifications: &BTreeMap<(String, String), Classification>,
    relationships: &[Relationship],
    config: &KeyPrefixConfig,
    metadata: &ModelMetadata,
) -> Result<IndexMap<String, String>> {
    let mut documents = IndexMap::new();

    documents.insert(".platform".to_string(), platform_json(model_name)?);
    documents.insert(
        "definition.pbism".to_string(),
        definition_pbism_json(model_name, metadata)?,
    );

    documents.insert("definition/database.tmdl".to_string(), database_tmdl()?);
    documents.insert(
        "definition/model.tmdl".to_string(),
        model_tmdl(tables, classifications)?,
    );
    documents.insert(
        "definition/expressions.tmdl".to_string(),
        expressions_tmdl(catalog_name)?,
    );
    documents.insert(
        "definition/relationships.tmdl".to_string(),
        relationships_tmdl(relationships)?,
    );

    for table in generate::sort_tables(tables, classifications) {
        let path = table_document_path(table);
        if documents.contains_key(&path) {
            // Table documents are keyed by unqualified name, so the same
            // table name in two schemas would silently overwrite.
            return Err(SemodelError::Config(format!(
                "duplicate table document path {path}: table name {:?} \
                 appears in more than one schema",
                table.table_name
            )));
        }
        documents.insert(path, table_tmdl(table, config, catalog_name)?);
    }

    documents.insert(
        "diagramLayout.json".to_string(),
        diagram_layout_json(tables, classifications)?,
    );

    Ok(documents)
}
