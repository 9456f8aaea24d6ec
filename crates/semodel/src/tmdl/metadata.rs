//! Fabric metadata documents: `.platform`, `definition.pbism`, and
//! `diagramLayout.json`.
//!
//! All three are JSON with sorted keys (serde_json's default map), so output
//! is deterministic without extra work. Pretty-printing uses tab indentation
//! and is validated like the TMDL documents: no line may start with a space.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Result, SemodelError};
use crate::ident::stable_id;
use crate::schema::{Classification, TableMetadata};

use super::whitespace::validate_indentation;

/// Pretty-print a JSON document with tab indentation.
fn to_tab_indented_json(path: &str, value: &serde_json::Value) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    let content = String::from_utf8(buf)
        .map_err(|e| SemodelError::Config(format!("{path}: emitted JSON is not UTF-8: {e}")))?;
    validate_indentation(path, &content)?;
    Ok(content)
}

/// Descriptive metadata carried into `definition.pbism`.
///
/// The timestamp is caller-supplied; when absent the `createdAt`/`modifiedAt`
/// keys are omitted so repeated runs stay byte-identical.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model description.
    pub description: String,
    /// Model author.
    pub author: String,
    /// Creation/modification timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Generate the `.platform` document (fabric gitIntegration properties).
///
/// The `logicalId` is deterministic, derived from the model name.
pub fn platform_json(model_name: &str) -> Result<String> {
    let logical_id = stable_id("platform", &[model_name])?;

    let doc = json!({
        "$schema": "https://developer.microsoft.com/json-schemas/fabric/gitIntegration/platformProperties/2.0.0/schema.json",
        "metadata": {
            "type": "SemanticModel",
            "displayName": model_name,
        },
        "config": {
            "version": "2.0",
            "logicalId": logical_id.to_string(),
        },
    });

    to_tab_indented_json(".platform", &doc)
}

/// Generate the `definition.pbism` document (fabric semanticModel
/// definition properties).
pub fn definition_pbism_json(model_name: &str, metadata: &ModelMetadata) -> Result<String> {
    let mut doc = serde_json::Map::new();
    doc.insert(
        "$schema".to_string(),
        json!("https://developer.microsoft.com/json-schemas/fabric/item/semanticModel/definitionProperties/1.0.0/schema.json"),
    );
    doc.insert("version".to_string(), json!("4.2"));
    doc.insert("name".to_string(), json!(model_name));
    doc.insert("description".to_string(), json!(metadata.description));
    doc.insert("author".to_string(), json!(metadata.author));
    if let Some(timestamp) = metadata.timestamp {
        let stamp = timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        doc.insert("createdAt".to_string(), json!(stamp));
        doc.insert("modifiedAt".to_string(), json!(stamp));
    }
    doc.insert("settings".to_string(), json!({}));

    to_tab_indented_json("definition.pbism", &serde_json::Value::Object(doc))
}

/// Diagram geometry. Facts stack in one column, dimensions in another, so
/// the two classes read as visually separate groups.
const FACT_X: i64 = 60;
const DIMENSION_X: i64 = 440;
const TOP_Y: i64 = 40;
const TABLE_WIDTH: i64 = 220;
const TABLE_HEIGHT: i64 = 160;
const VERTICAL_SPACING: i64 = 200;

/// Generate the `diagramLayout.json` document.
///
/// Only classified tables appear; unclassified tables carry no layout.
pub fn diagram_layout_json(
    tables: &[TableMetadata],
    classifications: &BTreeMap<(String, String), Classification>,
) -> Result<String> {
    let mut dimensions: Vec<&TableMetadata> = Vec::new();
    let mut facts: Vec<&TableMetadata> = Vec::new();
    for table in tables {
        match classifications.get(&table.key()) {
            Some(Classification::Dimension) => dimensions.push(table),
            Some(Classification::Fact) => facts.push(table),
            _ => {}
        }
    }
    dimensions.sort_by_key(|t| t.key());
    facts.sort_by_key(|t| t.key());

    let mut entries = Vec::new();
    for (i, table) in facts.iter().enumerate() {
        entries.push(layout_entry(table, FACT_X, TOP_Y + i as i64 * VERTICAL_SPACING));
    }
    for (i, table) in dimensions.iter().enumerate() {
        entries.push(layout_entry(
            table,
            DIMENSION_X,
            TOP_Y + i as i64 * VERTICAL_SPACING,
        ));
    }

    let doc = json!({
        "version": "1.1.0",
        "tables": entries,
    });

    to_tab_indented_json("diagramLayout.json", &doc)
}

fn layout_entry(table: &TableMetadata, x: i64, y: i64) -> serde_json::Value {
    json!({
        "name": table.table_name,
        "x": x,
        "y": y,
        "width": TABLE_WIDTH,
        "height": TABLE_HEIGHT,
    })
}
