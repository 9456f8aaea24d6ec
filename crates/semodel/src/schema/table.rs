//! Warehouse table metadata.

use serde::{Deserialize, Serialize};

use super::column::ColumnMetadata;
use crate::config::KeyPrefixConfig;

/// Immutable metadata for a warehouse table.
///
/// Columns keep their source ordinal order. Classification is never stored
/// here; it lives in a side mapping keyed by (schema, table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Schema name (e.g. `dbo`).
    pub schema_name: String,
    /// Table name, source casing preserved.
    pub table_name: String,
    /// Columns in ordinal order.
    pub columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    /// Create table metadata.
    pub fn new(
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
        columns: Vec<ColumnMetadata>,
    ) -> Self {
        Self {
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            columns,
        }
    }

    /// Schema-qualified name, `schema.table`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema_name, self.table_name)
    }

    /// Classification-map key, `(schema, table)`.
    pub fn key(&self) -> (String, String) {
        (self.schema_name.clone(), self.table_name.clone())
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns whose names match a configured key prefix, in ordinal order.
    pub fn key_columns<'a>(
        &'a self,
        config: &'a KeyPrefixConfig,
    ) -> impl Iterator<Item = &'a ColumnMetadata> {
        self.columns.iter().filter(|c| config.is_key_column(&c.name))
    }
}
