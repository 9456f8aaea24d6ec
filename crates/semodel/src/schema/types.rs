//! Core type definitions: table classification and TMDL data types.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SemodelError};

/// Star-schema classification of a table, derived from its key-column count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Exactly one key column: a descriptive entity with a single key.
    Dimension,
    /// Two or more key columns: an event/transaction table.
    Fact,
    /// No key columns.
    Unclassified,
}

impl Classification {
    /// Emission sort rank: dimensions before facts before unclassified.
    pub fn rank(&self) -> u8 {
        match self {
            Classification::Dimension => 0,
            Classification::Fact => 1,
            Classification::Unclassified => 2,
        }
    }
}

impl Default for Classification {
    fn default() -> Self {
        Classification::Unclassified
    }
}

/// TMDL tabular model data types.
///
/// Based on Analysis Services tabular model data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TmdlType {
    Int64,
    Double,
    Boolean,
    String,
    DateTime,
    Decimal,
    Binary,
}

/// Mapping from Fabric warehouse SQL types to TMDL types.
///
/// Kept sorted by SQL type name so error messages enumerate supported types
/// in a stable order.
static SQL_TO_TMDL: Lazy<Vec<(&'static str, TmdlType)>> = Lazy::new(|| {
    let mut table = vec![
        ("bigint", TmdlType::Int64),
        ("bit", TmdlType::Boolean),
        ("char", TmdlType::String),
        ("date", TmdlType::DateTime),
        ("datetime2", TmdlType::DateTime),
        ("decimal", TmdlType::Decimal),
        ("float", TmdlType::Double),
        ("int", TmdlType::Int64),
        ("numeric", TmdlType::Decimal),
        ("real", TmdlType::Double),
        ("smallint", TmdlType::Int64),
        ("time", TmdlType::DateTime),
        ("uniqueidentifier", TmdlType::Binary),
        ("varbinary", TmdlType::Binary),
        ("varchar", TmdlType::String),
    ];
    table.sort_by_key(|(name, _)| *name);
    table
});

impl TmdlType {
    /// TMDL spelling of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TmdlType::Int64 => "int64",
            TmdlType::Double => "double",
            TmdlType::Boolean => "boolean",
            TmdlType::String => "string",
            TmdlType::DateTime => "dateTime",
            TmdlType::Decimal => "decimal",
            TmdlType::Binary => "binary",
        }
    }

    /// Map a warehouse SQL type name to its TMDL type.
    ///
    /// The name is trimmed and lowercased before lookup. An unrecognized
    /// type is a fatal configuration error whose message enumerates every
    /// supported type name.
    pub fn from_sql(sql_type: &str) -> Result<Self> {
        let normalized = sql_type.trim().to_lowercase();
        SQL_TO_TMDL
            .iter()
            .find(|(name, _)| *name == normalized)
            .map(|(_, tmdl)| *tmdl)
            .ok_or_else(|| SemodelError::UnsupportedType {
                sql_type: sql_type.to_string(),
                supported: SQL_TO_TMDL
                    .iter()
                    .map(|(name, _)| *name)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl std::fmt::Display for TmdlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
