//! Warehouse column metadata.

use serde::{Deserialize, Serialize};

/// Immutable metadata for a warehouse column, built once from
/// INFORMATION_SCHEMA introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name, source casing preserved.
    pub name: String,
    /// SQL type name as reported by the warehouse (e.g. `varchar`, `bigint`).
    pub sql_type: String,
    /// Whether the column accepts NULL.
    pub is_nullable: bool,
    /// 1-based ordinal position in the table.
    pub ordinal_position: usize,
    /// Maximum character/byte length, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    /// Numeric precision, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_precision: Option<u8>,
    /// Numeric scale, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_scale: Option<u8>,
}

impl ColumnMetadata {
    /// Create column metadata without length/precision details.
    pub fn new(
        name: impl Into<String>,
        sql_type: impl Into<String>,
        is_nullable: bool,
        ordinal_position: usize,
    ) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            is_nullable,
            ordinal_position,
            max_length: None,
            numeric_precision: None,
            numeric_scale: None,
        }
    }

    /// Attach a maximum length.
    pub fn with_max_length(mut self, max_length: i64) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Attach numeric precision and scale.
    pub fn with_precision_scale(mut self, precision: u8, scale: u8) -> Self {
        self.numeric_precision = Some(precision);
        self.numeric_scale = Some(scale);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_attaches_details() {
        let col = ColumnMetadata::new("Amount", "decimal", false, 3).with_precision_scale(18, 2);
        assert_eq!(col.numeric_precision, Some(18));
        assert_eq!(col.numeric_scale, Some(2));
        assert_eq!(col.max_length, None);

        let col = ColumnMetadata::new("Name", "varchar", true, 1).with_max_length(200);
        assert_eq!(col.max_length, Some(200));
        assert!(col.is_nullable);
    }
}
