//! Table classification by key-column count.
//!
//! - 0 key columns -> unclassified
//! - 1 key column  -> dimension (single primary/surrogate key)
//! - 2+ key columns -> fact (composite foreign keys)

use std::collections::BTreeMap;

use crate::config::KeyPrefixConfig;
use crate::schema::{Classification, ColumnMetadata, TableMetadata};

/// Classify a single table by counting its key columns.
///
/// Key columns are those whose name starts with any configured prefix;
/// matching is case-sensitive.
pub fn classify_table(columns: &[ColumnMetadata], config: &KeyPrefixConfig) -> Classification {
    let key_count = columns
        .iter()
        .filter(|c| config.is_key_column(&c.name))
        .count();

    match key_count {
        0 => Classification::Unclassified,
        1 => Classification::Dimension,
        _ => Classification::Fact,
    }
}

/// Classify multiple tables into a `(schema, table)` -> classification map.
///
/// The map is ordered by key so downstream iteration is deterministic.
pub fn classify_tables(
    tables: &[TableMetadata],
    config: &KeyPrefixConfig,
) -> BTreeMap<(String, String), Classification> {
    tables
        .iter()
        .map(|t| (t.key(), classify_table(&t.columns, config)))
        .collect()
}
