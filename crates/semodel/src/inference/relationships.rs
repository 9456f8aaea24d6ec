//! Star-schema relationship inference.
//!
//! Fact key columns are matched against dimension key columns by base name
//! (the column name with its key prefix stripped). A dimension referenced
//! more than once from the same fact is a role-playing dimension: all of its
//! relationships are kept but only the first, by ascending from-column name,
//! stays active.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{ExactMatchPolicy, KeyPrefixConfig};
use crate::error::{Result, SemodelError};
use crate::ident::stable_id;
use crate::schema::{Classification, TableMetadata};

/// Cross-filter direction of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossFilterDirection {
    /// Filters flow from the one side to the many side only (the default).
    OneDirection,
    /// Filters flow both ways.
    BothDirections,
}

impl CrossFilterDirection {
    /// TMDL spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            CrossFilterDirection::OneDirection => "oneDirection",
            CrossFilterDirection::BothDirections => "bothDirections",
        }
    }
}

impl Default for CrossFilterDirection {
    fn default() -> Self {
        CrossFilterDirection::OneDirection
    }
}

/// An inferred fact-to-dimension relationship.
///
/// Cardinality is fixed: the from side (fact) is many, the to side
/// (dimension) is one. Identity is derived from the four endpoint fields, so
/// regenerating the model reproduces the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Deterministic identifier seeded by the four endpoint fields.
    pub id: Uuid,
    /// Qualified fact table name (`schema.table`), many side.
    pub from_table: String,
    /// Fact key column name.
    pub from_column: String,
    /// Qualified dimension table name (`schema.table`), one side.
    pub to_table: String,
    /// Dimension key column name.
    pub to_column: String,
    /// Whether this relationship participates in default filtering.
    pub is_active: bool,
    /// Cross-filter direction.
    pub cross_filtering_behavior: CrossFilterDirection,
}

impl Relationship {
    /// Cardinality of the from side. Always many.
    pub fn from_cardinality(&self) -> &'static str {
        "many"
    }

    /// Cardinality of the to side. Always one.
    pub fn to_cardinality(&self) -> &'static str {
        "one"
    }
}

/// Why a fact key column produced no relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedReason {
    /// No dimension resolved the column's base name.
    NoDimension,
    /// The column name exactly equals a configured prefix and the bypass
    /// policy left it unresolved.
    ExactPrefix,
}

/// A fact key column that was dropped from relationship inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedKey {
    /// Qualified fact table name.
    pub table: String,
    /// Column name.
    pub column: String,
    /// Why no relationship was produced.
    pub reason: UnmatchedReason,
}

/// Result of relationship inference: the ordered relationship set plus the
/// non-fatal unmatched-key report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InferenceOutcome {
    /// Relationships sorted by (active first, from_table, from_column,
    /// to_table, to_column). The only ordering callers may rely on.
    pub relationships: Vec<Relationship>,
    /// Fact key columns that matched no dimension.
    pub unmatched: Vec<UnmatchedKey>,
}

/// A dimension's key column with its prefix-stripped base name.
struct DimensionKey {
    qualified: String,
    key_column: String,
    base: String,
}

/// Infer fact-to-dimension relationships.
///
/// Unclassified tables are discarded entirely. Unmatched fact keys are
/// accumulated into the outcome rather than failing the run, unless `strict`
/// is set. An ambiguous match (one fact key resolving to several dimensions)
/// is always fatal.
pub fn infer_relationships(
    tables: &[TableMetadata],
    classifications: &BTreeMap<(String, String), Classification>,
    config: &KeyPrefixConfig,
    strict: bool,
) -> Result<InferenceOutcome> {
    let facts: Vec<&TableMetadata> = tables
        .iter()
        .filter(|t| classifications.get(&t.key()) == Some(&Classification::Fact))
        .collect();

    let dimensions = dimension_keys(tables, classifications, config);

    let mut candidates: Vec<Relationship> = Vec::new();
    let mut unmatched: Vec<UnmatchedKey> = Vec::new();

    for &fact in &facts {
        for column in fact.key_columns(config) {
            if config.is_exact_match(&column.name) {
                resolve_exact_match(fact, &column.name, &dimensions, config, &mut candidates, &mut unmatched)?;
                continue;
            }

            // is_key_column guarantees a prefix matches here
            let Some(base) = config.strip_prefix(&column.name) else {
                continue;
            };

            match resolve_base_name(fact, &column.name, base, &dimensions)? {
                Some(dim) => candidates.push(new_candidate(fact, &column.name, dim)),
                None => unmatched.push(UnmatchedKey {
                    table: fact.qualified_name(),
                    column: column.name.clone(),
                    reason: UnmatchedReason::NoDimension,
                }),
            }
        }
    }

    // Role-playing resolution must precede any other ordering: group by table
    // pair, sort each group by from_column, keep the first entry active.
    let mut groups: BTreeMap<(String, String), Vec<Relationship>> = BTreeMap::new();
    for candidate in candidates {
        groups
            .entry((candidate.from_table.clone(), candidate.to_table.clone()))
            .or_default()
            .push(candidate);
    }

    let mut relationships: Vec<Relationship> = Vec::new();
    for ((from_table, to_table), mut group) in groups {
        if from_table == to_table {
            continue;
        }
        group.sort_by(|a, b| a.from_column.cmp(&b.from_column));
        for (i, mut rel) in group.into_iter().enumerate() {
            rel.is_active = i == 0;
            rel.id = stable_id(
                "relationship",
                &[&rel.from_table, &rel.from_column, &rel.to_table, &rel.to_column],
            )?;
            relationships.push(rel);
        }
    }

    if strict {
        if let Some(first) = unmatched.first() {
            return Err(SemodelError::UnmatchedKey {
                table: first.table.clone(),
                column: first.column.clone(),
            });
        }
    }

    relationships.sort_by(|a, b| {
        (!a.is_active, &a.from_table, &a.from_column, &a.to_table, &a.to_column).cmp(&(
            !b.is_active,
            &b.from_table,
            &b.from_column,
            &b.to_table,
            &b.to_column,
        ))
    });

    Ok(InferenceOutcome {
        relationships,
        unmatched,
    })
}

/// Collect each dimension's single key column and base name.
///
/// Dimensions whose key column exactly equals a prefix (empty base) are left
/// out of base-name matching; they are only reachable through the
/// exact-match bypass.
fn dimension_keys(
    tables: &[TableMetadata],
    classifications: &BTreeMap<(String, String), Classification>,
    config: &KeyPrefixConfig,
) -> Vec<DimensionKey> {
    tables
        .iter()
        .filter(|t| classifications.get(&t.key()) == Some(&Classification::Dimension))
        .filter_map(|t| {
            let key_column = t.key_columns(config).next()?;
            let base = config.strip_prefix(&key_column.name)?;
            Some(DimensionKey {
                qualified: t.qualified_name(),
                key_column: key_column.name.clone(),
                base: base.to_string(),
            })
        })
        .collect()
}

/// Resolve a fact key column's base name to a dimension.
///
/// Prefers a dimension with an identical base name; otherwise accepts the
/// unique dimension whose base name is contained in the fact's base name
/// (role-playing columns such as `SK_OrderDate` against dimension base
/// `Date`). More than one candidate at either step is a fatal ambiguity.
fn resolve_base_name<'a>(
    fact: &TableMetadata,
    column_name: &str,
    base: &str,
    dimensions: &'a [DimensionKey],
) -> Result<Option<&'a DimensionKey>> {
    let exact: Vec<&DimensionKey> = dimensions.iter().filter(|d| d.base == base).collect();
    if !exact.is_empty() {
        return unique_or_ambiguous(fact, column_name, base, exact);
    }

    let partial: Vec<&DimensionKey> = dimensions
        .iter()
        .filter(|d| !d.base.is_empty() && base.contains(&d.base))
        .collect();
    if partial.is_empty() {
        return Ok(None);
    }
    unique_or_ambiguous(fact, column_name, base, partial)
}

fn unique_or_ambiguous<'a>(
    fact: &TableMetadata,
    column_name: &str,
    base: &str,
    matches: Vec<&'a DimensionKey>,
) -> Result<Option<&'a DimensionKey>> {
    if matches.len() > 1 {
        let mut candidates: Vec<String> = matches.iter().map(|d| d.qualified.clone()).collect();
        candidates.sort();
        return Err(SemodelError::AmbiguousMatch {
            table: fact.qualified_name(),
            column: column_name.to_string(),
            base_name: base.to_string(),
            candidates,
        });
    }
    Ok(matches.into_iter().next())
}

/// Apply the exact-match bypass to a column whose name equals a prefix.
fn resolve_exact_match(
    fact: &TableMetadata,
    column_name: &str,
    dimensions: &[DimensionKey],
    config: &KeyPrefixConfig,
    candidates: &mut Vec<Relationship>,
    unmatched: &mut Vec<UnmatchedKey>,
) -> Result<()> {
    match config.exact_match_policy() {
        ExactMatchPolicy::SkipAndReport => {
            unmatched.push(UnmatchedKey {
                table: fact.qualified_name(),
                column: column_name.to_string(),
                reason: UnmatchedReason::ExactPrefix,
            });
        }
        ExactMatchPolicy::RequireIdenticalKey => {
            let identical: Vec<&DimensionKey> = dimensions
                .iter()
                .filter(|d| d.key_column == column_name)
                .collect();
            if identical.len() > 1 {
                let mut names: Vec<String> =
                    identical.iter().map(|d| d.qualified.clone()).collect();
                names.sort();
                return Err(SemodelError::AmbiguousMatch {
                    table: fact.qualified_name(),
                    column: column_name.to_string(),
                    base_name: String::new(),
                    candidates: names,
                });
            }
            match identical.into_iter().next() {
                Some(dim) => candidates.push(new_candidate(fact, column_name, dim)),
                None => unmatched.push(UnmatchedKey {
                    table: fact.qualified_name(),
                    column: column_name.to_string(),
                    reason: UnmatchedReason::ExactPrefix,
                }),
            }
        }
    }
    Ok(())
}

fn new_candidate(fact: &TableMetadata, column_name: &str, dim: &DimensionKey) -> Relationship {
    Relationship {
        id: Uuid::nil(), // assigned after role-playing resolution
        from_table: fact.qualified_name(),
        from_column: column_name.to_string(),
        to_table: dim.qualified.clone(),
        to_column: dim.key_column.clone(),
        is_active: true,
        cross_filtering_behavior: CrossFilterDirection::OneDirection,
    }
}
