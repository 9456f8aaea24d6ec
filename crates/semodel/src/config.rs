//! Key-prefix configuration and prefix matching.
//!
//! All prefix semantics live here so the classifier and the relationship
//! engine cannot drift apart: matching is case-sensitive and the first
//! configured prefix wins.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SemodelError};

/// How to resolve a fact column whose name exactly equals a configured prefix.
///
/// The warehouse conventions this tool targets do not define a single target
/// for such columns, so the behavior is a policy rather than a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExactMatchPolicy {
    /// Skip the column and record it in the unmatched report.
    SkipAndReport,
    /// Resolve only to a dimension whose key column name is byte-identical;
    /// otherwise record as unmatched.
    RequireIdenticalKey,
}

impl Default for ExactMatchPolicy {
    fn default() -> Self {
        ExactMatchPolicy::SkipAndReport
    }
}

/// Validated, immutable key-prefix configuration.
///
/// Prefixes identify key columns (e.g. `SK_CustomerId` for prefix `SK_`) and
/// drive both table classification and relationship base-name matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPrefixConfig {
    prefixes: Vec<String>,
    exact_match_prefixes: BTreeSet<String>,
    exact_match_policy: ExactMatchPolicy,
}

impl KeyPrefixConfig {
    /// Build a configuration from an ordered prefix list.
    ///
    /// The list must be non-empty and contain no empty or whitespace-only
    /// entries; validation happens here rather than deep inside inference.
    pub fn new<I, S>(prefixes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();

        if prefixes.is_empty() {
            return Err(SemodelError::Config(
                "key prefix list cannot be empty".to_string(),
            ));
        }
        for prefix in &prefixes {
            if prefix.trim().is_empty() {
                return Err(SemodelError::Config(format!(
                    "key prefix {prefix:?} is empty or whitespace-only"
                )));
            }
        }

        Ok(Self {
            prefixes,
            exact_match_prefixes: BTreeSet::new(),
            exact_match_policy: ExactMatchPolicy::default(),
        })
    }

    /// Add prefixes whose exact name always takes the exact-match bypass,
    /// even if they are not in the ordered prefix list.
    pub fn with_exact_match_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exact_match_prefixes
            .extend(prefixes.into_iter().map(Into::into));
        self
    }

    /// Set the exact-match bypass policy.
    pub fn with_exact_match_policy(mut self, policy: ExactMatchPolicy) -> Self {
        self.exact_match_policy = policy;
        self
    }

    /// The ordered prefix list.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// The exact-match bypass policy.
    pub fn exact_match_policy(&self) -> ExactMatchPolicy {
        self.exact_match_policy
    }

    /// Whether a column name starts with any configured prefix.
    pub fn is_key_column(&self, column_name: &str) -> bool {
        self.prefixes.iter().any(|p| column_name.starts_with(p))
    }

    /// Strip the first matching prefix, yielding the base name.
    ///
    /// Returns `None` when no prefix matches and an empty string when the
    /// column name exactly equals a prefix.
    pub fn strip_prefix<'a>(&self, column_name: &'a str) -> Option<&'a str> {
        self.prefixes
            .iter()
            .find_map(|p| column_name.strip_prefix(p.as_str()))
    }

    /// Whether a column name exactly equals a configured prefix (or an
    /// explicit exact-match prefix), triggering the bypass.
    pub fn is_exact_match(&self, column_name: &str) -> bool {
        self.prefixes.iter().any(|p| p == column_name)
            || self.exact_match_prefixes.contains(column_name)
    }
}
