//! Error types for the semodel library.

use thiserror::Error;

/// Main error type for semantic model generation.
#[derive(Debug, Error)]
pub enum SemodelError {
    /// Invalid key-prefix or generator configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// SQL type with no TMDL mapping.
    #[error("Unsupported SQL type: '{sql_type}'. Supported types: {supported}")]
    UnsupportedType { sql_type: String, supported: String },

    /// A fact key column resolved to more than one dimension.
    #[error(
        "Ambiguous relationship match for {table}.{column}: base name '{base_name}' \
         matches dimensions {candidates:?}"
    )]
    AmbiguousMatch {
        table: String,
        column: String,
        base_name: String,
        candidates: Vec<String>,
    },

    /// A fact key column matched no dimension (strict mode only).
    #[error("Unmatched key column {table}.{column}: no dimension resolves its base name")]
    UnmatchedKey { table: String, column: String },

    /// A metadata document failed JSON serialization.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// An emitted document failed tab-indentation validation.
    ///
    /// This indicates an emitter defect, not a user-input problem.
    #[error("Format violation in {path} at line {line}: leading space in {content:?}")]
    FormatViolation {
        path: String,
        line: usize,
        content: String,
    },
}

/// Result type alias for semodel operations.
pub type Result<T> = std::result::Result<T, SemodelError>;
