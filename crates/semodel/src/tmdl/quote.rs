//! TMDL identifier quoting and unquoting.
//!
//! Identifiers containing whitespace or any of `.` `=` `:` `'` must be
//! wrapped in single quotes, with internal single quotes doubled. The rule
//! applies everywhere an identifier appears, definitions and relationship
//! endpoint references alike.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, SemodelError};

static NEEDS_QUOTING: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s.=:']").unwrap());

/// Quote a TMDL identifier if it contains special characters.
///
/// An empty identifier has no valid TMDL spelling and is rejected.
pub fn quote_identifier(identifier: &str) -> Result<String> {
    if identifier.is_empty() {
        return Err(SemodelError::Config(
            "TMDL identifier cannot be empty".to_string(),
        ));
    }
    if !NEEDS_QUOTING.is_match(identifier) {
        return Ok(identifier.to_string());
    }
    Ok(format!("'{}'", identifier.replace('\'', "''")))
}

/// Unquote a previously quoted TMDL identifier.
///
/// Removes outer single quotes and un-doubles internal quotes; identifiers
/// without outer quotes are returned unchanged.
pub fn unquote_identifier(identifier: &str) -> String {
    let inner = identifier
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''));
    match inner {
        Some(inner) => inner.replace("''", "'"),
        None => identifier.to_string(),
    }
}
