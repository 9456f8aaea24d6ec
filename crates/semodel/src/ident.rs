//! Deterministic identifier generation for semantic model objects.
//!
//! Every stable object (table, column, relationship, expression) gets a
//! name-based UUID derived from a fixed namespace, so regenerating the model
//! from unchanged input reproduces identical identifiers byte for byte.

use uuid::Uuid;

use crate::error::{Result, SemodelError};

/// Project namespace for name-based UUID generation.
///
/// Generated once at random and committed as a constant; all model object
/// identifiers are derived from it.
pub const SEMANTIC_MODEL_NAMESPACE: Uuid = Uuid::from_bytes([
    0xb8, 0xa7, 0xd3, 0xf2, 0x6c, 0x1e, 0x4a, 0x59, 0x9d, 0x2b, 0x8f, 0x3e, 0x7c, 0x5a, 0x1d, 0x04,
]);

/// Generate a stable identifier for a model object.
///
/// The composite key is `kind:part1:part2:...`. The kind is trimmed and
/// lowercased; parts are trimmed but keep their casing, since source systems
/// may be case-sensitive. Identical inputs always yield the identical UUID,
/// across runs and machines.
pub fn stable_id(kind: &str, parts: &[&str]) -> Result<Uuid> {
    let kind = kind.trim().to_lowercase();
    if kind.is_empty() {
        return Err(SemodelError::Config(
            "identifier kind cannot be empty".to_string(),
        ));
    }

    let mut composite = kind;
    for part in parts {
        let part = part.trim();
        if part.is_empty() {
            return Err(SemodelError::Config(format!(
                "identifier part cannot be empty (kind '{composite}')"
            )));
        }
        composite.push(':');
        composite.push_str(part);
    }
    if parts.is_empty() {
        return Err(SemodelError::Config(
            "identifier needs at least one part".to_string(),
        ));
    }

    Ok(Uuid::new_v5(&SEMANTIC_MODEL_NAMESPACE, composite.as_bytes()))
}
