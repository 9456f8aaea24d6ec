//! Inference engine: table classification and relationship discovery.

mod classification;
mod relationships;

pub use classification::{classify_table, classify_tables};
pub use relationships::{
    CrossFilterDirection, InferenceOutcome, Relationship, UnmatchedKey, UnmatchedReason,
    infer_relationships,
};
