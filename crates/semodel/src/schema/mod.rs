//! Domain model: warehouse table/column metadata and TMDL types.

mod column;
mod table;
mod types;

pub use column::ColumnMetadata;
pub use table::TableMetadata;
pub use types::{Classification, TmdlType};
