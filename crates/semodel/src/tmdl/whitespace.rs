//! TMDL indentation helpers and validation.
//!
//! TMDL is whitespace-sensitive: indentation is one tab per nesting level
//! and leading spaces are invalid anywhere.

use crate::error::{Result, SemodelError};

/// Tab indentation for the given nesting level.
pub fn indent(level: usize) -> String {
    "\t".repeat(level)
}

/// Validate that a document uses tab-only indentation.
///
/// Returns a `FormatViolation` naming the document path and the 1-based line
/// number of the first line starting with a space. A correct emitter never
/// trips this; it is an internal-invariant assertion.
pub fn validate_indentation(path: &str, content: &str) -> Result<()> {
    for (i, line) in content.split('\n').enumerate() {
        if line.starts_with(' ') {
            return Err(SemodelError::FormatViolation {
                path: path.to_string(),
                line: i + 1,
                content: line.chars().take(50).collect(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(1), "\t");
        assert_eq!(indent(3), "\t\t\t");
    }

    #[test]
    fn test_tab_indented_content_passes() {
        let content = "table Sales\n\tlineageTag: abc\n\n\tcolumn Qty\n\t\tdataType: int64\n";
        assert!(validate_indentation("definition/tables/Sales.tmdl", content).is_ok());
    }

    #[test]
    fn test_leading_space_reports_line_number() {
        let content = "table Sales\n  lineageTag: abc\n";
        let err = validate_indentation("definition/tables/Sales.tmdl", content).unwrap_err();
        match err {
            SemodelError::FormatViolation { path, line, content } => {
                assert_eq!(path, "definition/tables/Sales.tmdl");
                assert_eq!(line, 2);
                assert!(content.starts_with("  lineageTag"));
            }
            other => panic!("expected FormatViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_lines_allowed() {
        assert!(validate_indentation("definition/model.tmdl", "a\n\nb\n").is_ok());
    }
}
