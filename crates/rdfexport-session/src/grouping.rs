//! Identifier-run tracking for the row-to-resource scan.

use rdfexport_core::{Result, Row, format_value};

/// Identifier value that makes a row use its 1-based ordinal instead.
pub const ORDINAL_MARKER: &str = "@";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Open {
    Nothing,
    Id(String),
    /// A resource opened for a NULL identifier; it absorbs every later row.
    Null,
}

/// Decides, row by row, when a new resource starts.
///
/// Rows are expected to arrive grouped by identifier; a resource ends whenever
/// the identifier differs from the previous row's.
#[derive(Debug)]
pub struct IdentifierRuns {
    open: Open,
    rows: usize,
}

impl Default for IdentifierRuns {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierRuns {
    pub fn new() -> Self {
        Self {
            open: Open::Nothing,
            rows: 0,
        }
    }

    /// Identifier of `row`: the first cell as text, the row ordinal for `@`, `None` for NULL.
    pub fn identifier(&mut self, row: &Row) -> Result<Option<String>> {
        self.rows += 1;
        let cell = row.value(0);
        if cell.is_null() {
            return Ok(None);
        }
        let text = format_value(cell)?;
        if text == ORDINAL_MARKER {
            return Ok(Some(self.rows.to_string()));
        }
        Ok(Some(text))
    }

    /// Record `id` as the current row's identifier. Returns true when it starts a new resource.
    pub fn advance(&mut self, id: Option<&str>) -> bool {
        let starts = match &self.open {
            Open::Nothing => true,
            Open::Id(current) => id != Some(current.as_str()),
            Open::Null => false,
        };
        if starts {
            self.open = match id {
                Some(id) => Open::Id(id.to_string()),
                None => Open::Null,
            };
        }
        starts
    }

    /// Whether any resource has been opened.
    pub fn has_open(&self) -> bool {
        self.open != Open::Nothing
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfexport_core::Value;

    fn ids(runs: &mut IdentifierRuns, cells: &[Value]) -> Vec<Option<String>> {
        cells
            .iter()
            .map(|cell| runs.identifier(&Row::new(vec![cell.clone()])).unwrap())
            .collect()
    }

    #[test]
    fn test_contiguous_runs() {
        let mut runs = IdentifierRuns::new();
        assert!(!runs.has_open());
        let starts: Vec<bool> = ["1", "1", "2", "2", "1"]
            .iter()
            .map(|id| runs.advance(Some(id)))
            .collect();
        assert_eq!(starts, vec![true, false, true, false, true]);
        assert!(runs.has_open());
    }

    #[test]
    fn test_ordinal_marker() {
        let mut runs = IdentifierRuns::new();
        let got = ids(&mut runs, &["@".into(), "@".into(), "x".into()]);
        assert_eq!(
            got,
            vec![Some("1".to_string()), Some("2".to_string()), Some("x".to_string())]
        );
        assert_eq!(runs.rows(), 3);
    }

    #[test]
    fn test_numeric_identifier_is_formatted() {
        let mut runs = IdentifierRuns::new();
        assert_eq!(ids(&mut runs, &[Value::Int(7)]), vec![Some("7".to_string())]);
    }

    #[test]
    fn test_null_identifier_absorbs_following_rows() {
        let mut runs = IdentifierRuns::new();
        assert!(runs.advance(Some("1")));
        assert!(runs.advance(None));
        assert!(!runs.advance(Some("2")));
        assert!(!runs.advance(None));
    }

    #[test]
    fn test_leading_null_identifier() {
        let mut runs = IdentifierRuns::new();
        assert!(runs.advance(None));
        assert!(!runs.advance(Some("1")));
    }
}
