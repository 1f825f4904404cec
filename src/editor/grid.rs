use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Stat, PITCH_COLUMN};

/// Loosely typed editor grid: header names plus rows of JSON cells.
///
/// This is what the editors send and what a session stores. Nothing about it
/// is trusted until it passes `schema::validate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatGrid {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

impl StatGrid {
    /// Header of a fresh editor grid.
    pub fn standard_columns() -> Vec<String> {
        std::iter::once(PITCH_COLUMN)
            .chain(Stat::ALL.iter().map(|s| s.label()))
            .map(str::to_string)
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a header, ignoring surrounding whitespace.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.trim() == name)
    }
}

impl Default for StatGrid {
    fn default() -> Self {
        Self {
            columns: Self::standard_columns(),
            rows: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_grid_has_standard_columns_and_no_rows() {
        let grid = StatGrid::default();
        assert_eq!(
            grid.columns,
            vec!["Pitch", "K%", "Whiff%", "PutAway%", "OBA", "BA", "SLG"]
        );
        assert_eq!(grid.row_count(), 0);
    }

    #[test]
    fn rows_default_to_empty_when_omitted() {
        let grid: StatGrid = serde_json::from_value(json!({ "columns": ["Pitch"] })).unwrap();
        assert!(grid.rows.is_empty());
    }

    #[test]
    fn column_lookup_ignores_padding() {
        let grid = StatGrid {
            columns: vec![" Pitch ".into(), "K%".into()],
            rows: vec![],
        };
        assert_eq!(grid.column_index("Pitch"), Some(0));
        assert_eq!(grid.column_index("SLG"), None);
    }
}
