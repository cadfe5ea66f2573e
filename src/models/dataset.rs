use serde::{Deserialize, Serialize};

/// A parsed sheet handed over by the upload layer: a header row plus data
/// rows. Missing cells are `None`; short rows read as missing past their end.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Dataset { columns, rows }
    }

    /// Index of the column whose header equals `name` (surrounding whitespace ignored).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.columns.iter().position(|c| c.trim() == name)
    }

    /// Cell text, treating blank cells the same as missing ones.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
            .filter(|c| !c.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct non-empty values of a column, in first-seen order.
    pub fn distinct_values(&self, column: usize) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        (0..self.rows.len())
            .filter_map(|row| self.cell(row, column))
            .map(|v| v.trim().to_string())
            .filter(|v| seen.insert(v.clone()))
            .collect()
    }
}
