//! Rectangular table payload.

use serde::{Deserialize, Serialize};

/// A rectangular table of text cells.
///
/// Every row holds exactly `columns` cells; rows built from ragged input are
/// padded with empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    /// Rows of cell text
    pub rows: Vec<Vec<String>>,

    /// Number of columns in every row
    pub columns: usize,
}

impl TableData {
    /// Normalize ragged rows to a rectangle (padded to the widest row).
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(columns, String::new());
                row
            })
            .collect();
        Self { rows, columns }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total number of characters over all cells.
    pub fn total_chars(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .map(|cell| cell.chars().count())
            .sum()
    }

    /// Get a cell by row and column.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_from_rows_pads_short_rows() {
        let table = TableData::from_rows(vec![row(&["A", "B", "C"]), row(&["D"])]);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.rows[1], row(&["D", "", ""]));
    }

    #[test]
    fn test_total_chars_and_cells() {
        let table = TableData::from_rows(vec![row(&["ab", "c"]), row(&["é", ""])]);
        assert_eq!(table.total_chars(), 4);
        assert_eq!(table.cell(1, 0), Some("é"));
        assert_eq!(table.cell(5, 0), None);
        assert_eq!(table.plain_text(), "ab\tc\né\t");
    }

    #[test]
    fn test_empty_table() {
        let table = TableData::from_rows(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 0);
    }
}
