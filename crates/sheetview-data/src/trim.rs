//! Grid trimming and header promotion.

use crate::error::{DataError, Result};
use crate::sources::RawGrid;

/// A trimmed worksheet: ordered column labels plus ordered rows
///
/// Labels are not required to be unique or non-empty; duplicates from the
/// sheet are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedTable {
    /// Column labels, one per column
    pub columns: Vec<String>,
    /// Data rows, each as wide as `columns`
    pub rows: Vec<Vec<String>>,
}

impl NormalizedTable {
    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    /// Index of the first column labelled `label`
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }
}

/// Drop leading rows and columns, then optionally promote a header row
///
/// # Arguments
/// * `grid` - Rectangular raw grid
/// * `skip_rows` - Leading rows to drop
/// * `skip_cols` - Leading columns to drop
/// * `has_header` - Promote the first remaining row to column labels
///
/// Without a header, labels are the original column positions, so the
/// first label after `skip_cols = 2` is `"2"`.
///
/// # Errors
/// * `OutOfRange` - a skip count exceeds the grid
/// * `TrimFailed` - no row is left to promote to a header
pub fn trim(
    grid: RawGrid,
    skip_rows: usize,
    skip_cols: usize,
    has_header: bool,
) -> Result<NormalizedTable> {
    let width = grid.iter().map(|row| row.len()).max().unwrap_or(0);

    if grid.len() < skip_rows {
        return Err(DataError::OutOfRange(
            "skip_rows is greater than the number of rows in the dataframe.".to_string(),
        ));
    }
    if width < skip_cols {
        return Err(DataError::OutOfRange(
            "skip_cols is greater than the number of columns in the dataframe.".to_string(),
        ));
    }

    let mut rows = grid
        .into_iter()
        .skip(skip_rows)
        .map(|row| slice_row(row, skip_cols, width));

    let columns = if has_header {
        rows.next().ok_or_else(|| {
            DataError::TrimFailed(format!(
                "no header row left after skipping {} rows (skip_rows={}, skip_cols={}, has_header={})",
                skip_rows, skip_rows, skip_cols, has_header
            ))
        })?
    } else {
        (skip_cols..width).map(|i| i.to_string()).collect()
    };

    Ok(NormalizedTable {
        columns,
        rows: rows.collect(),
    })
}

fn slice_row(row: Vec<String>, skip_cols: usize, width: usize) -> Vec<String> {
    let mut cells: Vec<String> = row.into_iter().skip(skip_cols).collect();
    cells.resize(width - skip_cols, String::new());
    cells
}
