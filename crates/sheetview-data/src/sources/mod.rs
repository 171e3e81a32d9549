//! Worksheet sources.
//!
//! This module contains the two ways of fetching a worksheet grid: the
//! public CSV export and the authenticated Sheets API.

pub mod csv;
pub mod sheets_api;

pub use csv::CsvExportSource;
pub use sheets_api::{SheetsApiSource, WorksheetInfo};

use crate::error::Result;
use crate::reference::SheetReference;

/// Rows of string cells as read from the sheet, without header semantics
pub type RawGrid = Vec<Vec<String>>;

/// Trait for sources that can provide a worksheet grid
pub trait GridSource {
    /// Fetch every cell of the referenced worksheet
    ///
    /// The returned grid is rectangular: short rows are padded with
    /// empty strings to the widest row.
    fn load_grid(&self, reference: &SheetReference) -> Result<RawGrid>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Pad every row to the width of the widest one
pub(crate) fn fill_gaps(mut grid: RawGrid) -> RawGrid {
    let width = grid.iter().map(|row| row.len()).max().unwrap_or(0);
    for row in &mut grid {
        row.resize(width, String::new());
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_gaps() {
        let grid = vec![
            vec!["a".to_string()],
            vec!["b".to_string(), "c".to_string(), "d".to_string()],
            vec![],
        ];
        let filled = fill_gaps(grid);

        assert!(filled.iter().all(|row| row.len() == 3));
        assert_eq!(filled[0], vec!["a", "", ""]);
        assert_eq!(filled[2], vec!["", "", ""]);
    }

    #[test]
    fn test_fill_gaps_empty() {
        assert!(fill_gaps(Vec::new()).is_empty());
    }
}
