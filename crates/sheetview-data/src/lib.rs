//! # sheetview-data
//!
//! Load a Google Sheets worksheet and turn it into a plain table of
//! strings, ready for rendering.
//!
//! ## Features
//!
//! - **URL validation**: accepts `https://docs.google.com/spreadsheets/d/<KEY>/edit#gid=<GID>`
//! - **Two loaders**: the public CSV export, or the Sheets API with a service account
//! - **Trimming**: skip leading rows/columns and promote a header row
//!
//! ## Example
//!
//! ```rust,no_run
//! use sheetview_data::{DataEngine, LoadOptions};
//!
//! let url = "https://docs.google.com/spreadsheets/d/KEY/edit?gid=0#gid=0";
//! let options = LoadOptions {
//!     require_auth: false,
//!     ..Default::default()
//! };
//! let table = DataEngine::load_table(url, &options)?;
//! println!("{} rows", table.row_count());
//! # Ok::<(), sheetview_data::DataError>(())
//! ```

pub mod credentials;
pub mod error;
pub mod reference;
pub mod sources;
pub mod trim;

// Re-exports
pub use credentials::ServiceAccount;
pub use error::{DataError, Result};
pub use reference::{extract_tab_id, validate_url, SheetReference};
pub use sources::{CsvExportSource, GridSource, RawGrid, SheetsApiSource, WorksheetInfo};
pub use trim::{trim, NormalizedTable};

use tracing::info;

/// How a worksheet is loaded and trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Use the Sheets API with a service account instead of the CSV export
    pub require_auth: bool,
    /// Promote the first remaining row to column labels
    pub has_header: bool,
    /// Leading rows to drop
    pub skip_rows: usize,
    /// Leading columns to drop
    pub skip_cols: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            require_auth: true,
            has_header: true,
            skip_rows: 0,
            skip_cols: 0,
        }
    }
}

/// Data engine tying resolver, loaders and trimmer together
pub struct DataEngine;

impl DataEngine {
    /// Validate `url`, fetch its worksheet and trim it
    ///
    /// The loader is picked by `options.require_auth`; there is no
    /// fallback from one loader to the other.
    pub fn load_table(url: &str, options: &LoadOptions) -> Result<NormalizedTable> {
        let reference = SheetReference::parse(url)?;

        let source: Box<dyn GridSource> = if options.require_auth {
            Box::new(SheetsApiSource::from_env()?)
        } else {
            Box::new(CsvExportSource::new()?)
        };

        Self::load_from(source.as_ref(), &reference, options)
    }

    /// Fetch and trim the referenced worksheet from a given source
    pub fn load_from(
        source: &dyn GridSource,
        reference: &SheetReference,
        options: &LoadOptions,
    ) -> Result<NormalizedTable> {
        info!(
            source = source.name(),
            tab_id = reference.tab_id(),
            "loading worksheet"
        );

        let grid = source.load_grid(reference)?;
        let table = trim(grid, options.skip_rows, options.skip_cols, options.has_header)?;

        info!(
            rows = table.row_count(),
            columns = table.col_count(),
            "worksheet ready"
        );
        Ok(table)
    }
}
