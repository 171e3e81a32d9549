//! Configuration for sheetview.
//!
//! # Configuration File
//!
//! Settings are loaded from `sheetview.toml` in the working directory, or
//! from the file passed with `--config`:
//!
//! ```toml
//! [sheet]
//! url = "https://docs.google.com/spreadsheets/d/<ID>/edit?gid=0#gid=0"
//! require_auth = true
//! skip_rows = 0
//! skip_cols = 0
//! has_header = true
//!
//! [page]
//! title = "Cold Outreach"
//! row_label_column = "Business"
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! ```
//!
//! The service account credential is never read from this file; it comes
//! from the `SERVICE_ACCOUNT_JSON` environment variable.

mod settings;

#[cfg(test)]
mod tests;

pub use settings::{PageSettings, ServerSettings, Settings, SheetSettings, DEFAULT_CONFIG_FILE};
