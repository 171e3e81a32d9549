//! sheetview CLI - serve a Google Sheets worksheet as an HTML table
//!
//! This library provides the pieces of the `sheetview` binary:
//! - Config: `sheetview.toml` settings
//! - Render: turn a loaded worksheet into an HTML page
//! - Server: expose the page over HTTP
//!
//! # Binary Usage
//!
//! ```bash
//! # Serve a public sheet on 0.0.0.0:8080
//! sheetview serve --no-auth --url 'https://docs.google.com/spreadsheets/d/<ID>/edit#gid=0'
//!
//! # Serve a private sheet shared with a service account
//! SERVICE_ACCOUNT_JSON="$(cat key.json)" sheetview serve --config sheetview.toml
//!
//! # Write the page to a file instead
//! sheetview export --output leads.html
//! ```

pub mod app;
pub mod config;
pub mod render;
pub mod server;

// Re-export main entry point and types
pub use app::{export_command, log_filter, prepare_page, run_cli, serve_command, SheetArgs};
pub use config::Settings;
pub use render::TablePage;
