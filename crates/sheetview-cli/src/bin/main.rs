//! sheetview binary entry point
//!
//! This is a thin wrapper that sets up logging and calls the library's
//! `run_cli()` function.
//!
//! ```bash
//! # With debug logging
//! RUST_LOG=debug sheetview serve
//! ```

use anyhow::Result;
use sheetview_cli::{log_filter, run_cli};

fn main() -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    run_cli()
}
