//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sheetview_data::DataEngine;

use crate::config::Settings;
use crate::render::TablePage;
use crate::server;

#[derive(Parser)]
#[command(name = "sheetview")]
#[command(author, version, about = "Serve a Google Sheets worksheet as an HTML table", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the worksheet and serve it over HTTP
    Serve {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Bind address (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Load the worksheet and write the HTML page to a file
    Export {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Output HTML file
        #[arg(short, long, default_value = "sheet.html")]
        output: PathBuf,
    },
}

/// Options shared by every command that loads a worksheet
#[derive(Debug, Default, Args)]
pub struct SheetArgs {
    /// Configuration file path (defaults to ./sheetview.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Sheet URL including `#gid=<ID>` (overrides the config file)
    #[arg(long)]
    pub url: Option<String>,

    /// Use the public CSV export instead of the Sheets API
    #[arg(long)]
    pub no_auth: bool,
}

impl SheetArgs {
    /// Load the configuration file and apply the command-line overrides
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;

        if let Some(url) = &self.url {
            settings.sheet.url = Some(url.clone());
        }
        if self.no_auth {
            settings.sheet.require_auth = false;
        }

        Ok(settings)
    }
}

/// Log filter for the given `RUST_LOG` value, `info` when unset or invalid
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { sheet, host, port } => {
            let mut settings = sheet.settings()?;
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            serve_command(&settings)?;
        }
        Commands::Export { sheet, output } => {
            export_command(&sheet.settings()?, &output)?;
        }
    }

    Ok(())
}

/// Load the configured worksheet and build its page
///
/// This is the whole startup preparation: any failure here is fatal.
pub fn prepare_page(settings: &Settings) -> Result<TablePage> {
    let url = settings.sheet.url.as_deref().context(
        "No sheet URL configured: set `url` under [sheet] in sheetview.toml or pass --url",
    )?;

    let table = DataEngine::load_table(url, &settings.sheet.load_options())
        .with_context(|| format!("Failed to load worksheet: {}", url))?;

    TablePage::new(
        table,
        settings.page.title.clone(),
        settings.page.row_label_column.as_deref(),
    )
}

/// Execute the serve command
///
/// The worksheet is loaded synchronously before the async runtime starts.
pub fn serve_command(settings: &Settings) -> Result<()> {
    let addr = settings.server.socket_addr()?;
    let page = Arc::new(prepare_page(settings)?);
    info!(
        title = page.title(),
        rows = page.table().row_count(),
        "page ready"
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(server::serve(page, addr))
}

/// Execute the export command
pub fn export_command(settings: &Settings, output: &Path) -> Result<()> {
    let page = prepare_page(settings)?;

    fs::write(output, page.to_html())
        .with_context(|| format!("Failed to write HTML file: {}", output.display()))?;
    println!("  Created: {}", output.display());
    println!(
        "  {} rows, {} columns",
        page.table().row_count(),
        page.table().col_count()
    );

    Ok(())
}
