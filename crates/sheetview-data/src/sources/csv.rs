//! Public CSV export source.
//!
//! Works for sheets shared as "anyone with the link". The export endpoint
//! sits next to the edit URL: `.../d/<KEY>/export?gid=<GID>&format=csv`.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};
use url::Url;

use crate::error::{DataError, Result};
use crate::reference::SheetReference;
use crate::sources::{fill_gaps, GridSource, RawGrid};

/// User agent sent with every request
pub(crate) const USER_AGENT: &str = concat!("sheetview/", env!("CARGO_PKG_VERSION"));

/// Unauthenticated worksheet source using the CSV export endpoint
#[derive(Debug, Clone)]
pub struct CsvExportSource {
    client: Client,
    export_base: Option<String>,
}

impl CsvExportSource {
    /// Create a source with a default blocking HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client))
    }

    /// Create a source reusing an existing HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            export_base: None,
        }
    }

    /// Send export requests to another host, keeping the export path
    pub fn with_export_base(mut self, base: impl Into<String>) -> Self {
        self.export_base = Some(base.into());
        self
    }

    /// Build the export URL for the referenced worksheet
    ///
    /// The export path is resolved relative to the edit URL, so `/edit` is
    /// replaced and the original query and fragment are dropped.
    pub fn export_url(reference: &SheetReference) -> Result<Url> {
        let relative = format!("export?gid={}&format=csv", reference.tab_id());
        reference
            .url()
            .join(&relative)
            .map_err(|e| DataError::FetchFailed(format!("Cannot build export URL: {}", e)))
    }

    fn request_url(&self, reference: &SheetReference) -> Result<Url> {
        let export = Self::export_url(reference)?;
        let Some(base) = &self.export_base else {
            return Ok(export);
        };

        let mut url = Url::parse(base)
            .and_then(|b| b.join(export.path()))
            .map_err(|e| DataError::FetchFailed(format!("{}: {}", base, e)))?;
        url.set_query(export.query());
        Ok(url)
    }

    /// Parse CSV text into a grid with no header interpretation
    pub fn parse_csv(text: &str) -> Result<RawGrid> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::None)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut result = Vec::new();

        for record in reader.records() {
            let record = record?;
            let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            result.push(row);
        }

        Ok(fill_gaps(result))
    }
}

impl GridSource for CsvExportSource {
    fn load_grid(&self, reference: &SheetReference) -> Result<RawGrid> {
        let url = self.request_url(reference)?;
        debug!(%url, "fetching CSV export");

        let response = self.client.get(url.clone()).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::FetchFailed(format!("{} returned {}", url, status)));
        }

        // Private sheets redirect to a sign-in page instead of failing
        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/html"));
        if is_html {
            warn!(%url, "export returned HTML, the sheet is probably not shared publicly");
            return Err(DataError::FetchFailed(format!(
                "{} returned an HTML page instead of CSV",
                url
            )));
        }

        let body = response.text()?;
        let grid = Self::parse_csv(&body)?;
        debug!(rows = grid.len(), "parsed CSV export");

        Ok(grid)
    }

    fn name(&self) -> &'static str {
        "csv-export"
    }
}
