//! Spreadsheet URL validation and worksheet (`gid`) extraction.
//!
//! A usable reference looks like
//! `https://docs.google.com/spreadsheets/d/<KEY>/edit?gid=0#gid=<GID>`.
//! The `gid` in the fragment selects the worksheet to load.

use url::Url;

use crate::error::{DataError, Result};

/// Required host suffix
pub const SHEETS_HOST_SUFFIX: &str = "google.com";

/// Required path prefix, followed by the spreadsheet key
pub const SHEETS_PATH_PREFIX: &str = "/spreadsheets/d/";

/// Required path suffix
pub const SHEETS_PATH_SUFFIX: &str = "/edit";

/// Fragment parameter naming the worksheet
pub const TAB_ID_PARAM: &str = "gid";

/// A validated spreadsheet URL plus the worksheet it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetReference {
    url: Url,
    tab_id: String,
}

impl SheetReference {
    /// Validate `url` and extract its tab identifier
    pub fn parse(url: &str) -> Result<Self> {
        validate_url(url)?;
        let tab_id = extract_tab_id(url)?;
        let url = parse(url)?;

        Ok(Self { url, tab_id })
    }

    /// The full spreadsheet URL as given
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The worksheet identifier from the fragment
    pub fn tab_id(&self) -> &str {
        &self.tab_id
    }

    /// The document key between `/spreadsheets/d/` and `/edit`
    pub fn spreadsheet_key(&self) -> &str {
        let path = self.url.path();
        let rest = &path[SHEETS_PATH_PREFIX.len()..];
        rest.split('/').next().unwrap_or_default()
    }
}

fn parse(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| DataError::InvalidFormat(format!("{}: {}", url, e)))
}

/// Check that `url` is a Google Sheets edit URL with a `gid` fragment
///
/// # Errors
/// * `InvalidFormat` - wrong scheme, host or path shape, or not a URL at all
/// * `MissingTabId` - no non-empty `gid` parameter in the fragment
pub fn validate_url(url: &str) -> Result<()> {
    let parsed = parse(url)?;
    let host = parsed.host_str().unwrap_or_default();
    let path = parsed.path();

    if parsed.scheme() != "https"
        || !host.ends_with(SHEETS_HOST_SUFFIX)
        || !path.starts_with(SHEETS_PATH_PREFIX)
        || !path.ends_with(SHEETS_PATH_SUFFIX)
    {
        return Err(DataError::InvalidFormat(url.to_string()));
    }

    if first_tab_id(&parsed).is_none() {
        return Err(DataError::MissingTabId(url.to_string()));
    }

    Ok(())
}

/// Return the first non-empty `gid` value of the URL fragment
///
/// Meant to be called after [`validate_url`]; a URL without a `gid`
/// yields `MissingTabId` instead of panicking.
pub fn extract_tab_id(url: &str) -> Result<String> {
    let parsed = parse(url)?;
    first_tab_id(&parsed).ok_or_else(|| DataError::MissingTabId(url.to_string()))
}

fn first_tab_id(url: &Url) -> Option<String> {
    let fragment = url.fragment()?;

    // Blank values are dropped, as a query-string parser would do
    url::form_urlencoded::parse(fragment.as_bytes())
        .find(|(key, value)| key == TAB_ID_PARAM && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}
