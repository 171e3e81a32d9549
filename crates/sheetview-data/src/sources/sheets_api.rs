//! Authenticated Google Sheets API source.
//!
//! Reads a worksheet through the Sheets v4 REST API using a service
//! account. The sheet must be shared with the account's e-mail.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::credentials::ServiceAccount;
use crate::error::{DataError, Result};
use crate::reference::SheetReference;
use crate::sources::csv::USER_AGENT;
use crate::sources::{fill_gaps, GridSource, RawGrid};

/// Default Sheets API endpoint
pub const DEFAULT_SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Metadata of one worksheet (tab) of a spreadsheet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetInfo {
    /// Numeric id, the `gid` of the URL
    pub sheet_id: i64,
    /// Tab title
    pub title: String,
    /// Position among the tabs
    #[serde(default)]
    pub index: i64,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: WorksheetInfo,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Worksheet source backed by the Sheets API
#[derive(Debug, Clone)]
pub struct SheetsApiSource {
    client: Client,
    credentials: ServiceAccount,
    api_base: String,
}

impl SheetsApiSource {
    /// Create a source for the given service account
    pub fn new(credentials: ServiceAccount) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            credentials,
            api_base: DEFAULT_SHEETS_API.to_string(),
        })
    }

    /// Create a source with the credential from `SERVICE_ACCOUNT_JSON`
    pub fn from_env() -> Result<Self> {
        Self::new(ServiceAccount::from_env()?)
    }

    /// Use a different API endpoint
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the API endpoint
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// List the worksheets of the referenced spreadsheet
    pub fn list_worksheets(
        &self,
        reference: &SheetReference,
        token: &str,
    ) -> Result<Vec<WorksheetInfo>> {
        let mut url = self.spreadsheet_url(reference.spreadsheet_key(), &[])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(sheetId,title,index)");

        let metadata: SpreadsheetMetadata = self.get_json(url, token)?;
        Ok(metadata.sheets.into_iter().map(|s| s.properties).collect())
    }

    /// Read every cell value of a worksheet
    fn read_values(&self, key: &str, title: &str, token: &str) -> Result<RawGrid> {
        let range = quote_title(title);
        let url = self.spreadsheet_url(key, &["values", range.as_str()])?;

        let values: ValueRange = self.get_json(url, token)?;
        Ok(values_to_grid(values.values))
    }

    fn spreadsheet_url(&self, key: &str, tail: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| DataError::FetchFailed(format!("{}: {}", self.api_base, e)))?;

        url.path_segments_mut()
            .map_err(|_| DataError::FetchFailed(format!("{} cannot be a base", self.api_base)))?
            .push(key)
            .extend(tail);

        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url, token: &str) -> Result<T> {
        debug!(%url, "Sheets API request");
        let response = self.client.get(url.clone()).bearer_auth(token).send()?;

        if let Some(err) = status_error(response.status(), &url) {
            return Err(err);
        }

        response
            .json()
            .map_err(|e| DataError::FetchFailed(format!("Malformed response from {}: {}", url, e)))
    }
}

impl GridSource for SheetsApiSource {
    fn load_grid(&self, reference: &SheetReference) -> Result<RawGrid> {
        let token = self.credentials.fetch_access_token(&self.client)?;

        let worksheets = self.list_worksheets(reference, &token)?;
        let worksheet = find_worksheet(&worksheets, reference.tab_id())?;
        info!(
            title = %worksheet.title,
            sheet_id = worksheet.sheet_id,
            "reading worksheet"
        );

        self.read_values(reference.spreadsheet_key(), &worksheet.title, &token)
    }

    fn name(&self) -> &'static str {
        "sheets-api"
    }
}

/// Find the worksheet whose numeric id equals `tab_id`
///
/// # Errors
/// `NotFound` if `tab_id` is not a number or no worksheet carries it
pub fn find_worksheet<'a>(
    worksheets: &'a [WorksheetInfo],
    tab_id: &str,
) -> Result<&'a WorksheetInfo> {
    let id: i64 = tab_id
        .parse()
        .map_err(|_| DataError::NotFound(format!("Worksheet id '{}' is not numeric", tab_id)))?;

    worksheets
        .iter()
        .find(|w| w.sheet_id == id)
        .ok_or_else(|| DataError::NotFound(format!("Worksheet with id {} not found", id)))
}

/// Quote a tab title for use as an A1 range covering the whole sheet
fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Map an unsuccessful API status to the matching error
fn status_error(status: StatusCode, url: &Url) -> Option<DataError> {
    match status {
        s if s.is_success() => None,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Some(DataError::AuthFailed(format!(
            "{} returned {}",
            url, status
        ))),
        StatusCode::NOT_FOUND => Some(DataError::NotFound(format!("{} returned {}", url, status))),
        _ => Some(DataError::FetchFailed(format!("{} returned {}", url, status))),
    }
}

/// Convert API values to strings and square them up
fn values_to_grid(values: Vec<Vec<Value>>) -> RawGrid {
    let grid = values
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect();

    fill_gaps(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worksheets() -> Vec<WorksheetInfo> {
        let json = r#"{
            "sheets": [
                {"properties": {"sheetId": 0, "title": "Leads", "index": 0}},
                {"properties": {"sheetId": 2044031673, "title": "Bob's list", "index": 1}}
            ]
        }"#;
        let metadata: SpreadsheetMetadata = serde_json::from_str(json).unwrap();
        metadata.sheets.into_iter().map(|s| s.properties).collect()
    }

    #[test]
    fn test_metadata_parsing() {
        let sheets = worksheets();

        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[1].sheet_id, 2044031673);
        assert_eq!(sheets[1].title, "Bob's list");
    }

    #[test]
    fn test_find_worksheet() {
        let sheets = worksheets();

        assert_eq!(find_worksheet(&sheets, "0").unwrap().title, "Leads");
        assert_eq!(find_worksheet(&sheets, "2044031673").unwrap().index, 1);
    }

    #[test]
    fn test_find_worksheet_missing() {
        let sheets = worksheets();

        assert!(matches!(find_worksheet(&sheets, "42"), Err(DataError::NotFound(_))));
        assert!(matches!(find_worksheet(&sheets, "abc"), Err(DataError::NotFound(_))));
    }

    #[test]
    fn test_quote_title() {
        assert_eq!(quote_title("Leads"), "'Leads'");
        assert_eq!(quote_title("Bob's list"), "'Bob''s list'");
    }

    #[test]
    fn test_values_to_grid() {
        let json = r#"{"range": "Leads!A1:C3", "values": [["Business", "Score", "Open"], ["Acme", 3, true], ["Globex"]]}"#;
        let values: ValueRange = serde_json::from_str(json).unwrap();
        let grid = values_to_grid(values.values);

        assert_eq!(grid[0], vec!["Business", "Score", "Open"]);
        assert_eq!(grid[1], vec!["Acme", "3", "true"]);
        assert_eq!(grid[2], vec!["Globex", "", ""]);
    }

    #[test]
    fn test_empty_value_range() {
        let values: ValueRange = serde_json::from_str(r#"{"range": "Leads!A1:Z1000"}"#).unwrap();
        assert!(values_to_grid(values.values).is_empty());
    }

    #[test]
    fn test_status_error() {
        let url = Url::parse("https://sheets.googleapis.com/v4/spreadsheets/abc").unwrap();

        assert!(status_error(StatusCode::OK, &url).is_none());
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, &url),
            Some(DataError::AuthFailed(_))
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, &url),
            Some(DataError::NotFound(_))
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, &url),
            Some(DataError::FetchFailed(_))
        ));
    }

    #[test]
    fn test_spreadsheet_url_encodes_range() {
        let account = ServiceAccount {
            client_email: "reader@demo.iam.gserviceaccount.com".to_string(),
            private_key: String::new(),
            private_key_id: None,
            token_uri: crate::credentials::DEFAULT_TOKEN_URI.to_string(),
        };
        let source = SheetsApiSource::new(account)
            .unwrap()
            .with_api_base("https://sheets.example.test/v4/spreadsheets/");
        assert_eq!(source.api_base(), "https://sheets.example.test/v4/spreadsheets");

        let url = source
            .spreadsheet_url("KEY", &["values", quote_title("My Tab").as_str()])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.example.test/v4/spreadsheets/KEY/values/'My%20Tab'"
        );
    }
}
