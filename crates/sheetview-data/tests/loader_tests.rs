//! Loader tests against a local mock server
//!
//! Both loaders are pointed at `mockito` instead of Google: the CSV source
//! through its export base, the API source through its API base and the
//! token URI of the service account.

use mockito::{Matcher, Server};
use reqwest::blocking::Client;
use sheetview_data::{
    CsvExportSource, DataError, GridSource, ServiceAccount, SheetReference, SheetsApiSource,
};

const SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/KEY/edit?gid=0#gid=0";
const EXPORT_PATH: &str = "/spreadsheets/d/KEY/export";
const TEST_KEY: &str = include_str!("fixtures/test_key.pem");

const METADATA: &str = r#"{
    "sheets": [
        {"properties": {"sheetId": 0, "title": "Leads", "index": 0}},
        {"properties": {"sheetId": 7, "title": "Archive", "index": 1}}
    ]
}"#;

fn reference(url: &str) -> SheetReference {
    SheetReference::parse(url).expect("Failed to parse reference")
}

fn csv_source(server: &Server) -> CsvExportSource {
    CsvExportSource::with_client(Client::new()).with_export_base(server.url())
}

fn api_source(server: &Server) -> SheetsApiSource {
    let account = ServiceAccount {
        client_email: "reader@demo.iam.gserviceaccount.com".to_string(),
        private_key: TEST_KEY.to_string(),
        private_key_id: Some("test-key".to_string()),
        token_uri: format!("{}/token", server.url()),
    };

    SheetsApiSource::new(account)
        .expect("Failed to build source")
        .with_api_base(format!("{}/v4/spreadsheets", server.url()))
}

fn mock_token(server: &mut Server) -> mockito::Mock {
    server
        .mock("POST", "/token")
        .match_body(Matcher::UrlEncoded(
            "grant_type".into(),
            "urn:ietf:params:oauth:grant-type:jwt-bearer".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "test-token", "expires_in": 3599, "token_type": "Bearer"}"#)
        .create()
}

fn mock_metadata(server: &mut Server, status: usize, body: &str) -> mockito::Mock {
    server
        .mock("GET", "/v4/spreadsheets/KEY")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer test-token")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
}

#[test]
fn test_csv_export_load() {
    let mut server = Server::new();
    let export = server
        .mock("GET", EXPORT_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("gid".into(), "0".into()),
            Matcher::UrlEncoded("format".into(), "csv".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/csv")
        .with_body("Business,Status\nAcme,Called\nGlobex\n")
        .expect(1)
        .create();

    let grid = csv_source(&server)
        .load_grid(&reference(SHEET_URL))
        .expect("Failed to load grid");

    export.assert();
    assert_eq!(grid.len(), 3);
    assert_eq!(grid[2], vec!["Globex", ""]);
}

#[test]
fn test_csv_export_error_status() {
    let mut server = Server::new();
    let _export = server
        .mock("GET", EXPORT_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .create();

    let err = csv_source(&server)
        .load_grid(&reference(SHEET_URL))
        .unwrap_err();

    assert!(matches!(err, DataError::FetchFailed(_)));
    assert!(err.to_string().contains("500"));
}

#[test]
fn test_csv_export_sign_in_page() {
    let mut server = Server::new();
    let _export = server
        .mock("GET", EXPORT_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body("<!DOCTYPE html><html><body>Sign in</body></html>")
        .create();

    let err = csv_source(&server)
        .load_grid(&reference(SHEET_URL))
        .unwrap_err();

    assert!(matches!(err, DataError::FetchFailed(_)));
    assert!(err.to_string().contains("HTML"));
}

#[test]
fn test_access_token_exchange() {
    let mut server = Server::new();
    let token = mock_token(&mut server);

    let account = ServiceAccount {
        client_email: "reader@demo.iam.gserviceaccount.com".to_string(),
        private_key: TEST_KEY.to_string(),
        private_key_id: None,
        token_uri: format!("{}/token", server.url()),
    };
    let access_token = account
        .fetch_access_token(&Client::new())
        .expect("Failed to fetch token");

    token.assert();
    assert_eq!(access_token, "test-token");
}

#[test]
fn test_api_load() {
    let mut server = Server::new();
    let token = mock_token(&mut server);
    let metadata = mock_metadata(&mut server, 200, METADATA);
    let values = server
        .mock(
            "GET",
            Matcher::Regex(r"^/v4/spreadsheets/KEY/values/('|%27)Leads('|%27)$".to_string()),
        )
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"range": "Leads!A1:C3", "values": [["Business", "Score"], ["Acme", 3], ["Globex"]]}"#,
        )
        .expect(1)
        .create();

    let grid = api_source(&server)
        .load_grid(&reference(SHEET_URL))
        .expect("Failed to load grid");

    token.assert();
    metadata.assert();
    values.assert();
    assert_eq!(grid[0], vec!["Business", "Score"]);
    assert_eq!(grid[1], vec!["Acme", "3"]);
    assert_eq!(grid[2], vec!["Globex", ""]);
}

#[test]
fn test_api_token_rejected() {
    let mut server = Server::new();
    let _token = server
        .mock("POST", "/token")
        .with_status(400)
        .with_body(r#"{"error": "invalid_grant"}"#)
        .create();

    let err = api_source(&server)
        .load_grid(&reference(SHEET_URL))
        .unwrap_err();

    assert!(matches!(err, DataError::AuthFailed(_)));
    assert!(err.to_string().contains("invalid_grant"));
}

#[test]
fn test_api_forbidden() {
    let mut server = Server::new();
    let _token = mock_token(&mut server);
    let _metadata = mock_metadata(&mut server, 403, r#"{"error": {"code": 403}}"#);

    let err = api_source(&server)
        .load_grid(&reference(SHEET_URL))
        .unwrap_err();

    assert!(matches!(err, DataError::AuthFailed(_)));
}

#[test]
fn test_api_spreadsheet_not_found() {
    let mut server = Server::new();
    let _token = mock_token(&mut server);
    let _metadata = mock_metadata(&mut server, 404, r#"{"error": {"code": 404}}"#);

    let err = api_source(&server)
        .load_grid(&reference(SHEET_URL))
        .unwrap_err();

    assert!(matches!(err, DataError::NotFound(_)));
}

#[test]
fn test_api_unknown_worksheet() {
    let mut server = Server::new();
    let _token = mock_token(&mut server);
    let _metadata = mock_metadata(&mut server, 200, METADATA);

    let url = "https://docs.google.com/spreadsheets/d/KEY/edit#gid=42";
    let err = api_source(&server).load_grid(&reference(url)).unwrap_err();

    assert!(matches!(err, DataError::NotFound(_)));
    assert!(err.to_string().contains("42"));
}
