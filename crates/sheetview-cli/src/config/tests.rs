//! Tests for configuration loading.

use super::*;

use std::fs;

use tempfile::TempDir;

mod parsing_tests {
    use super::*;

    #[test]
    fn test_load_config_from_toml() {
        let toml = r#"
[sheet]
url = "https://docs.google.com/spreadsheets/d/abc/edit#gid=0"
require_auth = false
skip_rows = 2
has_header = false

[page]
title = "Cold Outreach"
row_label_column = "Business"

[server]
host = "127.0.0.1"
port = 3000
"#;

        let settings = Settings::from_toml_str(toml).unwrap();

        assert_eq!(
            settings.sheet.url.as_deref(),
            Some("https://docs.google.com/spreadsheets/d/abc/edit#gid=0")
        );
        assert!(!settings.sheet.require_auth);
        assert_eq!(settings.sheet.skip_rows, 2);
        assert_eq!(settings.sheet.skip_cols, 0);
        assert!(!settings.sheet.has_header);
        assert_eq!(settings.page.title, "Cold Outreach");
        assert_eq!(settings.page.row_label_column.as_deref(), Some("Business"));
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert!(settings.sheet.url.is_none());
        assert!(settings.sheet.require_auth);
        assert!(settings.sheet.has_header);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let settings = Settings::from_toml_str("[server]\nport = 9000\n").unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert!(settings.sheet.require_auth);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Settings::from_toml_str("[sheet\nurl = 1").is_err());
        assert!(Settings::from_toml_str("[sheet]\nskip_rows = -1\n").is_err());
    }
}

mod server_tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let addr = ServerSettings::default().socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_invalid_host() {
        let server = ServerSettings {
            host: "localhost:80".to_string(),
            port: 1,
        };
        assert!(server.socket_addr().is_err());
    }
}

mod file_tests {
    use super::*;

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[page]\ntitle = \"Leads\"\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.page.title, "Leads");
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Settings::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
