//! Configuration settings.

use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sheetview_data::LoadOptions;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "sheetview.toml";

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Which worksheet to load and how to trim it
    pub sheet: SheetSettings,
    /// Page presentation
    pub page: PageSettings,
    /// Listen address
    pub server: ServerSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists
    ///
    /// An explicit path must exist. Without one, a missing default file
    /// yields the default settings.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Path::new(DEFAULT_CONFIG_FILE),
            None => return Ok(Self::default()),
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Worksheet source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSettings {
    /// Full sheet URL, `#gid=<ID>` included
    pub url: Option<String>,
    /// Read through the Sheets API with a service account
    pub require_auth: bool,
    /// Leading rows to drop
    pub skip_rows: usize,
    /// Leading columns to drop
    pub skip_cols: usize,
    /// Promote the first remaining row to column labels
    pub has_header: bool,
}

impl Default for SheetSettings {
    fn default() -> Self {
        let defaults = LoadOptions::default();
        Self {
            url: None,
            require_auth: defaults.require_auth,
            skip_rows: defaults.skip_rows,
            skip_cols: defaults.skip_cols,
            has_header: defaults.has_header,
        }
    }
}

impl SheetSettings {
    /// Loader options for these settings
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            require_auth: self.require_auth,
            has_header: self.has_header,
            skip_rows: self.skip_rows,
            skip_cols: self.skip_cols,
        }
    }
}

/// Page settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSettings {
    /// Heading shown above the table
    pub title: String,
    /// Column rendered as row labels in front of the table
    pub row_label_column: Option<String>,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            title: "Sheet".to_string(),
            row_label_column: None,
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    /// Socket address to bind
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("Invalid listen host: {}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
