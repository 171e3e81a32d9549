//! Service account credentials and OAuth token exchange.
//!
//! The credential is the JSON key file of a Google Cloud service account,
//! passed whole through the `SERVICE_ACCOUNT_JSON` environment variable.
//! It is turned into a short-lived access token with the JWT bearer grant.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DataError, Result};

/// Environment variable holding the service account JSON
pub const SERVICE_ACCOUNT_ENV: &str = "SERVICE_ACCOUNT_JSON";

/// Token endpoint used when the key file does not name one
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// OAuth scopes requested for the access token
pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime in seconds (the maximum Google accepts)
const ASSERTION_LIFETIME: u64 = 3600;

/// Service account key, as found in the downloaded JSON key file
#[derive(Clone, Deserialize)]
pub struct ServiceAccount {
    /// Account e-mail, used as the JWT issuer
    pub client_email: String,
    /// PEM encoded RSA private key
    pub private_key: String,
    /// Key id, sent as the JWT `kid` header
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// Token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Claims of the signed assertion sent to the token endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ServiceAccount {
    /// Read the credential from [`SERVICE_ACCOUNT_ENV`]
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(SERVICE_ACCOUNT_ENV)
    }

    /// Read the credential from the named environment variable
    pub fn from_env_var(name: &str) -> Result<Self> {
        let json = std::env::var(name)
            .map_err(|_| DataError::AuthFailed(format!("{} is not set", name)))?;
        Self::from_json(&json)
    }

    /// Parse a service account key file
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| DataError::AuthFailed(format!("Invalid service account JSON: {}", e)))
    }

    /// Claims for an assertion issued at `issued_at` (seconds since epoch)
    pub(crate) fn claims(&self, issued_at: u64) -> Claims {
        Claims {
            iss: self.client_email.clone(),
            scope: SCOPES.join(" "),
            aud: self.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME,
        }
    }

    /// Sign an RS256 assertion with the account's private key
    pub fn assertion(&self, issued_at: u64) -> Result<String> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| DataError::AuthFailed(format!("Invalid private key: {}", e)))?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        encode(&header, &self.claims(issued_at), &key)
            .map_err(|e| DataError::AuthFailed(format!("Cannot sign assertion: {}", e)))
    }

    /// Exchange a fresh assertion for an access token
    pub fn fetch_access_token(&self, client: &Client) -> Result<String> {
        let assertion = self.assertion(now())?;
        debug!(email = %self.client_email, token_uri = %self.token_uri, "requesting access token");

        let response = client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DataError::AuthFailed(format!(
                "Token exchange failed ({}): {}",
                status, message
            )));
        }

        let token: TokenResponse = response
            .json()
            .map_err(|e| DataError::AuthFailed(format!("Malformed token response: {}", e)))?;

        Ok(token.access_token)
    }
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
