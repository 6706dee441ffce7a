//! Client configuration loaded via OrthoConfig.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use pagination::MAX_PAGE_SIZE;
use serde::Deserialize;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api/";

fn default_token_path() -> PathBuf {
    PathBuf::from(".dashboard").join("session.json")
}

/// Configuration values for the API client and the stored session.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DASHBOARD")]
pub struct DashboardSettings {
    /// Base URL every API path is resolved against.
    pub api_base_url: Option<String>,
    /// File holding the signed-in session.
    pub token_path: Option<PathBuf>,
    /// Optional per-request timeout; transport defaults apply when unset.
    pub request_timeout_secs: Option<u64>,
    /// Rows per page for paged lists.
    #[ortho_config(default = 50)]
    pub page_size: u32,
}

impl DashboardSettings {
    /// Return the configured base URL, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the configured value is not a URL.
    pub fn api_base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL))
    }

    /// Return the configured session file, falling back to the default.
    pub fn token_path(&self) -> PathBuf {
        self.token_path.clone().unwrap_or_else(default_token_path)
    }

    /// Request timeout, when one is configured and non-zero.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Page size clamped to what the backend accepts.
    pub fn page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}
