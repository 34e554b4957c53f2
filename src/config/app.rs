//! Application configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main application configuration
///
/// Carried explicitly through the client adapter, generator and server
/// rather than read from process globals; environment variables override
/// file values in [`AppConfig::apply_env`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // Site
    pub title: String,
    /// Locale tag used for date formatting ("en" or "pt-BR")
    pub language: String,

    // CMS
    /// Base URL of the CMS document API
    pub api_endpoint: String,
    /// Optional access token appended to CMS queries
    pub access_token: Option<String>,
    /// Number of posts per listing page
    pub page_size: u32,

    // Output
    pub public_dir: String,

    // Static regeneration
    /// Age in seconds after which the listing page is regenerated
    pub revalidate_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "waypost".to_string(),
            language: "en".to_string(),

            api_endpoint: "http://localhost:8080/api/v2".to_string(),
            access_token: None,
            page_size: 20,

            public_dir: "public".to_string(),

            revalidate_secs: 30 * 60,
        }
    }
}

impl AppConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: AppConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment overrides
    ///
    /// `CMS_API_ENDPOINT`, `CMS_ACCESS_TOKEN` and `CMS_PAGE_SIZE` take
    /// precedence over values from the config file.
    pub fn apply_env(&mut self) {
        if let Ok(endpoint) = std::env::var("CMS_API_ENDPOINT") {
            self.api_endpoint = endpoint;
        }
        if let Ok(token) = std::env::var("CMS_ACCESS_TOKEN") {
            self.access_token = Some(token);
        }
        if let Ok(size) = std::env::var("CMS_PAGE_SIZE") {
            match size.parse::<u32>() {
                Ok(size) if size > 0 => self.page_size = size,
                _ => tracing::warn!("Ignoring invalid CMS_PAGE_SIZE: {}", size),
            }
        }
    }
}
