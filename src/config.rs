//! Configuration options for the sales order client

use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Backend address used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Environment variable holding the backend base URL
pub const API_URL_ENV: &str = "SALESOPS_API_URL";

/// Environment variable holding the request timeout in seconds
pub const TIMEOUT_ENV: &str = "SALESOPS_TIMEOUT_SECS";

/// Configuration options for the client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Default `limit` for paged list endpoints
    pub page_size: u32,

    /// `limit` used by the order and email views that filter locally
    pub list_limit: u32,

    /// How often the dashboard re-reads the stats in watch mode
    pub refresh_interval: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            page_size: 50,
            list_limit: 100,
            refresh_interval: Duration::from_secs(30),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the default page size
    pub fn with_page_size(mut self, value: u32) -> Self {
        self.page_size = value;
        self
    }

    /// Set the limit used by locally filtered views
    pub fn with_list_limit(mut self, value: u32) -> Self {
        self.list_limit = value;
        self
    }

    /// Set the dashboard refresh interval
    pub fn with_refresh_interval(mut self, value: Duration) -> Self {
        self.refresh_interval = value;
        self
    }
}

/// Backend location plus client options.
#[derive(Debug, Clone)]
pub struct Config {
    pub url: Url,
    pub options: ClientOptions,
}

impl Config {
    /// Creates a new configuration, validating the URL.
    pub fn new(url_str: &str) -> Result<Self> {
        let url = Url::parse(url_str)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "unsupported scheme '{}' in API URL",
                url.scheme()
            )));
        }
        Ok(Self {
            url,
            options: ClientOptions::default(),
        })
    }

    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the configuration from `SALESOPS_API_URL` and
    /// `SALESOPS_TIMEOUT_SECS`, falling back to the local backend.
    pub fn from_env() -> Result<Self> {
        let url_str = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut config = Self::new(&url_str)?;

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::config(format!("{} must be a whole number of seconds", TIMEOUT_ENV))
            })?;
            config.options = config
                .options
                .with_request_timeout(Some(Duration::from_secs(secs)));
        }

        Ok(config)
    }

    /// Base URL without a trailing slash, ready for path concatenation
    pub fn base_url(&self) -> String {
        self.url.as_str().trim_end_matches('/').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_new_valid() {
        let config = Config::new("http://localhost:8000").unwrap();
        // Url::parse adds a trailing slash to an empty path
        assert_eq!(config.url.to_string(), "http://localhost:8000/");
        assert_eq!(config.base_url(), "http://localhost:8000");
    }

    #[test]
    fn config_new_invalid_url() {
        match Config::new("not a valid url") {
            Err(Error::Url(_)) => {}
            other => panic!("Expected Url error, got {:?}", other),
        }
    }

    #[test]
    fn config_rejects_non_http_scheme() {
        match Config::new("ftp://example.com") {
            Err(Error::Config(msg)) => assert!(msg.contains("ftp")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn base_url_keeps_path_prefix() {
        let config = Config::new("https://ops.example.com/backend/").unwrap();
        assert_eq!(config.base_url(), "https://ops.example.com/backend");
    }

    #[test]
    fn default_options() {
        let options = ClientOptions::default();
        assert_eq!(options.page_size, 50);
        assert_eq!(options.list_limit, 100);
        assert_eq!(options.refresh_interval, Duration::from_secs(30));
        assert_eq!(options.request_timeout, Some(Duration::from_secs(30)));
    }
}
