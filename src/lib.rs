//! Sales order console client
//!
//! A Rust client for the sales order automation backend, providing access to
//! orders, email threads, business rules and dashboard statistics, plus the
//! presentation helpers the operator console derives locally.

pub mod actions;
pub mod config;
mod de;
pub mod display;
pub mod emails;
pub mod error;
pub mod fetch;
pub mod notify;
pub mod orders;
pub mod rules;
pub mod stats;
pub mod workflow;

use reqwest::Client;

use crate::config::{ClientOptions, Config};
use crate::emails::EmailsClient;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::orders::OrdersClient;
use crate::rules::RulesClient;
use crate::stats::{Health, Stats};

pub use crate::error::Result;

/// The main entry point for the client
pub struct SalesOps {
    /// The backend base URL, without a trailing slash
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
}

impl SalesOps {
    /// Create a new client with default options
    ///
    /// # Example
    ///
    /// ```
    /// use salesops::SalesOps;
    ///
    /// let client = SalesOps::new("http://localhost:8000").unwrap();
    /// assert_eq!(client.url, "http://localhost:8000");
    /// ```
    pub fn new(api_url: &str) -> Result<Self> {
        Self::from_config(Config::new(api_url)?)
    }

    /// Create a new client with custom options
    pub fn new_with_options(api_url: &str, options: ClientOptions) -> Result<Self> {
        Self::from_config(Config::new(api_url)?.with_options(options))
    }

    /// Create a client from `SALESOPS_API_URL` / `SALESOPS_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::from_config(Config::from_env()?)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(Error::Http)?;

        Ok(Self {
            url: config.base_url(),
            http_client,
            options: config.options,
        })
    }

    /// Order endpoints and the workflow trigger
    pub fn orders(&self) -> OrdersClient {
        OrdersClient::new(&self.url, self.http_client.clone(), self.options.list_limit)
    }

    /// Email log, conversations and ingestion
    pub fn emails(&self) -> EmailsClient {
        EmailsClient::new(&self.url, self.http_client.clone())
    }

    /// Business rule CRUD
    pub fn rules(&self) -> RulesClient {
        RulesClient::new(&self.url, self.http_client.clone())
    }

    /// Liveness check
    pub async fn health(&self) -> Result<Health> {
        let url = format!("{}/health", self.url);
        let value = Fetch::get(&self.http_client, &url).execute_value().await?;
        match value {
            serde_json::Value::Null => Ok(Health::default()),
            other => Ok(serde_json::from_value(other)?),
        }
    }

    /// Aggregate counters for the dashboard
    pub async fn stats(&self) -> Result<Stats> {
        let url = format!("{}/api/stats", self.url);
        Fetch::get(&self.http_client, &url).execute().await
    }
}
