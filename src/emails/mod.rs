//! Email ingestion and email log endpoints

pub mod thread;
mod types;

pub use types::*;

use reqwest::Client;
use serde_json::Value;

use crate::error::Error;
use crate::fetch::Fetch;

/// Client for `/api/emails`, `/api/process-email` and `/api/fetch-emails`
pub struct EmailsClient {
    url: String,
    client: Client,
}

impl EmailsClient {
    pub(crate) fn new(url: &str, client: Client) -> Self {
        Self {
            url: url.to_string(),
            client,
        }
    }

    /// Page through the raw email log
    pub async fn list(&self, limit: u32, offset: u32) -> Result<Vec<EmailLog>, Error> {
        let url = format!("{}/api/emails", self.url);
        Fetch::get(&self.client, &url)
            .query_param("limit", limit)
            .query_param("offset", offset)
            .execute()
            .await
    }

    /// Per-order conversation summaries
    pub async fn conversations(&self) -> Result<Vec<Conversation>, Error> {
        let url = format!("{}/api/emails/conversations", self.url);
        Fetch::get(&self.client, &url).execute().await
    }

    /// Submit raw email text; the backend creates or extends an order
    pub async fn process_email(
        &self,
        request: &ProcessEmailRequest,
    ) -> Result<ProcessEmailResponse, Error> {
        let url = format!("{}/api/process-email", self.url);
        let value = Fetch::post(&self.client, &url)
            .json(request)?
            .execute_value()
            .await?;
        match value {
            Value::Null => Ok(ProcessEmailResponse::default()),
            other => Ok(serde_json::from_value(other)?),
        }
    }

    /// Trigger ingestion from the backend's mailbox
    pub async fn fetch_emails(&self) -> Result<Value, Error> {
        let url = format!("{}/api/fetch-emails", self.url);
        Fetch::post(&self.client, &url).execute_value().await
    }
}
