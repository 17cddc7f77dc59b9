//! Business rule endpoints

pub mod draft;
mod types;

pub use draft::RuleDraft;
pub use types::*;

use log::info;
use reqwest::Client;
use serde_json::Value;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::notify::Confirm;

/// Prompt shown before a rule is deleted
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this rule?";

/// Client for `/api/rules`
pub struct RulesClient {
    url: String,
    client: Client,
}

impl RulesClient {
    pub(crate) fn new(url: &str, client: Client) -> Self {
        Self {
            url: url.to_string(),
            client,
        }
    }

    fn rules_url(&self) -> String {
        format!("{}/api/rules", self.url)
    }

    fn rule_url(&self, id: i64) -> String {
        format!("{}/api/rules/{}", self.url, id)
    }

    pub async fn list(&self) -> Result<Vec<Rule>, Error> {
        Fetch::get(&self.client, &self.rules_url()).execute().await
    }

    pub async fn get(&self, id: i64) -> Result<Rule, Error> {
        Fetch::get(&self.client, &self.rule_url(id)).execute().await
    }

    pub async fn create(&self, rule: &NewRule) -> Result<Value, Error> {
        Fetch::post(&self.client, &self.rules_url())
            .json(rule)?
            .execute_value()
            .await
    }

    pub async fn update(&self, id: i64, update: &RuleUpdate) -> Result<Value, Error> {
        Fetch::put(&self.client, &self.rule_url(id))
            .json(update)?
            .execute_value()
            .await
    }

    /// Flip a rule between active and inactive
    pub async fn toggle(&self, rule: &Rule) -> Result<Value, Error> {
        self.update(rule.id, &RuleUpdate::toggle(rule)).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        Fetch::delete(&self.client, &self.rule_url(id))
            .execute_empty()
            .await
    }

    /// Delete after asking `confirm`. Returns `false`, without touching the
    /// backend, when the user declines.
    pub async fn delete_confirmed(&self, id: i64, confirm: &dyn Confirm) -> Result<bool, Error> {
        if !confirm.confirm(DELETE_PROMPT) {
            info!("deletion of rule {} cancelled", id);
            return Ok(false);
        }
        self.delete(id).await?;
        Ok(true)
    }

    /// Dry-run `conditions` against sample metrics
    pub async fn test(&self, request: &RuleTestRequest) -> Result<Value, Error> {
        let url = format!("{}/test", self.rules_url());
        Fetch::post(&self.client, &url)
            .json(request)?
            .execute_value()
            .await
    }

    /// Rule usage statistics, passed through untouched
    pub async fn stats(&self) -> Result<Value, Error> {
        let url = format!("{}/stats", self.rules_url());
        Fetch::get(&self.client, &url).execute_value().await
    }
}
