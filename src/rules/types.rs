//! Types for business rule operations

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Category of a business rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleType {
    Quantity,
    Amount,
    Product,
    Customer,
    Other(String),
}

impl RuleType {
    /// Types offered by the rule form
    pub const KNOWN: [RuleType; 4] = [
        RuleType::Quantity,
        RuleType::Amount,
        RuleType::Product,
        RuleType::Customer,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            RuleType::Quantity => "quantity",
            RuleType::Amount => "amount",
            RuleType::Product => "product",
            RuleType::Customer => "customer",
            RuleType::Other(s) => s,
        }
    }
}

impl Default for RuleType {
    fn default() -> Self {
        RuleType::Quantity
    }
}

impl From<&str> for RuleType {
    fn from(value: &str) -> Self {
        match value {
            "quantity" => RuleType::Quantity,
            "amount" => RuleType::Amount,
            "product" => RuleType::Product,
            "customer" => RuleType::Customer,
            other => RuleType::Other(other.to_string()),
        }
    }
}

impl From<String> for RuleType {
    fn from(value: String) -> Self {
        RuleType::from(value.as_str())
    }
}

impl From<RuleType> for String {
    fn from(value: RuleType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A backend-evaluated business rule.
///
/// `conditions` and `actions` are interpreted only by the backend and are
/// carried here as opaque JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub conditions: Value,
    #[serde(default)]
    pub actions: Value,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub rule_type: RuleType,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /api/rules`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRule {
    pub name: String,
    pub description: String,
    pub conditions: Value,
    pub actions: Value,
    pub priority: i32,
    pub rule_type: RuleType,
    pub is_active: bool,
}

/// Partial body of `PUT /api/rules/{id}`; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<RuleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl RuleUpdate {
    /// Flips the active flag and nothing else
    pub fn toggle(rule: &Rule) -> Self {
        Self {
            is_active: Some(!rule.is_active),
            ..Default::default()
        }
    }
}

impl From<NewRule> for RuleUpdate {
    fn from(rule: NewRule) -> Self {
        Self {
            name: Some(rule.name),
            description: Some(rule.description),
            conditions: Some(rule.conditions),
            actions: Some(rule.actions),
            priority: Some(rule.priority),
            rule_type: Some(rule.rule_type),
            is_active: Some(rule.is_active),
        }
    }
}

/// Body of `POST /api/rules/test`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleTestRequest {
    pub conditions: Value,
    pub test_metrics: Value,
}
