//! Types for email operations

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{Error, Result};

/// Whether an email came from the customer or went out from sales
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    Incoming,
    Outgoing,
    Other(String),
}

impl Direction {
    pub fn as_str(&self) -> &str {
        match self {
            Direction::Incoming => "incoming",
            Direction::Outgoing => "outgoing",
            Direction::Other(s) => s,
        }
    }

    /// Who is talking: `Customer` for incoming mail, `Sales Team` otherwise
    pub fn party(&self) -> &'static str {
        match self {
            Direction::Incoming => "Customer",
            _ => "Sales Team",
        }
    }
}

impl From<String> for Direction {
    fn from(value: String) -> Self {
        match value.as_str() {
            "incoming" => Direction::Incoming,
            "outgoing" => Direction::Outgoing,
            _ => Direction::Other(value),
        }
    }
}

impl From<Direction> for String {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailLog {
    /// The log entry ID
    pub id: i64,

    /// Message-ID header, used to thread replies
    #[serde(default)]
    pub email_id: Option<String>,

    pub direction: Direction,

    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub sender: String,

    #[serde(default)]
    pub recipient: String,

    #[serde(default)]
    pub body: Option<String>,

    /// Stage the backend classified the email into
    #[serde(default)]
    pub workflow_stage: Option<String>,

    #[serde(default)]
    pub intent_summary: Option<String>,

    #[serde(default)]
    pub requires_action: bool,

    /// Receive (or send) timestamp
    pub received_at: String,
}

impl EmailLog {
    pub fn is_incoming(&self) -> bool {
        self.direction == Direction::Incoming
    }

    pub fn subject_or_default(&self) -> &str {
        match self.subject.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => "No subject",
        }
    }
}

/// Per-order summary returned by `/api/emails/conversations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub order_id: i64,

    #[serde(default)]
    pub customer_name: Option<String>,

    #[serde(default)]
    pub customer_email: String,

    #[serde(default)]
    pub subject: String,

    pub latest_email_date: String,

    #[serde(default)]
    pub email_count: u32,

    /// Order status
    #[serde(default)]
    pub status: String,

    /// Direction of the latest email
    pub direction: Direction,

    #[serde(default)]
    pub workflow_stage: Option<String>,

    #[serde(default)]
    pub requires_action: bool,
}

/// Stage and direction filters of the conversations page.
///
/// `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationFilter {
    pub stage: Option<String>,
    pub direction: Option<Direction>,
}

impl ConversationFilter {
    /// Builds a filter from select values, where `all` disables the filter
    pub fn from_selects(stage: &str, direction: &str) -> Self {
        let pick = |value: &str| match value {
            "" | "all" => None,
            other => Some(other.to_string()),
        };
        Self {
            stage: pick(stage),
            direction: pick(direction).map(Direction::from),
        }
    }

    pub fn matches(&self, conversation: &Conversation) -> bool {
        let stage_match = self
            .stage
            .as_deref()
            .map_or(true, |s| conversation.workflow_stage.as_deref() == Some(s));
        let direction_match = self
            .direction
            .as_ref()
            .map_or(true, |d| &conversation.direction == d);
        stage_match && direction_match
    }

    pub fn apply<'a>(&self, conversations: &'a [Conversation]) -> Vec<&'a Conversation> {
        conversations.iter().filter(|c| self.matches(c)).collect()
    }
}

/// Counters shown above the conversation list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversationSummary {
    pub total: usize,
    pub incoming: usize,
    pub outgoing: usize,
    pub requires_action: usize,
}

impl ConversationSummary {
    pub fn from_conversations(conversations: &[Conversation]) -> Self {
        conversations.iter().fold(Self::default(), |mut acc, c| {
            acc.total += 1;
            match c.direction {
                Direction::Incoming => acc.incoming += 1,
                Direction::Outgoing => acc.outgoing += 1,
                Direction::Other(_) => {}
            }
            if c.requires_action {
                acc.requires_action += 1;
            }
            acc
        })
    }
}

/// Body of `POST /api/process-email`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessEmailRequest {
    pub email_content: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    /// Append to this order instead of creating a new one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
}

impl ProcessEmailRequest {
    pub fn new(email_content: impl Into<String>) -> Self {
        Self {
            email_content: email_content.into(),
            customer_email: None,
            order_id: None,
        }
    }

    /// Empty addresses are dropped rather than sent
    pub fn customer_email(mut self, email: impl Into<String>) -> Self {
        let email = email.into();
        self.customer_email = if email.is_empty() { None } else { Some(email) };
        self
    }

    pub fn order_id(mut self, order_id: i64) -> Self {
        self.order_id = Some(order_id);
        self
    }

    /// A simulated inquiry that creates a new order. The sender goes into a
    /// `From:` line ahead of the body.
    pub fn new_order(customer_email: &str, content: &str) -> Result<Self> {
        if customer_email.trim().is_empty() || content.trim().is_empty() {
            return Err(Error::invalid_input(
                "Please enter customer email and order content",
            ));
        }
        Ok(Self::new(format!("From: {}\n\n{}", customer_email, content)))
    }

    /// A simulated customer message appended to an existing order
    pub fn for_order(order_id: i64, content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Err(Error::invalid_input("Please enter a message"));
        }
        Ok(Self::new(content).order_id(order_id))
    }
}

/// Response of `POST /api/process-email`; `id` is the order that was created
/// or extended
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessEmailResponse {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
