//! Ordering and reply helpers for an order's email thread

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use super::types::EmailLog;
use crate::display::parse_timestamp;
use crate::error::{Error, Result};
use crate::orders::{EmailReply, GeneratedResponse, Order};

/// Subject used when the thread has no usable incoming subject
pub const FALLBACK_REPLY_SUBJECT: &str = "Re: Order Inquiry";

// Unparseable timestamps sort before every parseable one.
fn timestamp(email: &EmailLog) -> Option<NaiveDateTime> {
    parse_timestamp(&email.received_at)
}

/// Sorts a thread oldest first. Equal timestamps keep their order.
pub fn sort_chronological(emails: &mut [EmailLog]) {
    emails.sort_by(|a, b| timestamp(a).cmp(&timestamp(b)));
}

/// Most recent incoming email; the earliest listed wins a tie
pub fn latest_incoming(emails: &[EmailLog]) -> Option<&EmailLog> {
    emails
        .iter()
        .filter(|e| e.is_incoming())
        .fold(None, |best: Option<&EmailLog>, email| match best {
            Some(current) if timestamp(email).cmp(&timestamp(current)) != Ordering::Greater => {
                Some(current)
            }
            _ => Some(email),
        })
}

/// `Re: <subject>` unless the subject already starts with `re:` in any case
pub fn reply_subject_for(subject: &str) -> String {
    let subject = subject.trim();
    if subject.to_lowercase().starts_with("re:") {
        subject.to_string()
    } else {
        format!("Re: {}", subject)
    }
}

/// Subject proposed for a reply to `emails`.
///
/// `None` for an empty thread. Otherwise derived from the latest incoming
/// subject, or [`FALLBACK_REPLY_SUBJECT`] when there is none.
pub fn reply_subject(emails: &[EmailLog]) -> Option<String> {
    if emails.is_empty() {
        return None;
    }
    let subject = latest_incoming(emails)
        .and_then(|e| e.subject.as_deref())
        .filter(|s| !s.trim().is_empty())
        .map(reply_subject_for)
        .unwrap_or_else(|| FALLBACK_REPLY_SUBJECT.to_string());
    Some(subject)
}

/// Compose buffer for answering a customer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplyDraft {
    pub order_id: i64,
    /// Read-only: the order's customer address
    pub to: String,
    pub subject: String,
    pub body: String,
    pub reply_to_message_id: Option<String>,
}

impl ReplyDraft {
    /// Starts a reply threaded onto the latest incoming email
    pub fn for_thread(order: &Order, emails: &[EmailLog]) -> Self {
        Self {
            order_id: order.id,
            to: order.customer_email.clone(),
            subject: reply_subject(emails).unwrap_or_default(),
            body: String::new(),
            reply_to_message_id: latest_incoming(emails).and_then(|e| e.email_id.clone()),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Fills the buffer from an AI drafted reply
    pub fn apply_generated(&mut self, generated: &GeneratedResponse) {
        self.body = generated
            .body
            .clone()
            .unwrap_or_else(|| "Response generation failed".to_string());
        if let Some(subject) = generated.subject.as_ref().filter(|s| !s.is_empty()) {
            self.subject = subject.clone();
        }
    }

    /// Request body for `/respond`; rejects an empty message
    pub fn to_reply(&self) -> Result<EmailReply> {
        if self.body.trim().is_empty() {
            return Err(Error::invalid_input(
                "Please enter a response and select an order",
            ));
        }
        Ok(EmailReply {
            response_content: self.body.clone(),
            subject: Some(self.subject.clone()).filter(|s| !s.is_empty()),
            reply_to_message_id: self.reply_to_message_id.clone(),
        })
    }
}
