//! Workflow vocabulary reported by the backend and its presentation.
//!
//! Status strings are owned by the backend. Values outside the known
//! vocabulary are preserved verbatim and rendered with the default style.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order workflow status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Inquiry,
    InProcess,
    DbCheck,
    PendingApproval,
    Response,
    FollowUp,
    Completed,
    Unknown(String),
}

impl OrderStatus {
    /// Every known status, in pipeline order
    pub const KNOWN: [OrderStatus; 7] = [
        OrderStatus::Inquiry,
        OrderStatus::InProcess,
        OrderStatus::DbCheck,
        OrderStatus::PendingApproval,
        OrderStatus::Response,
        OrderStatus::FollowUp,
        OrderStatus::Completed,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Inquiry => "inquiry",
            OrderStatus::InProcess => "in_process",
            OrderStatus::DbCheck => "db_check",
            OrderStatus::PendingApproval => "pending_approval",
            OrderStatus::Response => "response",
            OrderStatus::FollowUp => "follow_up",
            OrderStatus::Completed => "completed",
            OrderStatus::Unknown(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, OrderStatus::Unknown(_))
    }

    /// Display label: the first underscore becomes a space.
    pub fn label(&self) -> String {
        stage_label(self.as_str())
    }

    pub fn badge(&self) -> BadgeStyle {
        match self {
            OrderStatus::Inquiry | OrderStatus::PendingApproval | OrderStatus::FollowUp => {
                BadgeStyle::Pending
            }
            OrderStatus::InProcess | OrderStatus::DbCheck | OrderStatus::Response => {
                BadgeStyle::Processing
            }
            OrderStatus::Completed => BadgeStyle::Completed,
            OrderStatus::Unknown(_) => BadgeStyle::Default,
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        match value {
            "inquiry" => OrderStatus::Inquiry,
            "in_process" => OrderStatus::InProcess,
            "db_check" => OrderStatus::DbCheck,
            "pending_approval" => OrderStatus::PendingApproval,
            "response" => OrderStatus::Response,
            "follow_up" => OrderStatus::FollowUp,
            "completed" => OrderStatus::Completed,
            other => OrderStatus::Unknown(other.to_string()),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match OrderStatus::from(value.as_str()) {
            OrderStatus::Unknown(_) => OrderStatus::Unknown(value),
            known => known,
        }
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Unknown(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual class of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeStyle {
    Pending,
    Processing,
    Completed,
    Default,
}

impl BadgeStyle {
    pub fn class_name(self) -> &'static str {
        match self {
            BadgeStyle::Pending => "status-pending",
            BadgeStyle::Processing => "status-processing",
            BadgeStyle::Completed => "status-completed",
            BadgeStyle::Default => "status-default",
        }
    }
}

/// Badge style for any workflow status or stage string.
pub fn status_badge(status: &str) -> BadgeStyle {
    OrderStatus::from(status).badge()
}

/// `in_process` -> `in process`. Only the first underscore is replaced,
/// so `pending_approval_x` keeps its second one.
pub fn stage_label(stage: &str) -> String {
    stage.replacen('_', " ", 1)
}

/// Validation status the backend assigns to a line item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LineItemStatus {
    Validated,
    NotFound,
    MoqNotMet,
    InsufficientStock,
    MultipleMatchesFound,
    Other(String),
}

impl LineItemStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LineItemStatus::Validated => "VALIDATED",
            LineItemStatus::NotFound => "NOT_FOUND",
            LineItemStatus::MoqNotMet => "MOQ_NOT_MET",
            LineItemStatus::InsufficientStock => "INSUFFICIENT_STOCK",
            LineItemStatus::MultipleMatchesFound => "MULTIPLE_MATCHES_FOUND",
            LineItemStatus::Other(s) => s,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            LineItemStatus::Validated => "Validated",
            LineItemStatus::NotFound => "Not Found",
            LineItemStatus::MoqNotMet => "Min Qty Not Met",
            LineItemStatus::InsufficientStock => "Out of Stock",
            LineItemStatus::MultipleMatchesFound => "Ambiguous",
            LineItemStatus::Other(s) => s,
        }
    }

    pub fn is_validated(&self) -> bool {
        matches!(self, LineItemStatus::Validated)
    }
}

impl From<String> for LineItemStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "VALIDATED" => LineItemStatus::Validated,
            "NOT_FOUND" => LineItemStatus::NotFound,
            "MOQ_NOT_MET" => LineItemStatus::MoqNotMet,
            "INSUFFICIENT_STOCK" => LineItemStatus::InsufficientStock,
            "MULTIPLE_MATCHES_FOUND" => LineItemStatus::MultipleMatchesFound,
            _ => LineItemStatus::Other(value),
        }
    }
}

impl From<LineItemStatus> for String {
    fn from(value: LineItemStatus) -> Self {
        match value {
            LineItemStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LineItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_map_to_designated_badges() {
        let expected = [
            ("inquiry", BadgeStyle::Pending),
            ("in_process", BadgeStyle::Processing),
            ("pending_approval", BadgeStyle::Pending),
            ("db_check", BadgeStyle::Processing),
            ("response", BadgeStyle::Processing),
            ("follow_up", BadgeStyle::Pending),
            ("completed", BadgeStyle::Completed),
        ];
        for (status, style) in expected {
            assert_eq!(status_badge(status), style, "status {}", status);
        }
    }

    #[test]
    fn unknown_statuses_fall_back_to_default() {
        for status in ["", "archived", "COMPLETED", "in process"] {
            assert_eq!(status_badge(status), BadgeStyle::Default);
        }
        assert_eq!(BadgeStyle::Default.class_name(), "status-default");
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in OrderStatus::KNOWN {
            assert!(status.is_known());
            assert_eq!(OrderStatus::from(status.to_string()), status);
        }
        let odd = OrderStatus::from("on_hold");
        assert_eq!(odd, OrderStatus::Unknown("on_hold".into()));
        assert_eq!(String::from(odd), "on_hold");
    }

    #[test]
    fn status_deserializes_unknown_values() {
        let status: OrderStatus = serde_json::from_str("\"escalated\"").unwrap();
        assert_eq!(status.badge(), BadgeStyle::Default);
        assert_eq!(serde_json::to_string(&OrderStatus::FollowUp).unwrap(), "\"follow_up\"");
    }

    #[test]
    fn labels_replace_first_underscore() {
        assert_eq!(OrderStatus::PendingApproval.label(), "pending approval");
        assert_eq!(stage_label("a_b_c"), "a b_c");
        assert_eq!(stage_label("inquiry"), "inquiry");
    }

    #[test]
    fn line_item_labels() {
        assert_eq!(LineItemStatus::from("MOQ_NOT_MET".to_string()).label(), "Min Qty Not Met");
        assert_eq!(LineItemStatus::from("INSUFFICIENT_STOCK".to_string()).label(), "Out of Stock");
        assert_eq!(LineItemStatus::from("MULTIPLE_MATCHES_FOUND".to_string()).label(), "Ambiguous");
        assert_eq!(LineItemStatus::from("NOT_FOUND".to_string()).label(), "Not Found");
        assert_eq!(LineItemStatus::from("PARTIAL".to_string()).label(), "PARTIAL");
        assert!(LineItemStatus::from("VALIDATED".to_string()).is_validated());
    }
}
