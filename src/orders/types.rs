//! Types for order operations

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::de::null_as_default;
use crate::display::value_text;
use crate::workflow::{LineItemStatus, OrderStatus};

/// A customer order as reported by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// The order ID
    pub id: i64,

    /// Customer contact address
    pub customer_email: String,

    /// Customer display name, when extracted
    #[serde(default)]
    pub customer_name: Option<String>,

    /// Workflow status
    pub status: OrderStatus,

    /// Creation timestamp
    pub created_at: String,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub completed_at: Option<String>,

    #[serde(default)]
    pub delivery_address: Option<String>,

    #[serde(default)]
    pub delivery_date: Option<String>,

    #[serde(default)]
    pub customer_notes: Option<String>,

    /// Business rules the backend applied while processing
    #[serde(default, deserialize_with = "null_as_default")]
    pub applied_rules: Vec<AppliedRule>,

    /// Whether a manager has to approve before the workflow continues
    #[serde(default, deserialize_with = "null_as_default")]
    pub approval_required: bool,

    #[serde(default)]
    pub approved_by: Option<String>,

    #[serde(default)]
    pub approved_at: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub line_items: Vec<LineItem>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub workflow_tasks: Vec<WorkflowTask>,

    /// Raw output of the AI extraction step
    #[serde(default)]
    pub extracted_data: Option<Value>,
}

impl Order {
    /// Customer name, or `Unknown` when the extraction found none
    pub fn display_name(&self) -> &str {
        match self.customer_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "Unknown",
        }
    }

    /// Customer name, falling back to the email address
    pub fn contact(&self) -> &str {
        match self.customer_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.customer_email,
        }
    }

    /// True while approval is required and nobody has approved yet
    pub fn awaiting_approval(&self) -> bool {
        self.approval_required && self.approved_by.as_deref().map_or(true, str::is_empty)
    }
}

/// One requested product line. Loosely typed: fields the console does not
/// know about are kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub requested_name: Option<String>,

    #[serde(default)]
    pub requested_quantity: Option<Value>,

    /// Catalogue name the backend resolved the request to
    #[serde(default)]
    pub product_name: Option<String>,

    #[serde(default)]
    pub product_code: Option<String>,

    #[serde(default)]
    pub unit_price: Option<Value>,

    #[serde(default)]
    pub total_price: Option<Value>,

    #[serde(default)]
    pub status: Option<LineItemStatus>,

    /// Explanation attached to a failed validation
    #[serde(default)]
    pub issue: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineItem {
    pub fn name(&self) -> &str {
        self.requested_name.as_deref().unwrap_or("")
    }

    pub fn quantity_text(&self) -> String {
        self.requested_quantity
            .as_ref()
            .map(value_text)
            .unwrap_or_default()
    }

    /// Resolved product name when it differs from what was requested
    pub fn resolved_name(&self) -> Option<&str> {
        match self.product_name.as_deref() {
            Some(name) if !name.is_empty() && Some(name) != self.requested_name.as_deref() => {
                Some(name)
            }
            _ => None,
        }
    }

    /// Validation label; `Processing` until the backend assigns a status
    pub fn status_label(&self) -> &str {
        self.status.as_ref().map_or("Processing", LineItemStatus::label)
    }
}

/// A backend workflow task attached to an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowTask {
    #[serde(default)]
    pub id: Option<i64>,

    pub task_type: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub created_by: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub parameters: Option<Value>,

    #[serde(default)]
    pub result: Option<Value>,
}

/// A business rule the backend applied to an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedRule {
    #[serde(default)]
    pub rule_name: Option<String>,

    #[serde(default)]
    pub action: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Query for `GET /api/orders`
#[derive(Debug, Clone)]
pub struct ListOrders {
    /// Server-side status filter; omitted from the query when `None`
    pub status: Option<OrderStatus>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListOrders {
    fn default() -> Self {
        Self {
            status: None,
            limit: 50,
            offset: 0,
        }
    }
}

impl ListOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

/// Body of `PUT /api/orders/{id}/status`
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `POST /api/orders/{id}/tasks`
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub task_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// Body of `POST /api/orders/{id}/respond`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailReply {
    pub response_content: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Message-ID of the email being answered, for threading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<String>,
}

/// Reply drafted by the backend's AI step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedResponse {
    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order_json() -> Value {
        json!({
            "id": 7,
            "customer_email": "procurement@company.com",
            "customer_name": null,
            "status": "db_check",
            "created_at": "2024-05-01T14:03:22",
            "approval_required": null,
            "line_items": [
                {
                    "requested_name": "Desk TRÄNHOLM 19",
                    "requested_quantity": 25,
                    "product_name": "Desk TRANHOLM 19",
                    "product_code": "DSK-019",
                    "unit_price": "199.00",
                    "status": "INSUFFICIENT_STOCK",
                    "issue": "Only 10 in stock",
                    "warehouse": "north"
                }
            ],
            "workflow_tasks": null
        })
    }

    #[test]
    fn order_tolerates_nulls_and_missing_fields() {
        let order: Order = serde_json::from_value(order_json()).unwrap();
        assert_eq!(order.status, OrderStatus::DbCheck);
        assert!(!order.approval_required);
        assert!(order.workflow_tasks.is_empty());
        assert!(order.applied_rules.is_empty());
        assert_eq!(order.display_name(), "Unknown");
        assert_eq!(order.contact(), "procurement@company.com");
    }

    #[test]
    fn line_item_keeps_unknown_fields() {
        let order: Order = serde_json::from_value(order_json()).unwrap();
        let item = &order.line_items[0];
        assert_eq!(item.quantity_text(), "25");
        assert_eq!(item.resolved_name(), Some("Desk TRANHOLM 19"));
        assert_eq!(item.status_label(), "Out of Stock");
        assert_eq!(item.extra.get("warehouse"), Some(&json!("north")));
    }

    #[test]
    fn line_item_without_status_is_processing() {
        let item = LineItem {
            requested_name: Some("Coffee HEMNTORP 601".into()),
            product_name: Some("Coffee HEMNTORP 601".into()),
            ..Default::default()
        };
        assert_eq!(item.status_label(), "Processing");
        assert_eq!(item.resolved_name(), None);
    }

    #[test]
    fn awaiting_approval_treats_empty_approver_as_missing() {
        let mut order: Order = serde_json::from_value(order_json()).unwrap();
        order.approval_required = true;
        assert!(order.awaiting_approval());
        order.approved_by = Some(String::new());
        assert!(order.awaiting_approval());
        order.approved_by = Some("manager@company.com".into());
        assert!(!order.awaiting_approval());
    }

    #[test]
    fn reply_body_omits_absent_fields() {
        let reply = EmailReply {
            response_content: "Thanks".into(),
            subject: None,
            reply_to_message_id: Some("<abc@mail>".into()),
        };
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"response_content": "Thanks", "reply_to_message_id": "<abc@mail>"})
        );
    }
}
