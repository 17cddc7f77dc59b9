//! Operator actions on a single order.
//!
//! Which actions are offered is a pure function of the order's status and
//! approval fields. The transitions themselves happen on the backend; callers
//! refetch the order after [`perform`] returns.

use log::warn;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::emails::thread::ReplyDraft;
use crate::error::{Error, Result};
use crate::notify::Notifier;
use crate::orders::{GeneratedResponse, Order};
use crate::workflow::OrderStatus;
use crate::SalesOps;

/// An action button of the order communication view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderAction {
    GenerateResponse,
    StartProcessing,
    ValidateInventory,
    MarkFollowUp,
    GeneratePdf,
    Approve,
    MarkCompleted,
}

impl OrderAction {
    /// Display order
    pub const ALL: [OrderAction; 7] = [
        OrderAction::GenerateResponse,
        OrderAction::StartProcessing,
        OrderAction::ValidateInventory,
        OrderAction::MarkFollowUp,
        OrderAction::GeneratePdf,
        OrderAction::Approve,
        OrderAction::MarkCompleted,
    ];

    /// Command-line name
    pub fn name(self) -> &'static str {
        match self {
            OrderAction::GenerateResponse => "generate-response",
            OrderAction::StartProcessing => "start-processing",
            OrderAction::ValidateInventory => "validate-inventory",
            OrderAction::MarkFollowUp => "follow-up",
            OrderAction::GeneratePdf => "generate-pdf",
            OrderAction::Approve => "approve",
            OrderAction::MarkCompleted => "complete",
        }
    }

    /// Button caption
    pub fn title(self) -> &'static str {
        match self {
            OrderAction::GenerateResponse => "Generate Response",
            OrderAction::StartProcessing => "Start Processing",
            OrderAction::ValidateInventory => "Validate Inventory",
            OrderAction::MarkFollowUp => "Mark for Follow-up",
            OrderAction::GeneratePdf => "Generate PDF",
            OrderAction::Approve => "Approve Order",
            OrderAction::MarkCompleted => "Mark Completed",
        }
    }

    pub fn is_available(self, order: &Order) -> bool {
        use OrderStatus::*;
        let status = &order.status;
        match self {
            OrderAction::GenerateResponse => *status != Inquiry,
            OrderAction::StartProcessing => *status == Inquiry,
            OrderAction::ValidateInventory => matches!(status, InProcess | DbCheck),
            OrderAction::MarkFollowUp => *status == InProcess,
            OrderAction::GeneratePdf => matches!(status, DbCheck | Response | FollowUp | Completed),
            OrderAction::Approve => order.awaiting_approval(),
            OrderAction::MarkCompleted => matches!(status, Response | FollowUp | DbCheck | InProcess),
        }
    }

    /// Target status and note for actions that move the order
    pub fn transition(self) -> Option<(OrderStatus, &'static str)> {
        match self {
            OrderAction::StartProcessing => Some((OrderStatus::InProcess, "Starting processing")),
            OrderAction::MarkFollowUp => Some((OrderStatus::FollowUp, "Ready for follow-up")),
            OrderAction::Approve => Some((OrderStatus::Response, "Order approved by manager")),
            OrderAction::MarkCompleted => Some((OrderStatus::Completed, "Order completed")),
            _ => None,
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            OrderAction::GenerateResponse => "AI-generated response created successfully!",
            OrderAction::StartProcessing => "Order processing started!",
            OrderAction::ValidateInventory => "Inventory validation started",
            OrderAction::MarkFollowUp => "Order marked for follow-up!",
            OrderAction::GeneratePdf => "Sales order PDF generated",
            OrderAction::Approve => "Order approved successfully!",
            OrderAction::MarkCompleted => "Order marked as completed successfully!",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            OrderAction::GenerateResponse => {
                "AI response generation failed. Check the backend AI configuration and try again."
            }
            OrderAction::StartProcessing => "Failed to start processing",
            OrderAction::ValidateInventory => "Failed to start inventory validation",
            OrderAction::MarkFollowUp => "Failed to mark for follow-up",
            OrderAction::GeneratePdf => "PDF generation failed",
            OrderAction::Approve => "Failed to approve order",
            OrderAction::MarkCompleted => "Failed to mark order as completed",
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OrderAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OrderAction::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = OrderAction::ALL.iter().map(|a| a.name()).collect();
                Error::invalid_input(format!(
                    "unknown action '{}', expected one of: {}",
                    s,
                    names.join(", ")
                ))
            })
    }
}

/// Actions to offer for `order`, in display order
pub fn available_actions(order: &Order) -> Vec<OrderAction> {
    OrderAction::ALL
        .into_iter()
        .filter(|a| a.is_available(order))
        .collect()
}

/// What a performed action produced
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    /// The backend accepted a status transition
    Updated(Value),
    /// Workflow processing was triggered
    WorkflowTriggered(Value),
    /// Sales order PDF bytes
    Pdf(Vec<u8>),
    /// AI drafted reply
    Draft(GeneratedResponse),
}

/// Runs one action against the backend and reports the result through
/// `notifier`.
///
/// Actions that are not offered for the order's current state are rejected
/// with [`Error::InvalidInput`] before any request is made.
pub async fn perform(
    client: &SalesOps,
    order: &Order,
    action: OrderAction,
    notifier: &dyn Notifier,
) -> Result<ActionOutcome> {
    if !action.is_available(order) {
        return Err(Error::invalid_input(format!(
            "'{}' is not available for order #{} in status {}",
            action.title(),
            order.id,
            order.status
        )));
    }

    let result = run(client, order, action).await;
    match &result {
        Ok(_) => notifier.success(action.success_message()),
        Err(e) => {
            warn!("{} failed for order #{}: {}", action.name(), order.id, e);
            notifier.error(action.failure_message());
        }
    }
    let outcome = result?;

    if action == OrderAction::Approve {
        // A failed trigger after approval is only logged.
        match client.orders().process_workflow().await {
            Ok(_) => notifier.success("Workflow processing started!"),
            Err(e) => warn!("workflow processing after approval of #{} failed: {}", order.id, e),
        }
    }

    Ok(outcome)
}

async fn run(client: &SalesOps, order: &Order, action: OrderAction) -> Result<ActionOutcome> {
    let orders = client.orders();
    if let Some((status, notes)) = action.transition() {
        let value = orders.update_status(order.id, status, Some(notes)).await?;
        return Ok(ActionOutcome::Updated(value));
    }
    match action {
        OrderAction::ValidateInventory => {
            Ok(ActionOutcome::WorkflowTriggered(orders.process_workflow().await?))
        }
        OrderAction::GeneratePdf => Ok(ActionOutcome::Pdf(orders.generate_pdf(order.id).await?)),
        OrderAction::GenerateResponse => {
            Ok(ActionOutcome::Draft(orders.generate_response(order.id).await?))
        }
        other => Err(Error::general(format!("no handler for action {}", other))),
    }
}

/// Sends the reply in `draft`, notifying success or failure
pub async fn send_reply(
    client: &SalesOps,
    draft: &ReplyDraft,
    notifier: &dyn Notifier,
) -> Result<Value> {
    let reply = match draft.to_reply() {
        Ok(reply) => reply,
        Err(e) => {
            if let Error::InvalidInput(message) = &e {
                notifier.error(message);
            }
            return Err(e);
        }
    };
    match client.orders().respond(draft.order_id, &reply).await {
        Ok(value) => {
            notifier.success("Response sent successfully!");
            Ok(value)
        }
        Err(e) => {
            notifier.error("Failed to send response");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(status: &str, approval_required: bool, approved_by: Option<&str>) -> Order {
        serde_json::from_value(json!({
            "id": 1,
            "customer_email": "buyer@shop.com",
            "status": status,
            "created_at": "2024-05-01T10:00:00",
            "approval_required": approval_required,
            "approved_by": approved_by
        }))
        .unwrap()
    }

    #[test]
    fn approve_offered_only_without_approver() {
        let pending = order("pending_approval", true, None);
        assert!(available_actions(&pending).contains(&OrderAction::Approve));

        let approved = order("pending_approval", true, Some("manager"));
        assert!(!available_actions(&approved).contains(&OrderAction::Approve));

        let not_required = order("pending_approval", false, None);
        assert!(!available_actions(&not_required).contains(&OrderAction::Approve));
    }

    #[test]
    fn inquiry_can_only_start_processing() {
        assert_eq!(
            available_actions(&order("inquiry", false, None)),
            vec![OrderAction::StartProcessing]
        );
    }

    #[test]
    fn in_process_actions() {
        assert_eq!(
            available_actions(&order("in_process", false, None)),
            vec![
                OrderAction::GenerateResponse,
                OrderAction::ValidateInventory,
                OrderAction::MarkFollowUp,
                OrderAction::MarkCompleted,
            ]
        );
    }

    #[test]
    fn db_check_and_completed_actions() {
        assert_eq!(
            available_actions(&order("db_check", false, None)),
            vec![
                OrderAction::GenerateResponse,
                OrderAction::ValidateInventory,
                OrderAction::GeneratePdf,
                OrderAction::MarkCompleted,
            ]
        );
        assert_eq!(
            available_actions(&order("completed", false, None)),
            vec![OrderAction::GenerateResponse, OrderAction::GeneratePdf]
        );
    }

    #[test]
    fn unknown_status_only_offers_reply_generation() {
        assert_eq!(
            available_actions(&order("escalated", false, None)),
            vec![OrderAction::GenerateResponse]
        );
    }

    #[test]
    fn transitions_carry_notes() {
        assert_eq!(
            OrderAction::Approve.transition(),
            Some((OrderStatus::Response, "Order approved by manager"))
        );
        assert_eq!(OrderAction::GeneratePdf.transition(), None);
    }

    #[test]
    fn parses_action_names() {
        for action in OrderAction::ALL {
            assert_eq!(action.name().parse::<OrderAction>().unwrap(), action);
        }
        assert!(matches!("launch".parse::<OrderAction>(), Err(Error::InvalidInput(_))));
    }
}
