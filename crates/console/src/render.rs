//! Plain-text views of backend data.
//!
//! Every function returns a `String` so the views can be tested without a
//! terminal.

use std::fmt::Write;

use salesops::actions::OrderAction;
use salesops::display::{
    format_date, format_datetime, format_optional_date, plural, price_text, truncate, value_text,
};
use salesops::emails::{Conversation, ConversationSummary, EmailLog};
use salesops::orders::views::item_summary;
use salesops::orders::Order;
use salesops::rules::draft::blob_text;
use salesops::rules::Rule;
use salesops::stats::{BreakdownRow, Health, Stats};
use salesops::workflow::{stage_label, status_badge, BadgeStyle, LineItemStatus};

fn marker(style: BadgeStyle) -> &'static str {
    match style {
        BadgeStyle::Pending => "○",
        BadgeStyle::Processing => "◐",
        BadgeStyle::Completed => "●",
        BadgeStyle::Default => "·",
    }
}

/// `◐ in process`
pub fn badge(status: &str) -> String {
    format!("{} {}", marker(status_badge(status)), stage_label(status))
}

pub fn health(url: &str, health: &Health) -> String {
    let state = if health.is_healthy() { "healthy" } else { "unhealthy" };
    match health.status.as_deref() {
        Some(status) if status != state => format!("{}: {} ({})", url, state, status),
        _ => format!("{}: {}", url, state),
    }
}

fn breakdown(out: &mut String, title: &str, rows: &[BreakdownRow]) {
    let _ = writeln!(out, "{}", title);
    if rows.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for row in rows {
        let _ = writeln!(out, "  {:<24} {:>6}", badge(&row.key), row.count);
    }
}

pub fn dashboard(stats: &Stats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total orders          {:>6}", stats.total_orders);
    let _ = writeln!(out, "Total emails          {:>6}", stats.total_emails);
    let _ = writeln!(out, "Pending tasks         {:>6}", stats.pending_tasks);
    let _ = writeln!(out, "Completed tasks today {:>6}", stats.completed_tasks_today);
    out.push('\n');
    breakdown(&mut out, "Orders by status", &stats.status_breakdown());
    out.push('\n');
    breakdown(&mut out, "Emails by stage", &stats.stage_breakdown());
    out
}

pub fn order_row(order: &Order) -> String {
    let items = item_summary(order, 3).join(", ");
    format!(
        "#{:<5} {:<24} {:<28} {:<20} {}  {}",
        order.id,
        truncate(order.display_name(), 24),
        truncate(&order.customer_email, 28),
        badge(order.status.as_str()),
        format_date(&order.created_at),
        items
    )
}

pub fn order_list(orders: &[Order], empty: &str) -> String {
    if orders.is_empty() {
        return format!("{}\n", empty);
    }
    let mut out = String::new();
    for order in orders {
        let _ = writeln!(out, "{}", order_row(order));
    }
    let _ = writeln!(out, "{}", plural(orders.len(), "order"));
    out
}

pub fn order_detail(order: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order #{}  {}", order.id, badge(order.status.as_str()));
    let _ = writeln!(out, "Customer:  {} <{}>", order.display_name(), order.customer_email);
    let _ = writeln!(out, "Created:   {}", format_datetime(&order.created_at));
    if let Some(updated) = order.updated_at.as_deref() {
        let _ = writeln!(out, "Updated:   {}", format_datetime(updated));
    }
    if order.completed_at.is_some() {
        let _ = writeln!(out, "Completed: {}", format_optional_date(order.completed_at.as_deref()));
    }
    if let Some(address) = order.delivery_address.as_deref() {
        let _ = writeln!(out, "Deliver to: {}", address.replace('\n', ", "));
    }
    if order.delivery_date.is_some() {
        let _ = writeln!(out, "Delivery:  {}", format_optional_date(order.delivery_date.as_deref()));
    }
    if let Some(notes) = order.customer_notes.as_deref().filter(|n| !n.is_empty()) {
        let _ = writeln!(out, "Notes:     {}", notes);
    }
    if order.approval_required {
        match order.approved_by.as_deref().filter(|a| !a.is_empty()) {
            Some(by) => {
                let _ = writeln!(
                    out,
                    "Approval:  approved by {} on {}",
                    by,
                    format_optional_date(order.approved_at.as_deref())
                );
            }
            None => {
                let _ = writeln!(out, "Approval:  required, pending");
            }
        }
    }

    let validated = order
        .line_items
        .iter()
        .filter(|item| item.status.as_ref().map_or(false, LineItemStatus::is_validated))
        .count();
    let _ = writeln!(
        out,
        "\nLine items ({}, {} validated)",
        order.line_items.len(),
        validated
    );
    for item in &order.line_items {
        let _ = write!(out, "  {} × {}", item.name(), item.quantity_text());
        if let Some(resolved) = item.resolved_name() {
            let _ = write!(out, " -> {}", resolved);
        }
        if let Some(code) = item.product_code.as_deref() {
            let _ = write!(out, " [{}]", code);
        }
        let _ = writeln!(
            out,
            "  {} each, {} total  {}",
            price_text(item.unit_price.as_ref()),
            price_text(item.total_price.as_ref()),
            item.status_label()
        );
        if let Some(issue) = item.issue.as_deref() {
            let _ = writeln!(out, "      {}", issue);
        }
    }

    if !order.workflow_tasks.is_empty() {
        let _ = writeln!(out, "\nWorkflow tasks");
        for task in &order.workflow_tasks {
            let _ = writeln!(
                out,
                "  {:<24} {:<12} {} {}",
                task.task_type,
                task.status,
                format_optional_date(task.created_at.as_deref()),
                task.created_by.as_deref().unwrap_or("")
            );
        }
    }

    if !order.applied_rules.is_empty() {
        let _ = writeln!(out, "\nApplied rules");
        for rule in &order.applied_rules {
            let action = rule.action.as_ref().map(value_text).unwrap_or_default();
            let _ = writeln!(out, "  {}  {}", rule.rule_name.as_deref().unwrap_or("Unnamed rule"), action);
        }
    }
    out
}

/// One message of a thread
pub fn email(email: &EmailLog) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] {}  {}",
        email.direction.party(),
        format_datetime(&email.received_at),
        email.subject_or_default()
    );
    let _ = writeln!(out, "  From: {}  To: {}", email.sender, email.recipient);
    if let Some(stage) = email.workflow_stage.as_deref() {
        let _ = writeln!(out, "  Stage: {}", badge(stage));
    }
    if let Some(summary) = email.intent_summary.as_deref() {
        let _ = writeln!(out, "  Intent: {}", summary);
    }
    if email.requires_action {
        let _ = writeln!(out, "  Requires action");
    }
    for line in email.body.as_deref().unwrap_or("").lines() {
        let _ = writeln!(out, "  | {}", line);
    }
    out
}

pub fn thread(emails: &[EmailLog]) -> String {
    if emails.is_empty() {
        return "No emails for this order yet.\n".to_string();
    }
    emails.iter().map(email).collect::<Vec<_>>().join("\n")
}

pub fn email_log_row(email: &EmailLog) -> String {
    format!(
        "{:<6} {:<9} {}  {:<28} {}",
        email.id,
        email.direction.as_str(),
        format_datetime(&email.received_at),
        truncate(&email.sender, 28),
        truncate(email.subject_or_default(), 60)
    )
}

pub fn conversation_summary(summary: &ConversationSummary) -> String {
    format!(
        "{} | {} incoming, {} outgoing, {} requiring action",
        plural(summary.total, "conversation"),
        summary.incoming,
        summary.outgoing,
        summary.requires_action
    )
}

pub fn conversation_row(conversation: &Conversation) -> String {
    let mut line = format!(
        "#{:<5} {:<28} {:<40} {:<10} {}  {}",
        conversation.order_id,
        truncate(
            conversation
                .customer_name
                .as_deref()
                .filter(|n| !n.is_empty())
                .unwrap_or(&conversation.customer_email),
            28
        ),
        truncate(&conversation.subject, 40),
        plural(conversation.email_count as usize, "email"),
        format_date(&conversation.latest_email_date),
        badge(&conversation.status)
    );
    if conversation.requires_action {
        line.push_str("  !");
    }
    line
}

pub fn actions(order: &Order, available: &[OrderAction]) -> String {
    if available.is_empty() {
        return format!("No actions available for order #{}\n", order.id);
    }
    let mut out = String::new();
    for action in available {
        let _ = writeln!(out, "{:<20} {}", action.name(), action.title());
    }
    out
}

pub fn rule_row(rule: &Rule) -> String {
    format!(
        "{:<5} {:<32} {:<10} p{:<3} {}",
        rule.id,
        truncate(&rule.name, 32),
        rule.rule_type.as_str(),
        rule.priority,
        if rule.is_active { "active" } else { "inactive" }
    )
}

pub fn rule_detail(rule: &Rule) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Rule {}: {}", rule.id, rule.name);
    if !rule.description.is_empty() {
        let _ = writeln!(out, "{}", rule.description);
    }
    let _ = writeln!(out, "Type:     {}", rule.rule_type);
    let _ = writeln!(out, "Priority: {}", rule.priority);
    let _ = writeln!(out, "Active:   {}", if rule.is_active { "yes" } else { "no" });
    let _ = writeln!(out, "Created:  {}", format_optional_date(rule.created_at.as_deref()));
    let _ = writeln!(out, "Conditions:\n{}", blob_text(&rule.conditions));
    let _ = writeln!(out, "Actions:\n{}", blob_text(&rule.actions));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order() -> Order {
        serde_json::from_value(json!({
            "id": 42,
            "customer_email": "procurement@company.com",
            "customer_name": "Operations Manager",
            "status": "pending_approval",
            "created_at": "2024-05-01T14:03:22.5",
            "approval_required": true,
            "line_items": [
                {"requested_name": "Desk TRÄNHOLM 19", "requested_quantity": 25, "unit_price": "199.00", "status": "VALIDATED"},
                {"requested_name": "Desk NORDMARK 476", "requested_quantity": 15, "status": "NOT_FOUND", "issue": "No such product"}
            ],
            "applied_rules": [{"rule_name": "Large order approval", "action": "require_approval"}]
        }))
        .unwrap()
    }

    #[test]
    fn badges_use_first_underscore_only() {
        assert_eq!(badge("in_process"), "◐ in process");
        assert_eq!(badge("pending_approval"), "○ pending approval");
        assert_eq!(badge("archived"), "· archived");
    }

    #[test]
    fn order_row_summarises_items() {
        let row = order_row(&order());
        assert!(row.starts_with("#42"));
        assert!(row.contains("2024-05-01"));
        assert!(row.contains("Desk TRÄNHOLM 19 × 25, Desk NORDMARK 476 × 15"));
    }

    #[test]
    fn order_detail_sections() {
        let text = order_detail(&order());
        assert!(text.contains("Approval:  required, pending"));
        assert!(text.contains("Line items (2, 1 validated)"));
        assert!(text.contains("$199.00 each, $0.00 total  Validated"));
        assert!(text.contains("No such product"));
        assert!(text.contains("Large order approval  require_approval"));
        assert!(!text.contains("Workflow tasks"));
    }

    #[test]
    fn empty_order_list() {
        assert_eq!(order_list(&[], "No new inquiries"), "No new inquiries\n");
    }

    #[test]
    fn dashboard_lists_breakdowns() {
        let stats: Stats = serde_json::from_value(json!({
            "total_orders": 5,
            "orders_by_status": {"completed": 2, "inquiry": 3}
        }))
        .unwrap();
        let text = dashboard(&stats);
        assert!(text.contains("Total orders               5"));
        assert!(text.contains("● completed"));
        assert!(text.contains("Emails by stage\n  (none)"));
    }

    #[test]
    fn email_shows_party_and_body() {
        let email: EmailLog = serde_json::from_value(json!({
            "id": 1,
            "direction": "incoming",
            "subject": "",
            "sender": "buyer@shop.com",
            "recipient": "sales@company.com",
            "body": "Line one\nLine two",
            "requires_action": true,
            "received_at": "2024-05-01T09:15:00"
        }))
        .unwrap();
        let text = super::email(&email);
        assert!(text.starts_with("[Customer] 2024-05-01 09:15  No subject"));
        assert!(text.contains("  | Line two"));
        assert!(text.contains("Requires action"));
    }

    #[test]
    fn health_line() {
        let ok: Health = serde_json::from_value(json!({"status": "healthy"})).unwrap();
        assert_eq!(health("http://localhost:8000", &ok), "http://localhost:8000: healthy");
        let bad: Health = serde_json::from_value(json!({"status": "degraded"})).unwrap();
        assert_eq!(
            health("http://localhost:8000", &bad),
            "http://localhost:8000: unhealthy (degraded)"
        );
    }

    #[test]
    fn rule_rows() {
        let rule: Rule = serde_json::from_value(json!({
            "id": 3,
            "name": "Bulk discount",
            "conditions": {"min_quantity": 50},
            "actions": "apply 5%",
            "priority": 2,
            "rule_type": "amount",
            "is_active": false
        }))
        .unwrap();
        assert!(rule_row(&rule).ends_with("inactive"));
        let detail = rule_detail(&rule);
        assert!(detail.contains("\"min_quantity\": 50"));
        assert!(detail.contains("Actions:\napply 5%"));
        assert!(detail.contains("Created:  N/A"));
    }
}
