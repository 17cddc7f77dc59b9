//! Local views over an already fetched order list

use super::types::Order;
use crate::workflow::OrderStatus;

/// Orders whose status equals `status`
pub fn with_status(orders: Vec<Order>, status: &OrderStatus) -> Vec<Order> {
    orders.into_iter().filter(|o| &o.status == status).collect()
}

/// New inquiries waiting to be picked up (the Orders page)
pub fn inquiries(orders: Vec<Order>) -> Vec<Order> {
    with_status(orders, &OrderStatus::Inquiry)
}

/// Finished orders (the Completed Orders page)
pub fn completed(orders: Vec<Order>) -> Vec<Order> {
    with_status(orders, &OrderStatus::Completed)
}

/// Everything still open, for the communication and conversation pages
pub fn active(orders: Vec<Order>) -> Vec<Order> {
    orders
        .into_iter()
        .filter(|o| o.status != OrderStatus::Completed)
        .collect()
}

/// `Desk A × 25`, at most `max` entries, then `+N more`.
pub fn item_summary(order: &Order, max: usize) -> Vec<String> {
    let mut lines: Vec<String> = order
        .line_items
        .iter()
        .take(max)
        .map(|item| format!("{} × {}", item.name(), item.quantity_text()))
        .collect();
    if order.line_items.len() > max {
        lines.push(format!("+{} more", order.line_items.len() - max));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(id: i64, status: &str) -> Order {
        serde_json::from_value(json!({
            "id": id,
            "customer_email": format!("c{}@example.com", id),
            "status": status,
            "created_at": "2024-05-01T10:00:00",
        }))
        .unwrap()
    }

    fn mixed() -> Vec<Order> {
        vec![order(1, "inquiry"), order(2, "in_process"), order(3, "completed")]
    }

    #[test]
    fn orders_view_keeps_only_inquiries() {
        let ids: Vec<i64> = inquiries(mixed()).iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn completed_view_keeps_only_completed() {
        let ids: Vec<i64> = completed(mixed()).iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn active_view_drops_completed() {
        let ids: Vec<i64> = active(mixed()).iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn item_summary_truncates() {
        let order: Order = serde_json::from_value(json!({
            "id": 9,
            "customer_email": "x@example.com",
            "status": "completed",
            "created_at": "2024-05-01T10:00:00",
            "line_items": [
                {"requested_name": "A", "requested_quantity": 1},
                {"requested_name": "B", "requested_quantity": 2},
                {"requested_name": "C", "requested_quantity": 3},
                {"requested_name": "D", "requested_quantity": 4},
                {"requested_name": "E", "requested_quantity": 5}
            ]
        }))
        .unwrap();
        assert_eq!(item_summary(&order, 3), vec!["A × 1", "B × 2", "C × 3", "+2 more"]);
    }
}
