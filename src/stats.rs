//! Aggregate counters shown on the dashboard

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::de::null_as_default;
use crate::workflow::{stage_label, status_badge, BadgeStyle};

/// Response of `GET /api/stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_orders: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub orders_by_status: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_emails: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub emails_by_stage: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pending_tasks: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed_tasks_today: u64,
}

/// One row of a histogram breakdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownRow {
    pub key: String,
    pub label: String,
    pub count: u64,
    pub badge: BadgeStyle,
}

fn breakdown(histogram: &BTreeMap<String, u64>) -> Vec<BreakdownRow> {
    histogram
        .iter()
        .map(|(key, count)| BreakdownRow {
            key: key.clone(),
            label: stage_label(key),
            count: *count,
            badge: status_badge(key),
        })
        .collect()
}

impl Stats {
    pub fn status_breakdown(&self) -> Vec<BreakdownRow> {
        breakdown(&self.orders_by_status)
    }

    pub fn stage_breakdown(&self) -> Vec<BreakdownRow> {
        breakdown(&self.emails_by_stage)
    }
}

/// Response of `GET /health`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Health {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.status
            .as_deref()
            .map_or(true, |s| matches!(s, "healthy" | "ok" | "OK"))
    }
}
