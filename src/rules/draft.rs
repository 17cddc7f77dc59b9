//! Form buffer behind the rule create/edit dialog

use serde_json::Value;

use super::types::{NewRule, Rule, RuleType, RuleUpdate};

pub const MIN_PRIORITY: i32 = 1;
pub const MAX_PRIORITY: i32 = 10;

/// Editable rule fields, with the blobs held as free text
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDraft {
    pub name: String,
    pub description: String,
    pub conditions: String,
    pub actions: String,
    pub priority: i32,
    pub rule_type: RuleType,
    pub is_active: bool,
}

impl Default for RuleDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            conditions: String::new(),
            actions: String::new(),
            priority: MIN_PRIORITY,
            rule_type: RuleType::Quantity,
            is_active: true,
        }
    }
}

impl RuleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an existing rule for editing, pretty-printing its blobs
    pub fn from_rule(rule: &Rule) -> Self {
        Self {
            name: rule.name.clone(),
            description: rule.description.clone(),
            conditions: blob_text(&rule.conditions),
            actions: blob_text(&rule.actions),
            priority: rule.priority,
            rule_type: rule.rule_type.clone(),
            is_active: rule.is_active,
        }
    }

    /// Applies raw priority input, see [`parse_priority`]
    pub fn set_priority_input(&mut self, input: &str) {
        self.priority = parse_priority(input);
    }

    pub fn to_new_rule(&self) -> NewRule {
        NewRule {
            name: self.name.clone(),
            description: self.description.clone(),
            conditions: blob_value(&self.conditions),
            actions: blob_value(&self.actions),
            priority: self.priority,
            rule_type: self.rule_type.clone(),
            is_active: self.is_active,
        }
    }

    pub fn to_update(&self) -> RuleUpdate {
        RuleUpdate::from(self.to_new_rule())
    }
}

/// Priority from raw form input. The leading integer counts, so `3.7` is 3
/// and `7abc` is 7. No digits or `0` gives 1; the result is clamped to 1..=10.
pub fn parse_priority(input: &str) -> i32 {
    leading_integer(input)
        .filter(|p| *p != 0)
        .map(|p| p.clamp(MIN_PRIORITY as i64, MAX_PRIORITY as i64) as i32)
        .unwrap_or(MIN_PRIORITY)
}

fn leading_integer(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(sign * value)
}

/// Blob as the backend receives it: the form text, unparsed, as a JSON string
pub fn blob_value(text: &str) -> Value {
    Value::String(text.to_string())
}

/// Editable text for a stored blob. Strings are shown as-is, so a blob that
/// was saved as raw text round-trips unchanged.
pub fn blob_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
