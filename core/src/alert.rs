//! Alert indexing and risk-reason resolution.
//!
//! Alerts are many-to-one with customers. The index groups them by
//! customer id, preserving arrival order within each group. Readers only
//! ever borrow from the index; ranking never reorders the stored groups.

use crate::{
    customer::value_as_string,
    types::{CustomerId, RawRecord},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Shown when a customer has no alerts at all.
pub const NO_ACTIVE_RISKS: &str = "No active risks";

/// Alert urgency. Declaration order is the ranking order:
/// `High < Medium < Low`, so the most urgent alert sorts first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    High,
    Medium,
    #[default]
    Low,
}

impl AlertPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertPriority::High   => "high",
            AlertPriority::Medium => "medium",
            AlertPriority::Low    => "low",
        }
    }
}

impl FromStr for AlertPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high"   => Ok(AlertPriority::High),
            "medium" => Ok(AlertPriority::Medium),
            "low"    => Ok(AlertPriority::Low),
            other    => Err(format!("unknown alert priority '{other}'")),
        }
    }
}

impl fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An alert object exactly as the backend sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAlert(pub RawRecord);

impl RawAlert {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _                  => Self::default(),
        }
    }

    fn text(&self, camel: &str, snake: &str) -> Option<String> {
        self.0
            .get(camel)
            .or_else(|| self.0.get(snake))
            .and_then(value_as_string)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub customer_id: CustomerId,
    pub title:       String,
    pub description: String,
    pub priority:    AlertPriority,
}

pub fn normalize_alerts(raw: &[RawAlert]) -> Vec<Alert> {
    raw.iter().map(normalize_alert).collect()
}

pub fn normalize_alert(raw: &RawAlert) -> Alert {
    let customer_id = raw.text("customerId", "customer_id").unwrap_or_default();
    let priority = match raw.text("priority", "priority") {
        Some(p) if !p.is_empty() => p.parse().unwrap_or_else(|e| {
            log::warn!("alerts: customer '{customer_id}': {e}, using low");
            AlertPriority::Low
        }),
        _ => AlertPriority::Low,
    };

    Alert {
        title:       raw.text("title", "title").unwrap_or_default(),
        description: raw.text("description", "description").unwrap_or_default(),
        priority,
        customer_id,
    }
}

// ── Index ────────────────────────────────────────────────────────────────────

/// Alerts grouped by customer id.
#[derive(Debug, Clone, Default)]
pub struct AlertIndex {
    by_customer: HashMap<CustomerId, Vec<Alert>>,
}

impl AlertIndex {
    pub fn build(alerts: &[Alert]) -> Self {
        let mut by_customer: HashMap<CustomerId, Vec<Alert>> = HashMap::new();
        for alert in alerts {
            by_customer
                .entry(alert.customer_id.clone())
                .or_default()
                .push(alert.clone());
        }
        log::debug!(
            "alerts: indexed {} alerts across {} customers",
            alerts.len(),
            by_customer.len(),
        );
        Self { by_customer }
    }

    /// A customer's alerts in arrival order. Unknown ids have none.
    pub fn for_customer(&self, customer_id: &str) -> &[Alert] {
        self.by_customer
            .get(customer_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn customer_count(&self) -> usize {
        self.by_customer.len()
    }
}

/// The title of the customer's most urgent alert, or [`NO_ACTIVE_RISKS`].
///
/// Ties keep arrival order: `min_by_key` returns the first minimum.
pub fn risk_reason(customer_id: &str, index: &AlertIndex) -> String {
    index
        .for_customer(customer_id)
        .iter()
        .min_by_key(|a| a.priority)
        .map(|a| a.title.clone())
        .unwrap_or_else(|| NO_ACTIVE_RISKS.to_string())
}

/// All alerts ranked most-urgent first, ties in arrival order.
/// Returns a new vec; the input is left as it was.
pub fn rank_alerts(alerts: &[Alert]) -> Vec<Alert> {
    let mut ranked = alerts.to_vec();
    ranked.sort_by_key(|a| a.priority);
    ranked
}
