//! Recommended-action rules for the customer detail page.
//!
//! Rules are independent. Each one that fires appends one action, in the
//! order declared below. The output is NOT re-sorted by priority; compare
//! alert::rank_alerts, which is.

use crate::{
    alert::AlertPriority,
    config::DashboardConfig,
    customer::{Customer, PaymentStatus},
};
use serde::{Deserialize, Serialize};

/// Shown by the renderer when recommend_actions() returns nothing.
pub const NO_ACTIONS: &str = "No recommended actions";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedAction {
    pub priority:    AlertPriority,
    pub title:       String,
    pub description: String,
}

impl RecommendedAction {
    fn new(priority: AlertPriority, title: &str, description: String) -> Self {
        Self { priority, title: title.to_string(), description }
    }
}

pub fn recommend_actions(customer: &Customer, config: &DashboardConfig) -> Vec<RecommendedAction> {
    let mut actions = Vec::new();

    // 1. Low health
    if customer.health_score < config.low_health_threshold {
        actions.push(RecommendedAction::new(
            AlertPriority::High,
            "Schedule urgent check-in call",
            format!("Health score is {}/100", customer.health_score),
        ));
    }

    // 2. Support load
    if customer.support_tickets_count > config.support_ticket_threshold {
        actions.push(RecommendedAction::new(
            AlertPriority::High,
            "Review support ticket history",
            format!("{} support tickets opened", customer.support_tickets_count),
        ));
    }

    // 3. Shallow adoption
    if customer.features_used_count < config.low_feature_usage_threshold {
        actions.push(RecommendedAction::new(
            AlertPriority::Medium,
            "Offer product training session",
            format!(
                "Only using {} of {} features",
                customer.features_used_count, config.feature_catalog_size,
            ),
        ));
    }

    // 4. Billing
    if customer.payment_status != PaymentStatus::Current {
        actions.push(RecommendedAction::new(
            AlertPriority::High,
            "Address payment issue",
            format!("Payment status: {}", customer.payment_status),
        ));
    }

    log::debug!("actions: customer '{}' -> {} actions", customer.id, actions.len());
    actions
}
