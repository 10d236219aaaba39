//! Customer list filtering for the customers page.
//!
//! Stateless: safe to re-run on every keystroke.

use crate::customer::{Customer, RiskLevel};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Risk-level selector. `all` disables the risk predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskFilter {
    #[default]
    All,
    #[serde(untagged)]
    Level(RiskLevel),
}

impl RiskFilter {
    pub fn matches(&self, level: RiskLevel) -> bool {
        match self {
            RiskFilter::All      => true,
            RiskFilter::Level(l) => *l == level,
        }
    }
}

impl FromStr for RiskFilter {
    type Err = std::convert::Infallible;

    /// Unknown selectors fall back to `All`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<RiskLevel>().map(RiskFilter::Level).unwrap_or(RiskFilter::All))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub risk:   RiskFilter,
}

impl CustomerFilter {
    pub fn new(search: impl Into<String>, risk: RiskFilter) -> Self {
        Self { search: search.into(), risk }
    }

    /// Case-insensitive substring on name OR email, AND the risk selector.
    pub fn matches(&self, customer: &Customer) -> bool {
        let needle = self.search.trim().to_lowercase();
        self.risk.matches(customer.risk_level) && matches_search(customer, &needle)
    }

    /// Matching customers in their original order.
    pub fn apply(&self, customers: &[Customer]) -> Vec<Customer> {
        let needle = self.search.trim().to_lowercase();
        customers
            .iter()
            .filter(|c| self.risk.matches(c.risk_level) && matches_search(c, &needle))
            .cloned()
            .collect()
    }
}

fn matches_search(customer: &Customer, needle: &str) -> bool {
    needle.is_empty()
        || customer.name.to_lowercase().contains(needle)
        || customer.email.to_lowercase().contains(needle)
}
