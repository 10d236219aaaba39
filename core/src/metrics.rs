//! Portfolio-wide metrics over the normalized customer list.
//!
//! Pure functions: no I/O, deterministic, defined for the empty list.

use crate::customer::{Customer, RiskLevel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub low:    usize,
    pub medium: usize,
    pub high:   usize,
}

impl RiskDistribution {
    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total:              usize,
    pub high_risk_count:    usize,
    #[serde(rename = "atRiskMRR")]
    pub at_risk_mrr:        f64,
    pub avg_health_score:   i64,
    pub risk_distribution:  RiskDistribution,
}

/// Share of recurring revenue held by high-risk customers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueAtRisk {
    #[serde(rename = "atRiskMRR")]
    pub at_risk_mrr: f64,
    #[serde(rename = "totalMRR")]
    pub total_mrr:   f64,
    /// at_risk_mrr / total_mrr, 0 when there is no revenue.
    pub risk_ratio:  f64,
}

/// Single pass over the list.
pub fn compute_metrics(customers: &[Customer]) -> Metrics {
    let mut distribution = RiskDistribution::default();
    let mut at_risk_mrr = 0.0;
    // Scores are not clamped on the way in, so sum wide.
    let mut health_sum: i128 = 0;

    for c in customers {
        match c.risk_level {
            RiskLevel::Low    => distribution.low += 1,
            RiskLevel::Medium => distribution.medium += 1,
            RiskLevel::High   => {
                distribution.high += 1;
                at_risk_mrr += c.mrr;
            }
        }
        health_sum += i128::from(c.health_score);
    }

    let total = customers.len();
    let avg_health_score = if total == 0 {
        0
    } else {
        // f64::round is half-away-from-zero: 58.5 -> 59. The cast saturates.
        (health_sum as f64 / total as f64).round() as i64
    };

    Metrics {
        total,
        high_risk_count: distribution.high,
        at_risk_mrr,
        avg_health_score,
        risk_distribution: distribution,
    }
}

pub fn revenue_at_risk(customers: &[Customer]) -> RevenueAtRisk {
    let (at_risk_mrr, total_mrr) = customers.iter().fold((0.0, 0.0), |(risk, total), c| {
        let risk = if c.risk_level == RiskLevel::High { risk + c.mrr } else { risk };
        (risk, total + c.mrr)
    });

    let risk_ratio = if total_mrr > 0.0 { at_risk_mrr / total_mrr } else { 0.0 };

    RevenueAtRisk { at_risk_mrr, total_mrr, risk_ratio }
}
