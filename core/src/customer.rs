//! Customer record normalization.
//!
//! RULE: Raw backend payloads are normalized exactly once, at ingestion.
//! Nothing downstream of normalize_customers() inspects raw JSON or
//! applies its own defaults.
//!
//! Malformed input never fails: every field degrades to its documented
//! default and the record is kept.

use crate::types::{CustomerId, RawRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// ── Enumerations ─────────────────────────────────────────────────────────────

/// Coarse churn-risk bucket, assigned upstream.
/// Independent of health score: the two may disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low    => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High   => "high",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low"    => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high"   => Ok(RiskLevel::High),
            other    => Err(format!("unknown risk level '{other}'")),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Current,
    Late,
    Failed,
    #[default]
    Unknown,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Current => "current",
            PaymentStatus::Late    => "late",
            PaymentStatus::Failed  => "failed",
            PaymentStatus::Unknown => "unknown",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(PaymentStatus::Current),
            "late"    => Ok(PaymentStatus::Late),
            "failed"  => Ok(PaymentStatus::Failed),
            "unknown" => Ok(PaymentStatus::Unknown),
            other     => Err(format!("unknown payment status '{other}'")),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Records ──────────────────────────────────────────────────────────────────

/// A customer object exactly as the backend sent it.
///
/// Keys are accepted in both camelCase and snake_case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawCustomer(pub RawRecord);

impl RawCustomer {
    /// Wrap any JSON value. Non-objects become an empty record, which
    /// normalizes to an all-defaults customer.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _                  => Self::default(),
        }
    }

    fn field(&self, camel: &str, snake: &str) -> Option<&Value> {
        self.0
            .get(camel)
            .or_else(|| self.0.get(snake))
            .filter(|v| !v.is_null())
    }
}

/// Canonical customer record. Every field is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id:                    CustomerId,
    pub name:                  String,
    pub email:                 String,
    pub mrr:                   f64,
    pub contract_end_date:     Option<NaiveDate>,
    pub status:                String,
    pub health_score:          i64,
    pub risk_level:            RiskLevel,
    pub last_login_at:         Option<DateTime<Utc>>,
    pub support_tickets_count: u32,
    pub features_used_count:   u32,
    pub payment_status:        PaymentStatus,
}

// ── Normalization ────────────────────────────────────────────────────────────

/// Normalize a whole payload. Same length and order as the input.
pub fn normalize_customers(raw: &[RawCustomer]) -> Vec<Customer> {
    let customers: Vec<Customer> = raw.iter().map(normalize_customer).collect();
    log::debug!("normalizer: {} customer records", customers.len());
    customers
}

pub fn normalize_customer(raw: &RawCustomer) -> Customer {
    let id = raw.field("id", "id").and_then(value_as_string).unwrap_or_default();

    let mrr = match raw.field("mrr", "mrr").and_then(value_as_number) {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        Some(v) => {
            log::warn!("normalizer: customer '{id}' has invalid mrr {v}, using 0");
            0.0
        }
        None => 0.0,
    };

    let health_score = raw
        .field("healthScore", "health_score")
        .and_then(value_as_number)
        .filter(|v| v.is_finite())
        .map(|v| v.round() as i64)
        .unwrap_or(0);

    let risk_level = match raw.field("riskLevel", "risk_level").and_then(value_as_string) {
        Some(s) if !s.is_empty() => s.parse().unwrap_or_else(|e| {
            log::warn!("normalizer: customer '{id}': {e}, using low");
            RiskLevel::Low
        }),
        _ => RiskLevel::Low,
    };

    let payment_status = match raw
        .field("paymentStatus", "payment_status")
        .and_then(value_as_string)
    {
        Some(s) if !s.is_empty() => s.parse().unwrap_or_else(|e| {
            log::warn!("normalizer: customer '{id}': {e}, using unknown");
            PaymentStatus::Unknown
        }),
        _ => PaymentStatus::Unknown,
    };

    Customer {
        name:   text_field(raw, "name", "name"),
        email:  text_field(raw, "email", "email"),
        mrr,
        contract_end_date: raw
            .field("contractEndDate", "contract_end_date")
            .and_then(Value::as_str)
            .and_then(parse_date),
        status: raw
            .field("status", "status")
            .and_then(value_as_string)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "unknown".into()),
        health_score,
        risk_level,
        last_login_at: raw
            .field("lastLoginAt", "last_login_at")
            .and_then(Value::as_str)
            .and_then(parse_timestamp),
        support_tickets_count: count_field(raw, "supportTicketsCount", "support_tickets_count"),
        features_used_count:   count_field(raw, "featuresUsedCount", "features_used_count"),
        payment_status,
        id,
    }
}

// ── Field coercion ───────────────────────────────────────────────────────────

/// Render a scalar as a string. Used for ids, which arrive as either
/// numbers or strings depending on the backend version. Whole floats
/// drop the fraction so `17.0` and `17` name the same customer.
pub(crate) fn value_as_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INT => {
                (f as i64).to_string()
            }
            _ => n.to_string(),
        }),
        Value::Bool(b)   => Some(b.to_string()),
        _                => None,
    }
}

/// 2^53: beyond this an f64 no longer holds every integer.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

fn value_as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _                => None,
    }
}

fn text_field(raw: &RawCustomer, camel: &str, snake: &str) -> String {
    raw.field(camel, snake).and_then(value_as_string).unwrap_or_default()
}

fn count_field(raw: &RawCustomer, camel: &str, snake: &str) -> u32 {
    raw.field(camel, snake)
        .and_then(value_as_number)
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v.min(u32::MAX as f64) as u32)
        .unwrap_or(0)
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(s).map(|t| t.date_naive()))
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (taken as UTC),
/// or a bare date (midnight UTC).
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(t.and_utc());
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(t.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}
