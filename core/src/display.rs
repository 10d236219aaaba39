//! Display helpers shared by the view-models: currency, percentages,
//! last-login labels and contract-expiry highlighting.

use crate::customer::Customer;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const NEVER_LOGGED_IN: &str = "Never";

/// Where a customer's contract stands relative to `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContractStatus {
    /// No fixed term.
    NoTerm,
    Active       { days_left: i64 },
    /// Ends within the configured window; highlighted in the UI.
    ExpiringSoon { days_left: i64 },
    Expired      { days_ago: i64 },
}

impl ContractStatus {
    pub fn is_highlighted(&self) -> bool {
        matches!(self, ContractStatus::ExpiringSoon { .. } | ContractStatus::Expired { .. })
    }
}

pub fn contract_status(customer: &Customer, today: NaiveDate, window_days: i64) -> ContractStatus {
    let Some(end) = customer.contract_end_date else {
        return ContractStatus::NoTerm;
    };
    let days_left = (end - today).num_days();
    if days_left < 0 {
        ContractStatus::Expired { days_ago: -days_left }
    } else if days_left <= window_days {
        ContractStatus::ExpiringSoon { days_left }
    } else {
        ContractStatus::Active { days_left }
    }
}

/// en-US style money: `$1,234.56`, `-$12.00`, `€9.99`. Codes without a
/// known symbol are written as a prefix (`CHF 10.00`). Non-finite
/// amounts render as zero.
pub fn format_currency(amount: f64, currency_code: &str) -> String {
    let cents = if amount.is_finite() { (amount * 100.0).round() as i64 } else { 0 };
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{sign}{}{}.{:02}",
        currency_prefix(currency_code),
        group_thousands(cents / 100),
        cents % 100
    )
}

fn currency_prefix(code: &str) -> String {
    match code.trim().to_ascii_uppercase().as_str() {
        "" | "USD" => "$".into(),
        "EUR"      => "€".into(),
        "GBP"      => "£".into(),
        "JPY"      => "¥".into(),
        other      => format!("{other} "),
    }
}

/// A ratio in [0, 1] as a whole percentage: 0.256 -> `26%`.
pub fn format_percent(ratio: f64) -> String {
    let pct = if ratio.is_finite() { (ratio * 100.0).round() as i64 } else { 0 };
    format!("{pct}%")
}

pub fn format_last_login(last_login_at: Option<DateTime<Utc>>) -> String {
    match last_login_at {
        Some(t) => t.format("%b %-d, %Y").to_string(),
        None    => NEVER_LOGGED_IN.to_string(),
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
