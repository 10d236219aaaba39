//! Currency, percentage, last-login and contract-expiry helpers.

mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use churnguard_core::display::{
    contract_status, format_currency, format_last_login, format_percent, ContractStatus,
};
use common::customer;
use serde_json::json;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[test]
fn currency_formatting() {
    assert_eq!(format_currency(0.0, "USD"), "$0.00");
    assert_eq!(format_currency(1200.0, "USD"), "$1,200.00");
    assert_eq!(format_currency(1234567.891, "USD"), "$1,234,567.89");
    assert_eq!(format_currency(-42.5, "USD"), "-$42.50");
    assert_eq!(format_currency(f64::NAN, "USD"), "$0.00");
}

#[test]
fn currency_code_selects_the_prefix() {
    assert_eq!(format_currency(1200.0, "eur"), "€1,200.00");
    assert_eq!(format_currency(-3.0, "GBP"), "-£3.00");
    assert_eq!(format_currency(10.0, "CHF"), "CHF 10.00");
    assert_eq!(format_currency(10.0, ""), "$10.00");
}

#[test]
fn percent_formatting() {
    assert_eq!(format_percent(0.0), "0%");
    assert_eq!(format_percent(0.256), "26%");
    assert_eq!(format_percent(1.0), "100%");
}

#[test]
fn last_login_never() {
    assert_eq!(format_last_login(None), "Never");
    let t = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
    assert_eq!(format_last_login(Some(t)), "Mar 1, 2026");
}

#[test]
fn contract_states() {
    let window = 30;

    let no_term = customer(json!({}));
    assert_eq!(contract_status(&no_term, today(), window), ContractStatus::NoTerm);

    let far = customer(json!({ "contractEndDate": "2027-10-19" }));
    assert_eq!(contract_status(&far, today(), window), ContractStatus::Active { days_left: 365 });

    let edge = customer(json!({ "contractEndDate": "2026-11-18" }));
    let status = contract_status(&edge, today(), window);
    assert_eq!(status, ContractStatus::ExpiringSoon { days_left: 30 });
    assert!(status.is_highlighted());

    let ends_today = customer(json!({ "contractEndDate": "2026-10-19" }));
    assert_eq!(
        contract_status(&ends_today, today(), window),
        ContractStatus::ExpiringSoon { days_left: 0 }
    );

    let lapsed = customer(json!({ "contractEndDate": "2026-10-09" }));
    assert_eq!(contract_status(&lapsed, today(), window), ContractStatus::Expired { days_ago: 10 });
    assert!(!ContractStatus::NoTerm.is_highlighted());
}
