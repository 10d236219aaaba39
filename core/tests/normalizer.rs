//! Customer record normalization: defaults, coercion, order.

mod common;

use churnguard_core::customer::{
    normalize_customers, PaymentStatus, RawCustomer, RiskLevel,
};
use common::{customer, raw};
use serde_json::json;

#[test]
fn empty_record_gets_every_default() {
    let c = customer(json!({}));

    assert_eq!(c.id, "");
    assert_eq!(c.mrr, 0.0);
    assert_eq!(c.health_score, 0);
    assert_eq!(c.risk_level, RiskLevel::Low);
    assert_eq!(c.payment_status, PaymentStatus::Unknown);
    assert_eq!(c.support_tickets_count, 0);
    assert_eq!(c.features_used_count, 0);
    assert!(c.contract_end_date.is_none());
    assert!(c.last_login_at.is_none());
}

#[test]
fn numeric_and_string_ids_key_the_same_way() {
    let a = customer(json!({ "id": 17 }));
    let b = customer(json!({ "id": "17" }));
    assert_eq!(a.id, "17");
    assert_eq!(a.id, b.id);
}

/// mrr accepts numeric strings; anything else non-numeric, negative or
/// missing becomes 0.
#[test]
fn mrr_is_coerced_and_never_negative() {
    assert_eq!(customer(json!({ "mrr": "2500.50" })).mrr, 2500.5);
    assert_eq!(customer(json!({ "mrr": 1200 })).mrr, 1200.0);
    assert_eq!(customer(json!({ "mrr": "n/a" })).mrr, 0.0);
    assert_eq!(customer(json!({ "mrr": null })).mrr, 0.0);
    assert_eq!(customer(json!({ "mrr": -40 })).mrr, 0.0);
    assert_eq!(customer(json!({ "mrr": [1, 2] })).mrr, 0.0);
}

#[test]
fn unknown_risk_level_defaults_to_low() {
    assert_eq!(customer(json!({ "riskLevel": "critical" })).risk_level, RiskLevel::Low);
    assert_eq!(customer(json!({ "riskLevel": "" })).risk_level, RiskLevel::Low);
    assert_eq!(customer(json!({ "riskLevel": "HIGH" })).risk_level, RiskLevel::High);
    assert_eq!(customer(json!({ "riskLevel": " medium " })).risk_level, RiskLevel::Medium);
}

#[test]
fn unknown_payment_status_defaults_to_unknown() {
    assert_eq!(customer(json!({ "paymentStatus": "late" })).payment_status, PaymentStatus::Late);
    assert_eq!(customer(json!({ "paymentStatus": "failed" })).payment_status, PaymentStatus::Failed);
    assert_eq!(customer(json!({ "paymentStatus": "overdue" })).payment_status, PaymentStatus::Unknown);
}

/// The backend sends snake_case keys; both spellings normalize identically.
#[test]
fn snake_case_backend_keys_are_accepted() {
    let c = customer(json!({
        "id": 5,
        "health_score": 42,
        "risk_level": "high",
        "contract_end_date": "2026-11-30",
        "last_login_at": "2026-10-01T08:00:00Z",
        "support_tickets_count": 4,
        "features_used_count": 3,
        "payment_status": "current",
    }));

    assert_eq!(c.health_score, 42);
    assert_eq!(c.risk_level, RiskLevel::High);
    assert_eq!(c.contract_end_date.unwrap().to_string(), "2026-11-30");
    assert!(c.last_login_at.is_some());
    assert_eq!(c.support_tickets_count, 4);
    assert_eq!(c.features_used_count, 3);
    assert_eq!(c.payment_status, PaymentStatus::Current);
}

#[test]
fn counts_and_scores_tolerate_junk() {
    let c = customer(json!({
        "healthScore": "71.6",
        "supportTicketsCount": -3,
        "featuresUsedCount": "seven",
        "contractEndDate": "someday",
    }));
    assert_eq!(c.health_score, 72);
    assert_eq!(c.support_tickets_count, 0);
    assert_eq!(c.features_used_count, 0);
    assert!(c.contract_end_date.is_none());
}

/// Output has the same length and order as the input, including
/// records that are not even objects.
#[test]
fn order_and_count_are_preserved() {
    let input = vec![
        raw(json!({ "id": "b", "mrr": 10 })),
        RawCustomer::from_value(json!("garbage")),
        raw(json!({ "id": "a", "mrr": -1, "riskLevel": "extreme" })),
        raw(json!({ "id": 3 })),
    ];

    let out = normalize_customers(&input);

    assert_eq!(out.len(), input.len());
    let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "", "a", "3"]);
    for c in &out {
        assert!(c.mrr >= 0.0);
        assert!(RiskLevel::ALL.contains(&c.risk_level));
    }
}
