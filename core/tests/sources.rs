//! Data-source implementations and the fetch-or-empty boundary.

use churnguard_core::{
    error::{DashError, DashResult},
    source::{fetch_or_empty, DataSource, JsonDirSource, RiskMomentumRow, StaticSource},
};
use serde_json::json;

fn sample_dir() -> String {
    format!("{}/../data", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn json_dir_source_reads_sample_data() {
    let src = JsonDirSource::new(sample_dir());

    assert_eq!(src.customers().unwrap().len(), 3);
    assert_eq!(src.alerts().unwrap().len(), 3);
    let trend = src.churn_trend().unwrap();
    assert_eq!(trend.len(), 3);
    assert_eq!(trend[2].month, "2026-09");

    let momentum = src.risk_momentum().unwrap();
    assert_eq!(momentum.len(), 2);
    assert_eq!(momentum[0].trend, "rising");
    // numeric cells are stringified
    assert_eq!(momentum[1].delta, "-6");
}

#[test]
fn json_dir_source_missing_dir_errors() {
    let src = JsonDirSource::new("/definitely/not/here");
    assert!(matches!(src.customers(), Err(DashError::Io(_))));
    // trend.json and risk_momentum.json are optional
    assert!(src.churn_trend().unwrap().is_empty());
    assert!(src.risk_momentum().unwrap().is_empty());
}

#[test]
fn fetch_failure_becomes_empty_list() {
    let out: Vec<u32> = fetch_or_empty("test", "numbers", || -> DashResult<Vec<u32>> {
        Err(DashError::Other(anyhow::anyhow!("boom")))
    });
    assert!(out.is_empty());

    let out = fetch_or_empty("test", "numbers", || Ok(vec![1, 2]));
    assert_eq!(out, vec![1, 2]);
}

#[test]
fn static_source_ignores_non_array_payloads() {
    let src = StaticSource::from_json(json!({ "detail": "Not authenticated" }), json!(null));
    assert!(src.customers().unwrap().is_empty());
    assert!(src.alerts().unwrap().is_empty());
}

#[test]
fn momentum_rows_are_lenient() {
    let row = RiskMomentumRow::from_value(&json!({ "customer": 42, "trend": "flat", "delta": null }));
    assert_eq!(row.customer, "42");
    assert_eq!(row.trend, "flat");
    assert_eq!(row.delta, "");
}
