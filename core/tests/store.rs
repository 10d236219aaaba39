//! SQLite snapshot store.

mod common;

use churnguard_core::{
    alert::RawAlert,
    config::DashboardConfig,
    dashboard::Dashboard,
    source::{DataSource, RiskMomentumRow, TrendPoint},
    store::SnapshotStore,
};
use common::raw;
use serde_json::json;

fn make_store() -> SnapshotStore {
    let store = SnapshotStore::in_memory().unwrap();
    store.migrate().unwrap();
    store
}

#[test]
fn fresh_store_is_empty() {
    let store = make_store();
    assert!(store.customers().unwrap().is_empty());
    assert!(store.alerts().unwrap().is_empty());
    assert!(store.churn_trend().unwrap().is_empty());
    assert!(store.risk_momentum().unwrap().is_empty());
    assert!(store.refreshed_at("customer_snapshot").unwrap().is_none());
    assert_eq!(store.row_count("customer_snapshot").unwrap(), 0);
}

#[test]
fn customers_round_trip_in_order() {
    let store = make_store();
    let input = vec![
        raw(json!({ "id": 3, "name": "C" })),
        raw(json!({ "id": "1", "name": "A", "mrr": "10" })),
        raw(json!({ "id": 2, "name": "B" })),
    ];

    store.replace_customers(&input).unwrap();

    assert_eq!(store.load_customers().unwrap(), input);
    assert_eq!(store.row_count("customer_snapshot").unwrap(), 3);
    assert!(store.refreshed_at("customer_snapshot").unwrap().is_some());
}

/// Each refresh replaces the previous list wholesale.
#[test]
fn replace_discards_previous_snapshot() {
    let store = make_store();
    store.replace_customers(&[raw(json!({ "id": 1 })), raw(json!({ "id": 2 }))]).unwrap();
    store.replace_customers(&[raw(json!({ "id": 9 }))]).unwrap();

    let customers = store.load_customers().unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].0["id"], 9);
    assert_eq!(store.row_count("customer_snapshot").unwrap(), 1);
}

#[test]
fn alerts_and_trend_persist() {
    let store = make_store();
    let alerts = vec![RawAlert::from_value(json!({
        "customer_id": 1, "title": "Usage dropped", "priority": "high"
    }))];
    let trend = vec![
        TrendPoint { month: "2026-08".into(), high: 2 },
        TrendPoint { month: "2026-09".into(), high: 4 },
    ];

    store.replace_alerts(&alerts).unwrap();
    store.replace_trend(&trend).unwrap();

    assert_eq!(store.load_alerts().unwrap(), alerts);
    assert_eq!(store.load_trend().unwrap(), trend);
}

/// The store is a data source like any other.
#[test]
fn dashboard_runs_from_snapshot() {
    let store = make_store();
    store.replace_customers(&[
        raw(json!({ "id": 1, "mrr": 500, "risk_level": "high", "health_score": 40 })),
        raw(json!({ "id": 2, "mrr": 700, "risk_level": "medium", "health_score": 70 })),
    ]).unwrap();

    let dash = Dashboard::new(store, DashboardConfig::default_test());
    let view = dash.dashboard_view();

    assert_eq!(view.metrics.total, 2);
    assert_eq!(view.metrics.at_risk_mrr, 500.0);
    assert_eq!(view.metrics.avg_health_score, 55);
}

#[test]
fn risk_momentum_persists_in_order() {
    let store = make_store();
    let rows = vec![
        RiskMomentumRow { customer: "Globex".into(), trend: "rising".into(), delta: "+18".into() },
        RiskMomentumRow { customer: "Acme".into(), trend: "falling".into(), delta: "-6".into() },
    ];

    store.replace_momentum(&rows).unwrap();

    assert_eq!(store.risk_momentum().unwrap(), rows);
    assert_eq!(store.row_count("momentum_snapshot").unwrap(), 2);
}

/// A file-backed store opens in WAL mode and keeps data across reopen.
#[test]
fn file_store_survives_reopen() {
    let dir = std::env::temp_dir().join(format!("churnguard-store-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("snapshot.db");
    let path = path.to_str().unwrap();

    {
        let store = SnapshotStore::open(path).unwrap();
        store.migrate().unwrap();
        store.replace_customers(&[raw(json!({ "id": 5 }))]).unwrap();
    }

    let store = SnapshotStore::open(path).unwrap();
    store.migrate().unwrap();
    assert_eq!(store.load_customers().unwrap().len(), 1);

    drop(store);
    std::fs::remove_dir_all(&dir).unwrap();
}
