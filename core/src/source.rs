//! Data-access collaborator seam.
//!
//! RULE: The aggregation functions never see a failed fetch. Every
//! fetch goes through fetch_or_empty(), which logs the failure and
//! hands the pipeline an empty list instead.

use crate::{
    alert::RawAlert,
    customer::{value_as_string, RawCustomer},
    error::{DashError, DashResult},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// One month of the churn trend chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    #[serde(default)]
    pub month: String,
    /// High-risk customer count for the month.
    #[serde(default)]
    pub high:  u64,
}

/// One row of the analytics risk-momentum table. All three cells are
/// display text; `trend` doubles as the row's style class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMomentumRow {
    pub customer: String,
    pub trend:    String,
    pub delta:    String,
}

impl RiskMomentumRow {
    /// Lenient: scalar cells are stringified, anything else is blank.
    pub fn from_value(value: &Value) -> Self {
        let cell = |key: &str| value.get(key).and_then(value_as_string).unwrap_or_default();
        Self {
            customer: cell("customer"),
            trend:    cell("trend"),
            delta:    cell("delta"),
        }
    }
}

/// Read-only source of raw backend collections.
pub trait DataSource {
    /// Stable name used in log lines.
    fn name(&self) -> &'static str;

    fn customers(&self) -> DashResult<Vec<RawCustomer>>;

    fn alerts(&self) -> DashResult<Vec<RawAlert>>;

    /// Monthly churn trend. Sources without one return nothing.
    fn churn_trend(&self) -> DashResult<Vec<TrendPoint>> {
        Ok(Vec::new())
    }

    /// Risk-momentum rows for the analytics page. Defaults to none.
    fn risk_momentum(&self) -> DashResult<Vec<RiskMomentumRow>> {
        Ok(Vec::new())
    }
}

/// Run a fetch, turning any failure into an empty list.
pub fn fetch_or_empty<T>(source: &str, what: &str, fetch: impl FnOnce() -> DashResult<Vec<T>>) -> Vec<T> {
    match fetch() {
        Ok(items) => {
            log::debug!("source={source}: fetched {} {what}", items.len());
            items
        }
        Err(e) => {
            log::warn!("source={source}: failed to fetch {what}, continuing with none: {e}");
            Vec::new()
        }
    }
}

// ── In-memory source ─────────────────────────────────────────────────────────

/// Fixed collections held in memory. Used by tests and tooling.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pub customers: Vec<RawCustomer>,
    pub alerts:    Vec<RawAlert>,
    pub trend:     Vec<TrendPoint>,
    pub momentum:  Vec<RiskMomentumRow>,
}

impl StaticSource {
    pub fn new(customers: Vec<RawCustomer>, alerts: Vec<RawAlert>) -> Self {
        Self { customers, alerts, trend: Vec::new(), momentum: Vec::new() }
    }

    /// Build from two JSON arrays. Anything that is not an array yields
    /// an empty collection.
    pub fn from_json(customers: Value, alerts: Value) -> Self {
        Self::new(
            array_items(customers).into_iter().map(RawCustomer::from_value).collect(),
            array_items(alerts).into_iter().map(RawAlert::from_value).collect(),
        )
    }

    pub fn with_trend(mut self, trend: Vec<TrendPoint>) -> Self {
        self.trend = trend;
        self
    }

    pub fn with_momentum(mut self, momentum: Vec<RiskMomentumRow>) -> Self {
        self.momentum = momentum;
        self
    }
}

impl DataSource for StaticSource {
    fn name(&self) -> &'static str { "static" }

    fn customers(&self) -> DashResult<Vec<RawCustomer>> {
        Ok(self.customers.clone())
    }

    fn alerts(&self) -> DashResult<Vec<RawAlert>> {
        Ok(self.alerts.clone())
    }

    fn churn_trend(&self) -> DashResult<Vec<TrendPoint>> {
        Ok(self.trend.clone())
    }

    fn risk_momentum(&self) -> DashResult<Vec<RiskMomentumRow>> {
        Ok(self.momentum.clone())
    }
}

// ── JSON directory source ────────────────────────────────────────────────────

/// Reads `customers.json`, `alerts.json` and, if present, `trend.json`
/// and `risk_momentum.json` from one directory. Each file holds a JSON
/// array in the backend's response shape.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_array(&self, file: &str) -> DashResult<Vec<Value>> {
        let path = self.dir.join(file);
        let content = std::fs::read_to_string(&path)?;
        match serde_json::from_str::<Value>(&content)? {
            Value::Array(items) => Ok(items),
            _ => Err(DashError::Other(anyhow::anyhow!(
                "{}: expected a JSON array",
                path.display()
            ))),
        }
    }
}

impl DataSource for JsonDirSource {
    fn name(&self) -> &'static str { "json_dir" }

    fn customers(&self) -> DashResult<Vec<RawCustomer>> {
        Ok(self.read_array("customers.json")?
            .into_iter()
            .map(RawCustomer::from_value)
            .collect())
    }

    fn alerts(&self) -> DashResult<Vec<RawAlert>> {
        Ok(self.read_array("alerts.json")?
            .into_iter()
            .map(RawAlert::from_value)
            .collect())
    }

    fn churn_trend(&self) -> DashResult<Vec<TrendPoint>> {
        if !self.dir.join("trend.json").exists() {
            return Ok(Vec::new());
        }
        self.read_array("trend.json")?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(DashError::from))
            .collect()
    }

    fn risk_momentum(&self) -> DashResult<Vec<RiskMomentumRow>> {
        if !self.dir.join("risk_momentum.json").exists() {
            return Ok(Vec::new());
        }
        Ok(self.read_array("risk_momentum.json")?
            .iter()
            .map(RiskMomentumRow::from_value)
            .collect())
    }
}

fn array_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _                   => Vec::new(),
    }
}
