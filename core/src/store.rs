//! SQLite snapshot store.
//!
//! RULE: Only store.rs talks to the database.
//! It keeps the last fetched raw payloads so the report tool can run
//! offline. Each replace_* call swaps a collection wholesale; there is
//! no incremental merge.

use crate::{
    alert::RawAlert,
    customer::RawCustomer,
    error::{DashError, DashResult},
    source::{DataSource, RiskMomentumRow, TrendPoint},
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    /// Open (or create) the snapshot database at `path`.
    pub fn open(path: &str) -> DashResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DashResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DashResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_snapshots.sql"))?;
        Ok(())
    }

    // ── Customers ──────────────────────────────────────────────

    pub fn replace_customers(&self, customers: &[RawCustomer]) -> DashResult<()> {
        let payloads = customers
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        self.replace_payloads("customer_snapshot", &payloads)?;
        log::info!("store: replaced customer snapshot ({} rows)", payloads.len());
        Ok(())
    }

    pub fn load_customers(&self) -> DashResult<Vec<RawCustomer>> {
        Ok(self.load_payloads("customer_snapshot")?
            .into_iter()
            .map(RawCustomer::from_value)
            .collect())
    }

    // ── Alerts ─────────────────────────────────────────────────

    pub fn replace_alerts(&self, alerts: &[RawAlert]) -> DashResult<()> {
        let payloads = alerts
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        self.replace_payloads("alert_snapshot", &payloads)?;
        log::info!("store: replaced alert snapshot ({} rows)", payloads.len());
        Ok(())
    }

    pub fn load_alerts(&self) -> DashResult<Vec<RawAlert>> {
        Ok(self.load_payloads("alert_snapshot")?
            .into_iter()
            .map(RawAlert::from_value)
            .collect())
    }

    // ── Trend ──────────────────────────────────────────────────

    pub fn replace_trend(&self, trend: &[TrendPoint]) -> DashResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM trend_point", [])?;
        for (position, point) in trend.iter().enumerate() {
            tx.execute(
                "INSERT INTO trend_point (position, month, high) VALUES (?1, ?2, ?3)",
                params![position as i64, point.month, point.high as i64],
            )?;
        }
        touch_meta(&tx, "trend_point", trend.len())?;
        tx.commit()?;
        Ok(())
    }

    pub fn load_trend(&self) -> DashResult<Vec<TrendPoint>> {
        let mut stmt = self.conn.prepare(
            "SELECT month, high FROM trend_point ORDER BY position ASC"
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(TrendPoint {
                month: row.get(0)?,
                high:  row.get::<_, i64>(1)?.max(0) as u64,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Risk momentum ──────────────────────────────────────────

    pub fn replace_momentum(&self, rows: &[RiskMomentumRow]) -> DashResult<()> {
        let payloads = rows
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        self.replace_payloads("momentum_snapshot", &payloads)?;
        log::info!("store: replaced risk momentum snapshot ({} rows)", payloads.len());
        Ok(())
    }

    pub fn load_momentum(&self) -> DashResult<Vec<RiskMomentumRow>> {
        Ok(self.load_payloads("momentum_snapshot")?
            .iter()
            .map(RiskMomentumRow::from_value)
            .collect())
    }

    // ── Metadata ───────────────────────────────────────────────

    /// When `collection` (a table name) was last replaced, if ever.
    pub fn refreshed_at(&self, collection: &str) -> DashResult<Option<DateTime<Utc>>> {
        let raw: Option<String> = self.conn.query_row(
            "SELECT refreshed_at FROM snapshot_meta WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        ).optional()?;
        Ok(raw
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|t| t.with_timezone(&Utc)))
    }

    pub fn row_count(&self, collection: &str) -> DashResult<i64> {
        let count: Option<i64> = self.conn.query_row(
            "SELECT row_count FROM snapshot_meta WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        ).optional()?;
        Ok(count.unwrap_or(0))
    }

    // ── Internals ──────────────────────────────────────────────

    fn replace_payloads(&self, table: &'static str, payloads: &[String]) -> DashResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(&format!("DELETE FROM {table}"), [])?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {table} (position, payload) VALUES (?1, ?2)"
            ))?;
            for (position, payload) in payloads.iter().enumerate() {
                stmt.execute(params![position as i64, payload])?;
            }
        }
        touch_meta(&tx, table, payloads.len())?;
        tx.commit()?;
        Ok(())
    }

    fn load_payloads(&self, table: &'static str) -> DashResult<Vec<Value>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT payload FROM {table} ORDER BY position ASC"
        ))?;
        let payloads = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        payloads
            .iter()
            .map(|p| serde_json::from_str::<Value>(p).map_err(DashError::from))
            .collect()
    }
}

fn touch_meta(conn: &Connection, collection: &str, rows: usize) -> DashResult<()> {
    conn.execute(
        "INSERT INTO snapshot_meta (collection, refreshed_at, row_count) VALUES (?1, ?2, ?3)
         ON CONFLICT(collection) DO UPDATE SET
            refreshed_at = excluded.refreshed_at,
            row_count    = excluded.row_count",
        params![collection, Utc::now().to_rfc3339(), rows as i64],
    )?;
    Ok(())
}

impl DataSource for SnapshotStore {
    fn name(&self) -> &'static str { "sqlite" }

    fn customers(&self) -> DashResult<Vec<RawCustomer>> {
        self.load_customers()
    }

    fn alerts(&self) -> DashResult<Vec<RawAlert>> {
        self.load_alerts()
    }

    fn churn_trend(&self) -> DashResult<Vec<TrendPoint>> {
        self.load_trend()
    }

    fn risk_momentum(&self) -> DashResult<Vec<RiskMomentumRow>> {
        self.load_momentum()
    }
}
