//! View-model assembly, one pipeline per page.
//!
//! PIPELINE (straight line, no callbacks between stages):
//!   1. Fetch customers, then alerts (each fails to an empty list)
//!   2. Normalize
//!   3. Index alerts by customer
//!   4. Aggregate / filter / resolve / recommend
//!   5. Return a Serialize view-model for the renderer
//!
//! The build_* functions are pure and take already-loaded data. The
//! Dashboard methods only add the fetch step in front of them.

use crate::{
    actions::{recommend_actions, RecommendedAction, NO_ACTIONS},
    alert::{normalize_alerts, rank_alerts, risk_reason, Alert, AlertIndex, AlertPriority},
    config::DashboardConfig,
    customer::{normalize_customers, Customer},
    display::{contract_status, format_currency, format_last_login, format_percent, ContractStatus},
    error::{DashError, DashResult},
    filter::CustomerFilter,
    metrics::{compute_metrics, revenue_at_risk, Metrics, RevenueAtRisk, RiskDistribution},
    source::{fetch_or_empty, DataSource, RiskMomentumRow, TrendPoint},
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

pub const NO_URGENT_ACTIONS: &str = "No urgent actions";
pub const NO_CUSTOMERS_FOUND: &str = "No customers found";

// ── View-models ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgentAction {
    pub customer_id:   String,
    pub customer_name: String,
    pub priority:      AlertPriority,
    pub title:         String,
    pub description:   String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub metrics:             Metrics,
    pub at_risk_mrr_display: String,
    /// Alerts ranked most urgent first.
    pub urgent_actions:      Vec<UrgentAction>,
    /// Set when there is nothing to show in the urgent actions panel.
    pub empty_state:         Option<String>,
    pub trend:               Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRow {
    pub customer:     Customer,
    pub risk_reason:  String,
    pub mrr_display:  String,
    pub last_login:   String,
    pub contract:     ContractStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomersView {
    pub filter:      CustomerFilter,
    pub rows:        Vec<CustomerRow>,
    pub empty_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetailView {
    pub customer:            Customer,
    /// This customer's alerts in arrival order.
    pub alerts:              Vec<Alert>,
    pub risk_reason:         String,
    /// Rule-declaration order, not priority order.
    pub actions:             Vec<RecommendedAction>,
    pub actions_empty_state: Option<String>,
    pub mrr_display:         String,
    pub last_login:          String,
    pub contract:            ContractStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsView {
    pub distribution:               RiskDistribution,
    pub avg_health_score:           i64,
    pub revenue_at_risk:            RevenueAtRisk,
    pub expected_mrr_loss_display:  String,
    pub risk_ratio_display:         String,
    pub trend:                      Vec<TrendPoint>,
    /// Per-customer risk movement, in backend order.
    pub momentum:                   Vec<RiskMomentumRow>,
}

// ── Pure builders ────────────────────────────────────────────────────────────

pub fn build_dashboard_view(
    customers: &[Customer],
    alerts: &[Alert],
    trend: Vec<TrendPoint>,
    config: &DashboardConfig,
) -> DashboardView {
    let metrics = compute_metrics(customers);
    let names: HashMap<&str, &str> = customers
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let urgent_actions: Vec<UrgentAction> = rank_alerts(alerts)
        .into_iter()
        .map(|a| UrgentAction {
            customer_name: names
                .get(a.customer_id.as_str())
                .map(|n| n.to_string())
                .unwrap_or_else(|| a.customer_id.clone()),
            customer_id:   a.customer_id,
            priority:      a.priority,
            title:         a.title,
            description:   a.description,
        })
        .collect();

    DashboardView {
        at_risk_mrr_display: format_currency(metrics.at_risk_mrr, &config.currency_code),
        empty_state: urgent_actions.is_empty().then(|| NO_URGENT_ACTIONS.to_string()),
        metrics,
        urgent_actions,
        trend,
    }
}

pub fn build_customer_row(
    customer: &Customer,
    index: &AlertIndex,
    config: &DashboardConfig,
    today: NaiveDate,
) -> CustomerRow {
    CustomerRow {
        risk_reason: risk_reason(&customer.id, index),
        mrr_display: format_currency(customer.mrr, &config.currency_code),
        last_login:  format_last_login(customer.last_login_at),
        contract:    contract_status(customer, today, config.contract_expiry_window_days),
        customer:    customer.clone(),
    }
}

pub fn build_customers_view(
    customers: &[Customer],
    index: &AlertIndex,
    filter: &CustomerFilter,
    config: &DashboardConfig,
    today: NaiveDate,
) -> CustomersView {
    let rows: Vec<CustomerRow> = filter
        .apply(customers)
        .iter()
        .map(|c| build_customer_row(c, index, config, today))
        .collect();

    CustomersView {
        filter: filter.clone(),
        empty_state: rows.is_empty().then(|| NO_CUSTOMERS_FOUND.to_string()),
        rows,
    }
}

pub fn build_customer_detail(
    customer: &Customer,
    index: &AlertIndex,
    config: &DashboardConfig,
    today: NaiveDate,
) -> CustomerDetailView {
    let actions = recommend_actions(customer, config);
    CustomerDetailView {
        alerts:              index.for_customer(&customer.id).to_vec(),
        risk_reason:         risk_reason(&customer.id, index),
        actions_empty_state: actions.is_empty().then(|| NO_ACTIONS.to_string()),
        actions,
        mrr_display:         format_currency(customer.mrr, &config.currency_code),
        last_login:          format_last_login(customer.last_login_at),
        contract:            contract_status(customer, today, config.contract_expiry_window_days),
        customer:            customer.clone(),
    }
}

pub fn build_analytics_view(
    customers: &[Customer],
    trend: Vec<TrendPoint>,
    momentum: Vec<RiskMomentumRow>,
    config: &DashboardConfig,
) -> AnalyticsView {
    let metrics = compute_metrics(customers);
    let revenue = revenue_at_risk(customers);
    AnalyticsView {
        distribution:              metrics.risk_distribution,
        avg_health_score:          metrics.avg_health_score,
        expected_mrr_loss_display: format_currency(revenue.at_risk_mrr, &config.currency_code),
        risk_ratio_display:        format_percent(revenue.risk_ratio),
        revenue_at_risk:           revenue,
        trend,
        momentum,
    }
}

// ── Fetching front-end ───────────────────────────────────────────────────────

pub struct Dashboard<S: DataSource> {
    source: S,
    config: DashboardConfig,
}

impl<S: DataSource> Dashboard<S> {
    pub fn new(source: S, config: DashboardConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn load_customers(&self) -> Vec<Customer> {
        let raw = fetch_or_empty(self.source.name(), "customers", || self.source.customers());
        normalize_customers(&raw)
    }

    pub fn load_alerts(&self) -> Vec<Alert> {
        let raw = fetch_or_empty(self.source.name(), "alerts", || self.source.alerts());
        normalize_alerts(&raw)
    }

    fn load_trend(&self) -> Vec<TrendPoint> {
        fetch_or_empty(self.source.name(), "churn trend", || self.source.churn_trend())
    }

    fn load_momentum(&self) -> Vec<RiskMomentumRow> {
        fetch_or_empty(self.source.name(), "risk momentum", || self.source.risk_momentum())
    }

    /// Customers, then alerts, then metrics.
    pub fn dashboard_view(&self) -> DashboardView {
        let customers = self.load_customers();
        let alerts = self.load_alerts();
        let view = build_dashboard_view(&customers, &alerts, self.load_trend(), &self.config);
        log::info!(
            "dashboard: {} customers, {} high risk, {} urgent actions",
            view.metrics.total,
            view.metrics.high_risk_count,
            view.urgent_actions.len(),
        );
        view
    }

    pub fn customers_view(&self, filter: &CustomerFilter, today: NaiveDate) -> CustomersView {
        let customers = self.load_customers();
        self.customers_view_from(&customers, filter, today)
    }

    /// Same as customers_view() but over a list the caller already holds,
    /// e.g. from a CustomerCache. Alerts are always fetched fresh.
    pub fn customers_view_from(
        &self,
        customers: &[Customer],
        filter: &CustomerFilter,
        today: NaiveDate,
    ) -> CustomersView {
        let index = AlertIndex::build(&self.load_alerts());
        let view = build_customers_view(customers, &index, filter, &self.config, today);
        log::info!(
            "customers: {} of {} match (search='{}', risk={:?})",
            view.rows.len(),
            customers.len(),
            filter.search,
            filter.risk,
        );
        view
    }

    /// The only pipeline step that can fail: the id must name a customer.
    pub fn customer_detail(&self, customer_id: &str, today: NaiveDate) -> DashResult<CustomerDetailView> {
        let customers = self.load_customers();
        let customer = customers
            .iter()
            .find(|c| c.id == customer_id)
            .ok_or_else(|| DashError::CustomerNotFound { id: customer_id.to_string() })?;
        let index = AlertIndex::build(&self.load_alerts());
        let view = build_customer_detail(customer, &index, &self.config, today);
        log::info!(
            "customer_detail: '{}' has {} alerts, {} actions",
            customer_id,
            view.alerts.len(),
            view.actions.len(),
        );
        Ok(view)
    }

    pub fn analytics_view(&self) -> AnalyticsView {
        let customers = self.load_customers();
        let view = build_analytics_view(
            &customers,
            self.load_trend(),
            self.load_momentum(),
            &self.config,
        );
        log::info!(
            "analytics: expected MRR loss {} ({}), {} momentum rows",
            view.expected_mrr_loss_display,
            view.risk_ratio_display,
            view.momentum.len(),
        );
        view
    }
}
