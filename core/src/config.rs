use serde::{Deserialize, Serialize};

/// Tunables for the recommended-action rules and the display helpers.
///
/// Thresholds are strict comparisons, matching the rule text:
/// health `<` low_health_threshold, tickets `>` support_ticket_threshold,
/// features `<` low_feature_usage_threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Number of features in the product catalog.
    #[serde(default = "default_feature_catalog_size")]
    pub feature_catalog_size: u32,
    #[serde(default = "default_low_health_threshold")]
    pub low_health_threshold: i64,
    #[serde(default = "default_support_ticket_threshold")]
    pub support_ticket_threshold: u32,
    #[serde(default = "default_low_feature_usage_threshold")]
    pub low_feature_usage_threshold: u32,
    /// Contracts ending within this many days are flagged as expiring.
    #[serde(default = "default_contract_expiry_window_days")]
    pub contract_expiry_window_days: i64,
    #[serde(default = "default_currency_code")]
    pub currency_code: String,
}

fn default_feature_catalog_size() -> u32 { 15 }
fn default_low_health_threshold() -> i64 { 50 }
fn default_support_ticket_threshold() -> u32 { 3 }
fn default_low_feature_usage_threshold() -> u32 { 5 }
fn default_contract_expiry_window_days() -> i64 { 30 }
fn default_currency_code() -> String { "USD".into() }

impl DashboardConfig {
    /// Load from the data/ directory.
    /// In tests, use DashboardConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/config/dashboard.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashboardConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;

        if config.feature_catalog_size == 0 {
            anyhow::bail!("{path}: feature_catalog_size must be positive");
        }
        if config.contract_expiry_window_days < 0 {
            anyhow::bail!("{path}: contract_expiry_window_days must not be negative");
        }

        log::debug!(
            "config: loaded {path} (catalog={}, expiry_window={}d)",
            config.feature_catalog_size,
            config.contract_expiry_window_days,
        );
        Ok(config)
    }

    /// Load from `data_dir` if a config file exists there, otherwise fall
    /// back to the built-in defaults.
    pub fn load_or_default(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/config/dashboard.json");
        if std::path::Path::new(&path).exists() {
            Self::load(data_dir)
        } else {
            log::info!("config: {path} not found, using defaults");
            Ok(Self::default_test())
        }
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            feature_catalog_size:        default_feature_catalog_size(),
            low_health_threshold:        default_low_health_threshold(),
            support_ticket_threshold:    default_support_ticket_threshold(),
            low_feature_usage_threshold: default_low_feature_usage_threshold(),
            contract_expiry_window_days: default_contract_expiry_window_days(),
            currency_code:               default_currency_code(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::default_test()
    }
}
