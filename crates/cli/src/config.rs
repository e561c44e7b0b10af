//! Run configuration from `RESTOCK_*` environment variables.

use restock_thresholds::config::{
    DEFAULT_FULFILLMENT_TIME_DAYS, DEFAULT_LEAD_TIME_DAYS, DEFAULT_SAFETY_STOCK_FRACTION,
};
use restock_thresholds::{RowPolicy, ThresholdConfig, ThresholdResult};

pub const LEAD_TIME_VAR: &str = "RESTOCK_LEAD_TIME_DAYS";
pub const SAFETY_STOCK_VAR: &str = "RESTOCK_SAFETY_STOCK_PERCENTAGE";
pub const FULFILLMENT_VAR: &str = "RESTOCK_FULFILLMENT_TIME_DAYS";
pub const ROW_POLICY_VAR: &str = "RESTOCK_ROW_POLICY";
pub const PARALLEL_VAR: &str = "RESTOCK_PARALLEL";

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    pub thresholds: ThresholdConfig,
    pub policy: RowPolicy,
    pub parallel: bool,
}

impl CliConfig {
    pub fn from_env() -> ThresholdResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Malformed values fall back to
    /// the default with a warning; out-of-range numbers are a config error.
    pub fn from_lookup<F>(lookup: F) -> ThresholdResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lead = number_or(&lookup, LEAD_TIME_VAR, DEFAULT_LEAD_TIME_DAYS);
        let pct = number_or(&lookup, SAFETY_STOCK_VAR, DEFAULT_SAFETY_STOCK_FRACTION * 100.0);
        let fulfillment = number_or(&lookup, FULFILLMENT_VAR, DEFAULT_FULFILLMENT_TIME_DAYS);

        let policy = match lookup(ROW_POLICY_VAR).as_deref().map(str::trim) {
            None | Some("") | Some("strict") => RowPolicy::Strict,
            Some("skip") => RowPolicy::SkipInvalid,
            Some(other) => {
                tracing::warn!(var = ROW_POLICY_VAR, value = other, "unknown row policy; using strict");
                RowPolicy::Strict
            }
        };

        let parallel = matches!(
            lookup(PARALLEL_VAR).as_deref().map(str::trim),
            Some("1") | Some("true")
        );

        Ok(Self {
            thresholds: ThresholdConfig::from_percentage(lead, pct, fulfillment)?,
            policy,
            parallel,
        })
    }
}

fn number_or<F>(lookup: &F, key: &str, default: f64) -> f64
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(var = key, value = %raw, fallback = default, "not a number; using default");
                default
            }
        },
    }
}
