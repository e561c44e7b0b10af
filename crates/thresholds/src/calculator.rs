//! Threshold calculator: demand rate, lead time, cadence and stock bands.
//!
//! Model (per product, records in date order):
//! - Demand rate is total orders over the observed date range.
//! - Order cadence is the date range divided by the number of days with demand.
//! - Expected lead-time usage is demand rate times (lead time + fulfillment time).
//! - Safety stock scales with cadence: a 7-day cadence is the baseline, with the
//!   factor clamped to `[0.8, 1.5]`.
//! - The low threshold is the reorder point; medium and high are spaced above it.

use serde::{Deserialize, Serialize};

use crate::config::ThresholdConfig;
use crate::grouper::ProductGroup;

const MS_PER_DAY: f64 = 86_400_000.0;
const CADENCE_BASELINE_DAYS: f64 = 7.0;
const MIN_ORDER_FREQUENCY_FACTOR: f64 = 0.8;
const MAX_ORDER_FREQUENCY_FACTOR: f64 = 1.5;
const MIN_BUFFER_FACTOR: f64 = 0.3;
const MAX_BUFFER_FACTOR: f64 = 0.7;

/// Current stock relative to the thresholds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryStatus {
    Low,
    Medium,
    High,
}

/// Days until stock runs out at the current demand rate.
///
/// Serialized as an integer, or `null` for [`StockoutForecast::Unbounded`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum StockoutForecast {
    Days(u64),
    /// Stock is positive and there is no demand: it never runs out at this pace.
    Unbounded,
}

impl StockoutForecast {
    pub fn days(&self) -> Option<u64> {
        match self {
            StockoutForecast::Days(d) => Some(*d),
            StockoutForecast::Unbounded => None,
        }
    }
}

impl From<Option<u64>> for StockoutForecast {
    fn from(value: Option<u64>) -> Self {
        value.map_or(StockoutForecast::Unbounded, StockoutForecast::Days)
    }
}

impl From<StockoutForecast> for Option<u64> {
    fn from(value: StockoutForecast) -> Self {
        value.days()
    }
}

/// Observed usage of one product, echoed into the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    /// Inventory of the chronologically last record.
    pub current_inventory: f64,
    pub data_points: usize,
    pub date_range_days: u64,
    pub total_orders: f64,
}

/// Derived reorder model of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMetrics {
    pub inventory_status: InventoryStatus,
    pub avg_daily_sales: f64,
    pub order_frequency_days: f64,
    /// Mean lead time across records, after the default fallback.
    pub lead_time_days: f64,
    pub fulfillment_time_days: f64,
    pub total_lead_time: f64,
    /// Configured safety stock, ×100.
    pub safety_stock_percentage: f64,
    /// Safety stock after the order frequency factor, ×100.
    pub adjusted_safety_stock_percentage: f64,
    pub order_frequency_factor: f64,
    pub buffer_factor: f64,
    pub expected_lead_time_usage: f64,
    pub low_threshold: i64,
    pub medium_threshold: i64,
    pub high_threshold: i64,
    pub safety_stock: i64,
    pub days_until_stockout: StockoutForecast,
    pub reorder_needed: bool,
}

/// Calculator output for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdOutcome {
    pub summary: UsageSummary,
    pub metrics: ProductMetrics,
}

/// Compute the reorder model of `group`.
///
/// Returns `None` only for a group without records, which grouping never
/// produces.
pub fn compute_metrics(group: &ProductGroup, config: &ThresholdConfig) -> Option<ThresholdOutcome> {
    let records = group.chronological();
    let first = records.first()?;
    let last = records.last()?;
    let n = records.len() as f64;

    let span_ms = (last.date - first.date).num_milliseconds() as f64;
    let date_range_days = (span_ms / MS_PER_DAY).ceil().max(1.0) as u64;
    let range = date_range_days as f64;

    let total_orders: f64 = records.iter().map(|r| r.orders).sum();
    let avg_daily_sales = total_orders / range;

    let order_events = records.iter().filter(|r| r.orders > 0.0).count().max(1);
    let order_frequency_days = range / order_events as f64;

    let avg_lead_time = records.iter().map(|r| r.lead_time_days).sum::<f64>() / n;
    let total_lead_time = avg_lead_time + config.fulfillment_time_days();

    let order_frequency_factor = (order_frequency_days / CADENCE_BASELINE_DAYS)
        .clamp(MIN_ORDER_FREQUENCY_FACTOR, MAX_ORDER_FREQUENCY_FACTOR);

    let expected_lead_time_usage = avg_daily_sales * total_lead_time;
    let adjusted_fraction = config.safety_stock_fraction() * order_frequency_factor;
    let safety_stock = expected_lead_time_usage * adjusted_fraction;

    let low = expected_lead_time_usage + safety_stock;
    let buffer_factor =
        (CADENCE_BASELINE_DAYS / order_frequency_days).clamp(MIN_BUFFER_FACTOR, MAX_BUFFER_FACTOR);
    let medium = low + expected_lead_time_usage * buffer_factor;
    let high = low + expected_lead_time_usage * order_frequency_factor.max(1.0);

    let current_inventory = last.inventory_level;

    // Status and reorder flag compare against the unrounded thresholds.
    let inventory_status = if current_inventory <= low {
        InventoryStatus::Low
    } else if current_inventory <= medium {
        InventoryStatus::Medium
    } else {
        InventoryStatus::High
    };

    let days_until_stockout = forecast_stockout(current_inventory, avg_daily_sales);

    Some(ThresholdOutcome {
        summary: UsageSummary {
            current_inventory,
            data_points: records.len(),
            date_range_days,
            total_orders,
        },
        metrics: ProductMetrics {
            inventory_status,
            avg_daily_sales,
            order_frequency_days,
            lead_time_days: avg_lead_time,
            fulfillment_time_days: config.fulfillment_time_days(),
            total_lead_time,
            safety_stock_percentage: config.safety_stock_fraction() * 100.0,
            adjusted_safety_stock_percentage: adjusted_fraction * 100.0,
            order_frequency_factor,
            buffer_factor,
            expected_lead_time_usage,
            low_threshold: low.ceil() as i64,
            medium_threshold: medium.ceil() as i64,
            high_threshold: high.ceil() as i64,
            safety_stock: safety_stock.ceil() as i64,
            days_until_stockout,
            reorder_needed: current_inventory <= low,
        },
    })
}

fn forecast_stockout(current_inventory: f64, avg_daily_sales: f64) -> StockoutForecast {
    if current_inventory <= 0.0 {
        return StockoutForecast::Days(0);
    }
    if avg_daily_sales <= 0.0 {
        return StockoutForecast::Unbounded;
    }
    StockoutForecast::Days((current_inventory / avg_daily_sales).floor() as u64)
}
