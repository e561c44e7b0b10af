//! Run-level configuration for a threshold analysis.

use serde::Serialize;

use restock_core::ValueObject;

use crate::error::{ThresholdError, ThresholdResult};

pub const DEFAULT_LEAD_TIME_DAYS: f64 = 7.0;
pub const DEFAULT_SAFETY_STOCK_FRACTION: f64 = 0.2;
pub const DEFAULT_FULFILLMENT_TIME_DAYS: f64 = 2.0;

/// Tunables of a single run.
///
/// Immutable once built; construct through [`ThresholdConfig::new`] or
/// [`ThresholdConfig::from_percentage`] so the ranges are checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdConfig {
    /// Lead time used for rows whose own lead time is zero, empty or not a number.
    default_lead_time_days: f64,
    /// Safety stock as a fraction of expected lead-time usage, in `[0, 1]`.
    safety_stock_fraction: f64,
    /// Days to process and ship an order, added on top of the supplier lead time.
    fulfillment_time_days: f64,
}

impl ValueObject for ThresholdConfig {}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            default_lead_time_days: DEFAULT_LEAD_TIME_DAYS,
            safety_stock_fraction: DEFAULT_SAFETY_STOCK_FRACTION,
            fulfillment_time_days: DEFAULT_FULFILLMENT_TIME_DAYS,
        }
    }
}

impl ThresholdConfig {
    pub fn new(
        default_lead_time_days: f64,
        safety_stock_fraction: f64,
        fulfillment_time_days: f64,
    ) -> ThresholdResult<Self> {
        if !(default_lead_time_days.is_finite() && default_lead_time_days > 0.0) {
            return Err(ThresholdError::invalid_config(
                "default lead time must be a positive number of days",
            ));
        }
        if !(safety_stock_fraction.is_finite() && (0.0..=1.0).contains(&safety_stock_fraction)) {
            return Err(ThresholdError::invalid_config(
                "safety stock fraction must be within [0, 1]",
            ));
        }
        if !(fulfillment_time_days.is_finite() && fulfillment_time_days >= 0.0) {
            return Err(ThresholdError::invalid_config(
                "fulfillment time cannot be negative",
            ));
        }

        Ok(Self {
            default_lead_time_days,
            safety_stock_fraction,
            fulfillment_time_days,
        })
    }

    /// Build from a safety stock percentage in `0..=100`.
    pub fn from_percentage(
        default_lead_time_days: f64,
        safety_stock_percentage: f64,
        fulfillment_time_days: f64,
    ) -> ThresholdResult<Self> {
        if !(safety_stock_percentage.is_finite() && (0.0..=100.0).contains(&safety_stock_percentage)) {
            return Err(ThresholdError::invalid_config(
                "safety stock percentage must be within 0..=100",
            ));
        }
        Self::new(
            default_lead_time_days,
            safety_stock_percentage / 100.0,
            fulfillment_time_days,
        )
    }

    pub fn default_lead_time_days(&self) -> f64 {
        self.default_lead_time_days
    }

    pub fn safety_stock_fraction(&self) -> f64 {
        self.safety_stock_fraction
    }

    pub fn fulfillment_time_days(&self) -> f64 {
        self.fulfillment_time_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_form_defaults() {
        let cfg = ThresholdConfig::default();
        assert_eq!(cfg.default_lead_time_days(), 7.0);
        assert_eq!(cfg.safety_stock_fraction(), 0.2);
        assert_eq!(cfg.fulfillment_time_days(), 2.0);
    }

    #[test]
    fn percentage_is_scaled_to_fraction() {
        let cfg = ThresholdConfig::from_percentage(5.0, 25.0, 0.0).unwrap();
        assert_eq!(cfg.safety_stock_fraction(), 0.25);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(ThresholdConfig::new(0.0, 0.2, 2.0).is_err());
        assert!(ThresholdConfig::new(f64::NAN, 0.2, 2.0).is_err());
        assert!(ThresholdConfig::new(7.0, 1.5, 2.0).is_err());
        assert!(ThresholdConfig::new(7.0, -0.1, 2.0).is_err());
        assert!(ThresholdConfig::new(7.0, 0.2, -1.0).is_err());
        assert!(ThresholdConfig::from_percentage(7.0, 120.0, 2.0).is_err());

        let err = ThresholdConfig::new(7.0, 0.2, f64::INFINITY).unwrap_err();
        assert!(matches!(err, ThresholdError::InvalidConfig(_)));
    }

    #[test]
    fn boundaries_are_accepted() {
        assert!(ThresholdConfig::new(0.5, 0.0, 0.0).is_ok());
        assert!(ThresholdConfig::new(30.0, 1.0, 10.0).is_ok());
    }
}
