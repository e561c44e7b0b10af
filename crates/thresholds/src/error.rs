use thiserror::Error;

use restock_core::DomainError;

/// Result type used by the threshold pipeline.
pub type ThresholdResult<T> = Result<T, ThresholdError>;

/// Failures of a threshold analysis run.
///
/// Every data-quality problem surfaces as one of these values; the pipeline
/// never propagates `NaN` or panics on malformed rows.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ThresholdError {
    #[error("input contains no rows")]
    EmptyInput,

    #[error("all {rejected} input row(s) were rejected")]
    AllRowsRejected { rejected: usize },

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row} (product {product_id}): invalid date {value:?}")]
    InvalidDate {
        row: usize,
        product_id: String,
        value: String,
    },

    #[error("row {row} (product {product_id}): invalid number {value:?} for {field}")]
    InvalidNumber {
        row: usize,
        product_id: String,
        field: &'static str,
        value: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ThresholdError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether this error describes a single malformed row (and can therefore be
    /// skipped under a lenient row policy).
    pub fn is_row_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDate { .. } | Self::InvalidNumber { .. } | Self::Domain(_)
        )
    }
}
