//! Input rows and their normalized form.
//!
//! Rows arrive from an ingestion collaborator that has already split the
//! uploaded file into named fields. Cells may carry native numbers (when the
//! ingester casts) or raw text; both are accepted here and coerced once.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ThresholdError, ThresholdResult};

/// Column names every row must expose.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "product_id",
    "product_name",
    "date",
    "inventory_level",
    "orders",
    "lead_time_days",
];

/// Check a header row against [`REQUIRED_COLUMNS`].
///
/// Intended for the ingestion layer, before rows are handed to the pipeline.
pub fn ensure_columns<S: AsRef<str>>(headers: &[S]) -> ThresholdResult<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h.as_ref() == **col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ThresholdError::MissingColumns(missing))
    }
}

/// A single cell of a numeric column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl CellValue {
    /// Coerce to a finite number. Text is trimmed before parsing.
    pub fn to_finite(&self) -> Option<f64> {
        let value = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Empty => return None,
        };
        value.is_finite().then_some(value)
    }

    fn describe(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// One row as delivered by ingestion. Read-only to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub product_id: String,
    pub product_name: String,
    pub date: String,
    #[serde(default)]
    pub inventory_level: CellValue,
    #[serde(default)]
    pub orders: CellValue,
    #[serde(default)]
    pub lead_time_days: CellValue,
}

impl InputRecord {
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        date: impl Into<String>,
        inventory_level: impl Into<CellValue>,
        orders: impl Into<CellValue>,
        lead_time_days: impl Into<CellValue>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            date: date.into(),
            inventory_level: inventory_level.into(),
            orders: orders.into(),
            lead_time_days: lead_time_days.into(),
        }
    }
}

/// A row with its date parsed and numeric fields coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub date: DateTime<Utc>,
    pub inventory_level: f64,
    pub orders: f64,
    /// Post-fallback lead time; never zero, never non-finite.
    pub lead_time_days: f64,
}

impl NormalizedRecord {
    /// Normalize `record`, found at position `row` of the input.
    pub fn from_input(
        row: usize,
        record: &InputRecord,
        default_lead_time_days: f64,
    ) -> ThresholdResult<Self> {
        let date = parse_date(&record.date).ok_or_else(|| ThresholdError::InvalidDate {
            row,
            product_id: record.product_id.clone(),
            value: record.date.clone(),
        })?;

        let number = |field: &'static str, cell: &CellValue| {
            cell.to_finite().ok_or_else(|| ThresholdError::InvalidNumber {
                row,
                product_id: record.product_id.clone(),
                field,
                value: cell.describe(),
            })
        };

        let inventory_level = number("inventory_level", &record.inventory_level)?;
        let orders = number("orders", &record.orders)?;

        // Falsy fallback: zero, empty and unparsable all mean "use the default".
        let lead_time_days = match record.lead_time_days.to_finite() {
            Some(v) if v != 0.0 => v,
            _ => default_lead_time_days,
        };

        Ok(Self {
            date,
            inventory_level,
            orders,
            lead_time_days,
        })
    }
}

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a date cell into an instant. Naive values are taken as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ndt.and_utc());
        }
    }

    for fmt in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|ndt| ndt.and_utc());
        }
    }

    None
}
