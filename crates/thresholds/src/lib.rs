//! `restock-thresholds`
//!
//! **Responsibility:** turn a time-stamped series of per-product inventory and
//! order rows into a reorder-threshold model per product.
//!
//! Stages, each a pure function of its input:
//! 1. [`grouper`]: normalize rows and partition them by product.
//! 2. [`monthly`]: calendar-month inventory and sales series.
//! 3. [`calculator`]: demand rate, lead time, cadence, stock bands, stockout forecast.
//! 4. [`assembler`]: one [`ProductResult`] per product, first-seen order.
//!
//! This crate performs no IO. Rows come from an ingestion collaborator and
//! results go to presentation collaborators.

pub mod assembler;
pub mod calculator;
pub mod config;
pub mod error;
pub mod grouper;
pub mod job;
pub mod monthly;
pub mod record;

pub use assembler::ProductResult;
pub use calculator::{InventoryStatus, ProductMetrics, StockoutForecast, UsageSummary};
pub use config::ThresholdConfig;
pub use error::{ThresholdError, ThresholdResult};
pub use grouper::{ProductGroup, ProductGroups, RowPolicy, RowRejection};
pub use job::{compute_thresholds, AnalysisReport, ThresholdJob};
pub use monthly::{MonthKey, MonthlyPoint};
pub use record::{ensure_columns, CellValue, InputRecord, NormalizedRecord, REQUIRED_COLUMNS};
