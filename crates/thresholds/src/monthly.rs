//! Monthly aggregator: calendar-month inventory and sales series.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use restock_core::ValueObject;

use crate::grouper::ProductGroup;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Calendar month, ordered by `(year, month0)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    /// Zero-based month index (`0` = January).
    pub month0: u32,
}

impl ValueObject for MonthKey {}

impl MonthKey {
    pub fn of<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn label(&self) -> &'static str {
        MONTH_NAMES[self.month0 as usize % 12]
    }
}

/// Per-month accumulator.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct MonthBucket {
    /// Inventory of the last row seen for the month, in input order.
    pub inventory_level: f64,
    /// Sum of orders of every row in the month.
    pub orders_total: f64,
}

/// One point of a monthly chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month_label: String,
    pub value: f64,
}

impl ValueObject for MonthlyPoint {}

/// Both monthly series of a product, sorted by month.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthlySeries {
    pub inventory: Vec<MonthlyPoint>,
    pub sales: Vec<MonthlyPoint>,
}

/// Bucket a product's records by calendar month.
///
/// Records are visited in insertion order, not date order: when a month holds
/// several rows, the inventory snapshot is whichever came last in the input.
pub fn aggregate_monthly(group: &ProductGroup) -> MonthlySeries {
    let mut buckets: BTreeMap<MonthKey, MonthBucket> = BTreeMap::new();

    for record in group.records() {
        let bucket = buckets.entry(MonthKey::of(&record.date)).or_default();
        bucket.inventory_level = record.inventory_level;
        bucket.orders_total += record.orders;
    }

    // BTreeMap iterates in ascending (year, month0) order.
    let mut series = MonthlySeries::default();
    for (key, bucket) in &buckets {
        series.inventory.push(MonthlyPoint {
            month_label: key.label().to_string(),
            value: bucket.inventory_level,
        });
        series.sales.push(MonthlyPoint {
            month_label: key.label().to_string(),
            value: bucket.orders_total,
        });
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouper::{group_records, RowPolicy};
    use crate::record::InputRecord;

    fn group_of(rows: &[(&str, f64, f64)]) -> ProductGroup {
        let records: Vec<InputRecord> = rows
            .iter()
            .map(|(date, inv, orders)| InputRecord::new("P1", "Widget", *date, *inv, *orders, 5.0))
            .collect();
        let grouping = group_records(&records, 7.0, RowPolicy::Strict).unwrap();
        grouping.groups.iter().next().unwrap().clone()
    }

    fn labels(points: &[MonthlyPoint]) -> Vec<&str> {
        points.iter().map(|p| p.month_label.as_str()).collect()
    }

    fn values(points: &[MonthlyPoint]) -> Vec<f64> {
        points.iter().map(|p| p.value).collect()
    }

    #[test]
    fn months_are_sorted_across_years() {
        let group = group_of(&[
            ("2024-02-10", 50.0, 5.0),
            ("2023-12-01", 90.0, 1.0),
            ("2024-01-15", 70.0, 2.0),
        ]);
        let series = aggregate_monthly(&group);

        assert_eq!(labels(&series.inventory), vec!["December", "January", "February"]);
        assert_eq!(values(&series.inventory), vec![90.0, 70.0, 50.0]);
        assert_eq!(values(&series.sales), vec![1.0, 2.0, 5.0]);
    }

    #[test]
    fn sales_accumulate_within_a_month() {
        let group = group_of(&[
            ("2024-03-01", 10.0, 4.0),
            ("2024-03-15", 8.0, 6.0),
            ("2024-03-30", 5.0, 0.0),
        ]);
        let series = aggregate_monthly(&group);

        assert_eq!(series.sales.len(), 1);
        assert_eq!(series.sales[0].value, 10.0);
        assert_eq!(series.sales[0].month_label, "March");
    }

    #[test]
    fn inventory_snapshot_is_last_row_in_input_order() {
        // The 20th is listed before the 5th; the snapshot follows the listing.
        let group = group_of(&[("2024-05-20", 40.0, 1.0), ("2024-05-05", 75.0, 1.0)]);
        let series = aggregate_monthly(&group);

        assert_eq!(values(&series.inventory), vec![75.0]);
    }

    #[test]
    fn offset_timestamps_bucket_by_utc_month() {
        // 01:00 at +02:00 on 1 February is 23:00 UTC on 31 January.
        let group = group_of(&[("2024-02-01T01:00:00+02:00", 15.0, 4.0), ("2024-02-10", 12.0, 1.0)]);
        let series = aggregate_monthly(&group);

        assert_eq!(labels(&series.sales), vec!["January", "February"]);
        assert_eq!(values(&series.sales), vec![4.0, 1.0]);
    }

    #[test]
    fn same_month_in_different_years_stays_separate() {
        let group = group_of(&[("2023-06-01", 1.0, 1.0), ("2024-06-01", 2.0, 2.0)]);
        let series = aggregate_monthly(&group);

        assert_eq!(labels(&series.sales), vec!["June", "June"]);
        assert_eq!(values(&series.sales), vec![1.0, 2.0]);
    }
}
