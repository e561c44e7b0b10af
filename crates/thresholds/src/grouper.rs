//! Record grouper: partitions input rows into per-product collections.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use restock_core::{Entity, ProductId};

use crate::error::{ThresholdError, ThresholdResult};
use crate::record::{InputRecord, NormalizedRecord};

/// How malformed rows are treated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    /// The first malformed row fails the run.
    #[default]
    Strict,
    /// Malformed rows are dropped and reported as [`RowRejection`]s.
    SkipInvalid,
}

/// A row dropped under [`RowPolicy::SkipInvalid`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowRejection {
    pub row: usize,
    pub product_id: String,
    pub reason: String,
}

/// All normalized records of one product, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductGroup {
    product_id: ProductId,
    product_name: String,
    records: Vec<NormalizedRecord>,
}

impl ProductGroup {
    fn new(product_id: ProductId, product_name: String) -> Self {
        Self {
            product_id,
            product_name,
            records: Vec::new(),
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Name from the product's first row.
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Records in original insertion order.
    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    /// Records sorted ascending by date. The sort is stable, so rows sharing a
    /// timestamp keep their input order.
    pub fn chronological(&self) -> Vec<&NormalizedRecord> {
        let mut sorted: Vec<&NormalizedRecord> = self.records.iter().collect();
        sorted.sort_by_key(|r| r.date);
        sorted
    }
}

impl Entity for ProductGroup {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.product_id
    }
}

/// Product groups keyed by id, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductGroups {
    groups: Vec<ProductGroup>,
    index: HashMap<ProductId, usize>,
}

impl ProductGroups {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&ProductGroup> {
        self.index.get(product_id).map(|&i| &self.groups[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProductGroup> {
        self.groups.iter()
    }

    /// Total number of records across all groups.
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|g| g.records.len()).sum()
    }

    fn push(&mut self, product_id: ProductId, product_name: &str, record: NormalizedRecord) {
        let slot = match self.index.get(&product_id) {
            Some(&i) => i,
            None => {
                let i = self.groups.len();
                self.index.insert(product_id.clone(), i);
                self.groups
                    .push(ProductGroup::new(product_id, product_name.to_string()));
                i
            }
        };
        self.groups[slot].records.push(record);
    }
}

impl<'a> IntoIterator for &'a ProductGroups {
    type Item = &'a ProductGroup;
    type IntoIter = std::slice::Iter<'a, ProductGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Output of the grouping stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    pub groups: ProductGroups,
    pub rejected: Vec<RowRejection>,
}

/// Normalize and group `records`.
///
/// Under [`RowPolicy::Strict`] the first malformed row is returned as the error;
/// under [`RowPolicy::SkipInvalid`] it is recorded in [`Grouping::rejected`].
pub fn group_records(
    records: &[InputRecord],
    default_lead_time_days: f64,
    policy: RowPolicy,
) -> ThresholdResult<Grouping> {
    let mut grouping = Grouping::default();

    for (row, record) in records.iter().enumerate() {
        match normalize_row(row, record, default_lead_time_days) {
            Ok((product_id, normalized)) => {
                grouping
                    .groups
                    .push(product_id, &record.product_name, normalized);
            }
            Err(err) if policy == RowPolicy::SkipInvalid && err.is_row_error() => {
                warn!(row, product_id = %record.product_id, error = %err, "skipping invalid row");
                grouping.rejected.push(RowRejection {
                    row,
                    product_id: record.product_id.clone(),
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    Ok(grouping)
}

fn normalize_row(
    row: usize,
    record: &InputRecord,
    default_lead_time_days: f64,
) -> ThresholdResult<(ProductId, NormalizedRecord)> {
    let product_id = ProductId::parse(&record.product_id).map_err(ThresholdError::from)?;
    let normalized = NormalizedRecord::from_input(row, record, default_lead_time_days)?;
    Ok((product_id, normalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, name: &str, date: &str, inventory: f64, orders: f64) -> InputRecord {
        InputRecord::new(id, name, date, inventory, orders, 5.0)
    }

    #[test]
    fn groups_follow_first_seen_order() {
        let records = vec![
            row("B", "Bolt", "2024-01-01", 10.0, 1.0),
            row("A", "Axle", "2024-01-02", 20.0, 2.0),
            row("B", "Bolt v2", "2024-01-03", 30.0, 3.0),
        ];

        let grouping = group_records(&records, 7.0, RowPolicy::Strict).unwrap();
        let ids: Vec<&str> = grouping.groups.iter().map(|g| g.product_id().as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);

        let bolt = grouping.groups.get(&ProductId::parse("B").unwrap()).unwrap();
        assert_eq!(bolt.id().as_str(), "B");
        assert_eq!(bolt.product_name(), "Bolt");
        assert_eq!(bolt.records().len(), 2);
        assert_eq!(grouping.groups.record_count(), 3);
        assert!(grouping.rejected.is_empty());
    }

    #[test]
    fn ids_differing_in_whitespace_stay_separate() {
        let records = vec![
            row("P1", "Widget", "2024-01-05", 10.0, 1.0),
            row(" P1", "Widget", "2024-02-05", 20.0, 2.0),
        ];
        let grouping = group_records(&records, 7.0, RowPolicy::Strict).unwrap();

        let ids: Vec<&str> = grouping.groups.iter().map(|g| g.product_id().as_str()).collect();
        assert_eq!(ids, vec!["P1", " P1"]);
        assert_eq!(grouping.groups.record_count(), 2);
    }

    #[test]
    fn chronological_view_leaves_insertion_order_untouched() {
        let records = vec![
            row("A", "Axle", "2024-03-01", 30.0, 0.0),
            row("A", "Axle", "2024-01-01", 10.0, 0.0),
            row("A", "Axle", "2024-02-01", 20.0, 0.0),
        ];
        let grouping = group_records(&records, 7.0, RowPolicy::Strict).unwrap();
        let group = grouping.groups.iter().next().unwrap();

        let inserted: Vec<f64> = group.records().iter().map(|r| r.inventory_level).collect();
        let sorted: Vec<f64> = group.chronological().iter().map(|r| r.inventory_level).collect();
        assert_eq!(inserted, vec![30.0, 10.0, 20.0]);
        assert_eq!(sorted, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn strict_policy_fails_on_first_bad_row() {
        let records = vec![
            row("A", "Axle", "2024-01-01", 10.0, 1.0),
            row("A", "Axle", "garbage", 10.0, 1.0),
        ];
        let err = group_records(&records, 7.0, RowPolicy::Strict).unwrap_err();
        assert!(matches!(err, ThresholdError::InvalidDate { row: 1, .. }));
    }

    #[test]
    fn skip_policy_collects_rejections() {
        let mut bad_number = row("A", "Axle", "2024-01-02", 0.0, 1.0);
        bad_number.inventory_level = "n/a".into();

        let records = vec![
            row("A", "Axle", "2024-01-01", 10.0, 1.0),
            bad_number,
            row(" ", "Blank", "2024-01-03", 10.0, 1.0),
        ];
        let grouping = group_records(&records, 7.0, RowPolicy::SkipInvalid).unwrap();

        assert_eq!(grouping.groups.len(), 1);
        assert_eq!(grouping.groups.record_count(), 1);
        let rejected_rows: Vec<usize> = grouping.rejected.iter().map(|r| r.row).collect();
        assert_eq!(rejected_rows, vec![1, 2]);
        assert!(grouping.rejected[0].reason.contains("inventory_level"));
    }
}
