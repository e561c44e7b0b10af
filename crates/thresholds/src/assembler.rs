//! Result assembler: one output record per product.

use serde::{Deserialize, Serialize};

use crate::calculator::{ProductMetrics, ThresholdOutcome, UsageSummary};
use crate::grouper::ProductGroup;
use crate::monthly::{MonthlyPoint, MonthlySeries};

/// Final per-product record, ready for tabular export or charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResult {
    pub product_id: String,
    pub product_name: String,
    #[serde(flatten)]
    pub summary: UsageSummary,
    #[serde(flatten)]
    pub metrics: ProductMetrics,
    #[serde(rename = "inventoryData")]
    pub inventory_data: Vec<MonthlyPoint>,
    #[serde(rename = "salesData")]
    pub sales_data: Vec<MonthlyPoint>,
}

/// Merge the calculator outcome and monthly series of `group`.
pub fn assemble(
    group: &ProductGroup,
    outcome: ThresholdOutcome,
    series: Option<MonthlySeries>,
) -> ProductResult {
    let MonthlySeries { inventory, sales } = series.unwrap_or_default();
    ProductResult {
        product_id: group.product_id().to_string(),
        product_name: group.product_name().to_string(),
        summary: outcome.summary,
        metrics: outcome.metrics,
        inventory_data: inventory,
        sales_data: sales,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::compute_metrics;
    use crate::config::ThresholdConfig;
    use crate::grouper::{group_records, RowPolicy};
    use crate::monthly::aggregate_monthly;
    use crate::record::InputRecord;

    #[test]
    fn missing_series_default_to_empty() {
        let records = vec![InputRecord::new("P9", "Gizmo", "2024-04-01", 5.0, 1.0, 2.0)];
        let grouping = group_records(&records, 7.0, RowPolicy::Strict).unwrap();
        let group = grouping.groups.iter().next().unwrap();
        let outcome = compute_metrics(group, &ThresholdConfig::default()).unwrap();

        let result = assemble(group, outcome, None);
        assert_eq!(result.product_id, "P9");
        assert_eq!(result.product_name, "Gizmo");
        assert!(result.inventory_data.is_empty());
        assert!(result.sales_data.is_empty());
    }

    #[test]
    fn serialized_shape_is_flat() {
        let records = vec![
            InputRecord::new("P1", "Widget", "2024-01-05", 100.0, 10.0, 5.0),
            InputRecord::new("P1", "Widget", "2024-02-05", 80.0, 15.0, 5.0),
        ];
        let grouping = group_records(&records, 7.0, RowPolicy::Strict).unwrap();
        let group = grouping.groups.iter().next().unwrap();
        let outcome = compute_metrics(group, &ThresholdConfig::default()).unwrap();
        let result = assemble(group, outcome, Some(aggregate_monthly(group)));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["product_id"], "P1");
        assert_eq!(json["current_inventory"], 80.0);
        assert_eq!(json["date_range_days"], 31);
        assert_eq!(json["inventory_status"], "High");
        assert_eq!(json["reorder_needed"], false);
        assert_eq!(json["inventoryData"][1]["month_label"], "February");
        assert_eq!(json["salesData"][0]["value"], 10.0);
        assert!(json.get("summary").is_none());
        assert!(json.get("metrics").is_none());
    }
}
