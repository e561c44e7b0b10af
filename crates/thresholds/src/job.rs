use serde::Serialize;
use tracing::{debug, info};

use crate::assembler::{assemble, ProductResult};
use crate::calculator::compute_metrics;
use crate::config::ThresholdConfig;
use crate::error::{ThresholdError, ThresholdResult};
use crate::grouper::{group_records, ProductGroup, RowPolicy, RowRejection};
use crate::monthly::aggregate_monthly;
use crate::record::InputRecord;

/// Output of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Rows that made it into a product group.
    pub record_count: usize,
    pub products_analyzed: usize,
    pub products: Vec<ProductResult>,
    pub rejected_rows: Vec<RowRejection>,
}

impl AnalysisReport {
    pub fn message(&self) -> String {
        format!(
            "Successfully processed {} inventory records and calculated thresholds for {} products",
            self.record_count, self.products_analyzed
        )
    }
}

/// Threshold analysis over one uploaded dataset.
///
/// Pipeline: group rows by product, then per product aggregate monthly
/// series, compute the reorder model, and assemble the result. Products are
/// independent of each other; output order is first-seen product order.
#[derive(Debug, Clone)]
pub struct ThresholdJob<'a> {
    records: &'a [InputRecord],
    config: ThresholdConfig,
    policy: RowPolicy,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    parallel: bool,
}

impl<'a> ThresholdJob<'a> {
    pub fn new(records: &'a [InputRecord], config: ThresholdConfig) -> Self {
        Self {
            records,
            config,
            policy: RowPolicy::default(),
            parallel: false,
        }
    }

    pub fn with_policy(mut self, policy: RowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the per-product stages on the rayon pool. Has no effect unless the
    /// `parallel` feature is enabled.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn run(&self) -> ThresholdResult<AnalysisReport> {
        if self.records.is_empty() {
            return Err(ThresholdError::EmptyInput);
        }

        let grouping = group_records(
            self.records,
            self.config.default_lead_time_days(),
            self.policy,
        )?;

        if grouping.groups.is_empty() {
            return Err(ThresholdError::AllRowsRejected {
                rejected: grouping.rejected.len(),
            });
        }

        let groups: Vec<&ProductGroup> = grouping.groups.iter().collect();
        let products = self.analyze_groups(&groups);

        info!(
            records = grouping.groups.record_count(),
            products = products.len(),
            rejected = grouping.rejected.len(),
            "threshold analysis complete"
        );

        Ok(AnalysisReport {
            record_count: grouping.groups.record_count(),
            products_analyzed: products.len(),
            products,
            rejected_rows: grouping.rejected,
        })
    }

    #[cfg(feature = "parallel")]
    fn analyze_groups(&self, groups: &[&ProductGroup]) -> Vec<ProductResult> {
        use rayon::prelude::*;

        if self.parallel {
            // rayon's collect keeps input order.
            groups
                .par_iter()
                .filter_map(|g| analyze_product(g, &self.config))
                .collect()
        } else {
            groups
                .iter()
                .filter_map(|g| analyze_product(g, &self.config))
                .collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn analyze_groups(&self, groups: &[&ProductGroup]) -> Vec<ProductResult> {
        groups
            .iter()
            .filter_map(|g| analyze_product(g, &self.config))
            .collect()
    }
}

fn analyze_product(group: &ProductGroup, config: &ThresholdConfig) -> Option<ProductResult> {
    let series = aggregate_monthly(group);
    let outcome = compute_metrics(group, config)?;

    debug!(
        product_id = %group.product_id(),
        status = ?outcome.metrics.inventory_status,
        low = outcome.metrics.low_threshold,
        medium = outcome.metrics.medium_threshold,
        high = outcome.metrics.high_threshold,
        reorder = outcome.metrics.reorder_needed,
        "computed thresholds"
    );

    Some(assemble(group, outcome, Some(series)))
}

/// Compute per-product thresholds, failing on the first malformed row.
pub fn compute_thresholds(
    records: &[InputRecord],
    config: &ThresholdConfig,
) -> ThresholdResult<Vec<ProductResult>> {
    ThresholdJob::new(records, *config)
        .run()
        .map(|report| report.products)
}
