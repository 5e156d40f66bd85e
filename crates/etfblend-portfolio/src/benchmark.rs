//! Benchmark composition.

use crate::aggregate::group_weights;
use etfblend_data::{HoldingRecord, holding::total_weight};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// The reference fund a blended portfolio is compared against.
///
/// Holds the benchmark's equity records unweighted (an implicit 100%
/// allocation) together with their sector and region totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkPortfolio {
    records: Vec<HoldingRecord>,
    sector_weights: BTreeMap<String, f64>,
    region_weights: BTreeMap<String, f64>,
}

impl BenchmarkPortfolio {
    /// Create a benchmark from its parsed records.
    pub fn new(records: Vec<HoldingRecord>) -> Self {
        let sector_weights = owned(group_weights(&records, |r| r.sector.as_str()));
        let region_weights = owned(group_weights(&records, |r| r.region.as_str()));

        Self {
            records,
            sector_weights,
            region_weights,
        }
    }

    /// Get all records, in source order.
    pub fn records(&self) -> &[HoldingRecord] {
        &self.records
    }

    /// Number of holdings (rows) in the benchmark.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the benchmark has no holdings.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Weight per sector, in percent.
    pub const fn sector_weights(&self) -> &BTreeMap<String, f64> {
        &self.sector_weights
    }

    /// Weight per region, in percent.
    pub const fn region_weights(&self) -> &BTreeMap<String, f64> {
        &self.region_weights
    }

    /// Total equity weight, in percent.
    pub fn total_weight(&self) -> f64 {
        total_weight(&self.records)
    }

    /// Set of identifiers in the benchmark. Blank-ticker rows share the
    /// empty identifier.
    pub fn identifiers(&self) -> HashSet<&str> {
        self.records
            .iter()
            .map(|r| r.identifier.as_str())
            .collect()
    }
}

impl From<Vec<HoldingRecord>> for BenchmarkPortfolio {
    fn from(records: Vec<HoldingRecord>) -> Self {
        Self::new(records)
    }
}

fn owned(groups: HashMap<&str, f64>) -> BTreeMap<String, f64> {
    groups
        .into_iter()
        .map(|(label, weight)| (label.to_string(), weight))
        .collect()
}
