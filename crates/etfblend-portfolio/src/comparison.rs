//! Benchmark versus portfolio comparison datasets.
//!
//! These are the tables the presentation layer charts: the benchmark's
//! largest holdings next to their weight in the portfolio, the sector and
//! region breakdowns of both sides, and the overlap ratio.

use crate::aggregate::AggregatedPortfolio;
use crate::benchmark::BenchmarkPortfolio;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of benchmark holdings compared by default.
pub const DEFAULT_TOP_N: usize = 30;

/// Configuration for the comparison datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Number of benchmark holdings in the top-holdings table (default: 30)
    pub top_n: usize,
    /// Whether to compute the overlap ratio (default: true)
    pub include_overlap: bool,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            include_overlap: true,
        }
    }
}

/// A benchmark holding next to its weight in the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingComparison {
    /// Issuer ticker.
    pub identifier: String,

    /// Security name, as reported by the benchmark.
    pub name: String,

    /// Weight in the benchmark, in percent.
    pub benchmark_weight: f64,

    /// Weight in the portfolio, in percent (0 if not held).
    pub portfolio_weight: f64,
}

impl HoldingComparison {
    /// Active weight (portfolio minus benchmark).
    pub fn difference(&self) -> f64 {
        self.portfolio_weight - self.benchmark_weight
    }
}

/// Benchmark and portfolio weight of one sector or region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposureComparison {
    /// Weight in the benchmark, in percent.
    pub benchmark_weight: f64,

    /// Weight in the portfolio, in percent.
    pub portfolio_weight: f64,
}

impl ExposureComparison {
    /// Active weight (portfolio minus benchmark).
    pub fn difference(&self) -> f64 {
        self.portfolio_weight - self.benchmark_weight
    }
}

/// The `n` largest benchmark holdings with their portfolio weight.
///
/// Rows keep the benchmark ranking. Equal weights keep their source order.
/// A holding the portfolio does not own gets a portfolio weight of 0.
pub fn top_holdings(
    benchmark: &BenchmarkPortfolio,
    portfolio: &AggregatedPortfolio,
    n: usize,
) -> Vec<HoldingComparison> {
    let mut ranked: Vec<_> = benchmark.records().iter().collect();
    // stable sort: ties stay in file order
    ranked.sort_by(|a, b| b.weight_pct.total_cmp(&a.weight_pct));

    ranked
        .into_iter()
        .take(n)
        .map(|record| HoldingComparison {
            identifier: record.identifier.clone(),
            name: record.name.clone(),
            benchmark_weight: record.weight_pct,
            portfolio_weight: portfolio.weight_of(&record.identifier),
        })
        .collect()
}

/// Sector weights of both sides over the union of their sectors.
pub fn sector_comparison(
    benchmark: &BenchmarkPortfolio,
    portfolio: &AggregatedPortfolio,
) -> BTreeMap<String, ExposureComparison> {
    merge_exposures(benchmark.sector_weights(), portfolio.sector_weights())
}

/// Region weights of both sides over the union of their regions.
pub fn region_comparison(
    benchmark: &BenchmarkPortfolio,
    portfolio: &AggregatedPortfolio,
) -> BTreeMap<String, ExposureComparison> {
    merge_exposures(benchmark.region_weights(), portfolio.region_weights())
}

fn merge_exposures(
    benchmark: &BTreeMap<String, f64>,
    portfolio: &BTreeMap<String, f64>,
) -> BTreeMap<String, ExposureComparison> {
    let mut merged: BTreeMap<String, ExposureComparison> = BTreeMap::new();

    for (label, weight) in benchmark {
        merged.entry(label.clone()).or_default().benchmark_weight = *weight;
    }
    for (label, weight) in portfolio {
        merged.entry(label.clone()).or_default().portfolio_weight = *weight;
    }

    merged
}

/// Percentage of portfolio holdings that also appear in the benchmark.
///
/// Counts holdings, not weight. The blank identifier is matched like any
/// other. Returns 0 for an empty portfolio.
pub fn overlap_ratio(benchmark: &BenchmarkPortfolio, portfolio: &AggregatedPortfolio) -> f64 {
    let total = portfolio.holding_count();
    if total == 0 {
        return 0.0;
    }

    let benchmark_ids = benchmark.identifiers();
    let shared = portfolio
        .holdings()
        .keys()
        .filter(|id| benchmark_ids.contains(id.as_str()))
        .count();

    shared as f64 / total as f64 * 100.0
}
