//! End-to-end analysis run.
//!
//! One call loads the benchmark and every fund, blends the funds and builds
//! all comparison datasets. Nothing is kept between runs: when inputs
//! change, run the analysis again.

use crate::aggregate::{AggregatedPortfolio, aggregate_loaded};
use crate::allocation::{AllocationCheck, DEFAULT_ALLOCATION_TOLERANCE};
use crate::benchmark::BenchmarkPortfolio;
use crate::comparison::{
    ComparisonConfig, ExposureComparison, HoldingComparison, overlap_ratio, region_comparison,
    sector_comparison, top_holdings,
};
use crate::fund::{FundInput, FundLoadError};
use etfblend_data::{DataError, HoldingsLoader, LoaderConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Maximum number of funds in one portfolio.
pub const DEFAULT_MAX_FUNDS: usize = 10;

/// Errors that abort an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The benchmark file could not be loaded.
    #[error("Benchmark could not be loaded: {0}")]
    Benchmark(#[source] DataError),

    /// No portfolio funds were given.
    #[error("At least one portfolio fund is required")]
    NoFunds,

    /// More funds than the configured limit.
    #[error("Too many funds: {count} given, at most {max} allowed")]
    TooManyFunds {
        /// Number of funds given
        count: usize,
        /// Configured limit
        max: usize,
    },
}

/// Configuration for an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Holdings loader settings, shared by benchmark and funds
    pub loader: LoaderConfig,
    /// Comparison dataset settings
    pub comparison: ComparisonConfig,
    /// Accepted deviation of the allocation total from 100 (default: 0.01)
    pub allocation_tolerance: f64,
    /// Maximum number of funds (default: 10)
    pub max_funds: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            comparison: ComparisonConfig::default(),
            allocation_tolerance: DEFAULT_ALLOCATION_TOLERANCE,
            max_funds: DEFAULT_MAX_FUNDS,
        }
    }
}

/// Raw content of one portfolio fund and its allocation.
#[derive(Debug, Clone, Copy)]
pub struct FundSource<'a> {
    /// Source name (usually the file name).
    pub label: &'a str,
    /// File content.
    pub content: &'a [u8],
    /// Allocation in percent.
    pub allocation_pct: f64,
}

impl<'a> FundSource<'a> {
    /// Create a new fund source.
    pub const fn new(label: &'a str, content: &'a [u8], allocation_pct: f64) -> Self {
        Self {
            label,
            content,
            allocation_pct,
        }
    }
}

/// A fund left out of the blend because it failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundFailure {
    /// Source name of the fund.
    pub label: String,
    /// Error description.
    pub message: String,
}

impl From<&FundLoadError> for FundFailure {
    fn from(err: &FundLoadError) -> Self {
        Self {
            label: err.label.clone(),
            message: err.source.to_string(),
        }
    }
}

/// Result of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// The benchmark holdings.
    pub benchmark: BenchmarkPortfolio,

    /// The blended portfolio.
    pub portfolio: AggregatedPortfolio,

    /// Allocation total of all funds given, loaded or not.
    pub allocation: AllocationCheck,

    /// Largest benchmark holdings with their portfolio weight.
    pub top_holdings: Vec<HoldingComparison>,

    /// Sector breakdown of both sides.
    pub sectors: BTreeMap<String, ExposureComparison>,

    /// Region breakdown of both sides.
    pub regions: BTreeMap<String, ExposureComparison>,

    /// Share of portfolio holdings present in the benchmark, if requested.
    pub overlap_ratio: Option<f64>,

    /// Funds that failed to load.
    pub failures: Vec<FundFailure>,
}

impl Analysis {
    /// Build the comparison datasets from already-loaded inputs.
    ///
    /// Funds that failed to load are recorded in [`Analysis::failures`] and
    /// do not contribute to the portfolio. Their allocation still counts
    /// toward the allocation check.
    pub fn build(
        benchmark: BenchmarkPortfolio,
        funds: &[Result<FundInput, FundLoadError>],
        comparison: &ComparisonConfig,
        allocation_tolerance: f64,
    ) -> Self {
        let allocations: Vec<f64> = funds
            .iter()
            .map(|fund| match fund {
                Ok(fund) => fund.allocation_pct,
                Err(err) => err.allocation_pct,
            })
            .collect();
        let allocation = AllocationCheck::new(&allocations, allocation_tolerance);
        if !allocation.is_balanced() {
            tracing::warn!(total = allocation.total, "allocations do not sum to 100%");
        }

        let portfolio = aggregate_loaded(funds);
        let failures = funds
            .iter()
            .filter_map(|fund| fund.as_ref().err())
            .map(FundFailure::from)
            .collect();

        Self {
            top_holdings: top_holdings(&benchmark, &portfolio, comparison.top_n),
            sectors: sector_comparison(&benchmark, &portfolio),
            regions: region_comparison(&benchmark, &portfolio),
            overlap_ratio: comparison
                .include_overlap
                .then(|| overlap_ratio(&benchmark, &portfolio)),
            benchmark,
            portfolio,
            allocation,
            failures,
        }
    }

    /// Returns true if at least one fund was left out.
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Number of benchmark holdings.
    pub fn benchmark_holding_count(&self) -> usize {
        self.benchmark.len()
    }

    /// Number of portfolio holdings.
    pub fn portfolio_holding_count(&self) -> usize {
        self.portfolio.holding_count()
    }
}

/// Load all inputs and build the comparison datasets.
///
/// A fund that fails to load is reported in [`Analysis::failures`] and the
/// run continues with the others.
///
/// # Errors
///
/// Returns [`AnalysisError::Benchmark`] if the benchmark cannot be loaded,
/// and [`AnalysisError::NoFunds`] / [`AnalysisError::TooManyFunds`] when the
/// fund count is out of range.
pub fn run_analysis(
    benchmark: &[u8],
    funds: &[FundSource<'_>],
    config: &AnalysisConfig,
) -> Result<Analysis, AnalysisError> {
    if funds.is_empty() {
        return Err(AnalysisError::NoFunds);
    }
    if funds.len() > config.max_funds {
        return Err(AnalysisError::TooManyFunds {
            count: funds.len(),
            max: config.max_funds,
        });
    }

    let loader = HoldingsLoader::new(config.loader.clone());

    let benchmark = loader
        .load_from_bytes(benchmark)
        .map(BenchmarkPortfolio::new)
        .map_err(AnalysisError::Benchmark)?;
    tracing::debug!(holdings = benchmark.len(), "loaded benchmark");

    let loaded: Vec<Result<FundInput, FundLoadError>> = funds
        .iter()
        .map(|source| {
            loader
                .load_from_bytes(source.content)
                .map(|records| FundInput::new(source.label, records, source.allocation_pct))
                .map_err(|err| FundLoadError::new(source.label, source.allocation_pct, err))
        })
        .collect();

    Ok(Analysis::build(
        benchmark,
        &loaded,
        &config.comparison,
        config.allocation_tolerance,
    ))
}
