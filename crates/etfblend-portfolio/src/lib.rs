#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/etfblend/etfblend/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod allocation;
pub mod analysis;
pub mod benchmark;
pub mod comparison;
pub mod fund;

pub use aggregate::{AggregatedHolding, AggregatedPortfolio, aggregate, aggregate_loaded};
pub use allocation::{AllocationCheck, DEFAULT_ALLOCATION_TOLERANCE, equal_allocations};
pub use analysis::{
    Analysis, AnalysisConfig, AnalysisError, FundFailure, FundSource, run_analysis,
};
pub use benchmark::BenchmarkPortfolio;
pub use comparison::{
    ComparisonConfig, ExposureComparison, HoldingComparison, overlap_ratio, region_comparison,
    sector_comparison, top_holdings,
};
pub use fund::{FundInput, FundLoadError};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
