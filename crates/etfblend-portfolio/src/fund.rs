//! Constituent funds of a blended portfolio.

use etfblend_data::{DataError, HoldingRecord, holding::total_weight};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One ETF's parsed holdings together with its share of the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundInput {
    /// Source name (usually the file name).
    pub label: String,

    /// Equity holdings of the fund, in source order.
    pub records: Vec<HoldingRecord>,

    /// Share of the portfolio assigned to this fund, in percent (0 to 100).
    pub allocation_pct: f64,
}

impl FundInput {
    /// Create a new fund input.
    pub fn new(label: impl Into<String>, records: Vec<HoldingRecord>, allocation_pct: f64) -> Self {
        Self {
            label: label.into(),
            records,
            allocation_pct,
        }
    }

    /// Multiplier applied to this fund's raw weights.
    pub const fn scale(&self) -> f64 {
        self.allocation_pct / 100.0
    }

    /// Total weight of the fund's equity holdings, in percent.
    pub fn equity_weight(&self) -> f64 {
        total_weight(&self.records)
    }

    /// Weight this fund contributes to the blended portfolio, in percent.
    pub fn contributed_weight(&self) -> f64 {
        self.equity_weight() * self.scale()
    }
}

/// A fund whose holdings file could not be loaded.
#[derive(Debug, Error)]
#[error("Failed to load {label}: {source}")]
pub struct FundLoadError {
    /// Source name of the fund.
    pub label: String,

    /// Allocation the fund would have had, in percent.
    pub allocation_pct: f64,

    /// Underlying loader error.
    #[source]
    pub source: DataError,
}

impl FundLoadError {
    /// Create a new fund load error.
    pub fn new(label: impl Into<String>, allocation_pct: f64, source: DataError) -> Self {
        Self {
            label: label.into(),
            allocation_pct,
            source,
        }
    }
}
