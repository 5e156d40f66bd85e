//! Export of comparison tables and portfolio holdings.
//!
//! Every exportable dataset implements [`Exporter`] and can be written as
//! CSV, compact JSON or pretty-printed JSON.

use etfblend_portfolio::{AggregatedPortfolio, Analysis, ExposureComparison, HoldingComparison};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output was not valid UTF-8.
    #[error("Invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn write_csv<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn write_json<T: Serialize + ?Sized>(value: &T, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(value)?),
        _ => Ok(serde_json::to_string(value)?),
    }
}

/// Flattened top-holdings row for CSV export.
#[derive(Debug, Serialize)]
struct HoldingComparisonFlat<'a> {
    identifier: &'a str,
    name: &'a str,
    benchmark_weight: f64,
    portfolio_weight: f64,
    difference: f64,
}

impl Exporter for Vec<HoldingComparison> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self.iter().map(|row| HoldingComparisonFlat {
                identifier: &row.identifier,
                name: &row.name,
                benchmark_weight: row.benchmark_weight,
                portfolio_weight: row.portfolio_weight,
                difference: row.difference(),
            })),
            ExportFormat::Json | ExportFormat::PrettyJson => write_json(self, format),
        }
    }
}

/// One line of a sector or region table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExposureRow {
    /// Sector or region label.
    pub label: String,

    /// Weight in the benchmark, in percent.
    pub benchmark_weight: f64,

    /// Weight in the portfolio, in percent.
    pub portfolio_weight: f64,

    /// Portfolio minus benchmark.
    pub difference: f64,
}

/// Sector or region comparison, heaviest benchmark exposure first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExposureTable {
    /// What the labels classify ("sector" or "region").
    pub dimension: String,

    /// Rows sorted by benchmark weight, then portfolio weight, then label.
    pub rows: Vec<ExposureRow>,
}

impl ExposureTable {
    /// Create a table from a comparison map.
    pub fn new(
        dimension: impl Into<String>,
        comparisons: &BTreeMap<String, ExposureComparison>,
    ) -> Self {
        let mut rows: Vec<ExposureRow> = comparisons
            .iter()
            .map(|(label, cmp)| ExposureRow {
                label: label.clone(),
                benchmark_weight: cmp.benchmark_weight,
                portfolio_weight: cmp.portfolio_weight,
                difference: cmp.difference(),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.benchmark_weight
                .total_cmp(&a.benchmark_weight)
                .then_with(|| b.portfolio_weight.total_cmp(&a.portfolio_weight))
                .then_with(|| a.label.cmp(&b.label))
        });

        Self {
            dimension: dimension.into(),
            rows,
        }
    }

    /// Sector table of an analysis.
    pub fn sectors(analysis: &Analysis) -> Self {
        Self::new("sector", &analysis.sectors)
    }

    /// Region table of an analysis.
    pub fn regions(analysis: &Analysis) -> Self {
        Self::new("region", &analysis.regions)
    }
}

impl Exporter for ExposureTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(&self.rows),
            ExportFormat::Json | ExportFormat::PrettyJson => write_json(self, format),
        }
    }
}

/// A blended-portfolio holding for export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioHoldingRow {
    /// Issuer ticker (empty if the source had none).
    pub identifier: String,

    /// Security name.
    pub name: String,

    /// Sector.
    pub sector: String,

    /// Region.
    pub region: String,

    /// Weight in the portfolio, in percent.
    pub weight: f64,
}

/// All holdings of a blended portfolio, heaviest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioHoldingsExport {
    /// Number of funds that contributed.
    pub funds: usize,

    /// Holdings sorted by descending weight.
    pub holdings: Vec<PortfolioHoldingRow>,
}

impl PortfolioHoldingsExport {
    /// Get total portfolio weight, in percent.
    pub fn total_weight(&self) -> f64 {
        self.holdings.iter().map(|h| h.weight).sum()
    }
}

impl From<&AggregatedPortfolio> for PortfolioHoldingsExport {
    fn from(portfolio: &AggregatedPortfolio) -> Self {
        let holdings = portfolio
            .sorted_holdings()
            .into_iter()
            .map(|h| PortfolioHoldingRow {
                identifier: h.identifier.clone(),
                name: h.name.clone(),
                sector: h.sector.clone(),
                region: h.region.clone(),
                weight: h.weight,
            })
            .collect();

        Self {
            funds: portfolio.funds_aggregated(),
            holdings,
        }
    }
}

impl Exporter for PortfolioHoldingsExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut output = String::new();

                // Write header information as comments
                output.push_str(&format!("# Funds: {}\n", self.funds));
                output.push_str(&format!("# Holdings: {}\n", self.holdings.len()));
                output.push_str(&format!("# Total Weight: {:.4}\n", self.total_weight()));

                output.push_str(&write_csv(&self.holdings)?);
                Ok(output)
            }
            ExportFormat::Json | ExportFormat::PrettyJson => write_json(self, format),
        }
    }
}
