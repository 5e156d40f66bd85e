//! Analysis reports.

use chrono::{DateTime, Utc};
use etfblend_portfolio::Analysis;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The builder was finished without an analysis.
    #[error("Report has no analysis")]
    MissingAnalysis,
}

/// A fund as given on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportFund {
    /// Source name of the fund.
    pub label: String,

    /// Allocation in percent.
    pub allocation_pct: f64,
}

/// A saved analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report title.
    pub title: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Source name of the benchmark.
    pub benchmark: String,

    /// Portfolio funds in input order.
    pub funds: Vec<ReportFund>,

    /// The analysis itself.
    pub analysis: Analysis,
}

impl Report {
    /// Create a new report stamped with the current time.
    pub fn new(
        title: String,
        benchmark: String,
        funds: Vec<ReportFund>,
        analysis: Analysis,
    ) -> Self {
        Self {
            title,
            timestamp: Utc::now(),
            benchmark,
            funds,
            analysis,
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as JSON.
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        let mut file = File::create(path)?;
        file.write_all(self.to_json()?.as_bytes())?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    title: Option<String>,
    benchmark: Option<String>,
    funds: Vec<ReportFund>,
    analysis: Option<Analysis>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the benchmark name.
    pub fn benchmark(mut self, benchmark: impl Into<String>) -> Self {
        self.benchmark = Some(benchmark.into());
        self
    }

    /// Add a portfolio fund.
    pub fn fund(mut self, label: impl Into<String>, allocation_pct: f64) -> Self {
        self.funds.push(ReportFund {
            label: label.into(),
            allocation_pct,
        });
        self
    }

    /// Set the analysis.
    pub fn analysis(mut self, analysis: Analysis) -> Self {
        self.analysis = Some(analysis);
        self
    }

    /// Build the report.
    pub fn build(self) -> Result<Report, ReportError> {
        let analysis = self.analysis.ok_or(ReportError::MissingAnalysis)?;
        Ok(Report::new(
            self.title
                .unwrap_or_else(|| "Benchmark vs Portfolio".to_string()),
            self.benchmark.unwrap_or_default(),
            self.funds,
            analysis,
        ))
    }
}
