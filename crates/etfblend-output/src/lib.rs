#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/etfblend/etfblend/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod render;
pub mod report;

pub use export::{
    ExportError, ExportFormat, Exporter, ExposureRow, ExposureTable, PortfolioHoldingRow,
    PortfolioHoldingsExport,
};
pub use render::{render_markdown, render_text};
pub use report::{Report, ReportBuilder, ReportError, ReportFund};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
