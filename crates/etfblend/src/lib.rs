#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/etfblend/etfblend/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export main types from sub-crates
pub use etfblend_data as data;
pub use etfblend_output as output;
pub use etfblend_portfolio as portfolio;

// Re-export the common entry points
pub use etfblend_data::{HoldingRecord, HoldingsLoader, LoaderConfig, SchemaPreset, SchemaSelection};
pub use etfblend_output::{ExportFormat, Exporter, render_markdown, render_text};
pub use etfblend_portfolio::{Analysis, AnalysisConfig, AnalysisError, FundSource, run_analysis};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
