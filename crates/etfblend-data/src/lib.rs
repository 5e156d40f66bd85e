#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/etfblend/etfblend/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod holding;
pub mod loader;
pub mod numeric;
pub mod schema;

pub use error::{DataError, Result};
pub use holding::HoldingRecord;
pub use loader::{HoldingsLoader, LoaderConfig, load_holdings};
pub use numeric::normalize_percent;
pub use schema::{ColumnSchema, SchemaPreset, SchemaSelection};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
