//! Holdings export loader.
//!
//! Turns the raw bytes of one fund's export into the ordered list of equity
//! holdings with a positive weight. Each call is independent: the loader
//! keeps no state between files.

use crate::error::{DataError, Result};
use crate::holding::HoldingRecord;
use crate::numeric::normalize_percent;
use crate::schema::SchemaSelection;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Number of metadata lines preceding the header row in a standard export.
pub const DEFAULT_SKIP_ROWS: usize = 2;

/// Configuration for the holdings loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Physical lines to discard before the header row (default: 2)
    pub skip_rows: usize,
    /// Column schema selection (default: auto-detect)
    pub schema: SchemaSelection,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            skip_rows: DEFAULT_SKIP_ROWS,
            schema: SchemaSelection::Auto,
        }
    }
}

/// Parses holdings exports into [`HoldingRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct HoldingsLoader {
    config: LoaderConfig,
}

impl HoldingsLoader {
    /// Create a loader with the given configuration.
    pub const fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Get the loader configuration.
    pub const fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load holdings from a file on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid export.
    pub fn load_from_path(&self, path: &Path) -> Result<Vec<HoldingRecord>> {
        tracing::debug!(path = %path.display(), "loading holdings file");
        let bytes = std::fs::read(path)?;
        self.load_from_bytes(&bytes)
    }

    /// Load holdings from any reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the content is not a valid export.
    pub fn load_from_reader<R: Read>(&self, mut reader: R) -> Result<Vec<HoldingRecord>> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.load_from_bytes(&bytes)
    }

    /// Load holdings from in-memory file content.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingHeader`] if no header row follows the
    /// metadata lines, [`DataError::MissingColumns`] if a required column is
    /// absent, and [`DataError::Csv`] for malformed content.
    pub fn load_from_bytes(&self, bytes: &[u8]) -> Result<Vec<HoldingRecord>> {
        let skipped = self.config.skip_rows;
        let body = skip_lines(bytes, skipped).ok_or(DataError::MissingHeader { skipped })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(body);
        let mut rows = reader.records();
        let malformed = |source| DataError::Csv { skipped, source };

        let header = loop {
            match rows.next() {
                Some(row) => {
                    let row = row.map_err(malformed)?;
                    if row.iter().any(|cell| !cell.trim().is_empty()) {
                        break row;
                    }
                }
                None => return Err(DataError::MissingHeader { skipped }),
            }
        };
        let header: Vec<String> = header
            .iter()
            .map(|cell| cell.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let (schema, columns) = self.config.schema.resolve(&header)?;

        let mut holdings = Vec::new();
        let mut total_rows = 0usize;
        for row in rows {
            let row = row.map_err(malformed)?;
            total_rows += 1;

            let cell = |index: usize| row.get(index).map_or("", str::trim);
            if cell(columns.asset_class) != schema.equity_label {
                continue;
            }

            let weight_pct = normalize_percent(row.get(columns.weight));
            if weight_pct <= 0.0 {
                continue;
            }

            holdings.push(HoldingRecord::new(
                cell(columns.identifier),
                cell(columns.name),
                weight_pct,
                cell(columns.sector),
                cell(columns.region),
            ));
        }

        tracing::debug!(
            rows = total_rows,
            kept = holdings.len(),
            dropped = total_rows - holdings.len(),
            "parsed holdings export"
        );

        Ok(holdings)
    }
}

/// Load holdings from in-memory content with the default configuration.
///
/// # Errors
///
/// See [`HoldingsLoader::load_from_bytes`].
pub fn load_holdings(bytes: &[u8]) -> Result<Vec<HoldingRecord>> {
    HoldingsLoader::default().load_from_bytes(bytes)
}

/// Drop the first `count` newline-terminated lines, or `None` if the input
/// has fewer lines than that.
fn skip_lines(bytes: &[u8], count: usize) -> Option<&[u8]> {
    let mut rest = bytes;
    for _ in 0..count {
        let end = rest.iter().position(|&b| b == b'\n')?;
        rest = &rest[end + 1..];
    }
    Some(rest)
}
