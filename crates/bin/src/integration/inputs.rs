//! Fund arguments and input files.

use etfblend_portfolio::equal_allocations;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors resolving command-line inputs.
#[derive(Debug, Error)]
pub(crate) enum InputError {
    /// An allocation outside 0-100 or not a number.
    #[error("Invalid allocation for {}: {value} (expected 0 to 100)", .path.display())]
    InvalidAllocation {
        /// Fund file
        path: PathBuf,
        /// Allocation given
        value: f64,
    },

    /// An input file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// Input file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

/// A `FILE[=ALLOC]` fund argument.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FundArg {
    pub(crate) path: PathBuf,
    pub(crate) allocation_pct: Option<f64>,
}

impl FundArg {
    /// Parse `FILE` or `FILE=ALLOC`.
    ///
    /// The text after the last `=` is an allocation only if it parses as a
    /// number. Otherwise the whole argument is the path.
    pub(crate) fn parse(arg: &str) -> Self {
        if let Some((path, alloc)) = arg.rsplit_once('=')
            && let Ok(value) = alloc.trim().parse::<f64>()
        {
            return Self {
                path: PathBuf::from(path),
                allocation_pct: Some(value),
            };
        }

        Self {
            path: PathBuf::from(arg),
            allocation_pct: None,
        }
    }

    /// Name shown for this fund: the file name, or the whole path if it has
    /// none.
    pub(crate) fn label(&self) -> String {
        file_label(&self.path)
    }
}

/// File name of a path, for display.
pub(crate) fn file_label(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Allocation of every fund, in input order.
///
/// Funds without an explicit allocation get an equal share of 100%.
pub(crate) fn resolve_allocations(funds: &[FundArg]) -> Result<Vec<f64>, InputError> {
    let defaults = equal_allocations(funds.len());

    funds
        .iter()
        .zip(defaults)
        .map(|(fund, default)| {
            let value = fund.allocation_pct.unwrap_or(default);
            if value.is_finite() && (0.0..=100.0).contains(&value) {
                Ok(value)
            } else {
                Err(InputError::InvalidAllocation {
                    path: fund.path.clone(),
                    value,
                })
            }
        })
        .collect()
}

/// Read an input file.
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>, InputError> {
    std::fs::read(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the benchmark and every fund file, stopping at the first failure.
pub(crate) fn read_inputs(
    benchmark: &Path,
    funds: &[FundArg],
) -> Result<(Vec<u8>, Vec<Vec<u8>>), InputError> {
    let benchmark = read_input(benchmark)?;
    let funds = funds
        .iter()
        .map(|fund| read_input(&fund.path))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((benchmark, funds))
}
