//! Error types for holdings parsing.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading a holdings file.
///
/// Every variant is fatal for the file being loaded and for that file only.
#[derive(Debug, Error)]
pub enum DataError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV content (bad quoting, invalid UTF-8)
    ///
    /// Positions reported by the CSV reader count from the header row, after
    /// the skipped metadata lines.
    #[error("CSV error ({skipped} metadata line(s) skipped before line 1): {source}")]
    Csv {
        /// Number of metadata lines skipped before the reader started
        skipped: usize,
        /// Underlying CSV error
        source: csv::Error,
    },

    /// The file ended before a header row was found
    #[error("No header row found after skipping {skipped} metadata line(s)")]
    MissingHeader {
        /// Number of metadata lines that were skipped
        skipped: usize,
    },

    /// One or more required columns are absent from the header
    #[error("Missing required column(s): {}", .columns.join(", "))]
    MissingColumns {
        /// Names of the absent columns
        columns: Vec<String>,
    },
}

impl DataError {
    /// Returns true if the file could be read but its content is not a usable
    /// holdings export.
    pub const fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::Csv { .. } | Self::MissingHeader { .. } | Self::MissingColumns { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message() {
        let err = DataError::MissingColumns {
            columns: vec!["Asset Class".to_string(), "Settore".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required column(s): Asset Class, Settore"
        );
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_io_is_not_parse_error() {
        let err = DataError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        assert!(!err.is_parse_error());
    }
}
