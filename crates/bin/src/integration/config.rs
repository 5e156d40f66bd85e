//! Settings file and command-line overrides.
//!
//! Settings are read from a JSON file holding an [`AnalysisConfig`]. Every
//! field is optional; missing ones keep their default.

use etfblend_data::SchemaSelection;
use etfblend_portfolio::AnalysisConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading a settings file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read settings file {}: {source}", .path.display())]
    Io {
        /// Settings file path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not a valid settings document.
    #[error("Invalid settings file {}: {source}", .path.display())]
    Parse {
        /// Settings file path
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },
}

/// Get the default settings file path.
///
/// Uses platform-specific config directories:
/// - Linux: `~/.config/etfblend/config.json`
/// - macOS: `~/Library/Application Support/etfblend/config.json`
/// - Windows: `%APPDATA%\etfblend\config.json`
pub(crate) fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("etfblend").join("config.json"))
}

/// Read a settings file.
pub(crate) fn read_config(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load settings from an explicit file, or from the default location if a
/// file exists there, or fall back to defaults.
///
/// An explicit path that cannot be read is an error. A missing default file
/// is not.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<AnalysisConfig, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    match default_config_path() {
        Some(path) if path.is_file() => {
            tracing::debug!(path = %path.display(), "using settings file");
            read_config(&path)
        }
        _ => Ok(AnalysisConfig::default()),
    }
}

/// Settings given as command-line flags. They take precedence over the file.
#[derive(Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) top_n: Option<usize>,
    pub(crate) no_overlap: bool,
    pub(crate) schema: Option<SchemaSelection>,
    pub(crate) skip_rows: Option<usize>,
}

impl Overrides {
    /// Apply the flags that were given.
    pub(crate) fn apply(self, config: &mut AnalysisConfig) {
        if let Some(top_n) = self.top_n {
            config.comparison.top_n = top_n;
        }
        if self.no_overlap {
            config.comparison.include_overlap = false;
        }
        if let Some(schema) = self.schema {
            config.loader.schema = schema;
        }
        if let Some(skip_rows) = self.skip_rows {
            config.loader.skip_rows = skip_rows;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etfblend_data::SchemaPreset;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_partial_config() {
        let path = temp_file(
            "etfblend_test_partial_config.json",
            r#"{"comparison": {"top_n": 10}, "loader": {"schema": {"preset": "english"}}}"#,
        );
        let config = read_config(&path).unwrap();

        assert_eq!(config.comparison.top_n, 10);
        assert!(config.comparison.include_overlap);
        assert_eq!(
            config.loader.schema,
            SchemaSelection::Preset(SchemaPreset::English)
        );
        assert_eq!(config.max_funds, AnalysisConfig::default().max_funds);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_read_invalid_config() {
        let path = temp_file("etfblend_test_invalid_config.json", "{ not json");
        let err = read_config(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("etfblend_test_invalid_config.json"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let path = std::env::temp_dir().join("etfblend_test_no_such_config.json");
        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_overrides() {
        let mut config = AnalysisConfig::default();
        Overrides {
            top_n: Some(5),
            no_overlap: true,
            schema: Some(SchemaSelection::Preset(SchemaPreset::Italian)),
            skip_rows: None,
        }
        .apply(&mut config);

        assert_eq!(config.comparison.top_n, 5);
        assert!(!config.comparison.include_overlap);
        assert_eq!(
            config.loader.schema,
            SchemaSelection::Preset(SchemaPreset::Italian)
        );
        assert_eq!(config.loader.skip_rows, 2);
    }

    #[test]
    fn test_empty_overrides_keep_file_values() {
        let mut config = AnalysisConfig::default();
        config.comparison.top_n = 12;
        Overrides::default().apply(&mut config);

        assert_eq!(config.comparison.top_n, 12);
        assert!(config.comparison.include_overlap);
    }
}
