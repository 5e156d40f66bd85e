//! Column layouts of supported holdings exports.

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Names of the columns a holdings export must provide, plus the asset-class
/// value that marks an equity row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Issuer ticker column.
    pub identifier: String,
    /// Security name column.
    pub name: String,
    /// Percentage weight column.
    pub weight: String,
    /// Asset-class column.
    pub asset_class: String,
    /// Sector column.
    pub sector: String,
    /// Geographic region column.
    pub region: String,
    /// Asset-class value selecting equity rows.
    pub equity_label: String,
}

impl ColumnSchema {
    /// Column names of the Italian-language iShares export.
    pub fn italian() -> Self {
        Self {
            identifier: "Ticker dell'emittente".to_string(),
            name: "Nome".to_string(),
            weight: "Ponderazione (%)".to_string(),
            asset_class: "Asset Class".to_string(),
            sector: "Settore".to_string(),
            region: "Area Geografica".to_string(),
            equity_label: "Azionario".to_string(),
        }
    }

    /// Column names of the English-language iShares export.
    pub fn english() -> Self {
        Self {
            identifier: "Ticker".to_string(),
            name: "Name".to_string(),
            weight: "Weight (%)".to_string(),
            asset_class: "Asset Class".to_string(),
            sector: "Sector".to_string(),
            region: "Location".to_string(),
            equity_label: "Equity".to_string(),
        }
    }

    /// Required column names, in a fixed order.
    pub fn required_columns(&self) -> [&str; 6] {
        [
            self.identifier.as_str(),
            self.name.as_str(),
            self.weight.as_str(),
            self.asset_class.as_str(),
            self.sector.as_str(),
            self.region.as_str(),
        ]
    }

    /// Locate every required column in `header`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingColumns`] listing every column that is absent.
    pub fn resolve(&self, header: &[String]) -> Result<ColumnIndices> {
        let position = |column: &str| header.iter().position(|h| h == column);

        let missing: Vec<String> = self
            .required_columns()
            .into_iter()
            .filter(|column| position(*column).is_none())
            .map(str::to_string)
            .collect();

        match (
            position(&self.identifier),
            position(&self.name),
            position(&self.weight),
            position(&self.asset_class),
            position(&self.sector),
            position(&self.region),
        ) {
            (
                Some(identifier),
                Some(name),
                Some(weight),
                Some(asset_class),
                Some(sector),
                Some(region),
            ) => Ok(ColumnIndices {
                identifier,
                name,
                weight,
                asset_class,
                sector,
                region,
            }),
            _ => Err(DataError::MissingColumns { columns: missing }),
        }
    }
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self::italian()
    }
}

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    /// Issuer ticker column index.
    pub identifier: usize,
    /// Security name column index.
    pub name: usize,
    /// Weight column index.
    pub weight: usize,
    /// Asset-class column index.
    pub asset_class: usize,
    /// Sector column index.
    pub sector: usize,
    /// Region column index.
    pub region: usize,
}

/// Built-in export layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaPreset {
    /// Italian column names, `Azionario` equity label
    Italian,

    /// English column names, `Equity` equity label
    English,
}

impl SchemaPreset {
    /// Returns all presets, in detection order.
    pub fn all() -> Vec<Self> {
        vec![Self::Italian, Self::English]
    }

    /// Returns the preset's short name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Italian => "italian",
            Self::English => "english",
        }
    }

    /// Returns the column schema for this preset.
    pub fn schema(&self) -> ColumnSchema {
        match self {
            Self::Italian => ColumnSchema::italian(),
            Self::English => ColumnSchema::english(),
        }
    }
}

impl fmt::Display for SchemaPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How the loader chooses a column schema for a file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaSelection {
    /// Use the first preset whose columns are all present.
    #[default]
    Auto,

    /// Always use the given preset.
    Preset(SchemaPreset),

    /// Always use a caller-supplied schema.
    Custom(ColumnSchema),
}

impl SchemaSelection {
    /// Resolve the header against the selected schema.
    ///
    /// With [`SchemaSelection::Auto`], a header matching no preset reports the
    /// columns missing from the default (Italian) preset.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingColumns`] when no usable schema matches.
    pub fn resolve(&self, header: &[String]) -> Result<(ColumnSchema, ColumnIndices)> {
        match self {
            Self::Auto => {
                for preset in SchemaPreset::all() {
                    let schema = preset.schema();
                    if let Ok(indices) = schema.resolve(header) {
                        tracing::debug!(preset = %preset, "detected holdings column schema");
                        return Ok((schema, indices));
                    }
                }
                let schema = ColumnSchema::default();
                let indices = schema.resolve(header)?;
                Ok((schema, indices))
            }
            Self::Preset(preset) => {
                let schema = preset.schema();
                let indices = schema.resolve(header)?;
                Ok((schema, indices))
            }
            Self::Custom(schema) => {
                let indices = schema.resolve(header)?;
                Ok((schema.clone(), indices))
            }
        }
    }
}
