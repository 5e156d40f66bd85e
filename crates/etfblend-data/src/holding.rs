//! Parsed holding records.

use serde::{Deserialize, Serialize};

/// A single equity position read from a holdings export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
    /// Issuer ticker. May be empty, and may repeat within one file.
    pub identifier: String,

    /// Security name.
    pub name: String,

    /// Weight in percent (0 to 100), always positive after loading.
    pub weight_pct: f64,

    /// Sector classification.
    pub sector: String,

    /// Geographic region classification.
    pub region: String,
}

impl HoldingRecord {
    /// Create a new holding record.
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        weight_pct: f64,
        sector: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            weight_pct,
            sector: sector.into(),
            region: region.into(),
        }
    }

    /// Returns true if the record carries a usable identifier.
    pub fn has_identifier(&self) -> bool {
        !self.identifier.is_empty()
    }
}

/// Sum of record weights, in percent.
pub fn total_weight(records: &[HoldingRecord]) -> f64 {
    records.iter().map(|r| r.weight_pct).sum()
}
