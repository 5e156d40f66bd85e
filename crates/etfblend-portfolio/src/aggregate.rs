//! Weighted merge of fund holdings into one portfolio.
//!
//! Holdings are merged by identifier: the first fund to report an identifier
//! fixes its name, sector and region, later funds only add weight. A blank
//! identifier is a key like any other, so all blank-ticker rows merge into
//! one holding. Sector and region totals are accumulated separately, from
//! each fund's own grouping, so they stay complete when classifications
//! disagree between funds.

use crate::fund::{FundInput, FundLoadError};
use etfblend_data::HoldingRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A holding of the blended portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedHolding {
    /// Issuer ticker (empty for rows the source left blank).
    pub identifier: String,

    /// Security name, from the first fund that reported the identifier.
    pub name: String,

    /// Sector, from the first fund that reported the identifier.
    pub sector: String,

    /// Region, from the first fund that reported the identifier.
    pub region: String,

    /// Allocation-weighted sum across funds, in percent of the portfolio.
    pub weight: f64,
}

impl AggregatedHolding {
    fn from_record(record: &HoldingRecord, weight: f64) -> Self {
        Self {
            identifier: record.identifier.clone(),
            name: record.name.clone(),
            sector: record.sector.clone(),
            region: record.region.clone(),
            weight,
        }
    }
}

/// Holdings, sector and region exposures of a blend of funds.
///
/// Built once by [`aggregate`] or [`aggregate_loaded`] and read-only
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPortfolio {
    holdings: BTreeMap<String, AggregatedHolding>,
    sector_weights: BTreeMap<String, f64>,
    region_weights: BTreeMap<String, f64>,
    funds_aggregated: usize,
}

impl AggregatedPortfolio {
    /// Holdings keyed by identifier.
    pub const fn holdings(&self) -> &BTreeMap<String, AggregatedHolding> {
        &self.holdings
    }

    /// Get the holding for an identifier.
    pub fn holding(&self, identifier: &str) -> Option<&AggregatedHolding> {
        self.holdings.get(identifier)
    }

    /// Check if an identifier is held.
    pub fn contains(&self, identifier: &str) -> bool {
        self.holdings.contains_key(identifier)
    }

    /// Weight of an identifier, or `0.0` if it is not held.
    pub fn weight_of(&self, identifier: &str) -> f64 {
        self.holdings.get(identifier).map_or(0.0, |h| h.weight)
    }

    /// Weight per sector, in percent of the portfolio.
    pub const fn sector_weights(&self) -> &BTreeMap<String, f64> {
        &self.sector_weights
    }

    /// Weight per region, in percent of the portfolio.
    pub const fn region_weights(&self) -> &BTreeMap<String, f64> {
        &self.region_weights
    }

    /// Number of distinct holdings.
    pub fn holding_count(&self) -> usize {
        self.holdings.len()
    }

    /// Check if the portfolio holds nothing.
    pub fn is_empty(&self) -> bool {
        self.holding_count() == 0
    }

    /// Number of funds that contributed.
    pub const fn funds_aggregated(&self) -> usize {
        self.funds_aggregated
    }

    /// Total holding weight, in percent.
    pub fn total_weight(&self) -> f64 {
        self.holdings.values().map(|h| h.weight).sum()
    }

    /// All holdings, heaviest first (ties by identifier, then name).
    pub fn sorted_holdings(&self) -> Vec<&AggregatedHolding> {
        let mut sorted: Vec<&AggregatedHolding> = self.holdings.values().collect();
        sorted.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| a.identifier.cmp(&b.identifier))
                .then_with(|| a.name.cmp(&b.name))
        });
        sorted
    }

    fn add_fund(&mut self, fund: &FundInput) {
        let scale = fund.scale();

        for record in &fund.records {
            let contribution = record.weight_pct * scale;
            self.holdings
                .entry(record.identifier.clone())
                .and_modify(|holding| holding.weight += contribution)
                .or_insert_with(|| AggregatedHolding::from_record(record, contribution));
        }

        for (sector, subtotal) in group_weights(&fund.records, |r| r.sector.as_str()) {
            *self.sector_weights.entry(sector.to_string()).or_insert(0.0) += subtotal * scale;
        }
        for (region, subtotal) in group_weights(&fund.records, |r| r.region.as_str()) {
            *self.region_weights.entry(region.to_string()).or_insert(0.0) += subtotal * scale;
        }

        self.funds_aggregated += 1;
    }
}

/// Sum record weights per classification label.
pub(crate) fn group_weights<'a>(
    records: &'a [HoldingRecord],
    label: impl Fn(&'a HoldingRecord) -> &'a str,
) -> HashMap<&'a str, f64> {
    let mut groups = HashMap::new();
    for record in records {
        *groups.entry(label(record)).or_insert(0.0) += record.weight_pct;
    }
    groups
}

/// Blend funds into one portfolio.
///
/// Each record contributes `weight_pct * allocation_pct / 100`. Allocations
/// are used as given; they do not need to sum to 100.
pub fn aggregate(funds: &[FundInput]) -> AggregatedPortfolio {
    let mut portfolio = AggregatedPortfolio::default();
    for fund in funds {
        portfolio.add_fund(fund);
    }

    tracing::debug!(
        funds = portfolio.funds_aggregated,
        holdings = portfolio.holding_count(),
        "aggregated portfolio"
    );

    portfolio
}

/// Blend the funds that loaded successfully, skipping the rest.
///
/// A failed fund contributes nothing; whether a partial blend is acceptable
/// is up to the caller.
pub fn aggregate_loaded(funds: &[Result<FundInput, FundLoadError>]) -> AggregatedPortfolio {
    let mut portfolio = AggregatedPortfolio::default();
    for fund in funds {
        match fund {
            Ok(fund) => portfolio.add_fund(fund),
            Err(err) => {
                tracing::warn!(fund = %err.label, error = %err.source, "skipping fund");
            }
        }
    }

    tracing::debug!(
        funds = portfolio.funds_aggregated,
        skipped = funds.len() - portfolio.funds_aggregated,
        holdings = portfolio.holding_count(),
        "aggregated portfolio"
    );

    portfolio
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use etfblend_data::DataError;

    fn record(id: &str, weight: f64, sector: &str, region: &str) -> HoldingRecord {
        HoldingRecord::new(id, format!("{id} name"), weight, sector, region)
    }

    #[test]
    fn test_single_fund_full_allocation() {
        let fund = FundInput::new(
            "a",
            vec![
                record("AAA", 50.0, "Tech", "US"),
                record("BBB", 30.0, "Energy", "US"),
                record("CCC", 20.0, "Tech", "EU"),
            ],
            100.0,
        );

        let portfolio = aggregate(&[fund]);

        assert_eq!(portfolio.holding_count(), 3);
        assert_relative_eq!(portfolio.weight_of("AAA"), 50.0);
        assert_relative_eq!(portfolio.sector_weights()["Tech"], 70.0);
        assert_relative_eq!(portfolio.region_weights()["US"], 80.0);
        assert_relative_eq!(portfolio.total_weight(), 100.0);
        assert_eq!(portfolio.funds_aggregated(), 1);
    }

    #[test]
    fn test_overlapping_funds_sum_weights() {
        let a = FundInput::new("a", vec![record("AAA", 10.0, "Tech", "US")], 60.0);
        let b = FundInput::new("b", vec![record("AAA", 20.0, "Tech", "US")], 40.0);

        let portfolio = aggregate(&[a, b]);

        // 10 * 0.6 + 20 * 0.4
        assert_relative_eq!(portfolio.weight_of("AAA"), 14.0);
        assert_eq!(portfolio.holding_count(), 1);
    }

    #[test]
    fn test_first_occurrence_keeps_classification() {
        let a = FundInput::new(
            "a",
            vec![HoldingRecord::new("AAA", "Alpha Inc", 10.0, "Tech", "US")],
            50.0,
        );
        let b = FundInput::new(
            "b",
            vec![HoldingRecord::new("AAA", "ALPHA", 10.0, "Software", "America")],
            50.0,
        );

        let portfolio = aggregate(&[a, b]);
        let holding = portfolio.holding("AAA").unwrap();

        assert_eq!(holding.name, "Alpha Inc");
        assert_eq!(holding.sector, "Tech");
        assert_eq!(holding.region, "US");
        assert_relative_eq!(holding.weight, 10.0);

        // sector totals follow each fund's own labels
        assert_relative_eq!(portfolio.sector_weights()["Tech"], 5.0);
        assert_relative_eq!(portfolio.sector_weights()["Software"], 5.0);
    }

    #[test]
    fn test_duplicate_identifier_within_fund() {
        let fund = FundInput::new(
            "a",
            vec![record("AAA", 3.0, "Tech", "US"), record("AAA", 2.0, "Tech", "US")],
            100.0,
        );

        let portfolio = aggregate(&[fund]);
        assert_eq!(portfolio.holding_count(), 1);
        assert_relative_eq!(portfolio.weight_of("AAA"), 5.0);
    }

    #[test]
    fn test_blank_identifiers_merge_into_one_holding() {
        let a = FundInput::new(
            "a",
            vec![
                HoldingRecord::new("", "Unlisted rights", 1.0, "Finance", "ES"),
                HoldingRecord::new("", "Other rights", 2.0, "Tech", "US"),
                record("AAA", 7.0, "Tech", "US"),
            ],
            50.0,
        );
        let b = FundInput::new(
            "b",
            vec![HoldingRecord::new("", "Warrants", 4.0, "Energy", "IT")],
            50.0,
        );

        let portfolio = aggregate(&[a, b]);
        let blank = portfolio.holding("").unwrap();

        assert_eq!(portfolio.holding_count(), 2);
        assert_relative_eq!(blank.weight, 3.5);
        // first blank row fixes the descriptive fields
        assert_eq!(blank.name, "Unlisted rights");
        assert_eq!(blank.sector, "Finance");
        assert_relative_eq!(portfolio.total_weight(), 7.0);
        assert_relative_eq!(portfolio.sector_weights()["Tech"], 4.5);
    }

    #[test]
    fn test_serialized_keys_are_ordered() {
        let fund = FundInput::new(
            "a",
            vec![
                record("ZZZ", 1.0, "Utilities", "US"),
                record("MMM", 1.0, "Energy", "EU"),
                record("AAA", 1.0, "Tech", "JP"),
            ],
            100.0,
        );

        let first = serde_json::to_string(&aggregate(&[fund.clone()])).unwrap();
        let second = serde_json::to_string(&aggregate(&[fund])).unwrap();

        assert_eq!(first, second);
        let aaa = first.find("\"AAA\"").unwrap();
        let mmm = first.find("\"MMM\"").unwrap();
        let zzz = first.find("\"ZZZ\"").unwrap();
        assert!(aaa < mmm && mmm < zzz);
    }

    #[test]
    fn test_empty_labels_conserve_mass() {
        let fund = FundInput::new(
            "a",
            vec![record("AAA", 4.0, "", ""), record("BBB", 6.0, "Tech", "US")],
            50.0,
        );

        let portfolio = aggregate(&[fund]);
        assert_relative_eq!(portfolio.sector_weights()[""], 2.0);
        assert_relative_eq!(portfolio.sector_weights().values().sum::<f64>(), 5.0);
        assert_relative_eq!(portfolio.region_weights().values().sum::<f64>(), 5.0);
    }

    #[test]
    fn test_failed_funds_are_skipped() {
        let funds = vec![
            Ok(FundInput::new("a", vec![record("AAA", 10.0, "Tech", "US")], 50.0)),
            Err(FundLoadError::new(
                "b",
                50.0,
                DataError::MissingColumns {
                    columns: vec!["Asset Class".to_string()],
                },
            )),
        ];

        let portfolio = aggregate_loaded(&funds);
        assert_eq!(portfolio.funds_aggregated(), 1);
        assert_relative_eq!(portfolio.weight_of("AAA"), 5.0);
    }

    #[test]
    fn test_no_funds() {
        let portfolio = aggregate(&[]);
        assert!(portfolio.is_empty());
        assert_eq!(portfolio.total_weight(), 0.0);
        assert!(portfolio.sector_weights().is_empty());
    }

    #[test]
    fn test_sorted_holdings() {
        let fund = FundInput::new(
            "a",
            vec![
                record("BBB", 5.0, "Tech", "US"),
                record("AAA", 9.0, "Tech", "US"),
                record("CCC", 5.0, "Tech", "US"),
            ],
            100.0,
        );

        let portfolio = aggregate(&[fund]);
        let order: Vec<&str> = portfolio
            .sorted_holdings()
            .iter()
            .map(|h| h.identifier.as_str())
            .collect();
        assert_eq!(order, vec!["AAA", "BBB", "CCC"]);
    }
}
