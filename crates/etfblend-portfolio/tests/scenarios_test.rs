//! End-to-end tests: raw exports in, comparison datasets out.

use approx::assert_relative_eq;
use etfblend_data::{HoldingRecord, load_holdings};
use etfblend_portfolio::{
    AnalysisConfig, BenchmarkPortfolio, FundInput, FundSource, aggregate, overlap_ratio,
    run_analysis, top_holdings,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

const HEADER: &str =
    "Ticker dell'emittente,Nome,Settore,Asset Class,Ponderazione (%),Area Geografica";

fn export(rows: &[&str]) -> String {
    let mut content = String::from("Fondo di prova\nPosizioni al,\"31/dic/2024\"\n");
    content.push_str(HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    content
}

fn three_stock_export() -> String {
    export(&[
        "AAA,Alpha,Tech,Azionario,\"50,0\",Stati Uniti",
        "BBB,Beta,Energy,Azionario,\"30,0\",Europa",
        "CCC,Gamma,Health,Azionario,\"20,0\",Giappone",
    ])
}

#[test]
fn test_identical_fund_matches_benchmark() {
    let benchmark = three_stock_export();
    let sources = [FundSource::new("fund.csv", benchmark.as_bytes(), 100.0)];

    let analysis =
        run_analysis(benchmark.as_bytes(), &sources, &AnalysisConfig::default()).unwrap();

    for record in analysis.benchmark.records() {
        assert_relative_eq!(
            analysis.portfolio.weight_of(&record.identifier),
            record.weight_pct
        );
    }
    assert_eq!(analysis.overlap_ratio, Some(100.0));
    assert!(analysis.allocation.is_balanced());
    assert!(!analysis.is_degraded());
    assert_eq!(analysis.benchmark_holding_count(), 3);
    assert_eq!(analysis.portfolio_holding_count(), 3);
}

#[test]
fn test_identical_fund_with_blank_tickers_matches_benchmark() {
    let benchmark = export(&[
        "AAA,Alpha,Tech,Azionario,\"50,0\",Stati Uniti",
        "BBB,Beta,Energy,Azionario,\"30,0\",Europa",
        ",Diritti di opzione,Finanza,Azionario,\"10,0\",Spagna",
        ",Warrant,Tech,Azionario,\"10,0\",Europa",
    ]);
    let sources = [FundSource::new("fund.csv", benchmark.as_bytes(), 100.0)];

    let analysis =
        run_analysis(benchmark.as_bytes(), &sources, &AnalysisConfig::default()).unwrap();

    assert_eq!(analysis.overlap_ratio, Some(100.0));
    assert_eq!(analysis.portfolio_holding_count(), 3);
    assert_relative_eq!(analysis.portfolio.weight_of(""), 20.0);
    assert_eq!(analysis.portfolio.holding("").unwrap().name, "Diritti di opzione");
}

#[test]
fn test_benchmark_holding_missing_from_all_funds() {
    let benchmark = export(&[
        "AAA,Alpha,Tech,Azionario,\"10,0\",Stati Uniti",
        "BBB,Beta,Energy,Azionario,\"5,0\",Europa",
    ]);
    let fund_a = export(&["BBB,Beta,Energy,Azionario,\"40,0\",Europa"]);
    let fund_b = export(&["DDD,Delta,Energy,Azionario,\"25,0\",Europa"]);
    let sources = [
        FundSource::new("a.csv", fund_a.as_bytes(), 50.0),
        FundSource::new("b.csv", fund_b.as_bytes(), 50.0),
    ];

    let analysis =
        run_analysis(benchmark.as_bytes(), &sources, &AnalysisConfig::default()).unwrap();

    assert!(!analysis.portfolio.contains("AAA"));
    let row = analysis
        .top_holdings
        .iter()
        .find(|row| row.identifier == "AAA")
        .unwrap();
    assert_relative_eq!(row.benchmark_weight, 10.0);
    assert_eq!(row.portfolio_weight, 0.0);

    // BBB shared, DDD not
    assert_relative_eq!(analysis.overlap_ratio.unwrap(), 50.0);
}

#[test]
fn test_fund_without_asset_class_is_skipped() {
    let benchmark = three_stock_export();
    let broken = "meta\nmeta\nTicker dell'emittente,Nome,Settore,Ponderazione (%),Area Geografica\nAAA,Alpha,Tech,\"50,0\",Stati Uniti\n";
    let valid = export(&["AAA,Alpha,Tech,Azionario,\"100,0\",Stati Uniti"]);
    let sources = [
        FundSource::new("broken.csv", broken.as_bytes(), 50.0),
        FundSource::new("valid.csv", valid.as_bytes(), 50.0),
    ];

    let analysis =
        run_analysis(benchmark.as_bytes(), &sources, &AnalysisConfig::default()).unwrap();

    assert!(analysis.is_degraded());
    assert_eq!(analysis.failures.len(), 1);
    assert_eq!(analysis.failures[0].label, "broken.csv");
    assert!(analysis.failures[0].message.contains("Asset Class"));

    assert!(!analysis.portfolio.is_empty());
    assert_eq!(analysis.portfolio.funds_aggregated(), 1);
    assert_relative_eq!(analysis.portfolio.weight_of("AAA"), 50.0);
}

#[test]
fn test_sector_mass_is_preserved() {
    let content = export(&[
        "AAA,Alpha,Tech,Azionario,\"40,0\",Stati Uniti",
        "BBB,Beta,Tech,Azionario,\"10,0\",Europa",
    ]);
    let sources = [FundSource::new("fund.csv", content.as_bytes(), 100.0)];

    let analysis =
        run_analysis(content.as_bytes(), &sources, &AnalysisConfig::default()).unwrap();

    assert_relative_eq!(analysis.portfolio.sector_weights()["Tech"], 50.0);
    assert_relative_eq!(analysis.sectors["Tech"].benchmark_weight, 50.0);
    assert_relative_eq!(analysis.sectors["Tech"].portfolio_weight, 50.0);
}

#[test]
fn test_single_fund_mass_conservation() {
    let content = export(&[
        "AAA,Alpha,Tech,Azionario,\"12,5\",Stati Uniti",
        "AAA,Alpha B,Tech,Azionario,\"1,5\",Stati Uniti",
        ",Unlisted,Tech,Azionario,\"0,25\",Europa",
        "BBB,Beta,,Azionario,\"7,75\",",
        "EUR,Cash,Liquidità,Liquidità,\"3,0\",Europa",
    ]);
    let records = load_holdings(content.as_bytes()).unwrap();
    let fund_total: f64 = records.iter().map(|r| r.weight_pct).sum();

    let portfolio = aggregate(&[FundInput::new("fund.csv", records, 100.0)]);

    assert_relative_eq!(portfolio.total_weight(), fund_total, epsilon = 1e-9);
    assert_relative_eq!(
        portfolio.sector_weights().values().sum::<f64>(),
        fund_total,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        portfolio.region_weights().values().sum::<f64>(),
        fund_total,
        epsilon = 1e-9
    );
}

fn sample_funds() -> Vec<FundInput> {
    let sectors = ["Tech", "Energy", "Health", "Financials"];
    let regions = ["US", "EU", "JP"];

    (0..5)
        .map(|fund| {
            let records = (0..12)
                .map(|i| {
                    let id = format!("T{:02}", (fund * 7 + i) % 20);
                    HoldingRecord::new(
                        id.clone(),
                        id,
                        0.5 + ((fund * 13 + i * 5) % 17) as f64 * 0.37,
                        sectors[(fund + i) % sectors.len()],
                        regions[i % regions.len()],
                    )
                })
                .collect();
            FundInput::new(format!("fund{fund}"), records, 10.0 + fund as f64 * 5.0)
        })
        .collect()
}

#[test]
fn test_aggregation_is_order_independent() {
    let funds = sample_funds();
    let baseline = aggregate(&funds);

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..10 {
        let mut shuffled = funds.clone();
        shuffled.shuffle(&mut rng);
        let portfolio = aggregate(&shuffled);

        assert_eq!(portfolio.holding_count(), baseline.holding_count());
        for (id, holding) in baseline.holdings() {
            assert_relative_eq!(portfolio.weight_of(id), holding.weight, epsilon = 1e-9);
        }
        for (sector, weight) in baseline.sector_weights() {
            assert_relative_eq!(portfolio.sector_weights()[sector], *weight, epsilon = 1e-9);
        }
        for (region, weight) in baseline.region_weights() {
            assert_relative_eq!(portfolio.region_weights()[region], *weight, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_multi_fund_mass_conservation() {
    let funds = sample_funds();
    let expected: f64 = funds.iter().map(FundInput::contributed_weight).sum();

    let portfolio = aggregate(&funds);

    assert_relative_eq!(portfolio.total_weight(), expected, epsilon = 1e-9);
    assert_relative_eq!(
        portfolio.sector_weights().values().sum::<f64>(),
        expected,
        epsilon = 1e-9
    );
}

#[test]
fn test_overlap_ratio_bounds() {
    let funds = sample_funds();
    let benchmark = BenchmarkPortfolio::new(funds[0].records.clone());

    for take in 1..=funds.len() {
        let portfolio = aggregate(&funds[..take]);
        let ratio = overlap_ratio(&benchmark, &portfolio);
        assert!((0.0..=100.0).contains(&ratio));
    }

    let top = top_holdings(&benchmark, &aggregate(&funds), 5);
    assert_eq!(top.len(), 5);
    assert!(top.windows(2).all(|w| w[0].benchmark_weight >= w[1].benchmark_weight));
}
