//! etfblend CLI binary.
//!
//! Compares a blend of equity ETFs with a benchmark ETF from their holdings
//! exports.

mod integration;

use clap::{Parser, Subcommand, ValueEnum};
use etfblend::data::holding::total_weight;
use etfblend::output::{ExposureTable, PortfolioHoldingsExport, ReportBuilder};
use etfblend::{
    ExportFormat, Exporter, FundSource, HoldingsLoader, LoaderConfig, SchemaPreset,
    SchemaSelection, render_markdown, render_text, run_analysis,
};
use indicatif::{ProgressBar, ProgressStyle};
use integration::config::{Overrides, load_config};
use integration::inputs::{FundArg, file_label, read_inputs, resolve_allocations};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "etfblend")]
#[command(about = "Compare a blend of equity ETFs against a benchmark ETF", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a portfolio of funds with a benchmark
    Analyze {
        /// Benchmark holdings file
        #[arg(long)]
        benchmark: PathBuf,

        /// Portfolio fund as FILE or FILE=ALLOCATION (percent); repeatable
        #[arg(long = "fund", required = true)]
        funds: Vec<String>,

        /// Number of top benchmark holdings to compare
        #[arg(long)]
        top: Option<usize>,

        /// Skip the overlap ratio
        #[arg(long)]
        no_overlap: bool,

        /// Column layout of the input files
        #[arg(long, value_enum)]
        schema: Option<SchemaArg>,

        /// Metadata lines before the header row
        #[arg(long)]
        skip_rows: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also write CSV tables and a JSON report to this directory
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Settings file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the equity holdings found in one file
    Inspect {
        /// Holdings file
        file: PathBuf,

        /// Column layout of the file
        #[arg(long, value_enum, default_value_t = SchemaArg::Auto)]
        schema: SchemaArg,

        /// Metadata lines before the header row
        #[arg(long, default_value_t = etfblend::data::loader::DEFAULT_SKIP_ROWS)]
        skip_rows: usize,

        /// Number of holdings to list
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// List the built-in column layouts
    Schemas,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SchemaArg {
    /// Detect from the header row
    Auto,
    /// Italian iShares export
    Italian,
    /// English iShares export
    English,
}

impl From<SchemaArg> for SchemaSelection {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Auto => Self::Auto,
            SchemaArg::Italian => Self::Preset(SchemaPreset::Italian),
            SchemaArg::English => Self::Preset(SchemaPreset::English),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Text with bar charts
    Text,
    /// Markdown tables
    Markdown,
    /// JSON report
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Analyze {
            benchmark,
            funds,
            top,
            no_overlap,
            schema,
            skip_rows,
            format,
            export_dir,
            config,
        } => {
            let overrides = Overrides {
                top_n: top,
                no_overlap,
                schema: schema.map(SchemaSelection::from),
                skip_rows,
            };
            analyze(
                &benchmark,
                &funds,
                overrides,
                config.as_deref(),
                format,
                export_dir.as_deref(),
            )?;
        }
        Commands::Inspect {
            file,
            schema,
            skip_rows,
            limit,
        } => {
            inspect(&file, schema, skip_rows, limit)?;
        }
        Commands::Schemas => list_schemas(),
    }

    Ok(())
}

fn spinner(message: &str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    Ok(pb)
}

fn analyze(
    benchmark: &Path,
    fund_args: &[String],
    overrides: Overrides,
    config_path: Option<&Path>,
    format: OutputFormat,
    export_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?;
    overrides.apply(&mut config);

    let funds: Vec<FundArg> = fund_args.iter().map(|arg| FundArg::parse(arg)).collect();
    let allocations = resolve_allocations(&funds)?;
    let labels: Vec<String> = funds.iter().map(FundArg::label).collect();

    let pb = spinner("Loading holdings...")?;

    let (benchmark_content, contents) = match read_inputs(benchmark, &funds) {
        Ok(inputs) => inputs,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    let sources: Vec<FundSource<'_>> = labels
        .iter()
        .zip(&contents)
        .zip(&allocations)
        .map(|((label, content), &allocation)| FundSource::new(label, content, allocation))
        .collect();

    pb.set_message("Aggregating portfolio...");
    let analysis = match run_analysis(&benchmark_content, &sources, &config) {
        Ok(analysis) => {
            pb.finish_and_clear();
            analysis
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    let mut report = ReportBuilder::new().benchmark(file_label(benchmark));
    for (label, &allocation) in labels.iter().zip(&allocations) {
        report = report.fund(label.as_str(), allocation);
    }
    let report = report.analysis(analysis).build()?;

    match format {
        OutputFormat::Text => println!("{}", render_text(&report.analysis)),
        OutputFormat::Markdown => println!("{}", render_markdown(&report.analysis)),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    if let Some(dir) = export_dir {
        std::fs::create_dir_all(dir)?;
        let analysis = &report.analysis;

        analysis
            .top_holdings
            .export_to_file(&dir.join("top_holdings.csv"), ExportFormat::Csv)?;
        ExposureTable::sectors(analysis).export_to_file(&dir.join("sectors.csv"), ExportFormat::Csv)?;
        ExposureTable::regions(analysis).export_to_file(&dir.join("regions.csv"), ExportFormat::Csv)?;
        PortfolioHoldingsExport::from(&analysis.portfolio)
            .export_to_file(&dir.join("portfolio_holdings.csv"), ExportFormat::Csv)?;
        report.save(&dir.join("report.json"))?;

        eprintln!("Exported tables to {}", dir.display());
    }

    Ok(())
}

fn inspect(
    file: &Path,
    schema: SchemaArg,
    skip_rows: usize,
    limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let loader = HoldingsLoader::new(LoaderConfig {
        skip_rows,
        schema: schema.into(),
    });
    let records = loader.load_from_path(file)?;

    println!("\nHoldings: {}", file_label(file));
    println!("{}", "=".repeat(80));
    println!("  Equity Holdings:          {}", records.len());
    println!("  Total Equity Weight:      {:.2}%", total_weight(&records));
    println!();
    println!(
        "  {:<10} {:<30} {:>8}  {:<20} {}",
        "Ticker", "Name", "Weight", "Sector", "Region"
    );
    println!("{}", "-".repeat(80));

    for record in records.iter().take(limit) {
        println!(
            "  {:<10} {:<30} {:>7.2}%  {:<20} {}",
            record.identifier,
            record.name.chars().take(30).collect::<String>(),
            record.weight_pct,
            record.sector.chars().take(20).collect::<String>(),
            record.region
        );
    }
    if records.len() > limit {
        println!("  ... and {} more", records.len() - limit);
    }

    Ok(())
}

fn list_schemas() {
    println!("\nColumn Layouts");
    println!("{}", "=".repeat(80));

    for preset in SchemaPreset::all() {
        let schema = preset.schema();
        println!("\n{} (equity rows: \"{}\")", preset, schema.equity_label);
        for column in schema.required_columns() {
            println!("  - {}", column);
        }
    }
    println!("\nWith --schema auto, layouts are tried in the order listed.");
}
