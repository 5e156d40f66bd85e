//! Terminal and Markdown rendering of an analysis.
//!
//! Text output draws grouped horizontal bar charts: one benchmark bar and
//! one portfolio bar per label, scaled to the largest value in the chart.

use crate::export::ExposureTable;
use etfblend_portfolio::{Analysis, HoldingComparison};

/// Width of the longest bar, in characters.
const BAR_WIDTH: usize = 40;

/// Labels longer than this are cut.
const LABEL_WIDTH: usize = 28;

/// Shown in place of an empty sector or region.
const UNCLASSIFIED: &str = "(unclassified)";

fn display_label(label: &str) -> &str {
    if label.trim().is_empty() {
        UNCLASSIFIED
    } else {
        label
    }
}

fn truncate(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        return label.to_string();
    }
    let mut cut: String = label.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn bar(value: f64, max: f64, fill: char) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    std::iter::repeat_n(fill, len.clamp(1, BAR_WIDTH)).collect()
}

/// A grouped bar chart row: label plus both weights.
struct ChartRow {
    label: String,
    benchmark: f64,
    portfolio: f64,
}

fn push_chart(output: &mut String, title: &str, rows: &[ChartRow]) {
    output.push_str(&format!("\n{title}\n"));
    output.push_str(&"-".repeat(80));
    output.push('\n');

    if rows.is_empty() {
        output.push_str("  (no data)\n");
        return;
    }

    let max = rows
        .iter()
        .flat_map(|r| [r.benchmark, r.portfolio])
        .fold(0.0_f64, f64::max);

    for row in rows {
        let label = truncate(&row.label, LABEL_WIDTH);
        output.push_str(&format!(
            "  {:<w$} B {:>6.2}% {}\n",
            label,
            row.benchmark,
            bar(row.benchmark, max, '█'),
            w = LABEL_WIDTH
        ));
        output.push_str(&format!(
            "  {:<w$} P {:>6.2}% {}\n",
            "",
            row.portfolio,
            bar(row.portfolio, max, '░'),
            w = LABEL_WIDTH
        ));
    }
}

fn holding_label(row: &HoldingComparison) -> String {
    if row.name.is_empty() {
        row.identifier.clone()
    } else if row.identifier.is_empty() {
        row.name.clone()
    } else {
        format!("{} ({})", row.name, row.identifier)
    }
}

fn exposure_rows(table: &ExposureTable) -> Vec<ChartRow> {
    table
        .rows
        .iter()
        .map(|r| ChartRow {
            label: display_label(&r.label).to_string(),
            benchmark: r.benchmark_weight,
            portfolio: r.portfolio_weight,
        })
        .collect()
}

fn push_failures(output: &mut String, analysis: &Analysis) {
    for failure in &analysis.failures {
        output.push_str(&format!(
            "  Failed to load {}: {}\n",
            failure.label, failure.message
        ));
    }
}

/// Render an analysis as plain text with bar charts.
pub fn render_text(analysis: &Analysis) -> String {
    let mut output = String::new();

    output.push_str("\nBenchmark vs Portfolio\n");
    output.push_str(&"=".repeat(80));
    output.push('\n');
    output.push_str(&format!(
        "  Benchmark Holdings:       {}\n",
        analysis.benchmark_holding_count()
    ));
    output.push_str(&format!(
        "  Portfolio Holdings:       {}\n",
        analysis.portfolio_holding_count()
    ));
    if let Some(overlap) = analysis.overlap_ratio {
        output.push_str(&format!("  Overlap Ratio:            {overlap:.1}%\n"));
    }
    output.push_str(&format!("  {}\n", analysis.allocation));
    push_failures(&mut output, analysis);

    let holdings: Vec<ChartRow> = analysis
        .top_holdings
        .iter()
        .map(|row| ChartRow {
            label: holding_label(row),
            benchmark: row.benchmark_weight,
            portfolio: row.portfolio_weight,
        })
        .collect();
    push_chart(
        &mut output,
        &format!(
            "Top {} Holdings: Benchmark vs Portfolio",
            analysis.top_holdings.len()
        ),
        &holdings,
    );
    push_chart(
        &mut output,
        "Sector Allocation: Benchmark vs Portfolio",
        &exposure_rows(&ExposureTable::sectors(analysis)),
    );
    push_chart(
        &mut output,
        "Geographic Allocation: Benchmark vs Portfolio",
        &exposure_rows(&ExposureTable::regions(analysis)),
    );

    output
}

fn push_exposure_markdown(output: &mut String, title: &str, table: &ExposureTable) {
    output.push_str(&format!("## {title}\n\n"));
    output.push_str("| Label | Benchmark | Portfolio | Difference |\n");
    output.push_str("|-------|-----------|-----------|------------|\n");
    for row in &table.rows {
        output.push_str(&format!(
            "| {} | {:.2}% | {:.2}% | {:+.2}% |\n",
            display_label(&row.label),
            row.benchmark_weight,
            row.portfolio_weight,
            row.difference
        ));
    }
    output.push('\n');
}

/// Render an analysis as Markdown tables.
pub fn render_markdown(analysis: &Analysis) -> String {
    let mut output = String::new();

    output.push_str("# Benchmark vs Portfolio\n\n");
    output.push_str(&format!(
        "- **Benchmark Holdings:** {}\n",
        analysis.benchmark_holding_count()
    ));
    output.push_str(&format!(
        "- **Portfolio Holdings:** {}\n",
        analysis.portfolio_holding_count()
    ));
    if let Some(overlap) = analysis.overlap_ratio {
        output.push_str(&format!("- **Overlap Ratio:** {overlap:.1}%\n"));
    }
    output.push_str(&format!("- **{}**\n", analysis.allocation));
    for failure in &analysis.failures {
        output.push_str(&format!(
            "- **Failed to load {}:** {}\n",
            failure.label, failure.message
        ));
    }
    output.push('\n');

    output.push_str(&format!(
        "## Top {} Holdings\n\n",
        analysis.top_holdings.len()
    ));
    output.push_str("| Ticker | Name | Benchmark | Portfolio | Difference |\n");
    output.push_str("|--------|------|-----------|-----------|------------|\n");
    for row in &analysis.top_holdings {
        output.push_str(&format!(
            "| {} | {} | {:.2}% | {:.2}% | {:+.2}% |\n",
            row.identifier,
            row.name,
            row.benchmark_weight,
            row.portfolio_weight,
            row.difference()
        ));
    }
    output.push('\n');

    push_exposure_markdown(
        &mut output,
        "Sector Allocation",
        &ExposureTable::sectors(analysis),
    );
    push_exposure_markdown(
        &mut output,
        "Geographic Allocation",
        &ExposureTable::regions(analysis),
    );

    output
}
