// revchonk CLI - extract, summarize and export report rows
use anyhow::{Context, Result};
use clap::Parser;
use revchonk::pipeline::{ReportViews, ViewRow};
use revchonk::{DocumentFormat, Extraction, Pipeline, RawDocument, Report, RevchonkConfig};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Revenue report extraction tool")]
struct Args {
    /// Report to read (PDF or CSV)
    file: PathBuf,
    /// Declared format; guessed from the extension when omitted
    #[arg(short, long)]
    format: Option<DocumentFormat>,
    /// Config file (defaults: $REVCHONK_CONFIG, ./revchonk.toml, user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Include the service label in the deduplication key
    #[arg(long)]
    service_key: bool,
    /// Column to group the summary by
    #[arg(short, long)]
    group_by: Option<String>,
    /// Size of the top-N views
    #[arg(short, long)]
    top: Option<usize>,
    /// Write the row table as CSV to this path
    #[arg(short, long)]
    export: Option<PathBuf>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
    /// Also print the raw extracted text
    #[arg(long)]
    raw_text: bool,
    /// Debug logging; RUST_LOG takes precedence when set
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut config = RevchonkConfig::load(args.config.as_deref()).context("Failed to load config")?;
    if args.service_key {
        config.dedupe.include_service_in_key = true;
    }
    if let Some(group_by) = &args.group_by {
        config.report.group_by = group_by.clone();
    }
    if let Some(top) = args.top {
        config.report.top_n = top;
    }

    let bytes = fs::read(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
    let format = args.format.unwrap_or_else(|| DocumentFormat::from_path(&args.file));
    let doc = RawDocument::new(bytes, format);

    let report = Pipeline::new(config)
        .process(&doc)
        .with_context(|| format!("Failed to process {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if args.raw_text || (report.is_empty() && !args.json) {
        print_raw_text(&report, args.raw_text);
    }

    if let Some(path) = &args.export {
        report
            .export_to(path)
            .with_context(|| format!("Failed to export to {}", path.display()))?;
        eprintln!("Exported table to {}", path.display());
    }

    Ok(())
}

fn print_report(report: &Report) {
    match &report.extraction {
        Extraction::NoRowsExtracted => {
            println!("No rows detected. Check the report format.");
            return;
        }
        Extraction::Rows(rows) => {
            println!(
                "{:<10} {:<28} {:>10} {:>10} {:>8} {:>14} {:>9}",
                "Code", "Service", "Start Subs", "End Subs", "Change", "Revenue", "Net Adds"
            );
            for row in rows {
                println!(
                    "{:<10} {:<28} {:>10} {:>10} {:>8} {:>14} {:>9}",
                    row.code,
                    truncate(&row.service, 28),
                    opt(row.start_count),
                    opt(row.end_count),
                    opt(row.change_count),
                    row.revenue.map(format_money).unwrap_or_default(),
                    opt(row.net_adds),
                );
            }
        }
        Extraction::Table(table) => {
            println!("{}", table.headers.join(" | "));
            for values in &table.rows {
                println!("{}", values.join(" | "));
            }
        }
    }
    println!();
    print_views(&report.views);
}

fn print_views(views: &ReportViews) {
    println!("Total revenue:     {}", format_money(views.totals.revenue));
    println!("Total subscribers: {}", views.totals.subscribers);
    println!(
        "Rows:              {} ({} with revenue)",
        views.totals.rows, views.totals.rows_with_revenue
    );

    println!("\nSummary by {}:", views.group_by);
    for group in &views.summary {
        let label = if group.category.is_empty() { "(none)" } else { group.category.as_str() };
        println!(
            "  {:<28} {:>14} {:>9}",
            truncate(label, 28),
            format_money(group.revenue),
            group.net_change
        );
    }

    print_view("Top revenue", &views.top_revenue);
    print_view("Top gainers", &views.top_gainers);
    print_view("Top decliners", &views.top_decliners);
}

fn print_view(title: &str, rows: &[ViewRow]) {
    println!("\n{}:", title);
    for row in rows {
        println!(
            "  {:<10} {:<28} {:>14} {:>9}",
            row.code,
            truncate(&row.service, 28),
            row.revenue.map(format_money).unwrap_or_default(),
            opt(row.net_change)
        );
    }
}

fn print_raw_text(report: &Report, requested: bool) {
    if requested {
        println!("\n--- extracted text ---\n{}", report.raw_text);
    } else {
        println!("Re-run with --raw-text to inspect the extracted text.");
    }
}

fn opt(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        s.chars().take(width - 1).chain(std::iter::once('…')).collect()
    }
}

/// 1234567.891 -> "1,234,567.89"
fn format_money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    // amounts that round to zero print without a sign
    let nonzero = fixed.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let sign = if value < 0.0 && nonzero { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}
