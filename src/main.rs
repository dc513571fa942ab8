use analytics::{AnalyticsEngine, AnalyticsError, AnalyticsReport};
use chrono::{NaiveDate, Utc};
use core_types::InstrumentKind;
use clap::{Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use configuration::load_ticker_reference;
use market_data::YahooClient;
use matrix_builder::{BuildError, MatrixBuilder};
use rust_decimal::Decimal;

/// The main entry point for the carteira analytics application.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => {
            if let Err(e) = handle_analyze(args).await {
                eprintln!("Error during analysis: {}", e);
            }
        }
        Commands::Tickers => {
            if let Err(e) = handle_tickers() {
                eprintln!("Error listing tickers: {}", e);
            }
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Portfolio performance analytics over B3 tickers and the IBOV benchmark.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the price matrix for a selection and print its derived metrics.
    Analyze(AnalyzeArgs),
    /// Print the ticker reference table.
    Tickers,
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Comma-separated bare tickers (e.g., "PETR4,VALE3").
    #[arg(long, value_delimiter = ',', required = true)]
    tickers: Vec<String>,

    /// The start date of the analysis window (format: YYYY-MM-DD).
    /// Defaults to the configured start date.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// The end date of the analysis window (format: YYYY-MM-DD).
    /// Defaults to the configured end date, or today.
    #[arg(long)]
    to: Option<NaiveDate>,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

/// Handles the orchestration of the build-then-analyze pipeline.
async fn handle_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = configuration::load_config()?;
    let start = args.from.unwrap_or(config.defaults.start_date);
    let end = args
        .to
        .or(config.defaults.end_date)
        .unwrap_or_else(|| Utc::now().date_naive());

    let client = YahooClient::new(&config.data);
    let builder = MatrixBuilder::new(Box::new(client), config.data.clone());

    let matrix = match builder.build(&args.tickers, start, end).await {
        Ok(matrix) => matrix,
        // No data is a displayable condition, not a crash.
        Err(e @ BuildError::NoData) => {
            println!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let engine = AnalyticsEngine::new();
    let report = match engine.analyze(&matrix) {
        Ok(report) => report,
        // A benchmark with no usable data in range must not take the
        // asset analytics down with it. Drop the column and re-analyze.
        Err(AnalyticsError::DegenerateSeries(symbol))
            if matrix
                .column(&symbol)
                .is_some_and(|c| c.instrument.kind == InstrumentKind::Benchmark) =>
        {
            eprintln!(
                "Benchmark '{}' has no usable data in range; continuing without it.",
                symbol
            );
            engine.analyze(&matrix.without_column(&symbol))?
        }
        Err(e) => return Err(e.into()),
    };

    print_metrics(&report);
    print_normalized_tail(&report, 5);
    Ok(())
}

/// Renders one metrics row per instrument, portfolio and benchmark included.
fn print_metrics(report: &AnalyticsReport) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Instrument",
        "Total Return",
        "Volatility (ann.)",
        "Risk/Reward",
    ]);

    for metric in &report.metrics {
        table.add_row(vec![
            metric.instrument.symbol.clone(),
            percent(metric.total_return),
            metric
                .annualized_volatility
                .map(percent)
                .unwrap_or_else(|| "-".to_string()),
            metric
                .risk_reward
                .map(|r| r.round_dp(2).to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!("{table}");
}

/// Renders the last rows of the normalized matrix (base 100).
fn print_normalized_tail(report: &AnalyticsReport, rows: usize) {
    let normalized = &report.normalized;
    let mut table = Table::new();

    let mut header = vec!["Date".to_string()];
    header.extend(
        normalized
            .columns()
            .iter()
            .map(|c| c.instrument.symbol.clone()),
    );
    table.load_preset(UTF8_FULL).set_header(header);

    let skip = normalized.num_rows().saturating_sub(rows);
    for (i, date) in normalized.dates().iter().enumerate().skip(skip) {
        let mut row = vec![date.to_string()];
        row.extend(normalized.columns().iter().map(|c| {
            c.values[i]
                .map(|v| v.round_dp(1).to_string())
                .unwrap_or_else(|| "-".to_string())
        }));
        table.add_row(row);
    }

    println!("{table}");
}

/// Formats a fraction as a display percentage (0.1234 -> "12.34%").
fn percent(value: Decimal) -> String {
    format!("{}%", (value * Decimal::ONE_HUNDRED).round_dp(2))
}

// ==============================================================================
// Tickers Command Logic
// ==============================================================================

fn handle_tickers() -> anyhow::Result<()> {
    let config = configuration::load_config()?;
    let tickers = load_ticker_reference(&config.data.tickers_file)?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Symbol", "Name"]);
    for ticker in tickers {
        table.add_row(vec![ticker.symbol, ticker.name]);
    }

    println!("{table}");
    Ok(())
}
