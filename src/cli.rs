//! Command-line interface.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Fallback for `--tickers`, consulted only when neither ticker flag is given.
pub const TICKERS_ENV: &str = "TICKRS_TICKERS";

/// Fallback for `--tickers-from`, consulted after [`TICKERS_ENV`].
pub const TICKERS_FROM_ENV: &str = "TICKRS_TICKERS_FROM";

/// A terminal dashboard that flags stocks trading near their 52-week high or low.
///
/// tickrs loads a list of ticker symbols, fetches delayed quotes from Yahoo
/// Finance and marks each row with a buy or sell hint when the price sits
/// within 20% of the yearly range from either extreme.
#[derive(Parser, Debug, Clone)]
#[command(name = "tickrs")]
#[command(version)]
#[command(about = "A terminal dashboard that flags stocks near their 52-week high or low", long_about = None)]
pub struct Args {
    /// Tell more about what is going on (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Print tickers info and recommendations once, then exit
    #[arg(short = '1', long, visible_alias = "batch")]
    pub once: bool,

    /// Comma-separated list of tickers [env: TICKRS_TICKERS]
    ///
    /// Example: AAPL,MSFT,GOOG
    #[arg(short = 't', long, value_delimiter = ',', conflicts_with = "tickers_from")]
    pub tickers: Option<Vec<String>>,

    /// Path to a file with tickers, one per line [env: TICKRS_TICKERS_FROM] [default: tickers.txt]
    #[arg(short = 'f', long)]
    pub tickers_from: Option<PathBuf>,

    /// Auto-refresh delay in seconds for the interactive view
    #[arg(short = 'd', long, env = "TICKRS_DELAY")]
    pub delay: Option<f64>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "TICKRS_CONFIG")]
    pub config: Option<PathBuf>,

    /// API timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output format for --once
    #[arg(long, value_enum, default_value = "text")]
    pub export: ExportFormat,

    /// Write logs to this file instead of the default location
    #[arg(long, env = "TICKRS_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Export format for one-shot output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ExportFormat {
    /// Aligned plain-text table
    #[default]
    Text,
    /// Comma-separated values (CSV)
    Csv,
    /// JavaScript Object Notation (JSON)
    Json,
}

impl Args {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Args::parse()
    }
}
