//! Command-line parsing for the dataset dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the ingestion/summary code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dg", version, about = "Dataset dashboard for product catalogs (CSV/XLSX)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the full dashboard: summary, charts, and narrative text.
    Report(ReportArgs),
    /// Print column profiles and summary stats only (useful for scripting).
    Stats(ReportArgs),
    /// Re-render the charts from a previously exported dashboard JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `dg report`, but renders the
    /// dashboard in a terminal UI using Ratatui.
    Tui(ReportArgs),
}

/// Common options for building a dashboard.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Input file (.csv, .xlsx or .xls). When omitted, an interactive picker runs.
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Use a generated demo catalog instead of reading a file.
    #[arg(long)]
    pub demo: bool,

    /// Number of demo rows to generate.
    #[arg(long, default_value_t = 200)]
    pub demo_rows: usize,

    /// Random seed for demo data generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Column holding the product category (overrides name-based detection).
    #[arg(long, value_name = "NAME")]
    pub category_column: Option<String>,

    /// Column holding the rating (overrides name-based detection).
    #[arg(long, value_name = "NAME")]
    pub rating_column: Option<String>,

    /// Column holding the list price (overrides name-based detection).
    #[arg(long, value_name = "NAME")]
    pub price_column: Option<String>,

    /// Column holding the discounted price (overrides name-based detection).
    #[arg(long, value_name = "NAME")]
    pub discounted_price_column: Option<String>,

    /// Maximum number of per-column distribution charts.
    #[arg(long, default_value_t = 4)]
    pub numeric_charts: usize,

    /// Maximum number of points on the price comparison chart.
    #[arg(long, default_value_t = 20)]
    pub price_points: usize,

    /// Show top-N categories in the report.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Render ASCII charts in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub charts: bool,

    /// Disable the terminal charts.
    #[arg(long)]
    pub no_charts: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 15)]
    pub height: usize,

    /// Export the full dashboard (stats + charts + narratives) to JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the per-category summary to CSV.
    #[arg(long = "export-summary")]
    pub export_summary: Option<PathBuf>,
}

/// Options for re-rendering a saved dashboard.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Dashboard JSON file produced by `dg report --export`.
    #[arg(long, value_name = "JSON")]
    pub dashboard: PathBuf,

    /// Chart width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 15)]
    pub height: usize,
}
