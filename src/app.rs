//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - ingests a dataset (file, picker, or generated demo catalog)
//! - profiles columns and aggregates the dashboard summary
//! - prints reports/charts
//! - writes optional exports

use clap::Parser;

use crate::charts::ChartOptions;
use crate::cli::{Command, PlotArgs, ReportArgs};
use crate::domain::RoleBindings;
use crate::error::AppError;

pub mod pipeline;

use pipeline::{DashboardConfig, DataSource};

/// Entry point for the `dg` binary.
pub fn run() -> Result<(), AppError> {
    // We want `dg` and `dg -f data.csv` to behave like `dg tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args, OutputMode::Full),
        Command::Stats(args) => handle_report(args, OutputMode::StatsOnly),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    StatsOnly,
}

fn handle_report(args: ReportArgs, mode: OutputMode) -> Result<(), AppError> {
    let source = match source_from_args(&args)? {
        Some(source) => source,
        None => DataSource::File(crate::cli::picker::prompt_for_data_path()?),
    };
    let config = dashboard_config_from_args(&args, source);
    let out = pipeline::run_dashboard(&config)?;

    // Print terminal output.
    match mode {
        OutputMode::Full => {
            println!(
                "{}",
                crate::report::format_dashboard(
                    &out.ingest,
                    &out.profiles,
                    &out.summary,
                    &out.narratives,
                    args.top
                )
            );
        }
        OutputMode::StatsOnly => {
            println!(
                "{}",
                crate::report::format_stats(&out.ingest, &out.profiles, &out.summary, args.top)
            );
        }
    }

    if mode == OutputMode::Full && args.charts && !args.no_charts {
        for chart in &out.charts {
            println!("{}", crate::plot::render_chart(chart, args.width, args.height));
        }
    }

    // Optional exports.
    if let Some(path) = &args.export {
        let numeric = crate::profile::numeric_columns(&out.profiles);
        let dashboard = crate::io::dashboard::build_dashboard_file(
            &out.ingest,
            &numeric,
            out.summary.stats(),
            &out.charts,
            &out.narratives,
        );
        crate::io::dashboard::write_dashboard_json(path, &dashboard)?;
    }
    if let Some(path) = &args.export_summary {
        crate::io::export::write_summary_csv(path, &out.summary)?;
    }

    Ok(())
}

fn handle_tui(args: ReportArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let dashboard = crate::io::dashboard::read_dashboard_json(&args.dashboard)?;

    println!(
        "Dashboard from {} ({} rows, exported {})",
        dashboard.source,
        dashboard.rows,
        dashboard.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    for chart in &dashboard.charts {
        println!("{}", crate::plot::render_chart(chart, args.width, args.height));
    }
    Ok(())
}

/// Pick the data source from flags alone (no prompting).
///
/// `None` means nothing was specified; the caller decides how to ask (text
/// prompt for the CLI, picker overlay for the TUI).
pub fn source_from_args(args: &ReportArgs) -> Result<Option<DataSource>, AppError> {
    if args.demo {
        return Ok(Some(DataSource::Demo {
            rows: args.demo_rows,
            seed: args.seed,
        }));
    }
    match &args.file {
        Some(path) => Ok(Some(DataSource::File(crate::cli::picker::validate_data_path(path)?))),
        None => Ok(None),
    }
}

pub fn dashboard_config_from_args(args: &ReportArgs, source: DataSource) -> DashboardConfig {
    DashboardConfig {
        source,
        bindings: RoleBindings {
            category: args.category_column.clone(),
            rating: args.rating_column.clone(),
            price: args.price_column.clone(),
            discounted_price: args.discounted_price_column.clone(),
        },
        charts: ChartOptions {
            price_points: args.price_points,
            numeric_charts: args.numeric_charts,
        },
    }
}

/// Rewrite argv so `dg` defaults to `dg tui`.
///
/// Rules:
/// - `dg`                      -> `dg tui`
/// - `dg -f data.csv ...`      -> `dg tui -f data.csv ...`
/// - `dg --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "stats" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["dg"])), argv(&["dg", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["dg", "--demo"])),
            argv(&["dg", "tui", "--demo"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through_unchanged() {
        assert_eq!(
            rewrite_args(argv(&["dg", "report", "-f", "x.csv"])),
            argv(&["dg", "report", "-f", "x.csv"])
        );
        assert_eq!(rewrite_args(argv(&["dg", "--help"])), argv(&["dg", "--help"]));
        assert_eq!(rewrite_args(argv(&["dg", "-V"])), argv(&["dg", "-V"]));
    }
}
