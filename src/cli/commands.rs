//! Command implementations for the vacancy statistics CLI
//!
//! Logging setup plus one runner per subcommand.

use crate::cli::args::{Args, Commands, SplitArgs, StatsArgs};
use crate::error::{Result, StatsError};
use crate::processor::StatsProcessor;
use crate::processor::splitter::split_by_year;
use crate::report;

use colored::*;
use tokio::task;
use tracing::{debug, info};

/// Dispatch to the selected subcommand
pub async fn run(args: Args) -> Result<()> {
    setup_logging(&args);
    debug!("Command line arguments: {:?}", args);

    match &args.command {
        Some(Commands::Stats(stats_args)) => run_stats(stats_args, args.show_progress()).await,
        Some(Commands::Split(split_args)) => run_split(split_args).await,
        None => Err(StatsError::configuration("no command given")),
    }
}

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vacancy_stats={}", log_level)));

    // A subscriber may already be installed when running under tests
    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if result.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}

async fn run_stats(args: &StatsArgs, show_progress: bool) -> Result<()> {
    args.validate()?;
    let config = args.to_config(show_progress);

    println!(
        "{}",
        "Starting vacancy statistics run".bright_green().bold()
    );
    println!("  {} {}", "Input:".bright_cyan(), args.input_dir.display());
    if !config.name_filter.is_empty() {
        println!("  {} {}", "Filter:".bright_cyan(), config.name_filter);
    }

    let report = StatsProcessor::new(config)
        .process_directory(&args.input_dir)
        .await?;

    report::print_summary(&report);
    if let Some(path) = &args.json {
        report::write_json(&report, path)?;
        println!("  {} {}", "JSON written to".bright_cyan(), path.display());
    }
    Ok(())
}

async fn run_split(args: &SplitArgs) -> Result<()> {
    info!(
        "Splitting {} into {}",
        args.input.display(),
        args.output_dir.display()
    );

    let input = args.input.clone();
    let output_dir = args.output_dir.clone();
    let summary = task::spawn_blocking(move || split_by_year(&input, &output_dir))
        .await
        .map_err(|e| StatsError::TaskFailed {
            path: args.input.clone(),
            reason: e.to_string(),
        })??;

    report::print_split_summary(&summary, &args.output_dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_run_split_then_stats() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("vacancies.csv");
        std::fs::write(
            &input,
            "name,salary_from,salary_to,salary_currency,area_name,published_at\n\
             Dev,100,100,RUR,X,2020-01-01T00:00:00+0300\n\
             Dev,300,300,RUR,Y,2021-01-01T00:00:00+0300\n",
        )
        .unwrap();
        let chunks = temp_dir.path().join("chunks");
        let json = temp_dir.path().join("stats.json");

        let split = Args::try_parse_from([
            "vacancy-stats",
            "-q",
            "split",
            input.to_str().unwrap(),
            "--output",
            chunks.to_str().unwrap(),
        ])
        .unwrap();
        run(split).await.unwrap();
        assert!(chunks.join("2020.csv").exists());
        assert!(chunks.join("2021.csv").exists());

        let stats = Args::try_parse_from([
            "vacancy-stats",
            "-q",
            "stats",
            chunks.to_str().unwrap(),
            "--json",
            json.to_str().unwrap(),
        ])
        .unwrap();
        run(stats).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(value["stats"]["count_by_year"]["2021"], 1);
    }

    #[tokio::test]
    async fn test_missing_command_is_an_error() {
        let args = Args::try_parse_from(["vacancy-stats", "-q"]).unwrap();
        assert!(run(args).await.is_err());
    }
}
