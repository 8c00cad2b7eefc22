//! Output adapters for finished statistics
//!
//! Console rendering for interactive use and a JSON export for downstream
//! renderers. Neither touches the numbers; they only format a [`StatsReport`].

use crate::error::Result;
use crate::processor::StatsReport;
use crate::processor::splitter::SplitSummary;

use colored::*;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Print the six statistics and the run summary to stdout
pub fn print_summary(report: &StatsReport) {
    let stats = &report.stats;
    let filter_label = if stats.name_filter.is_empty() {
        "all vacancies".to_string()
    } else {
        format!("'{}'", stats.name_filter)
    };

    println!("\n{}", "Salary statistics".bright_green().bold());
    print_year_series("Average salary by year:", &stats.salary_by_year);
    print_year_series("Vacancies by year:", &stats.count_by_year);
    print_year_series(
        &format!("Average salary by year for {}:", filter_label),
        &stats.filtered_salary_by_year,
    );
    print_year_series(
        &format!("Vacancies by year for {}:", filter_label),
        &stats.filtered_count_by_year,
    );

    println!("\n  {}", "Top cities by average salary:".bright_cyan());
    for (city, salary) in &stats.top_cities_by_salary {
        println!("    {:<30} {}", city, salary.to_string().bright_white());
    }

    println!("\n  {}", "Top cities by share of vacancies:".bright_cyan());
    for (city, share) in &stats.top_cities_by_share {
        println!(
            "    {:<30} {}",
            city,
            format!("{:.2}%", share * 100.0).bright_white()
        );
    }

    if !stats.currency_counts.is_empty() {
        println!("\n  {}", "Currencies:".bright_cyan());
        for (code, count) in &stats.currency_counts {
            println!("    {:<8} {}", code, count.to_string().bright_white());
        }
    }

    let summary = &report.summary;
    println!("\n{}", "Run Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        summary.elapsed_ms.to_string().bright_white()
    );
    println!(
        "  {} {} ({} workers)",
        "Shards processed:".bright_cyan(),
        summary.shards_processed.to_string().bright_white(),
        summary.workers
    );
    println!(
        "  {} {} ({:.1}% parsed)",
        "Rows read:".bright_cyan(),
        summary.rows_read().to_string().bright_white().bold(),
        summary.parse.success_rate()
    );
    if summary.rows_dropped() > 0 {
        println!(
            "  {} {} ({} malformed, {} unknown currency)",
            "Rows dropped:".bright_red(),
            summary.rows_dropped().to_string().bright_red().bold(),
            summary.parse.malformed_rows,
            summary.parse.unknown_currency_rows
        );
    }
}

fn print_year_series<V: Display>(title: &str, series: &BTreeMap<i32, V>) {
    println!("\n  {}", title.bright_cyan());
    for (year, value) in series {
        println!("    {} {}", year, value.to_string().bright_white());
    }
}

/// Print what a split produced
pub fn print_split_summary(summary: &SplitSummary, output_dir: &Path) {
    println!("\n{}", "Split Summary".bright_green().bold());
    println!("  {} {}", "Output:".bright_cyan(), output_dir.display());
    println!(
        "  {} {}",
        "Rows read:".bright_cyan(),
        summary.rows_read.to_string().bright_white()
    );
    for (year, rows) in &summary.rows_by_year {
        println!("    {}.csv {}", year, rows.to_string().bright_white());
    }
    if summary.rows_dropped > 0 {
        println!(
            "  {} {}",
            "Rows dropped:".bright_red(),
            summary.rows_dropped.to_string().bright_red().bold()
        );
    }
}

/// Write the report as pretty-printed JSON
pub fn write_json(report: &StatsReport, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report).map_err(std::io::Error::from)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!("Wrote JSON report to {}", path.display());
    Ok(())
}
