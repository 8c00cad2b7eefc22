use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::process;
use vacancy_stats::cli::{args::Args, commands};

fn main() {
    let args = Args::parse();

    // Without a subcommand, show help
    if args.command.is_none() {
        let _ = Args::command().print_help();
        println!();
        process::exit(0);
    }

    match run(args) {
        Ok(true) => process::exit(0),
        Ok(false) => {
            eprintln!("\nReceived CTRL+C, shutting down");
            process::exit(130);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Run the command; `Ok(false)` means it was interrupted
fn run(args: Args) -> anyhow::Result<bool> {
    let runtime = tokio::runtime::Runtime::new().context("failed to create async runtime")?;

    runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => {
                result.context("run failed")?;
                Ok(true)
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for CTRL+C")?;
                Ok(false)
            }
        }
    })
}
