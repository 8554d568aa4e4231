mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::schedule::{AnnuityArgs, ScheduleArgs, ValidateArgs};

/// Loan amortization schedules with minor-unit precision
#[derive(Parser)]
#[command(
    name = "amort",
    version,
    about = "Loan amortization schedules with minor-unit precision",
    long_about = "A CLI for computing fixed-annuity loan payment schedules. \
                  Each installment is decomposed into principal, interest and \
                  index-rate components, exact to the minor currency unit, \
                  with per-segment index-rate overrides."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the full payment schedule for a loan
    Schedule(ScheduleArgs),
    /// Compute the level annuity payment only
    Annuity(AnnuityArgs),
    /// Validate a loan document without computing a schedule
    Validate(ValidateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Annuity(args) => commands::schedule::run_annuity(args),
        Commands::Validate(args) => commands::schedule::run_validate(args),
        Commands::Version => {
            println!("amort {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
