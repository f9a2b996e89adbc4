mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::amortization::PaymentArgs;
use commands::loans::LoansArgs;
use commands::restructure::RestructureArgs;
use commands::schedule::ScheduleArgs;

/// Mortgage restructuring analysis
#[derive(Parser)]
#[command(
    name = "mra",
    version,
    about = "Mortgage restructuring analysis",
    long_about = "Aggregates existing mortgage loans, amortises fixed-rate payments and \
                  ranks equal-split restructure scenarios across a lender's rate sheet \
                  by monthly savings, with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Print unrounded decimals instead of cents
    #[arg(long, global = true)]
    exact: bool,

    /// Debug logging on stderr (otherwise RUST_LOG, default warn)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment and lifetime interest for one loan
    Payment(PaymentArgs),
    /// Month-by-month amortisation schedule
    Schedule(ScheduleArgs),
    /// Aggregate existing loans (total balance, payment, weighted rate)
    Loans(LoansArgs),
    /// Rank equal-split restructure scenarios by monthly savings
    Restructure(RestructureArgs),
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

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::amortization::run_payment(args, cli.exact),
        Commands::Schedule(args) => commands::schedule::run_schedule(args, cli.exact),
        Commands::Loans(args) => commands::loans::run_loans(args, cli.exact),
        Commands::Restructure(args) => commands::restructure::run_restructure(args, cli.exact),
        Commands::Version => {
            println!("mra {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
