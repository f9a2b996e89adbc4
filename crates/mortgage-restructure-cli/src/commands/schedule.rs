use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_restructure_core::restructure::DEFAULT_TERM_MONTHS;
use mortgage_restructure_core::schedule::{self, ScheduleInput};

use crate::input;

/// Arguments for a month-by-month amortisation schedule
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScheduleArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long, default_value_t = DEFAULT_TERM_MONTHS)]
    pub term_months: u32,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs, exact: bool) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input = match input::load::<ScheduleInput>(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => ScheduleInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args.term_months,
        },
    };
    let result = schedule::build_schedule(&schedule_input)?;
    super::render(result, exact)
}
