use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_restructure_core::amortization::{self, PaymentInput};
use mortgage_restructure_core::restructure::DEFAULT_TERM_MONTHS;

use crate::input;

/// Arguments for a single-loan payment calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PaymentArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 6.5 for 6.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long, default_value_t = DEFAULT_TERM_MONTHS)]
    pub term_months: u32,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_payment(args: PaymentArgs, exact: bool) -> Result<Value, Box<dyn std::error::Error>> {
    let payment_input = match input::load::<PaymentInput>(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => PaymentInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args.term_months,
        },
    };
    let result = amortization::calculate_payment(&payment_input)?;
    super::render(result, exact)
}
