use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_restructure_core::restructure::{
    self, RestructureInput, DEFAULT_SPLIT_COUNT, DEFAULT_TERM_MONTHS, DEFAULT_TOP_N,
};

use crate::input::mortgage_data::MortgageData;

/// Arguments for ranking restructure scenarios
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RestructureArgs {
    /// Path to mortgage data JSON (existing loans and market rates)
    #[arg(long)]
    pub input: Option<String>,

    /// Number of equal loans to split the balance into
    #[arg(long, default_value_t = DEFAULT_SPLIT_COUNT)]
    pub split_count: u32,

    /// Term of each new loan in months
    #[arg(long, default_value_t = DEFAULT_TERM_MONTHS)]
    pub term_months: u32,

    /// Number of unique combinations to return
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Upfront cost of restructuring, used for break-even months
    #[arg(long)]
    pub restructure_cost: Option<Decimal>,

    /// Use every numeric rate on the sheet, not just the standard rate types
    #[arg(long)]
    pub all_rate_types: bool,
}

pub fn run_restructure(
    args: RestructureArgs,
    exact: bool,
) -> Result<Value, Box<dyn std::error::Error>> {
    let data = MortgageData::load(args.input.as_deref(), "restructure analysis")?;

    let table = data.rate_table(args.all_rate_types)?;
    let restructure_input = RestructureInput {
        existing_loans: data.existing_loans,
        rate_offers: table.into_offers(),
        split_count: args.split_count,
        term_months: args.term_months,
        top_n: args.top,
        restructure_cost: args.restructure_cost,
    };

    let result = restructure::analyze_restructure(&restructure_input)?;
    tracing::info!(
        scenarios = result.result.scenarios.len(),
        candidates = result.result.candidates_evaluated,
        "restructure analysis complete"
    );
    super::render(result, exact)
}
