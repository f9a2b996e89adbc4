use clap::Args;
use serde_json::Value;

use mortgage_restructure_core::loans::{self, LoanAnalysisInput};

use crate::input::mortgage_data::MortgageData;

/// Arguments for aggregating the existing loan book
#[derive(Args)]
pub struct LoansArgs {
    /// Path to mortgage data JSON with an `existing_loans` list
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_loans(args: LoansArgs, exact: bool) -> Result<Value, Box<dyn std::error::Error>> {
    let data = MortgageData::load(args.input.as_deref(), "loan analysis")?;

    let analysis_input = LoanAnalysisInput {
        existing_loans: data.existing_loans,
    };
    let result = loans::analyze_loans(&analysis_input)?;
    super::render(result, exact)
}
