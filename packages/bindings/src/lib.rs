use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortisation
// ---------------------------------------------------------------------------

#[napi]
pub fn monthly_payment(input_json: String) -> NapiResult<String> {
    let input: mortgage_restructure_core::amortization::PaymentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_restructure_core::amortization::calculate_payment(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: mortgage_restructure_core::schedule::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        mortgage_restructure_core::schedule::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loans & restructuring
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_loans(input_json: String) -> NapiResult<String> {
    let input: mortgage_restructure_core::loans::LoanAnalysisInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        mortgage_restructure_core::loans::analyze_loans(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_restructure(input_json: String) -> NapiResult<String> {
    let input: mortgage_restructure_core::restructure::RestructureInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_restructure_core::restructure::analyze_restructure(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
