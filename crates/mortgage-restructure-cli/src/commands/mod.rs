pub mod amortization;
pub mod loans;
pub mod restructure;
pub mod schedule;

use serde::Serialize;
use serde_json::Value;

use mortgage_restructure_core::presentation::Rounded;
use mortgage_restructure_core::ComputationOutput;

/// Serialise a computation, rounded to cents unless exact output was asked for.
pub(crate) fn render<T: Serialize + Rounded>(
    output: ComputationOutput<T>,
    exact: bool,
) -> Result<Value, Box<dyn std::error::Error>> {
    for warning in &output.warnings {
        tracing::debug!(%warning, "computation warning");
    }
    let output = if exact {
        output
    } else {
        output.map(|result| result.rounded())
    };
    Ok(serde_json::to_value(output)?)
}
