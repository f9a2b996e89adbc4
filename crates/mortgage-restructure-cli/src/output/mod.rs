pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The first array-of-objects field in the result (scenarios, schedule rows).
pub(crate) fn primary_rows(result: &Value) -> Option<(&str, &Vec<Value>)> {
    result.as_object()?.iter().find_map(|(key, val)| match val {
        Value::Array(items) if items.first().is_some_and(Value::is_object) => {
            Some((key.as_str(), items))
        }
        _ => None,
    })
}

/// Keys of a row object whose values are scalars; nested legs and the like
/// are left to the JSON output.
pub(crate) fn scalar_columns(row: &Value) -> Vec<String> {
    row.as_object()
        .map(|map| {
            map.iter()
                .filter(|(_, v)| !v.is_array() && !v.is_object())
                .map(|(k, _)| k.clone())
                .collect()
        })
        .unwrap_or_default()
}
