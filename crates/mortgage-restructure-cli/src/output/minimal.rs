use serde_json::Value;

/// Print just the key answer value from the output.
///
/// For scenario results that is the best combination and its monthly
/// savings; otherwise the first well-known field present, then the first
/// field of the result.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(Value::Array(scenarios)) = result_obj.get("scenarios") {
        match scenarios.first() {
            Some(best) => println!(
                "{}: {}",
                best.get("combination_name").map(format_minimal).unwrap_or_default(),
                best.get("monthly_savings").map(format_minimal).unwrap_or_default(),
            ),
            None => println!("(no scenarios)"),
        }
        return;
    }

    let priority_keys = [
        "monthly_payment",
        "weighted_average_rate",
        "total_interest",
        "total_balance",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
