use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{primary_rows, scalar_columns};

/// Format output as tables: a Field/Value summary, then one row per
/// scenario or schedule month when the result carries them.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    if let Value::Object(res_map) = result {
        let rows = primary_rows(result);
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in res_map {
            if rows.is_some_and(|(rows_key, _)| rows_key == key.as_str()) {
                continue;
            }
            push_field(&mut builder, key, val);
        }
        println!("{}", Table::from(builder));

        if let Some((key, items)) = rows {
            println!("\n{}:", key);
            print_array_table(items);
        }
    } else {
        print_flat_object(&Value::Object(envelope.clone()));
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Nested objects (e.g. current_position) are expanded as dotted fields.
fn push_field(builder: &mut Builder, key: &str, val: &Value) {
    match val {
        Value::Object(inner) => {
            for (sub_key, sub_val) in inner {
                push_field(builder, &format!("{}.{}", key, sub_key), sub_val);
            }
        }
        _ => builder.push_record([key.to_string(), format_value(val)]),
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_array_table(arr: &[Value]) {
    let Some(first) = arr.first() else {
        println!("(empty)");
        return;
    };

    if first.is_object() {
        let headers = scalar_columns(first);
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
