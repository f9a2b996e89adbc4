use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print the envelope to stdout. A closed pipe (`mra ... | head`) is
/// not an error.
pub fn print_json(value: &Value) {
    let rendered = match serde_json::to_string_pretty(value) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("JSON serialization error: {}", e);
            return;
        }
    };
    let mut out = io::stdout().lock();
    if let Err(e) = writeln!(out, "{}", rendered) {
        if e.kind() != io::ErrorKind::BrokenPipe {
            eprintln!("write error: {}", e);
        }
    }
}
