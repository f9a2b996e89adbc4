pub mod file;
pub mod mortgage_data;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Typed input from `--input <file>`, or else from piped stdin.
/// `Ok(None)` when neither was given, so the caller can fall back to flags.
pub fn load<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Some(file::read_json(path)?)),
        None => stdin::read_stdin(),
    }
}
