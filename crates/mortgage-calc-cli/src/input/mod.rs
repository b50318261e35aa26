pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a JSON request from `--input <file>` if given, otherwise from piped
/// stdin. Returns `None` when neither source supplies anything.
pub fn read_request<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    stdin::read_stdin()
}
