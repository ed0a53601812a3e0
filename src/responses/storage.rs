use super::types::{CollectedResponses, ScoredResponse, ScoredResponses};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Key that marks the envelope written by `collect`
const COLLECTED_AT_KEY: &str = "collected_at";

/// Parse responses from JSON.
///
/// Accepts the `collect` envelope, a plain list of responses, or an object
/// keyed by question_id (the key fills in `question_id`). A record that is
/// not a response object fails the parse with its index or key in the
/// message.
pub fn parse_responses(json: &str) -> Result<ScoredResponses> {
    let value: Value = serde_json::from_str(json).context("Responses file is not valid JSON")?;

    match value {
        Value::Array(records) => parse_list(records),
        Value::Object(mut object) if object.contains_key(COLLECTED_AT_KEY) => {
            match object.remove("responses") {
                Some(Value::Array(records)) => parse_list(records),
                _ => anyhow::bail!("Collected responses file has no `responses` list"),
            }
        }
        Value::Object(object) => object
            .into_iter()
            .map(|(question_id, record)| {
                let mut response = parse_record(record, &question_id)?;
                response.question_id = question_id;
                Ok(response)
            })
            .collect(),
        _ => anyhow::bail!(
            "Responses JSON is not a list, a keyed object, or a collected-responses file"
        ),
    }
}

fn parse_list(records: Vec<Value>) -> Result<ScoredResponses> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| parse_record(record, &i.to_string()))
        .collect()
}

fn parse_record(record: Value, location: &str) -> Result<ScoredResponse> {
    serde_json::from_value(record)
        .with_context(|| format!("responses[{}]: not a valid response record", location))
}

/// Load scored responses from a JSON file
pub fn load_responses(path: &Path) -> Result<ScoredResponses> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read responses at {}", path.display()))?;
    let responses = parse_responses(&content)
        .with_context(|| format!("Failed to parse responses in {}", path.display()))?;
    tracing::debug!(path = %path.display(), responses = responses.len(), "loaded responses");
    Ok(responses)
}

/// Save collected responses atomically, creating the parent directory if needed.
pub fn save_collected_responses(path: &Path, collected: &CollectedResponses) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, collected)
        .context("Failed to serialize collected responses")?;

    file.commit().context("Failed to save collected responses")?;

    Ok(())
}
