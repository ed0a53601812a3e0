use super::types::{AxisMapping, MappingRecord};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Mapping path used when neither the CLI nor the config names one
pub fn default_mapping_path() -> PathBuf {
    PathBuf::from("data").join("axis_mapping.json")
}

/// Both layouts seen in mapping files: a list of records carrying their own
/// `question_id`, or an object keyed by question_id.
#[derive(Deserialize)]
#[serde(untagged)]
enum MappingFile {
    List(Vec<MappingRecord>),
    Keyed(BTreeMap<String, MappingRecord>),
}

/// Parse mapping JSON into `(question_id, record)` pairs, in file order for
/// the list layout and key order for the object layout.
pub fn parse_mapping_records(json: &str) -> Result<Vec<(String, MappingRecord)>> {
    let file: MappingFile =
        serde_json::from_str(json).context("Mapping JSON is neither a list of records nor an object keyed by question_id")?;

    match file {
        MappingFile::List(records) => records
            .into_iter()
            .enumerate()
            .map(|(i, record)| match record.question_id.clone() {
                Some(id) if !id.trim().is_empty() => Ok((id, record)),
                _ => bail!("mapping[{}]: missing question_id", i),
            })
            .collect(),
        MappingFile::Keyed(records) => Ok(records.into_iter().collect()),
    }
}

/// Read raw mapping records from a JSON file
pub fn read_mapping_records(path: &Path) -> Result<Vec<(String, MappingRecord)>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read axis mapping at {}", path.display()))?;
    parse_mapping_records(&content)
        .with_context(|| format!("Failed to parse axis mapping in {}", path.display()))
}

/// Validate raw records and build the typed mapping, returning every
/// problem found (duplicate ids included) when any record is invalid.
pub fn check_axis_mapping(records: &[(String, MappingRecord)]) -> Result<AxisMapping, Vec<String>> {
    crate::scoring::validate_mapping(records)?;

    let mut mapping = AxisMapping::new();
    let mut errors = Vec::new();
    for (question_id, record) in records {
        match record.to_entry() {
            Ok(entry) => mapping.insert(question_id.clone(), entry),
            Err(record_errors) => errors.extend(
                record_errors
                    .iter()
                    .map(|e| format!("mapping[{}]: {}", question_id, e)),
            ),
        }
    }

    if errors.is_empty() {
        Ok(mapping)
    } else {
        Err(errors)
    }
}

/// Build a typed mapping from raw records, rejecting the whole table if any
/// record is invalid.
pub fn build_axis_mapping(records: &[(String, MappingRecord)]) -> Result<AxisMapping> {
    check_axis_mapping(records)
        .map_err(|errors| anyhow::anyhow!("Invalid axis mapping:\n  - {}", errors.join("\n  - ")))
}

/// Load and validate an axis mapping file
pub fn load_axis_mapping(path: &Path) -> Result<AxisMapping> {
    let records = read_mapping_records(path)?;
    let mapping = build_axis_mapping(&records)?;
    tracing::debug!(
        path = %path.display(),
        questions = mapping.len(),
        "loaded axis mapping"
    );
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::types::Axis;
    use std::env;

    const LIST_JSON: &str = r#"[
        {
            "question_id": "A1.GR.1",
            "axis": "Economic",
            "scoring_type": "choice",
            "choices_mapping": { "a": -4, "b": 4 },
            "max_abs_points": 4
        },
        {
            "question_id": "A3.GIE.1",
            "axis": "Social",
            "scoring_type": "stance",
            "stance_scale": { "-2": -5, "-1": -2.5, "0": 0, "1": 2.5, "2": 5 },
            "max_abs_points": 5
        }
    ]"#;

    #[test]
    fn test_parse_list_layout() {
        let records = parse_mapping_records(LIST_JSON).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, "A1.GR.1");
        assert_eq!(records[1].0, "A3.GIE.1");
    }

    #[test]
    fn test_parse_keyed_layout() {
        let json = r#"{
            "Q1": { "axis": "Global", "type": "choice", "scoring": { "a": 1, "b": -1 } }
        }"#;
        let records = parse_mapping_records(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, "Q1");
        let mapping = build_axis_mapping(&records).unwrap();
        let entry = mapping.get("Q1").unwrap();
        assert_eq!(entry.axis, Axis::Global);
        assert_eq!(entry.ceiling(), 1.0);
    }

    #[test]
    fn test_list_entry_without_id_rejected() {
        let json = r#"[{ "axis": "Global", "scoring_type": "choice", "choices_mapping": { "a": 1 } }]"#;
        let err = parse_mapping_records(json).unwrap_err();
        assert!(format!("{:#}", err).contains("missing question_id"));
    }

    #[test]
    fn test_not_a_mapping_rejected() {
        assert!(parse_mapping_records("42").is_err());
        assert!(parse_mapping_records("not json").is_err());
    }

    #[test]
    fn test_build_reports_all_invalid_records() {
        let json = r#"[
            { "question_id": "Q1", "axis": "Economic", "scoring_type": "choice" },
            { "question_id": "Q2", "axis": "Social", "scoring_type": "stance", "stance_scale": { "9": 1 } }
        ]"#;
        let records = parse_mapping_records(json).unwrap();
        let err = build_axis_mapping(&records).unwrap_err().to_string();
        assert!(err.contains("mapping[Q1]"));
        assert!(err.contains("mapping[Q2]"));
    }

    #[test]
    fn test_check_lists_each_problem_once() {
        let json = r#"[
            { "question_id": "Q1", "axis": "Economic", "scoring_type": "choice", "choices_mapping": { "a": 1 } },
            { "question_id": "Q1", "axis": "Economic", "scoring_type": "choice", "choices_mapping": { "a": 2 } },
            { "question_id": "Q2", "axis": "Social", "scoring_type": "stance" }
        ]"#;
        let records = parse_mapping_records(json).unwrap();
        let errors = check_axis_mapping(&records).unwrap_err();
        assert_eq!(errors.len(), 2, "{:?}", errors);
        assert!(errors[0].contains("mapping[Q1]: duplicate question_id"));
        assert!(errors[1].starts_with("mapping[Q2]"));

        let valid = parse_mapping_records(LIST_JSON).unwrap();
        let mapping = check_axis_mapping(&valid).unwrap();
        assert_eq!(mapping.axis_counts()[0], (Axis::Economic, 1));
    }

    #[test]
    fn test_load_from_file() {
        let path = env::temp_dir().join("ideology_axes_test_mapping.json");
        std::fs::write(&path, LIST_JSON).unwrap();

        let mapping = load_axis_mapping(&path).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("A3.GIE.1").unwrap().axis, Axis::Social);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let path = env::temp_dir().join("ideology_axes_test_mapping_missing.json");
        let _ = std::fs::remove_file(&path);
        let err = load_axis_mapping(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to read axis mapping"));
    }
}
