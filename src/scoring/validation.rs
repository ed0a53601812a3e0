use std::collections::HashSet;

use super::config::ScoringPolicy;
use crate::mapping::MappingRecord;
use crate::responses::{MAX_CLARITY, MIN_CLARITY};

/// Validate the scoring policy at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_policy(policy: &ScoringPolicy) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !(MIN_CLARITY..=MAX_CLARITY).contains(&policy.clarity_threshold) {
        errors.push(format!(
            "scoring.clarity_threshold: must be between {} and {}, got {}",
            MIN_CLARITY, MAX_CLARITY, policy.clarity_threshold
        ));
    }

    let weight = policy.low_clarity_weight;
    if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
        errors.push(format!(
            "scoring.low_clarity_weight: must be between 0 and 1, got {}",
            weight
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate raw mapping records.
/// Every record is checked; duplicate question ids are reported too.
pub fn validate_mapping(records: &[(String, MappingRecord)]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (question_id, record) in records {
        if !seen.insert(question_id.as_str()) {
            errors.push(format!("mapping[{}]: duplicate question_id", question_id));
        }
        if let Err(record_errors) = record.to_entry() {
            for e in record_errors {
                errors.push(format!("mapping[{}]: {}", question_id, e));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{Axis, ScoringType};
    use crate::scoring::{ClarityPolicy, DenominatorPolicy};
    use std::collections::BTreeMap;

    fn choice_record(choices: &[(&str, f64)]) -> MappingRecord {
        MappingRecord {
            question_id: None,
            axis: Axis::Economic,
            scoring_type: ScoringType::Choice,
            choices_mapping: Some(
                choices
                    .iter()
                    .map(|(k, v)| (k.to_string(), *v))
                    .collect::<BTreeMap<_, _>>(),
            ),
            stance_scale: None,
            max_abs_points: Some(4.0),
            question_text: None,
        }
    }

    #[test]
    fn test_valid_policy() {
        assert!(validate_policy(&ScoringPolicy::default()).is_ok());
        let policy = ScoringPolicy {
            clarity: ClarityPolicy::Exclude,
            clarity_threshold: 3,
            low_clarity_weight: 0.0,
            denominator: DenominatorPolicy::Achievable,
        };
        assert!(validate_policy(&policy).is_ok());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let policy = ScoringPolicy {
            clarity_threshold: 4,
            ..ScoringPolicy::default()
        };
        let errors = validate_policy(&policy).unwrap_err();
        assert!(errors[0].contains("scoring.clarity_threshold"));
    }

    #[test]
    fn test_collects_all_policy_errors() {
        let policy = ScoringPolicy {
            clarity_threshold: -1,    // Error 1
            low_clarity_weight: 1.5,  // Error 2
            ..ScoringPolicy::default()
        };
        let errors = validate_policy(&policy).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[1].contains("scoring.low_clarity_weight"));
    }

    #[test]
    fn test_nan_weight_rejected() {
        let policy = ScoringPolicy {
            low_clarity_weight: f64::NAN,
            ..ScoringPolicy::default()
        };
        assert!(validate_policy(&policy).is_err());
    }

    #[test]
    fn test_valid_mapping() {
        let records = vec![
            ("Q1".to_string(), choice_record(&[("a", -4.0), ("b", 4.0)])),
            ("Q2".to_string(), choice_record(&[("a", 1.0)])),
        ];
        assert!(validate_mapping(&records).is_ok());
    }

    #[test]
    fn test_duplicate_question_id() {
        let records = vec![
            ("Q1".to_string(), choice_record(&[("a", 1.0)])),
            ("Q1".to_string(), choice_record(&[("b", 1.0)])),
        ];
        let errors = validate_mapping(&records).unwrap_err();
        assert_eq!(errors, vec!["mapping[Q1]: duplicate question_id".to_string()]);
    }

    #[test]
    fn test_collects_all_mapping_errors() {
        let mut bad_ceiling = choice_record(&[("a", 1.0)]);
        bad_ceiling.max_abs_points = Some(f64::INFINITY);
        let records = vec![
            ("Q1".to_string(), choice_record(&[])),
            ("Q2".to_string(), bad_ceiling),
        ];
        let errors = validate_mapping(&records).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("mapping[Q1]: scoring_type 'choice'"));
        assert!(errors[1].starts_with("mapping[Q2]: max_abs_points"));
    }
}
