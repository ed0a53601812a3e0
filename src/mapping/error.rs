use thiserror::Error;

/// Problems that stop a mapping record from becoming a typed entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    #[error("scoring_type 'choice' requires a non-empty choices_mapping")]
    MissingChoices,

    #[error("scoring_type 'stance' requires a non-empty stance_scale")]
    MissingStanceScale,

    #[error("both choices_mapping and stance_scale are set; exactly one is allowed")]
    ConflictingRules,

    #[error("stance level '{0}' is not an integer")]
    InvalidStanceKey(String),

    #[error("stance level {0} is outside -2..=2")]
    StanceOutOfRange(i64),

    #[error("max_abs_points must be a finite non-negative number, got {0}")]
    InvalidCeiling(f64),

    #[error("points for '{0}' are not a finite number")]
    NonFinitePoints(String),
}
