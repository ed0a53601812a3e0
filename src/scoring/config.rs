use serde::{Deserialize, Serialize};

/// Clarity level at or above which an answer counts in full
pub const DEFAULT_CLARITY_THRESHOLD: i64 = 2;
/// Weight applied to answers below the threshold under `ClarityPolicy::Discount`
pub const DEFAULT_LOW_CLARITY_WEIGHT: f64 = 0.5;

/// What happens to an answer whose clarity is below the threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClarityPolicy {
    /// Points are multiplied by `low_clarity_weight`
    #[default]
    Discount,
    /// Points are dropped; the question's ceiling still counts
    Exclude,
}

/// How an axis's normalization denominator is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenominatorPolicy {
    /// Sum of each answered question's ceiling (`max_abs_points`, or the
    /// largest absolute value its rule can award)
    #[default]
    Ceiling,
    /// `max(sum of positive extremes, |sum of negative extremes|)` over the
    /// answered questions' rules; `max_abs_points` is ignored
    Achievable,
}

/// Scoring policy.
///
/// The two policy axes are independent and never blended. The default is
/// `Discount` + `Ceiling`.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   clarity: discount
///   clarity_threshold: 2
///   low_clarity_weight: 0.5
///   denominator: ceiling
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringPolicy {
    #[serde(default)]
    pub clarity: ClarityPolicy,

    #[serde(default = "default_clarity_threshold")]
    pub clarity_threshold: i64,

    #[serde(default = "default_low_clarity_weight")]
    pub low_clarity_weight: f64,

    #[serde(default)]
    pub denominator: DenominatorPolicy,
}

fn default_clarity_threshold() -> i64 {
    DEFAULT_CLARITY_THRESHOLD
}

fn default_low_clarity_weight() -> f64 {
    DEFAULT_LOW_CLARITY_WEIGHT
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            clarity: ClarityPolicy::Discount,
            clarity_threshold: DEFAULT_CLARITY_THRESHOLD,
            low_clarity_weight: DEFAULT_LOW_CLARITY_WEIGHT,
            denominator: DenominatorPolicy::Ceiling,
        }
    }
}

impl ScoringPolicy {
    /// Multiplier for an answer's points given its (already clamped) clarity
    pub fn clarity_weight(&self, clarity: i64) -> f64 {
        if clarity >= self.clarity_threshold {
            1.0
        } else {
            match self.clarity {
                ClarityPolicy::Discount => self.low_clarity_weight,
                ClarityPolicy::Exclude => 0.0,
            }
        }
    }
}
