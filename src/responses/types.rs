use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Clarity assumed when a response does not carry one ("moderate")
pub const DEFAULT_CLARITY: i64 = 2;
pub const MIN_CLARITY: i64 = 0;
pub const MAX_CLARITY: i64 = 3;

/// Rubric id that holds the clarity level inside a `rubrics` object
pub const POSITION_CLARITY_RUBRIC: &str = "position_clarity";

/// A single already-judged answer.
///
/// Exactly one of `selected_choice` / `stance_score` is expected, matching
/// the question's rule. A mismatch is not an error; it scores zero.
///
/// Judgement fields of the wrong JSON type (a float stance, a numeric
/// choice, a string rubric) are dropped with a warning instead of failing
/// the whole file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScoredResponse {
    /// Filled from the object key when responses are stored keyed by id
    #[serde(default)]
    pub question_id: String,

    #[serde(
        default,
        alias = "position_clarity",
        deserialize_with = "lenient_clarity",
        skip_serializing_if = "Option::is_none"
    )]
    pub clarity_level: Option<i64>,

    #[serde(
        default,
        deserialize_with = "lenient_choice",
        skip_serializing_if = "Option::is_none"
    )]
    pub selected_choice: Option<String>,

    #[serde(
        default,
        alias = "ideological_stance_score",
        deserialize_with = "lenient_stance",
        skip_serializing_if = "Option::is_none"
    )]
    pub stance_score: Option<i64>,

    /// Per-rubric judgements; only `position_clarity` is read, as a fallback
    #[serde(
        default,
        deserialize_with = "lenient_rubrics",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub rubrics: BTreeMap<String, i64>,
}

fn integer_or_warn(value: Value, field: &str) -> Option<i64> {
    let parsed = value.as_i64();
    if parsed.is_none() {
        tracing::warn!(field, value = %value, "ignoring non-integer response field");
    }
    parsed
}

fn lenient_clarity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| integer_or_warn(v, "clarity_level")))
}

fn lenient_stance<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| integer_or_warn(v, "stance_score")))
}

fn lenient_choice<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(label)) => Ok(Some(label)),
        Some(other) => {
            tracing::warn!(value = %other, "ignoring non-string selected_choice");
            Ok(None)
        }
        None => Ok(None),
    }
}

fn lenient_rubrics<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, i64>, D::Error> {
    let object = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(object)) => object,
        Some(other) => {
            tracing::warn!(value = %other, "ignoring rubrics that are not an object");
            return Ok(BTreeMap::new());
        }
        None => return Ok(BTreeMap::new()),
    };

    let mut rubrics = BTreeMap::new();
    for (rubric, value) in object {
        match value.as_i64() {
            Some(level) => {
                rubrics.insert(rubric, level);
            }
            None if rubric == POSITION_CLARITY_RUBRIC => {
                tracing::warn!(rubric = %rubric, value = %value, "ignoring non-integer rubric");
            }
            None => tracing::debug!(rubric = %rubric, "skipping non-integer rubric"),
        }
    }
    Ok(rubrics)
}

impl ScoredResponse {
    pub fn choice(question_id: impl Into<String>, clarity_level: Option<i64>, label: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            clarity_level,
            selected_choice: Some(label.into()),
            stance_score: None,
            rubrics: BTreeMap::new(),
        }
    }

    pub fn stance(question_id: impl Into<String>, clarity_level: Option<i64>, stance_score: i64) -> Self {
        Self {
            question_id: question_id.into(),
            clarity_level,
            selected_choice: None,
            stance_score: Some(stance_score),
            rubrics: BTreeMap::new(),
        }
    }

    /// Effective clarity: explicit level, then the `position_clarity` rubric,
    /// then the moderate default; clamped into 0..=3.
    pub fn clarity(&self) -> i64 {
        self.clarity_level
            .or_else(|| self.rubrics.get(POSITION_CLARITY_RUBRIC).copied())
            .unwrap_or(DEFAULT_CLARITY)
            .clamp(MIN_CLARITY, MAX_CLARITY)
    }
}

/// Responses indexed by question_id. Later duplicates replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredResponses {
    by_id: BTreeMap<String, ScoredResponse>,
}

impl ScoredResponses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, response: ScoredResponse) {
        self.by_id.insert(response.question_id.clone(), response);
    }

    pub fn get(&self, question_id: &str) -> Option<&ScoredResponse> {
        self.by_id.get(question_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredResponse> {
        self.by_id.values()
    }
}

impl FromIterator<ScoredResponse> for ScoredResponses {
    fn from_iter<I: IntoIterator<Item = ScoredResponse>>(iter: I) -> Self {
        let mut responses = ScoredResponses::new();
        for response in iter {
            responses.insert(response);
        }
        responses
    }
}

/// File written by `collect`: the responses plus when they were gathered
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CollectedResponses {
    pub collected_at: DateTime<Utc>,
    pub responses: Vec<ScoredResponse>,
}

impl CollectedResponses {
    pub fn new(responses: Vec<ScoredResponse>) -> Self {
        Self {
            collected_at: Utc::now(),
            responses,
        }
    }
}
