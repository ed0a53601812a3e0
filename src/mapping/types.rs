use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::error::MappingError;

/// Lowest stance level a response can express
pub const MIN_STANCE: i64 = -2;
/// Highest stance level a response can express
pub const MAX_STANCE: i64 = 2;

/// The four ideological axes, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Axis {
    #[serde(alias = "economic")]
    Economic,
    #[serde(alias = "social")]
    Social,
    #[serde(alias = "authority")]
    Authority,
    #[serde(alias = "global")]
    Global,
}

impl Axis {
    /// Fixed evaluation order used for every coordinate run
    pub const ALL: [Axis; 4] = [Axis::Economic, Axis::Social, Axis::Authority, Axis::Global];

    pub fn name(&self) -> &'static str {
        match self {
            Axis::Economic => "Economic",
            Axis::Social => "Social",
            Axis::Authority => "Authority",
            Axis::Global => "Global",
        }
    }

    /// Key used in flat coordinate output (e.g. "economic_axis")
    pub fn output_key(&self) -> &'static str {
        match self {
            Axis::Economic => "economic_axis",
            Axis::Social => "social_axis",
            Axis::Authority => "authority_axis",
            Axis::Global => "global_axis",
        }
    }

    /// Case-insensitive lookup by name
    pub fn parse(s: &str) -> Option<Axis> {
        let s = s.trim();
        Axis::ALL
            .into_iter()
            .find(|axis| axis.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a question turns an answer into points.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringRule {
    /// Discrete choice label -> signed points
    Choice(BTreeMap<String, f64>),
    /// Stance level (-2..=2) -> signed points
    Stance(BTreeMap<i64, f64>),
}

impl ScoringRule {
    pub fn scoring_type(&self) -> ScoringType {
        match self {
            ScoringRule::Choice(_) => ScoringType::Choice,
            ScoringRule::Stance(_) => ScoringType::Stance,
        }
    }

    /// All point values this rule can award
    pub fn values(&self) -> Vec<f64> {
        match self {
            ScoringRule::Choice(choices) => choices.values().copied().collect(),
            ScoringRule::Stance(scale) => scale.values().copied().collect(),
        }
    }

    /// Largest absolute contribution the rule can produce (0 for an empty table)
    pub fn derived_ceiling(&self) -> f64 {
        self.values().into_iter().map(f64::abs).fold(0.0, f64::max)
    }

    /// `(max(0, highest), min(0, lowest))` over the rule's point values
    pub fn achievable_extremes(&self) -> (f64, f64) {
        let values = self.values();
        let highest = values.iter().copied().fold(0.0, f64::max);
        let lowest = values.iter().copied().fold(0.0, f64::min);
        (highest, lowest)
    }
}

/// One question's entry in the axis mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisMappingEntry {
    pub axis: Axis,
    pub rule: ScoringRule,
    /// Explicit ceiling; derived from the rule when absent
    pub max_abs_points: Option<f64>,
    pub question_text: Option<String>,
}

impl AxisMappingEntry {
    pub fn choice<'a>(
        axis: Axis,
        choices: impl IntoIterator<Item = (&'a str, f64)>,
        max_abs_points: Option<f64>,
    ) -> Self {
        Self {
            axis,
            rule: ScoringRule::Choice(
                choices
                    .into_iter()
                    .map(|(label, points)| (label.to_string(), points))
                    .collect(),
            ),
            max_abs_points,
            question_text: None,
        }
    }

    pub fn stance(
        axis: Axis,
        scale: impl IntoIterator<Item = (i64, f64)>,
        max_abs_points: Option<f64>,
    ) -> Self {
        Self {
            axis,
            rule: ScoringRule::Stance(scale.into_iter().collect()),
            max_abs_points,
            question_text: None,
        }
    }

    /// Per-question ceiling used by the fixed-ceiling denominator
    pub fn ceiling(&self) -> f64 {
        self.max_abs_points
            .unwrap_or_else(|| self.rule.derived_ceiling())
    }
}

/// Immutable question_id -> entry table.
///
/// Backed by a `BTreeMap` so every scoring run walks questions in the same
/// order and floating-point sums are reproducible bit for bit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisMapping {
    entries: BTreeMap<String, AxisMappingEntry>,
}

impl AxisMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. A repeated question_id replaces the earlier entry.
    pub fn insert(&mut self, question_id: impl Into<String>, entry: AxisMappingEntry) {
        self.entries.insert(question_id.into(), entry);
    }

    pub fn get(&self, question_id: &str) -> Option<&AxisMappingEntry> {
        self.entries.get(question_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AxisMappingEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Entries that feed the given axis, in question_id order
    pub fn entries_for_axis(&self, axis: Axis) -> impl Iterator<Item = (&str, &AxisMappingEntry)> {
        self.iter().filter(move |(_, entry)| entry.axis == axis)
    }

    /// Number of mapped questions per axis, in `Axis::ALL` order
    pub fn axis_counts(&self) -> Vec<(Axis, usize)> {
        Axis::ALL
            .into_iter()
            .map(|axis| (axis, self.entries_for_axis(axis).count()))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, AxisMappingEntry)> for AxisMapping {
    fn from_iter<I: IntoIterator<Item = (S, AxisMappingEntry)>>(iter: I) -> Self {
        let mut mapping = AxisMapping::new();
        for (question_id, entry) in iter {
            mapping.insert(question_id, entry);
        }
        mapping
    }
}

/// Rule tag as written in mapping files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringType {
    Choice,
    #[serde(alias = "analytical_stance")]
    Stance,
}

/// A mapping entry as it appears on disk, before the rule invariant is checked.
///
/// Example JSON:
/// ```json
/// {
///   "question_id": "A1.GR.1",
///   "axis": "Economic",
///   "scoring_type": "choice",
///   "choices_mapping": { "a": -4, "b": 4 },
///   "max_abs_points": 4
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MappingRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,

    pub axis: Axis,

    #[serde(alias = "type")]
    pub scoring_type: ScoringType,

    #[serde(default, alias = "scoring", skip_serializing_if = "Option::is_none")]
    pub choices_mapping: Option<BTreeMap<String, f64>>,

    /// Keys are stance levels written as strings ("-2" .. "2")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stance_scale: Option<BTreeMap<String, f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_abs_points: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
}

impl MappingRecord {
    /// Convert into a typed entry, reporting every problem found.
    pub fn to_entry(&self) -> Result<AxisMappingEntry, Vec<MappingError>> {
        let mut errors = Vec::new();

        if let Some(max) = self.max_abs_points {
            if !max.is_finite() || max < 0.0 {
                errors.push(MappingError::InvalidCeiling(max));
            }
        }

        let rule = match self.scoring_type {
            ScoringType::Choice => {
                if self.stance_scale.is_some() {
                    errors.push(MappingError::ConflictingRules);
                }
                match &self.choices_mapping {
                    Some(choices) if !choices.is_empty() => {
                        for (label, points) in choices {
                            if !points.is_finite() {
                                errors.push(MappingError::NonFinitePoints(label.clone()));
                            }
                        }
                        Some(ScoringRule::Choice(choices.clone()))
                    }
                    _ => {
                        errors.push(MappingError::MissingChoices);
                        None
                    }
                }
            }
            ScoringType::Stance => {
                if self.choices_mapping.is_some() {
                    errors.push(MappingError::ConflictingRules);
                }
                match &self.stance_scale {
                    Some(scale) if !scale.is_empty() => {
                        let mut levels = BTreeMap::new();
                        for (key, points) in scale {
                            if !points.is_finite() {
                                errors.push(MappingError::NonFinitePoints(key.clone()));
                            }
                            match key.trim().parse::<i64>() {
                                Ok(level) if (MIN_STANCE..=MAX_STANCE).contains(&level) => {
                                    levels.insert(level, *points);
                                }
                                Ok(level) => errors.push(MappingError::StanceOutOfRange(level)),
                                Err(_) => errors.push(MappingError::InvalidStanceKey(key.clone())),
                            }
                        }
                        Some(ScoringRule::Stance(levels))
                    }
                    _ => {
                        errors.push(MappingError::MissingStanceScale);
                        None
                    }
                }
            }
        };

        match rule {
            Some(rule) if errors.is_empty() => Ok(AxisMappingEntry {
                axis: self.axis,
                rule,
                max_abs_points: self.max_abs_points,
                question_text: self.question_text.clone(),
            }),
            _ => Err(errors),
        }
    }
}
