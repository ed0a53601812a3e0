use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::config::{DenominatorPolicy, ScoringPolicy};
use crate::mapping::{Axis, AxisMapping, AxisMappingEntry, ScoringRule};
use crate::responses::{ScoredResponse, ScoredResponses};

/// Axis scores span `[-AXIS_SCALE, AXIS_SCALE]`
pub const AXIS_SCALE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionContribution {
    pub question_id: String,
    pub answer: String,      // e.g. "choice 'a'", "stance +1", "no stance"
    pub points: f64,         // Points from the rule table (0 if unrecognized)
    pub clarity_weight: f64, // Multiplier from the clarity policy
    pub weighted: f64,       // points * clarity_weight
    pub max_points: f64,     // This question's share of the denominator
}

/// One axis's score with the sums it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisScore {
    pub axis: Axis,
    pub score: f64,
    pub raw_score: f64,
    pub max_abs_score: f64,
    pub contributions: Vec<QuestionContribution>,
}

/// The four axis scores, each in [-10, 10] with two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct AxisCoordinate {
    pub economic_axis: f64,
    pub social_axis: f64,
    pub authority_axis: f64,
    pub global_axis: f64,
}

impl AxisCoordinate {
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Economic => self.economic_axis,
            Axis::Social => self.social_axis,
            Axis::Authority => self.authority_axis,
            Axis::Global => self.global_axis,
        }
    }

    fn from_scores(scores: &[AxisScore]) -> Self {
        let mut coordinate = AxisCoordinate::default();
        for axis_score in scores {
            let slot = match axis_score.axis {
                Axis::Economic => &mut coordinate.economic_axis,
                Axis::Social => &mut coordinate.social_axis,
                Axis::Authority => &mut coordinate.authority_axis,
                Axis::Global => &mut coordinate.global_axis,
            };
            *slot = axis_score.score;
        }
        coordinate
    }

    /// `(axis, score)` pairs in `Axis::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        Axis::ALL.into_iter().map(move |axis| (axis, self.get(axis)))
    }

    /// Flat `economic_axis -> score` style map
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        self.iter()
            .map(|(axis, score)| (axis.output_key(), score))
            .collect()
    }
}

/// Coordinates together with the per-axis breakdowns that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateReport {
    pub coordinate: AxisCoordinate,
    pub axes: Vec<AxisScore>,
}

/// Score one axis. See [`score_axis`] for the breakdown.
pub fn compute_axis_score(
    axis: Axis,
    responses: &ScoredResponses,
    mapping: &AxisMapping,
    policy: &ScoringPolicy,
) -> f64 {
    score_axis(axis, responses, mapping, policy).score
}

/// Score one axis, keeping every answered question's contribution.
///
/// Unanswered questions are skipped outright: they add to neither the raw
/// sum nor the denominator. Answered questions always add to the
/// denominator, even when their answer is unrecognized or of the wrong kind.
pub fn score_axis(
    axis: Axis,
    responses: &ScoredResponses,
    mapping: &AxisMapping,
    policy: &ScoringPolicy,
) -> AxisScore {
    let mut raw_score = 0.0;
    let mut ceiling_total = 0.0;
    let mut positive_reach = 0.0;
    let mut negative_reach = 0.0;
    let mut contributions = Vec::new();

    for (question_id, entry) in mapping.entries_for_axis(axis) {
        let Some(response) = responses.get(question_id) else {
            tracing::trace!(question_id, axis = %axis, "no response, skipping");
            continue;
        };

        let clarity_weight = policy.clarity_weight(response.clarity());
        let (points, answer) = question_points(&entry.rule, response);
        let weighted = points * clarity_weight;
        raw_score += weighted;

        let max_points = match policy.denominator {
            DenominatorPolicy::Ceiling => {
                let ceiling = entry.ceiling();
                ceiling_total += ceiling;
                ceiling
            }
            DenominatorPolicy::Achievable => {
                let (highest, lowest) = entry.rule.achievable_extremes();
                positive_reach += highest;
                negative_reach += lowest;
                highest.max(lowest.abs())
            }
        };

        contributions.push(QuestionContribution {
            question_id: question_id.to_string(),
            answer,
            points,
            clarity_weight,
            weighted,
            max_points,
        });
    }

    let max_abs_score = match policy.denominator {
        DenominatorPolicy::Ceiling => ceiling_total,
        DenominatorPolicy::Achievable => positive_reach.max(negative_reach.abs()),
    };

    AxisScore {
        axis,
        score: normalize(raw_score, max_abs_score),
        raw_score,
        max_abs_score,
        contributions,
    }
}

/// Run the aggregator once per axis in `Axis::ALL` order.
///
/// An empty mapping yields all-zero coordinates.
pub fn compute_coordinates(
    responses: &ScoredResponses,
    mapping: &AxisMapping,
    policy: &ScoringPolicy,
) -> AxisCoordinate {
    compute_coordinate_report(responses, mapping, policy).coordinate
}

pub fn compute_coordinate_report(
    responses: &ScoredResponses,
    mapping: &AxisMapping,
    policy: &ScoringPolicy,
) -> CoordinateReport {
    if mapping.is_empty() {
        return CoordinateReport {
            coordinate: AxisCoordinate::default(),
            axes: Axis::ALL
                .into_iter()
                .map(|axis| AxisScore {
                    axis,
                    score: 0.0,
                    raw_score: 0.0,
                    max_abs_score: 0.0,
                    contributions: Vec::new(),
                })
                .collect(),
        };
    }

    let axes: Vec<AxisScore> = Axis::ALL
        .into_iter()
        .map(|axis| score_axis(axis, responses, mapping, policy))
        .collect();

    for axis_score in &axes {
        tracing::debug!(
            axis = %axis_score.axis,
            answered = axis_score.contributions.len(),
            raw = axis_score.raw_score,
            max = axis_score.max_abs_score,
            score = axis_score.score,
            "axis scored"
        );
    }

    CoordinateReport {
        coordinate: AxisCoordinate::from_scores(&axes),
        axes,
    }
}

/// Scale `raw / max_abs` to the axis range, clamp, and round to 2 decimals.
/// Exact ties round to even. A zero (or otherwise unusable) denominator
/// yields 0.0.
pub fn normalize(raw_score: f64, max_abs_score: f64) -> f64 {
    if max_abs_score.is_nan() || max_abs_score <= 0.0 {
        return 0.0;
    }
    let scaled = raw_score / max_abs_score * AXIS_SCALE;
    if scaled.is_nan() {
        return 0.0;
    }
    let rounded = (scaled.clamp(-AXIS_SCALE, AXIS_SCALE) * 100.0).round_ties_even() / 100.0;
    // Collapse -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn question_points(rule: &ScoringRule, response: &ScoredResponse) -> (f64, String) {
    match rule {
        ScoringRule::Choice(choices) => match response.selected_choice.as_deref() {
            Some(label) => (
                choices.get(label).copied().unwrap_or(0.0),
                format!("choice '{}'", label),
            ),
            None => (0.0, "no choice".to_string()),
        },
        ScoringRule::Stance(scale) => match response.stance_score {
            Some(level) => (
                scale.get(&level).copied().unwrap_or(0.0),
                format!("stance {:+}", level),
            ),
            None => (0.0, "no stance".to_string()),
        },
    }
}

/// Whether a response carries the field its entry's rule reads
pub fn response_matches_rule(entry: &AxisMappingEntry, response: &ScoredResponse) -> bool {
    match entry.rule {
        ScoringRule::Choice(_) => response.selected_choice.is_some(),
        ScoringRule::Stance(_) => response.stance_score.is_some(),
    }
}
