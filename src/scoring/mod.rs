pub mod config;
pub mod engine;
pub mod validation;

pub use config::*;
pub use engine::{
    compute_axis_score, compute_coordinate_report, compute_coordinates, normalize,
    response_matches_rule, score_axis, AxisCoordinate, AxisScore, CoordinateReport,
    QuestionContribution, AXIS_SCALE,
};
pub use validation::{validate_mapping, validate_policy};
