//! Turn judged survey responses into four ideological axis coordinates.
//!
//! Each mapped question feeds one axis through a choice or stance rule. Per
//! axis, clarity-weighted points are summed, divided by the axis's maximum
//! absolute contribution, scaled to [-10, 10], clamped and rounded to two
//! decimals. The core ([`scoring`]) is pure; loading, collection and output
//! live around it.

pub mod config;
pub mod mapping;
pub mod output;
pub mod responses;
pub mod scoring;

pub use mapping::{Axis, AxisMapping, AxisMappingEntry, ScoringRule};
pub use responses::{ScoredResponse, ScoredResponses};
pub use scoring::{
    compute_axis_score, compute_coordinates, AxisCoordinate, ClarityPolicy, DenominatorPolicy,
    ScoringPolicy,
};
