pub mod error;
pub mod storage;
pub mod types;

pub use error::MappingError;
pub use storage::{
    build_axis_mapping, check_axis_mapping, default_mapping_path, load_axis_mapping, parse_mapping_records,
    read_mapping_records,
};
pub use types::{
    Axis, AxisMapping, AxisMappingEntry, MappingRecord, ScoringRule, ScoringType, MAX_STANCE,
    MIN_STANCE,
};
