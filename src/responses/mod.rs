pub mod collect;
pub mod storage;
pub mod types;

pub use collect::{
    collect_responses, sentinel_response, stdin_is_interactive, ResponseCollector,
    SentinelCollector, TerminalCollector, SENTINEL_CHOICE, SENTINEL_CLARITY, SENTINEL_STANCE,
};
pub use storage::{load_responses, parse_responses, save_collected_responses};
pub use types::{
    CollectedResponses, ScoredResponse, ScoredResponses, DEFAULT_CLARITY, MAX_CLARITY,
    MIN_CLARITY, POSITION_CLARITY_RUBRIC,
};
