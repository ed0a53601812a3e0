use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::ScoringPolicy;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Axis mapping JSON; relative paths resolve against the working directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringPolicy>,
}

impl Config {
    /// Policy in effect: the configured one, or the default
    pub fn effective_policy(&self) -> ScoringPolicy {
        self.scoring.clone().unwrap_or_default()
    }
}
