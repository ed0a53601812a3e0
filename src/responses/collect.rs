use anyhow::{Context, Result};
use std::io::{BufRead, IsTerminal, Write};

use super::types::{ScoredResponse, MAX_CLARITY, MIN_CLARITY};
use crate::mapping::{Axis, AxisMapping, AxisMappingEntry, ScoringRule, MAX_STANCE, MIN_STANCE};

/// Clarity recorded when no judgement could be made. Clamps to 0 when scored.
pub const SENTINEL_CLARITY: i64 = -1;
/// Choice recorded when no judgement could be made. Never a mapped label.
pub const SENTINEL_CHOICE: &str = "N/A";
/// Stance recorded when no judgement could be made
pub const SENTINEL_STANCE: i64 = 0;

/// Source of judged answers for mapped questions.
pub trait ResponseCollector {
    fn collect(&mut self, question_id: &str, entry: &AxisMappingEntry) -> Result<ScoredResponse>;
}

/// Whether stdin can answer prompts
pub fn stdin_is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// Response made entirely of sentinel values for the entry's rule
pub fn sentinel_response(question_id: &str, entry: &AxisMappingEntry) -> ScoredResponse {
    match entry.rule {
        ScoringRule::Choice(_) => {
            ScoredResponse::choice(question_id, Some(SENTINEL_CLARITY), SENTINEL_CHOICE)
        }
        ScoringRule::Stance(_) => {
            ScoredResponse::stance(question_id, Some(SENTINEL_CLARITY), SENTINEL_STANCE)
        }
    }
}

/// Collector for non-interactive runs: every question gets sentinel values.
#[derive(Debug, Default)]
pub struct SentinelCollector;

impl ResponseCollector for SentinelCollector {
    fn collect(&mut self, question_id: &str, entry: &AxisMappingEntry) -> Result<ScoredResponse> {
        tracing::debug!(question_id, "no interactive input, recording sentinel response");
        Ok(sentinel_response(question_id, entry))
    }
}

/// Prompts a person for each judgement. Invalid input is re-asked; end of
/// input falls back to the sentinel for the field being asked.
pub struct TerminalCollector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalCollector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `message` and read one trimmed line. `None` means end of input.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush().context("Failed to flush prompt")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            Ok(None)
        } else {
            Ok(Some(line.trim().to_string()))
        }
    }

    fn prompt_in_range(&mut self, message: &str, min: i64, max: i64, fallback: i64) -> Result<i64> {
        loop {
            let Some(input) = self.prompt(message)? else {
                writeln!(self.output)?;
                writeln!(self.output, "  No input. Recording {}.", fallback)?;
                return Ok(fallback);
            };
            match input.parse::<i64>() {
                Ok(v) if (min..=max).contains(&v) => return Ok(v),
                _ => writeln!(
                    self.output,
                    "  Invalid: enter a whole number from {} to {}.",
                    min, max
                )?,
            }
        }
    }

    fn prompt_choice(&mut self, labels: &[&str]) -> Result<String> {
        let message = format!("Selected choice ({}): ", labels.join(", "));
        loop {
            let Some(input) = self.prompt(&message)? else {
                writeln!(self.output)?;
                writeln!(self.output, "  No input. Recording {}.", SENTINEL_CHOICE)?;
                return Ok(SENTINEL_CHOICE.to_string());
            };
            if input == SENTINEL_CHOICE {
                return Ok(input);
            }
            if labels.contains(&input.as_str()) {
                return Ok(input);
            }
            let lowered = input.to_lowercase();
            if labels.contains(&lowered.as_str()) {
                return Ok(lowered);
            }
            writeln!(
                self.output,
                "  Invalid choice. Enter one of {} or {}.",
                labels.join(", "),
                SENTINEL_CHOICE
            )?;
        }
    }
}

impl<R: BufRead, W: Write> ResponseCollector for TerminalCollector<R, W> {
    fn collect(&mut self, question_id: &str, entry: &AxisMappingEntry) -> Result<ScoredResponse> {
        writeln!(self.output)?;
        writeln!(self.output, "--- {} ({} axis) ---", question_id, entry.axis)?;
        if let Some(text) = &entry.question_text {
            writeln!(self.output, "{}", text)?;
        }

        let clarity = self.prompt_in_range(
            &format!("Position clarity ({}-{}): ", MIN_CLARITY, MAX_CLARITY),
            MIN_CLARITY,
            MAX_CLARITY,
            SENTINEL_CLARITY,
        )?;

        let response = match &entry.rule {
            ScoringRule::Choice(choices) => {
                let labels: Vec<&str> = choices.keys().map(String::as_str).collect();
                let label = self.prompt_choice(&labels)?;
                ScoredResponse::choice(question_id, Some(clarity), label)
            }
            ScoringRule::Stance(_) => {
                let stance = self.prompt_in_range(
                    &format!("Stance score ({} to {}): ", MIN_STANCE, MAX_STANCE),
                    MIN_STANCE,
                    MAX_STANCE,
                    SENTINEL_STANCE,
                )?;
                ScoredResponse::stance(question_id, Some(clarity), stance)
            }
        };
        Ok(response)
    }
}

/// Ask the collector about every mapped question (optionally one axis only),
/// in question_id order.
pub fn collect_responses<C: ResponseCollector + ?Sized>(
    collector: &mut C,
    mapping: &AxisMapping,
    axis: Option<Axis>,
) -> Result<Vec<ScoredResponse>> {
    mapping
        .iter()
        .filter(|(_, entry)| axis.map_or(true, |a| entry.axis == a))
        .map(|(question_id, entry)| collector.collect(question_id, entry))
        .collect()
}
