use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::mapping::Axis;
use crate::scoring::{AxisCoordinate, AxisScore, AXIS_SCALE};

/// Bar width when stdout is not a terminal
const DEFAULT_BAR_WIDTH: usize = 21;
/// Upper bound so wide terminals don't get absurd bars
const MAX_BAR_WIDTH: usize = 41;
/// Axis name column (fits "Authority") + score column (fits "-10.00") + gaps
const LABEL_COLUMNS: usize = 10 + 7 + 4;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Bar width for the current terminal, always odd so zero has a center cell
fn bar_width() -> usize {
    let width = match get_terminal_width() {
        Some(w) if w > LABEL_COLUMNS + DEFAULT_BAR_WIDTH => (w - LABEL_COLUMNS).min(MAX_BAR_WIDTH),
        _ => DEFAULT_BAR_WIDTH,
    };
    if width % 2 == 0 {
        width - 1
    } else {
        width
    }
}

/// Format an axis score with sign and two decimals ("+3.25", "-10.00", "0.00")
pub fn format_score(score: f64) -> String {
    if score == 0.0 {
        "0.00".to_string()
    } else {
        format!("{:+.2}", score)
    }
}

/// Render a score as a position on a `[-10, 10]` bar: `-----|--o--`
pub fn axis_bar(score: f64, width: usize) -> String {
    let width = width.max(3);
    let center = width / 2;
    let fraction = (score.clamp(-AXIS_SCALE, AXIS_SCALE) + AXIS_SCALE) / (2.0 * AXIS_SCALE);
    let marker = (fraction * (width - 1) as f64).round() as usize;

    (0..width)
        .map(|i| {
            if i == marker {
                'o'
            } else if i == center {
                '|'
            } else {
                '-'
            }
        })
        .collect()
}

fn color_score(score: f64, text: &str, use_colors: bool) -> String {
    if !use_colors {
        text.to_string()
    } else if score < 0.0 {
        text.cyan().bold().to_string()
    } else if score > 0.0 {
        text.yellow().bold().to_string()
    } else {
        text.dimmed().to_string()
    }
}

/// Format coordinates as one line per axis: name, score, bar
pub fn format_coordinates(coordinate: &AxisCoordinate, use_colors: bool) -> String {
    let width = bar_width();

    coordinate
        .iter()
        .map(|(axis, score)| {
            let score_str = format!("{:>7}", format_score(score));
            let bar = axis_bar(score, width);
            if use_colors {
                format!(
                    "{:<10} {}  [{}]",
                    axis.name().bold(),
                    color_score(score, &score_str, true),
                    bar.dimmed()
                )
            } else {
                format!("{:<10} {}  [{}]", axis.name(), score_str, bar)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format coordinates as pretty JSON with `*_axis` keys
pub fn format_json(coordinate: &AxisCoordinate) -> Result<String> {
    serde_json::to_string_pretty(coordinate).context("Failed to serialize coordinates")
}

/// Format coordinates as tab-separated `key\tscore` lines for scripting
pub fn format_tsv(coordinate: &AxisCoordinate) -> String {
    coordinate
        .iter()
        .map(|(axis, score)| format!("{}\t{:.2}", axis.output_key(), score))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format one axis's per-question breakdown (for --breakdown / verbose)
pub fn format_breakdown(axis_score: &AxisScore, use_colors: bool) -> String {
    let header = format!(
        "{}: {} (raw {:.2} / max {:.2})",
        axis_score.axis.name(),
        format_score(axis_score.score),
        axis_score.raw_score,
        axis_score.max_abs_score
    );
    let header = if use_colors {
        header.bold().to_string()
    } else {
        header
    };

    if axis_score.contributions.is_empty() {
        return format!("{}\n  (no answered questions)", header);
    }

    let id_width = axis_score
        .contributions
        .iter()
        .map(|c| c.question_id.chars().count())
        .max()
        .unwrap_or(0);

    let lines = axis_score.contributions.iter().map(|c| {
        format!(
            "  {:<id_width$}  {:<14} {:>6} x{:<4} = {:>6.2}  (max {})",
            c.question_id,
            c.answer,
            c.points,
            c.clarity_weight,
            c.weighted,
            c.max_points,
            id_width = id_width
        )
    });

    std::iter::once(header)
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Count of mapped questions per axis, e.g. "Economic 3, Social 2, ..."
pub fn format_axis_counts(counts: &[(Axis, usize)]) -> String {
    counts
        .iter()
        .map(|(axis, n)| format!("{} {}", axis.name(), n))
        .collect::<Vec<_>>()
        .join(", ")
}
