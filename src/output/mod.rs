pub mod formatter;

pub use formatter::{
    axis_bar, format_axis_counts, format_breakdown, format_coordinates, format_json,
    format_score, format_tsv, should_use_colors,
};
