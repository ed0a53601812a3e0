use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use ideology_axes::mapping::{Axis, AxisMapping};
use ideology_axes::responses::{ResponseCollector, ScoredResponses};
use ideology_axes::scoring::ScoringPolicy;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Tsv,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute axis coordinates from scored responses
    Score {
        /// Scored responses JSON (list, keyed object, or `collect` output)
        #[arg(short, long)]
        responses: PathBuf,

        /// Axis mapping JSON (overrides the config file)
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Show each axis's per-question contributions
        #[arg(short, long)]
        breakdown: bool,
    },
    /// Check the axis mapping and scoring policy, reporting every problem
    Validate {
        /// Axis mapping JSON (overrides the config file)
        #[arg(short, long)]
        mapping: Option<PathBuf>,
    },
    /// Record judgements for mapped questions and save them as JSON
    Collect {
        /// Where to write the collected responses
        #[arg(short, long)]
        output: PathBuf,

        /// Axis mapping JSON (overrides the config file)
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Only ask about questions on this axis
        #[arg(short, long, value_parser = parse_axis)]
        axis: Option<Axis>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "ideology-axes")]
#[command(about = "Score survey responses onto four ideological axes", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/ideology-axes/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn parse_axis(s: &str) -> Result<Axis, String> {
    Axis::parse(s).ok_or_else(|| {
        format!(
            "unknown axis '{}' (expected one of: {})",
            s,
            Axis::ALL.map(|a| a.name()).join(", ")
        )
    })
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_with_errors(heading: &str, errors: &[String]) -> ! {
    eprintln!("{}", heading);
    for error in errors {
        eprintln!("  - {}", error);
    }
    std::process::exit(EXIT_CONFIG);
}

/// Load the mapping for scoring. A missing file is not fatal: every axis
/// then scores 0.0.
fn load_mapping_for_scoring(path: &Path) -> AxisMapping {
    if !path.exists() {
        tracing::warn!(
            path = %path.display(),
            "axis mapping not found; all coordinates default to 0.0"
        );
        return AxisMapping::default();
    }
    match ideology_axes::mapping::load_axis_mapping(path) {
        Ok(m) => {
            if m.is_empty() {
                tracing::warn!(
                    path = %path.display(),
                    "axis mapping is empty; all coordinates default to 0.0"
                );
            }
            m
        }
        Err(e) => {
            eprintln!("Mapping error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}

/// Log responses that cannot contribute points as submitted
fn warn_on_unusable_responses(responses: &ScoredResponses, mapping: &AxisMapping) {
    for response in responses.iter() {
        match mapping.get(&response.question_id) {
            None => tracing::debug!(
                question_id = %response.question_id,
                "response has no mapping entry; ignored"
            ),
            Some(entry) if !ideology_axes::scoring::response_matches_rule(entry, response) => {
                tracing::warn!(
                    question_id = %response.question_id,
                    rule = ?entry.rule.scoring_type(),
                    "response does not answer its rule; it scores 0 but still counts toward the axis maximum"
                )
            }
            Some(_) => {}
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match ideology_axes::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring policy at startup
    let policy: ScoringPolicy = config.effective_policy();
    if let Err(errors) = ideology_axes::scoring::validate_policy(&policy) {
        exit_with_errors("Scoring config errors:", &errors);
    }
    tracing::debug!(?policy, "scoring policy");

    match cli.command {
        Commands::Score {
            responses,
            mapping,
            format,
            breakdown,
        } => {
            let mapping_path = ideology_axes::config::resolve_mapping_path(mapping, &config);
            let mapping = load_mapping_for_scoring(&mapping_path);

            let responses = match ideology_axes::responses::load_responses(&responses) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Responses error: {:#}", e);
                    std::process::exit(EXIT_DATA);
                }
            };
            warn_on_unusable_responses(&responses, &mapping);

            let report =
                ideology_axes::scoring::compute_coordinate_report(&responses, &mapping, &policy);
            let use_colors = ideology_axes::output::should_use_colors();

            match format {
                OutputFormat::Table => {
                    println!(
                        "{}",
                        ideology_axes::output::format_coordinates(&report.coordinate, use_colors)
                    );
                }
                OutputFormat::Json => match ideology_axes::output::format_json(&report.coordinate) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Output error: {:#}", e);
                        std::process::exit(EXIT_DATA);
                    }
                },
                OutputFormat::Tsv => {
                    println!("{}", ideology_axes::output::format_tsv(&report.coordinate));
                }
            }

            if breakdown {
                // Keep stdout machine-readable for json/tsv
                let table = matches!(format, OutputFormat::Table);
                for axis_score in &report.axes {
                    let text = ideology_axes::output::format_breakdown(axis_score, use_colors && table);
                    if table {
                        println!();
                        println!("{}", text);
                    } else {
                        eprintln!("{}", text);
                    }
                }
            }
        }
        Commands::Validate { mapping } => {
            let mapping_path = ideology_axes::config::resolve_mapping_path(mapping, &config);
            let records = match ideology_axes::mapping::read_mapping_records(&mapping_path) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Mapping error: {:#}", e);
                    std::process::exit(EXIT_DATA);
                }
            };
            match ideology_axes::mapping::check_axis_mapping(&records) {
                Ok(mapping) => {
                    println!(
                        "Mapping OK: {} questions ({})",
                        mapping.len(),
                        ideology_axes::output::format_axis_counts(&mapping.axis_counts())
                    );
                }
                Err(errors) => exit_with_errors("Mapping errors:", &errors),
            }
        }
        Commands::Collect {
            output,
            mapping,
            axis,
        } => {
            let mapping_path = ideology_axes::config::resolve_mapping_path(mapping, &config);
            let mapping = match ideology_axes::mapping::load_axis_mapping(&mapping_path) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Mapping error: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let stdin = std::io::stdin();
            let mut collector: Box<dyn ResponseCollector> =
                if ideology_axes::responses::stdin_is_interactive() {
                    Box::new(ideology_axes::responses::TerminalCollector::new(
                        stdin.lock(),
                        std::io::stdout(),
                    ))
                } else {
                    tracing::warn!("stdin is not a terminal; recording sentinel responses");
                    Box::new(ideology_axes::responses::SentinelCollector)
                };

            let collected =
                match ideology_axes::responses::collect_responses(collector.as_mut(), &mapping, axis) {
                    Ok(r) => r,
                    Err(e) => {
                        eprintln!("Collection error: {:#}", e);
                        std::process::exit(EXIT_DATA);
                    }
                };

            let count = collected.len();
            let file = ideology_axes::responses::CollectedResponses::new(collected);
            if let Err(e) = ideology_axes::responses::save_collected_responses(&output, &file) {
                eprintln!("Save error: {:#}", e);
                std::process::exit(EXIT_DATA);
            }
            println!("Saved {} responses to {}", count, output.display());
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
