//! OKR CLI - key result progress, pace and objective roll-up.

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use okr_core::{KeyResultId, ObjectiveId, PaceStatus, ProgressResult, Time};
use okr_storage::{MemoryStorage, Snapshot, Storage};
use okr_progress::{
    BasicProgressTracker, ObjectiveProgress, PaceConfig, ProgressEngine, ProgressTracker,
};

#[derive(Parser)]
#[command(name = "okr")]
#[command(about = "OKR progress and pace", long_about = None)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Pace margin, as a fraction of the year
    #[arg(long, global = true)]
    pace_margin: Option<f64>,

    /// Maintain tolerance, as a fraction of the key result's scale
    #[arg(long, global = true)]
    maintain_tolerance: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show key result progress
    Kr {
        /// Snapshot file
        snapshot: PathBuf,
        /// Key result ID
        id: KeyResultId,
        /// Evaluation date (UTC), defaults to now
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Show objective roll-up
    Objective {
        /// Snapshot file
        snapshot: PathBuf,
        /// Objective ID
        id: ObjectiveId,
        /// Evaluation date (UTC), defaults to now
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Show every objective
    Status {
        /// Snapshot file
        snapshot: PathBuf,
        /// Evaluation date (UTC), defaults to now
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Only list key results with this pace
        #[arg(long)]
        pace: Option<PaceStatus>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // stdout carries results
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let overrides = (cli.pace_margin, cli.maintain_tolerance);

    match cli.command {
        Commands::Kr { snapshot, id, as_of, json } => {
            let tracker = open(&snapshot, overrides).await?;
            let as_of = resolve_as_of(as_of);
            let Some(key_result) = tracker.storage().load_key_result(id).await? else {
                anyhow::bail!("Key result not found: {id}");
            };
            let result = tracker.key_result_progress(id, as_of).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Key result: {} ({})", key_result.title, key_result.id);
                print_result(&result, "  ");
            }
        }
        Commands::Objective { snapshot, id, as_of, json } => {
            let tracker = open(&snapshot, overrides).await?;
            let progress = tracker.objective_progress(id, resolve_as_of(as_of)).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&objective_json(&progress))?);
            } else {
                print_objective(&progress);
                for (key_result, result) in &progress.key_results {
                    println!("  {} ({})", key_result.title, key_result.id);
                    print_result(result, "    ");
                }
            }
        }
        Commands::Status { snapshot, as_of, pace } => {
            let tracker = open(&snapshot, overrides).await?;
            let as_of = resolve_as_of(as_of);
            let snapshot = tracker.snapshot(as_of).await?;

            println!("OKR Status ({})", as_of.date_naive());
            for progress in &snapshot.objectives {
                print_objective(progress);
                for (key_result, result) in &progress.key_results {
                    if pace.is_some_and(|p| p != result.pace_status) {
                        continue;
                    }
                    println!(
                        "  {:<9} {:>5.1}% | {} ({})",
                        format_pace(result.pace_status),
                        result.progress,
                        key_result.title,
                        key_result.id,
                    );
                }
            }
        }
    }

    Ok(())
}

/// Load a snapshot into a tracker configured from its `config` section.
async fn open(
    path: &Path,
    overrides: (Option<f64>, Option<f64>),
) -> Result<BasicProgressTracker<MemoryStorage>> {
    let snapshot = Snapshot::load(path)
        .await
        .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
    let config = pace_config(&snapshot.config, overrides)?;
    let engine = ProgressEngine::new(config)?;
    debug!(?config, "Using pace configuration");

    let storage = MemoryStorage::from_snapshot(snapshot)?;
    Ok(BasicProgressTracker::new(storage).with_engine(engine))
}

/// Snapshot configuration with command-line overrides applied.
fn pace_config(
    section: &serde_json::Value,
    (pace_margin, maintain_tolerance): (Option<f64>, Option<f64>),
) -> Result<PaceConfig> {
    let mut config = if section.is_null() {
        PaceConfig::default()
    } else {
        serde_json::from_value(section.clone()).context("Invalid config section")?
    };
    if let Some(margin) = pace_margin {
        config = config.with_pace_margin(margin);
    }
    if let Some(tolerance) = maintain_tolerance {
        config = config.with_maintain_tolerance(tolerance);
    }
    Ok(config)
}

/// Start of the given UTC day, or now.
fn resolve_as_of(date: Option<NaiveDate>) -> Time {
    date.map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
        .unwrap_or_else(Utc::now)
}

fn objective_json(progress: &ObjectiveProgress) -> serde_json::Value {
    let key_results: Vec<_> = progress
        .key_results
        .iter()
        .map(|(key_result, result)| json!({ "key_result": key_result, "progress": result }))
        .collect();
    json!({
        "objective": progress.objective,
        "rollup": progress.rollup,
        "key_results": key_results,
    })
}

fn print_objective(progress: &ObjectiveProgress) {
    println!(
        "Objective: {} ({}) {:.1}% - {}/{} key results complete",
        progress.objective.title,
        progress.objective.id,
        progress.rollup.progress,
        progress.rollup.completed_count,
        progress.rollup.key_result_count,
    );
}

fn print_result(result: &ProgressResult, indent: &str) {
    println!("{indent}Progress: {:.1}%", result.progress);
    println!("{indent}Current value: {}", result.current_value);
    println!("{indent}Expected: {:.1}%", result.expected_progress * 100.0);
    println!("{indent}Pace: {}", format_pace(result.pace_status));
    println!(
        "{indent}Forecast: {:.2} ({:.1}%)",
        result.forecast, result.projected_progress
    );
    println!("{indent}Complete: {}", result.is_complete);
    println!(
        "{indent}Tasks: {} done, {} open, {} total",
        result.tasks.completed, result.tasks.open, result.tasks.total
    );
}

fn format_pace(status: PaceStatus) -> &'static str {
    match status {
        PaceStatus::Ahead => "AHEAD",
        PaceStatus::OnTrack => "ON TRACK",
        PaceStatus::AtRisk => "AT RISK",
        PaceStatus::Behind => "BEHIND",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use okr_progress::{DEFAULT_MAINTAIN_TOLERANCE, DEFAULT_PACE_MARGIN};

    #[test]
    fn test_parse_status_command() {
        let cli = Cli::try_parse_from([
            "okr", "-vv", "status", "okrs.json", "--as-of", "2025-07-01", "--pace", "at-risk",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Status { snapshot, as_of, pace } => {
                assert_eq!(snapshot, PathBuf::from("okrs.json"));
                assert_eq!(as_of, NaiveDate::from_ymd_opt(2025, 7, 1));
                assert_eq!(pace, Some(PaceStatus::AtRisk));
            }
            _ => panic!("expected status"),
        }
    }

    #[test]
    fn test_rejects_bad_id() {
        assert!(Cli::try_parse_from(["okr", "kr", "okrs.json", "not-an-id"]).is_err());
    }

    #[test]
    fn test_pace_config_from_section_and_flags() {
        let defaults = pace_config(&serde_json::Value::Null, (None, None)).unwrap();
        assert_eq!(defaults.pace_margin, DEFAULT_PACE_MARGIN);
        assert_eq!(defaults.maintain_tolerance, DEFAULT_MAINTAIN_TOLERANCE);

        let section = json!({ "pace_margin": 0.1 });
        let config = pace_config(&section, (None, Some(0.2))).unwrap();
        assert_eq!(config.pace_margin, 0.1);
        assert_eq!(config.maintain_tolerance, 0.2);

        let config = pace_config(&section, (Some(0.02), None)).unwrap();
        assert_eq!(config.pace_margin, 0.02);
    }

    #[test]
    fn test_as_of_is_start_of_utc_day() {
        let as_of = resolve_as_of(NaiveDate::from_ymd_opt(2025, 3, 15));
        assert_eq!(as_of.to_rfc3339(), "2025-03-15T00:00:00+00:00");
    }
}
