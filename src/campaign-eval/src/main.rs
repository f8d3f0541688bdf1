//! Campaign Eval: batch scoring of advertising performance metrics.
//!
//! Entry point that loads configuration, checks the recorded version, and
//! runs one evaluation or export.

use std::path::{Path, PathBuf};

use anyhow::Context;
use campaign_core::config::AppConfig;
use campaign_core::version::{check_version, read_version_file};
use campaign_reporting::{
    derive, evaluation_inputs, load_events_file, load_metrics_file, Evaluator, MetricsAggregator,
    ReportExporter, ResultsStore,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "campaign-eval")]
#[command(about = "Aggregate ad performance metrics and record a composite evaluation score")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./campaign-eval.toml when present)
    #[arg(long, global = true, env = "CAMPAIGN_EVAL_CONFIG")]
    config: Option<PathBuf>,

    /// Human-readable logs instead of JSON
    #[arg(long, global = true, default_value_t = false)]
    plain_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a metrics file (JSON or YAML) and update the results document
    Evaluate {
        metrics_file: PathBuf,

        /// Results document (overrides config)
        #[arg(long)]
        results: Option<PathBuf>,

        /// Evaluation date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Aggregate a JSON array of raw events and write the CSV snapshot
    Export {
        events_file: PathBuf,

        /// CSV destination (overrides config)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Only verify the VERSION file against the package version
    CheckVersion,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.plain_logs);

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let version = verify_version(&config.version_file)?;

    match cli.command {
        Command::Evaluate {
            metrics_file,
            results,
            date,
        } => {
            let results_path = results.unwrap_or_else(|| config.results_path.clone());
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            run_evaluate(&config, &version, &metrics_file, &results_path, date)
        }
        Command::Export { events_file, out } => {
            let out = out.unwrap_or_else(|| config.export_path.clone());
            run_export(&events_file, &out)
        }
        Command::CheckVersion => {
            info!(version = %version, "Version file matches package");
            Ok(())
        }
    }
}

fn init_tracing(plain: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "campaign_eval=info,campaign_reporting=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if plain {
        builder.init();
    } else {
        builder.json().init();
    }
}

fn verify_version(version_file: &Path) -> anyhow::Result<String> {
    let recorded = read_version_file(version_file)
        .with_context(|| format!("Failed to read version file {}", version_file.display()))?;
    check_version(env!("CARGO_PKG_VERSION"), &recorded)?;
    Ok(recorded)
}

fn run_evaluate(
    config: &AppConfig,
    version: &str,
    metrics_file: &Path,
    results_path: &Path,
    date: NaiveDate,
) -> anyhow::Result<()> {
    let input = load_metrics_file(metrics_file)
        .with_context(|| format!("Failed to load metrics from {}", metrics_file.display()))?;

    let evaluator = Evaluator::new(config.evaluator.clone())?;
    let evaluation = evaluator.evaluate(&evaluation_inputs(&input.values));
    info!(
        score = evaluation.score,
        metrics_used = evaluation.inputs.len(),
        "Evaluation complete"
    );

    let store = ResultsStore::new(config.default_reviewer.clone());
    let document = store
        .load(results_path)
        .with_context(|| format!("Failed to read results document {}", results_path.display()))?;
    let document = store.merge(document, version, input.raw, evaluation.score, date);
    store
        .persist(&document, results_path)
        .with_context(|| format!("Failed to write {}", results_path.display()))?;

    println!("Wrote evaluation results to {}", results_path.display());
    Ok(())
}

fn run_export(events_file: &Path, out: &Path) -> anyhow::Result<()> {
    let events = load_events_file(events_file)
        .with_context(|| format!("Failed to load events from {}", events_file.display()))?;

    let mut aggregator = MetricsAggregator::new();
    for (i, event) in events.iter().enumerate() {
        aggregator
            .record(event)
            .with_context(|| format!("Event #{i} rejected"))?;
    }
    let snapshot = aggregator.collect();
    let derived = derive(&snapshot);
    info!(
        events = aggregator.events(),
        ctr = derived.ctr,
        cpc = derived.cpc,
        cpa = derived.cpa,
        roas = derived.roas,
        "Snapshot aggregated"
    );

    ReportExporter::export(&snapshot, out)?;
    println!("Metrics exported to {}", out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_evaluate_with_date() {
        let cli = Cli::try_parse_from([
            "campaign-eval",
            "evaluate",
            "metrics.json",
            "--date",
            "2026-01-31",
        ])
        .unwrap();
        match cli.command {
            Command::Evaluate {
                metrics_file, date, ..
            } => {
                assert_eq!(metrics_file, PathBuf::from("metrics.json"));
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 1, 31));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_export_with_global_flag() {
        let cli = Cli::try_parse_from([
            "campaign-eval",
            "export",
            "events.json",
            "--out",
            "out.csv",
            "--plain-logs",
        ])
        .unwrap();
        assert!(cli.plain_logs);
        assert!(matches!(cli.command, Command::Export { .. }));
    }

    #[test]
    fn test_bad_date_rejected() {
        assert!(
            Cli::try_parse_from(["campaign-eval", "evaluate", "m.json", "--date", "17/10/2026"])
                .is_err()
        );
    }

    #[test]
    fn test_verify_version_against_workspace_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../VERSION");
        assert_eq!(verify_version(&path).unwrap(), env!("CARGO_PKG_VERSION"));
    }
}
