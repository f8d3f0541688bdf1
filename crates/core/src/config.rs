use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CampaignError, CampaignResult};

/// Root application configuration. Loaded from an optional
/// `campaign-eval.toml` and environment variables with the prefix
/// `CAMPAIGN_EVAL__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_results_path")]
    pub results_path: PathBuf,
    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,
    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,
    #[serde(default = "default_reviewer")]
    pub default_reviewer: String,
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
}

/// Reference target for a single metric in the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MetricTarget {
    pub weight: f64,
    pub target: f64,
    #[serde(default = "default_higher_is_better")]
    pub higher_is_better: bool,
}

impl MetricTarget {
    pub const fn new(weight: f64, target: f64, higher_is_better: bool) -> Self {
        Self {
            weight,
            target,
            higher_is_better,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluatorConfig {
    #[serde(default = "default_targets")]
    pub targets: BTreeMap<String, MetricTarget>,
}

impl EvaluatorConfig {
    pub fn validate(&self) -> CampaignResult<()> {
        let mut total_weight = 0.0;
        for (name, t) in &self.targets {
            if !t.weight.is_finite() || t.weight < 0.0 {
                return Err(CampaignError::Config(format!(
                    "weight for `{name}` must be a non-negative number, got {}",
                    t.weight
                )));
            }
            if !t.target.is_finite() || t.target <= 0.0 {
                return Err(CampaignError::Config(format!(
                    "target for `{name}` must be positive, got {}",
                    t.target
                )));
            }
            total_weight += t.weight;
        }
        if total_weight <= 0.0 {
            return Err(CampaignError::Config(
                "evaluator needs at least one metric with a positive weight".to_string(),
            ));
        }
        Ok(())
    }

    pub fn total_weight(&self) -> f64 {
        self.targets.values().map(|t| t.weight).sum()
    }
}

// Default functions
fn default_results_path() -> PathBuf {
    PathBuf::from("docs/meta/evaluation_results.json")
}
fn default_version_file() -> PathBuf {
    PathBuf::from("VERSION")
}
fn default_export_path() -> PathBuf {
    PathBuf::from("ads_metrics.csv")
}
fn default_reviewer() -> String {
    "Automated".to_string()
}
fn default_higher_is_better() -> bool {
    true
}
fn default_targets() -> BTreeMap<String, MetricTarget> {
    [
        ("ctr", MetricTarget::new(0.25, 0.05, true)),
        ("cpc", MetricTarget::new(0.15, 0.50, false)),
        ("cpa", MetricTarget::new(0.20, 5.0, false)),
        ("roas", MetricTarget::new(0.30, 4.0, true)),
        ("conversions", MetricTarget::new(0.10, 100.0, true)),
    ]
    .into_iter()
    .map(|(name, t)| (name.to_string(), t))
    .collect()
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            targets: default_targets(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            results_path: default_results_path(),
            version_file: default_version_file(),
            export_path: default_export_path(),
            default_reviewer: default_reviewer(),
            evaluator: EvaluatorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional config file and environment
    /// variables. Without an explicit path, `campaign-eval.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> CampaignResult<Self> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name("campaign-eval").required(false),
        };
        let builder = config::Config::builder().add_source(file).add_source(
            config::Environment::with_prefix("CAMPAIGN_EVAL")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.evaluator.validate()?;
        Ok(config)
    }
}
