//! Composite campaign score.
//!
//! Each configured metric is normalized against its reference target,
//! clamped to [0, 1], combined by weight, and scaled to [0, 100] with two
//! decimals. Metrics absent from the input contribute nothing; keys with
//! no configured target are ignored.

use std::collections::BTreeMap;

use campaign_core::config::{EvaluatorConfig, MetricTarget};
use campaign_core::CampaignResult;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationScore {
    /// Composite score in [0, 100], rounded to 2 decimals.
    pub score: f64,
    /// Configured metrics that were present in the input.
    pub inputs: BTreeMap<String, f64>,
    /// Points each metric added to `score`, before rounding.
    pub contributions: BTreeMap<String, f64>,
}

pub struct Evaluator {
    config: EvaluatorConfig,
    total_weight: f64,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> CampaignResult<Self> {
        config.validate()?;
        let total_weight = config.total_weight();
        Ok(Self {
            config,
            total_weight,
        })
    }

    pub fn targets(&self) -> &BTreeMap<String, MetricTarget> {
        &self.config.targets
    }

    pub fn evaluate(&self, metrics: &BTreeMap<String, f64>) -> EvaluationScore {
        let mut inputs = BTreeMap::new();
        let mut contributions = BTreeMap::new();
        let mut weighted = 0.0;

        for (name, target) in &self.config.targets {
            let Some(&value) = metrics.get(name) else {
                continue;
            };
            let share = target.weight * normalize(value, target) / self.total_weight;
            debug!(metric = %name, value, share, "Metric contribution");
            inputs.insert(name.clone(), value);
            contributions.insert(name.clone(), share * 100.0);
            weighted += share;
        }

        EvaluationScore {
            score: round2(weighted.clamp(0.0, 1.0) * 100.0),
            inputs,
            contributions,
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        let config = EvaluatorConfig::default();
        let total_weight = config.total_weight();
        Self {
            config,
            total_weight,
        }
    }
}

/// Ratio of `value` to its target in [0, 1]. For lower-is-better metrics a
/// non-positive value is the undefined-ratio sentinel and scores 0.
fn normalize(value: f64, target: &MetricTarget) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let ratio = if target.higher_is_better {
        value / target.target
    } else if value <= 0.0 {
        0.0
    } else {
        target.target / value
    };
    ratio.clamp(0.0, 1.0)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
