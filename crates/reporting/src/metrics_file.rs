//! Loading metric mappings and event batches from disk.
//!
//! Metric files are JSON or YAML (by extension) holding a flat mapping of
//! metric name to number. YAML support is behind the `yaml` feature.

use std::collections::BTreeMap;
use std::path::Path;

use campaign_core::types::MetricEvent;
use campaign_core::{CampaignError, CampaignResult};
use serde_json::{Map, Value};
use tracing::debug;

/// A validated metrics mapping. `raw` keeps the values exactly as provided
/// (integers stay integers) for persistence; `values` is the numeric view.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsInput {
    pub raw: Map<String, Value>,
    pub values: BTreeMap<String, f64>,
}

pub fn load_metrics_file(path: &Path) -> CampaignResult<MetricsInput> {
    let bytes = std::fs::read(path)?;
    let parsed = if is_yaml(path) {
        parse_yaml(&bytes).map_err(|e| prefix_path(path, e))?
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .map_err(|e| CampaignError::MalformedInput(format!("{}: {e}", path.display())))?
    };
    let input = metrics_from_value(parsed)?;
    debug!(path = %path.display(), metrics = input.values.len(), "Loaded metrics file");
    Ok(input)
}

/// Validate that `value` is a flat mapping of numbers.
pub fn metrics_from_value(value: Value) -> CampaignResult<MetricsInput> {
    let Value::Object(raw) = value else {
        return Err(CampaignError::MalformedInput(
            "top level must be a mapping of metric name to number".to_string(),
        ));
    };
    let mut values = BTreeMap::new();
    for (name, v) in &raw {
        let n = v.as_f64().ok_or_else(|| {
            CampaignError::MalformedInput(format!("metric `{name}` is not numeric: {v}"))
        })?;
        values.insert(name.clone(), n);
    }
    Ok(MetricsInput { raw, values })
}

/// Read a JSON array of raw events.
pub fn load_events_file(path: &Path) -> CampaignResult<Vec<MetricEvent>> {
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| CampaignError::MalformedInput(format!("{}: {e}", path.display())))
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn prefix_path(path: &Path, err: CampaignError) -> CampaignError {
    match err {
        CampaignError::MalformedInput(msg) => {
            CampaignError::MalformedInput(format!("{}: {msg}", path.display()))
        }
        other => other,
    }
}

#[cfg(feature = "yaml")]
fn parse_yaml(bytes: &[u8]) -> CampaignResult<Value> {
    serde_yaml::from_slice::<Value>(bytes).map_err(|e| CampaignError::MalformedInput(e.to_string()))
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(_bytes: &[u8]) -> CampaignResult<Value> {
    Err(CampaignError::MissingDependency(
        "YAML metrics input needs the `yaml` feature of campaign-reporting; \
         rebuild with `--features yaml` or convert the file to JSON"
            .to_string(),
    ))
}
