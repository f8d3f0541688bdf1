//! Standard performance ratios derived from a raw snapshot.
//!
//! A ratio whose denominator is exactly zero reports 0.0 so that a
//! zero-traffic period still produces a well-formed report.

use std::collections::BTreeMap;

use campaign_core::types::{DerivedMetrics, RawMetricsSnapshot, RAW_METRIC_KEYS};

pub fn derive(snapshot: &RawMetricsSnapshot) -> DerivedMetrics {
    DerivedMetrics {
        ctr: ratio(snapshot.clicks as f64, snapshot.impressions as f64),
        cpc: ratio(snapshot.cost, snapshot.clicks as f64),
        cpa: ratio(snapshot.cost, snapshot.conversions as f64),
        roas: ratio(snapshot.revenue, snapshot.cost),
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Rebuild a snapshot from a flat metric mapping. Returns `None` when the
/// mapping carries none of the raw keys.
pub fn snapshot_from_metrics(metrics: &BTreeMap<String, f64>) -> Option<RawMetricsSnapshot> {
    if !RAW_METRIC_KEYS.iter().any(|k| metrics.contains_key(*k)) {
        return None;
    }
    let amount = |key: &str| {
        metrics
            .get(key)
            .copied()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
            .max(0.0)
    };
    let count = |key: &str| amount(key).round() as u64;

    Some(RawMetricsSnapshot {
        impressions: count("impressions"),
        clicks: count("clicks"),
        cost: amount("cost"),
        conversions: count("conversions"),
        revenue: amount("revenue"),
    })
}

/// Evaluation input: the caller's mapping plus any derived ratio it did
/// not already supply. Caller-provided keys always win.
pub fn evaluation_inputs(metrics: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let mut inputs = metrics.clone();
    if let Some(snapshot) = snapshot_from_metrics(metrics) {
        for (key, value) in derive(&snapshot).entries() {
            inputs.entry(key.to_string()).or_insert(value);
        }
    }
    inputs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawMetricsSnapshot {
        RawMetricsSnapshot {
            impressions: 1200,
            clicks: 160,
            cost: 80.0,
            conversions: 20,
            revenue: 320.0,
        }
    }

    #[test]
    fn test_ratios() {
        let d = derive(&sample());
        assert!((d.ctr - 160.0 / 1200.0).abs() < 1e-12);
        assert!((d.ctr - 0.1333).abs() < 1e-4);
        assert_eq!(d.cpc, 0.5);
        assert_eq!(d.cpa, 4.0);
        assert_eq!(d.roas, 4.0);
    }

    #[test]
    fn test_zero_snapshot_is_all_zero() {
        assert_eq!(derive(&RawMetricsSnapshot::default()), DerivedMetrics::default());
    }

    #[test]
    fn test_each_zero_denominator_independently() {
        let mut s = sample();
        s.impressions = 0;
        assert_eq!(derive(&s).ctr, 0.0);

        let mut s = sample();
        s.clicks = 0;
        let d = derive(&s);
        assert_eq!(d.cpc, 0.0);
        assert_eq!(d.ctr, 0.0);

        let mut s = sample();
        s.conversions = 0;
        assert_eq!(derive(&s).cpa, 0.0);

        let mut s = sample();
        s.cost = 0.0;
        let d = derive(&s);
        assert_eq!(d.roas, 0.0);
        assert_eq!(d.cpc, 0.0);
        assert_eq!(d.cpa, 0.0);
    }

    #[test]
    fn test_snapshot_from_metrics_requires_raw_key() {
        let mut m = BTreeMap::new();
        m.insert("roas".to_string(), 3.0);
        assert!(snapshot_from_metrics(&m).is_none());

        m.insert("clicks".to_string(), 12.4);
        m.insert("cost".to_string(), -5.0);
        let s = snapshot_from_metrics(&m).unwrap();
        assert_eq!(s.clicks, 12);
        assert_eq!(s.cost, 0.0);
        assert_eq!(s.impressions, 0);
    }

    #[test]
    fn test_evaluation_inputs_keeps_caller_values() {
        let mut m = BTreeMap::new();
        m.insert("impressions".to_string(), 1000.0);
        m.insert("clicks".to_string(), 50.0);
        m.insert("ctr".to_string(), 0.9);
        let inputs = evaluation_inputs(&m);
        assert_eq!(inputs["ctr"], 0.9);
        assert_eq!(inputs["cpc"], 0.0);
        assert_eq!(inputs["impressions"], 1000.0);
        assert_eq!(inputs.len(), 6);
    }

    #[test]
    fn test_evaluation_inputs_without_raw_keys_is_unchanged() {
        let mut m = BTreeMap::new();
        m.insert("roas".to_string(), 2.0);
        assert_eq!(evaluation_inputs(&m), m);
    }
}
