//! Shared metric types flowing between aggregation, derivation, and export.

use serde::{Deserialize, Serialize};

/// Raw metric keys in canonical column order.
pub const RAW_METRIC_KEYS: [&str; 5] = ["impressions", "clicks", "cost", "conversions", "revenue"];

/// Derived ratio keys as they appear in an evaluation input mapping.
pub const DERIVED_METRIC_KEYS: [&str; 4] = ["ctr", "cpc", "cpa", "roas"];

/// A single raw performance event as reported by an upstream producer.
///
/// Counts are signed so that bad upstream data survives deserialization and
/// can be rejected by the aggregator instead of failing at parse time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricEvent {
    pub impressions: i64,
    pub clicks: i64,
    pub cost: f64,
    pub conversions: i64,
    pub revenue: f64,
}

/// Point-in-time totals accumulated from raw events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetricsSnapshot {
    pub impressions: u64,
    pub clicks: u64,
    pub cost: f64,
    pub conversions: u64,
    pub revenue: f64,
}

/// Standard performance ratios. A ratio with a zero denominator is 0.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Click-through rate: clicks / impressions.
    pub ctr: f64,
    /// Cost per click: cost / clicks.
    pub cpc: f64,
    /// Cost per acquisition: cost / conversions.
    pub cpa: f64,
    /// Return on ad spend: revenue / cost.
    pub roas: f64,
}

impl DerivedMetrics {
    /// Pairs each ratio with its key, in `DERIVED_METRIC_KEYS` order.
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("ctr", self.ctr),
            ("cpc", self.cpc),
            ("cpa", self.cpa),
            ("roas", self.roas),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_missing_fields_default_to_zero() {
        let event: MetricEvent = serde_json::from_str(r#"{"clicks": 3, "cost": 1.5}"#).unwrap();
        assert_eq!(event.impressions, 0);
        assert_eq!(event.clicks, 3);
        assert_eq!(event.cost, 1.5);
        assert_eq!(event.revenue, 0.0);
    }

    #[test]
    fn test_event_keeps_negative_counts() {
        let event: MetricEvent = serde_json::from_str(r#"{"impressions": -4}"#).unwrap();
        assert_eq!(event.impressions, -4);
    }

    #[test]
    fn test_derived_entries_order() {
        let derived = DerivedMetrics {
            ctr: 0.1,
            cpc: 0.2,
            cpa: 0.3,
            roas: 0.4,
        };
        let keys: Vec<_> = derived.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, DERIVED_METRIC_KEYS);
    }
}
