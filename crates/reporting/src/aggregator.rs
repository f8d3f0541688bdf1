//! Running accumulation of raw performance events into one snapshot.
//!
//! Single writer: callers that ingest from several threads must serialize
//! `add` calls themselves.

use campaign_core::types::{MetricEvent, RawMetricsSnapshot};
use campaign_core::{CampaignError, CampaignResult};
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct MetricsAggregator {
    totals: RawMetricsSnapshot,
    events: u64,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate one event and add it to the running totals.
    ///
    /// Every argument is checked before any total changes, so a rejected
    /// call leaves the snapshot untouched.
    pub fn add(
        &mut self,
        impressions: i64,
        clicks: i64,
        cost: f64,
        conversions: i64,
        revenue: f64,
    ) -> CampaignResult<()> {
        let result = self.try_add(impressions, clicks, cost, conversions, revenue);
        if let Err(e) = &result {
            warn!(error = %e, "Rejected metric event");
        }
        result
    }

    fn try_add(
        &mut self,
        impressions: i64,
        clicks: i64,
        cost: f64,
        conversions: i64,
        revenue: f64,
    ) -> CampaignResult<()> {
        let impressions = checked_count("impressions", self.totals.impressions, impressions)?;
        let clicks = checked_count("clicks", self.totals.clicks, clicks)?;
        let conversions = checked_count("conversions", self.totals.conversions, conversions)?;
        let cost = checked_amount("cost", self.totals.cost, cost)?;
        let revenue = checked_amount("revenue", self.totals.revenue, revenue)?;

        self.totals = RawMetricsSnapshot {
            impressions,
            clicks,
            cost,
            conversions,
            revenue,
        };
        self.events += 1;
        debug!(events = self.events, "Metric event accumulated");
        Ok(())
    }

    pub fn record(&mut self, event: &MetricEvent) -> CampaignResult<()> {
        self.add(
            event.impressions,
            event.clicks,
            event.cost,
            event.conversions,
            event.revenue,
        )
    }

    /// Copy of the current totals. Does not reset state.
    pub fn collect(&self) -> RawMetricsSnapshot {
        self.totals
    }

    /// Number of accepted `add` calls.
    pub fn events(&self) -> u64 {
        self.events
    }
}

fn checked_count(field: &'static str, total: u64, value: i64) -> CampaignResult<u64> {
    let value = u64::try_from(value)
        .map_err(|_| CampaignError::invalid_metric(field, format!("must be non-negative, got {value}")))?;
    total
        .checked_add(value)
        .ok_or_else(|| CampaignError::invalid_metric(field, "running total would overflow"))
}

fn checked_amount(field: &'static str, total: f64, value: f64) -> CampaignResult<f64> {
    if !value.is_finite() {
        return Err(CampaignError::invalid_metric(
            field,
            format!("must be a finite number, got {value}"),
        ));
    }
    if value < 0.0 {
        return Err(CampaignError::invalid_metric(
            field,
            format!("must be non-negative, got {value}"),
        ));
    }
    let sum = total + value;
    if !sum.is_finite() {
        return Err(CampaignError::invalid_metric(field, "running total would overflow"));
    }
    Ok(sum)
}
