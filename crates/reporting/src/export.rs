//! Flat CSV export of a metrics snapshot.

use std::path::Path;

use campaign_core::types::{RawMetricsSnapshot, RAW_METRIC_KEYS};
use campaign_core::CampaignResult;
use tracing::info;

pub struct ReportExporter;

impl ReportExporter {
    /// Header row plus one data row with the snapshot totals.
    pub fn render_csv(snapshot: &RawMetricsSnapshot) -> String {
        let mut csv = RAW_METRIC_KEYS.join(",");
        csv.push('\n');
        let cells = [
            snapshot.impressions.to_string(),
            snapshot.clicks.to_string(),
            format_amount(snapshot.cost),
            snapshot.conversions.to_string(),
            format_amount(snapshot.revenue),
        ];
        csv.push_str(&cells.join(","));
        csv.push('\n');
        csv
    }

    /// Write the snapshot to `destination`, replacing any existing file.
    pub fn export(snapshot: &RawMetricsSnapshot, destination: &Path) -> CampaignResult<()> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(destination, Self::render_csv(snapshot))?;
        info!(path = %destination.display(), "Exported metrics snapshot");
        Ok(())
    }
}

// Debug formatting keeps the fractional part on whole amounts (80.0, not 80).
fn format_amount(v: f64) -> String {
    format!("{v:?}")
}
