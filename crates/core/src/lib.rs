//! Shared data model, error taxonomy, and configuration for campaign
//! performance evaluation.

pub mod config;
pub mod error;
pub mod types;
pub mod version;

pub use config::{AppConfig, EvaluatorConfig, MetricTarget};
pub use error::{CampaignError, CampaignResult};
pub use types::{DerivedMetrics, MetricEvent, RawMetricsSnapshot};
