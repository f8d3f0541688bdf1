//! Campaign performance reporting: event aggregation, derived ratios,
//! composite scoring, results persistence, and CSV export.

pub mod aggregator;
pub mod derived;
pub mod evaluator;
pub mod export;
pub mod metrics_file;
pub mod results_store;

pub use aggregator::MetricsAggregator;
pub use derived::{derive, evaluation_inputs};
pub use evaluator::{EvaluationScore, Evaluator};
pub use export::ReportExporter;
pub use metrics_file::{load_events_file, load_metrics_file, MetricsInput};
pub use results_store::{ResultsDocument, ResultsStore};
