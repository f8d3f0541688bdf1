use std::path::PathBuf;

use thiserror::Error;

pub type CampaignResult<T> = Result<T, CampaignError>;

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Invalid metric `{field}`: {reason}")]
    InvalidMetric { field: &'static str, reason: String },

    #[error("Malformed metrics input: {0}")]
    MalformedInput(String),

    #[error("Malformed results document at {}: {reason}", .path.display())]
    MalformedResultsDocument { path: PathBuf, reason: String },

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Version mismatch: package reports {package}, version file records {recorded}")]
    VersionMismatch { package: String, recorded: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CampaignError {
    pub fn invalid_metric(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidMetric {
            field,
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for CampaignError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
