//! Persisted, versioned evaluation results.
//!
//! The document is a flat JSON object. Merging a new evaluation is a shallow
//! field-by-field update: keys outside the evaluation (e.g. a reviewer set by
//! hand) survive every merge.

use std::path::{Path, PathBuf};

use campaign_core::{CampaignError, CampaignResult};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::info;

pub const VERSION_KEY: &str = "version";
pub const SCORES_KEY: &str = "scores";
pub const SCORE_KEY: &str = "score";
pub const DATE_KEY: &str = "date";
pub const REVIEWER_KEY: &str = "reviewer";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsDocument {
    fields: Map<String, Value>,
}

impl ResultsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn version(&self) -> Option<&str> {
        self.fields.get(VERSION_KEY).and_then(Value::as_str)
    }

    pub fn score(&self) -> Option<f64> {
        self.fields.get(SCORE_KEY).and_then(Value::as_f64)
    }

    pub fn scores(&self) -> Option<&Map<String, Value>> {
        self.fields.get(SCORES_KEY).and_then(Value::as_object)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.fields
            .get(DATE_KEY)
            .and_then(Value::as_str)
            .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
    }

    pub fn reviewer(&self) -> Option<&str> {
        self.fields.get(REVIEWER_KEY).and_then(Value::as_str)
    }

    pub fn to_pretty_json(&self) -> CampaignResult<String> {
        let mut text = serde_json::to_string_pretty(&self.fields)?;
        text.push('\n');
        Ok(text)
    }
}

/// Load/merge/persist cycle for the results document.
///
/// The sequence is not atomic across processes; two concurrent writers to
/// the same path race and the last one wins.
#[derive(Debug, Clone)]
pub struct ResultsStore {
    default_reviewer: String,
}

impl ResultsStore {
    pub fn new(default_reviewer: impl Into<String>) -> Self {
        Self {
            default_reviewer: default_reviewer.into(),
        }
    }

    /// Read the document at `path`. A missing file is a first run and yields
    /// an empty document; unreadable JSON is an error, never overwritten.
    pub fn load(&self, path: &Path) -> CampaignResult<ResultsDocument> {
        if !path.exists() {
            info!(path = %path.display(), "No results document yet, starting empty");
            return Ok(ResultsDocument::new());
        }
        let bytes = std::fs::read(path)?;
        let value: Value =
            serde_json::from_slice(&bytes).map_err(|e| malformed(path, e.to_string()))?;
        match value {
            Value::Object(fields) => {
                info!(path = %path.display(), fields = fields.len(), "Loaded results document");
                Ok(ResultsDocument::from_map(fields))
            }
            other => Err(malformed(
                path,
                format!("expected a JSON object at top level, found {}", json_kind(&other)),
            )),
        }
    }

    /// Overwrite the four evaluation fields and set the reviewer only when
    /// absent.
    pub fn merge(
        &self,
        mut document: ResultsDocument,
        version: &str,
        scores: Map<String, Value>,
        score: f64,
        date: NaiveDate,
    ) -> ResultsDocument {
        document.set(VERSION_KEY, Value::String(version.to_string()));
        document.set(SCORES_KEY, Value::Object(scores));
        document.set(SCORE_KEY, Value::from(score));
        document.set(DATE_KEY, Value::String(date.format(DATE_FORMAT).to_string()));
        document
            .fields
            .entry(REVIEWER_KEY)
            .or_insert_with(|| Value::String(self.default_reviewer.clone()));
        document
    }

    pub fn persist(&self, document: &ResultsDocument, path: &Path) -> CampaignResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, document.to_pretty_json()?)?;
        info!(path = %path.display(), "Wrote evaluation results");
        Ok(())
    }
}

impl Default for ResultsStore {
    fn default() -> Self {
        Self::new("Automated")
    }
}

fn malformed(path: &Path, reason: String) -> CampaignError {
    CampaignError::MalformedResultsDocument {
        path: PathBuf::from(path),
        reason,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn scores() -> Map<String, Value> {
        match json!({"impressions": 1200, "cost": 80.0}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_load_missing_path_is_empty() {
        let dir = TempDir::new().unwrap();
        let doc = ResultsStore::default()
            .load(&dir.path().join("missing.json"))
            .unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_merge_sets_fields_and_default_reviewer() {
        let store = ResultsStore::default();
        let doc = store.merge(ResultsDocument::new(), "0.1.0", scores(), 57.5, date());
        assert_eq!(doc.version(), Some("0.1.0"));
        assert_eq!(doc.score(), Some(57.5));
        assert_eq!(doc.date(), Some(date()));
        assert_eq!(doc.reviewer(), Some("Automated"));
        assert_eq!(doc.scores().unwrap().len(), 2);
        assert_eq!(doc.fields().len(), 5);
    }

    #[test]
    fn test_merge_preserves_existing_reviewer_and_extra_fields() {
        let store = ResultsStore::new("Bot");
        let mut prior = ResultsDocument::new();
        prior.set(REVIEWER_KEY, json!("Alice"));
        prior.set("notes", json!("checked by hand"));
        prior.set(SCORE_KEY, json!(12.0));

        let doc = store.merge(prior, "0.1.0", scores(), 80.0, date());
        assert_eq!(doc.reviewer(), Some("Alice"));
        assert_eq!(doc.get("notes"), Some(&json!("checked by hand")));
        assert_eq!(doc.score(), Some(80.0));
    }

    #[test]
    fn test_merge_replaces_scores_wholesale() {
        let store = ResultsStore::default();
        let mut prior = ResultsDocument::new();
        prior.set(SCORES_KEY, json!({"roas": 2.0}));
        let doc = store.merge(prior, "0.1.0", scores(), 1.0, date());
        assert!(doc.scores().unwrap().get("roas").is_none());
    }

    #[test]
    fn test_persist_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docs/meta/evaluation_results.json");
        let store = ResultsStore::default();
        let doc = store.merge(ResultsDocument::new(), "0.1.0", scores(), 57.5, date());
        store.persist(&doc, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\n  \"date\": \"2026-10-17\""));
        let date_at = text.find("\"date\"").unwrap();
        let version_at = text.find("\"version\"").unwrap();
        assert!(date_at < version_at);

        let reloaded = store.load(&path).unwrap();
        assert_eq!(reloaded, doc);
    }

    #[test]
    fn test_malformed_document_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = ResultsStore::default().load(&path).unwrap_err();
        assert!(matches!(err, CampaignError::MalformedResultsDocument { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[test]
    fn test_invalid_utf8_document_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, [0xff, 0xfe, 0x7b, 0x7d]).unwrap();
        let err = ResultsStore::default().load(&path).unwrap_err();
        assert!(matches!(err, CampaignError::MalformedResultsDocument { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xff, 0xfe, 0x7b, 0x7d]);
    }

    #[test]
    fn test_directory_path_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = ResultsStore::default().load(dir.path()).unwrap_err();
        assert!(matches!(err, CampaignError::Io(_)));
    }

    #[test]
    fn test_non_object_document_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        let err = ResultsStore::default().load(&path).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }
}
