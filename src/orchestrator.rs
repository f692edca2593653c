//! Scoring orchestrator: lease → predict → persist → audit → notify.
//!
//! The scoring core never retries. Retries with exponential backoff and the
//! per-application lease live here, around it.

use crate::config::OrchestratorConfig;
use crate::error::ScoringError;
use crate::features::RawApplicationInput;
use crate::logging::{AuditEvent, StructuredLogger};
use crate::notify::NotificationClient;
use crate::scoring::{CreditScorer, ScoringResponse};
use crate::storage::{AssessmentRecord, AssessmentStore, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("scoring already in progress for application {0}")]
    LeaseHeld(String),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error("persisting assessment: {0}")]
    Store(#[from] StoreError),
}

impl OrchestratorError {
    /// Validation and artifact-load failures will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OrchestratorError::Scoring(ScoringError::Prediction(_)) | OrchestratorError::Store(_)
        )
    }

    fn into_response(self) -> ScoringResponse {
        match self {
            OrchestratorError::Scoring(err) => ScoringResponse::from(Err(err)),
            other => ScoringResponse::failure(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay after the `attempt`-th failure (1-based): base · 2^(attempt−1).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

impl From<&OrchestratorConfig> for RetryPolicy {
    fn from(config: &OrchestratorConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxSummary {
    pub scanned: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// SHA-256 over the input's JSON form.
pub fn input_fingerprint(input: &RawApplicationInput) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(input)?;
    let mut h = Sha256::new();
    h.update(&bytes);
    Ok(format!("{:x}", h.finalize()))
}

pub struct ScoringOrchestrator {
    scorer: Arc<CreditScorer>,
    store: Arc<AssessmentStore>,
    notifier: Option<NotificationClient>,
    audit_log: Option<Mutex<File>>,
    config: OrchestratorConfig,
    holder: String,
}

impl ScoringOrchestrator {
    pub fn new(
        scorer: Arc<CreditScorer>,
        store: Arc<AssessmentStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            scorer,
            store,
            notifier: None,
            audit_log: None,
            config,
            holder: Uuid::new_v4().to_string(),
        }
    }

    pub fn with_notifier(mut self, notifier: Option<NotificationClient>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Append one NDJSON audit line per attempt to `path`.
    pub fn with_audit_log(mut self, path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        self.audit_log = Some(Mutex::new(file));
        Ok(self)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from(&self.config)
    }

    /// One scoring attempt under the application's lease.
    pub fn attempt(
        &self,
        application_id: &str,
        input: &RawApplicationInput,
    ) -> Result<AssessmentRecord, OrchestratorError> {
        let now = Utc::now();
        let lease_ms =
            i64::try_from(self.config.lease_minutes.saturating_mul(60_000)).unwrap_or(i64::MAX);
        if !self
            .store
            .try_acquire_lease(application_id, &self.holder, now.timestamp_millis(), lease_ms)?
        {
            return Err(OrchestratorError::LeaseHeld(application_id.to_string()));
        }

        let outcome = self.score_and_persist(application_id, input, now);
        if let Err(e) = self.store.release_lease(application_id, &self.holder) {
            warn!(application_id, error = %e, "failed to release scoring lease");
        }

        self.audit(application_id, &outcome);
        if let (Ok(record), Some(notifier)) = (&outcome, &self.notifier) {
            notifier.assessment_completed(record);
        }
        outcome
    }

    fn score_and_persist(
        &self,
        application_id: &str,
        input: &RawApplicationInput,
        scored_at: DateTime<Utc>,
    ) -> Result<AssessmentRecord, OrchestratorError> {
        let result = self.scorer.predict(input)?;
        let input_hash = input_fingerprint(input).map_err(StoreError::from)?;
        let record = AssessmentRecord {
            application_id: application_id.to_string(),
            assessment_id: Uuid::new_v4().to_string(),
            scored_at,
            input_hash,
            result,
        };
        self.store.upsert_assessment(&record)?;
        info!(
            application_id,
            credit_score = record.result.credit_score,
            category = %record.result.category,
            confidence = record.result.confidence,
            "assessment stored"
        );
        Ok(record)
    }

    fn audit(&self, application_id: &str, outcome: &Result<AssessmentRecord, OrchestratorError>) {
        let Some(log) = &self.audit_log else {
            return;
        };
        let error = outcome.as_ref().err().map(ToString::to_string);
        let record = outcome.as_ref().ok();
        let event = AuditEvent {
            ts: Utc::now().to_rfc3339(),
            application_id,
            success: record.is_some(),
            assessment_id: record.map(|r| r.assessment_id.as_str()),
            credit_score: record.map(|r| r.result.credit_score),
            category: record.map(|r| r.result.category.as_str()),
            confidence: record.map(|r| r.result.confidence),
            model_version: record.map(|r| r.result.model_version.as_str()),
            input_hash: record.map(|r| r.input_hash.as_str()),
            error: error.as_deref(),
        };
        let written = match log.lock() {
            Ok(mut file) => StructuredLogger::emit_json(&event, &mut *file),
            Err(_) => Err(std::io::Error::other("audit log lock poisoned")),
        };
        if let Err(e) = written {
            warn!(application_id, error = %e, "failed to write audit line");
        }
    }

    /// Single attempt, reported as data.
    pub fn score_application(
        &self,
        application_id: &str,
        input: &RawApplicationInput,
    ) -> ScoringResponse {
        match self.attempt(application_id, input) {
            Ok(record) => ScoringResponse::from(Ok(record.result)),
            Err(err) => err.into_response(),
        }
    }

    /// Retry transient failures with exponential backoff.
    pub fn run_with_retry(
        &self,
        application_id: &str,
        input: &RawApplicationInput,
    ) -> ScoringResponse {
        let policy = self.retry_policy();
        let mut attempt = 1;
        loop {
            match self.attempt(application_id, input) {
                Ok(record) => return ScoringResponse::from(Ok(record.result)),
                Err(err) if err.is_retryable() && attempt < policy.max_attempts => {
                    let delay = policy.delay_for(attempt);
                    warn!(
                        application_id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "scoring attempt failed; retrying"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => {
                    warn!(application_id, attempt, error = %err, "scoring failed");
                    return err.into_response();
                }
            }
        }
    }

    /// Score every `*.json` application record directly under `inbox`. Each
    /// file moves to `processed/` or `failed/` with a `.result.json` beside it.
    pub fn process_inbox(&self, inbox: &Path) -> std::io::Result<InboxSummary> {
        let processed_dir = inbox.join("processed");
        let failed_dir = inbox.join("failed");
        std::fs::create_dir_all(&processed_dir)?;
        std::fs::create_dir_all(&failed_dir)?;

        let files: Vec<PathBuf> = WalkDir::new(inbox)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().and_then(|x| x.to_str()) == Some("json"))
            .collect();

        let mut summary = InboxSummary::default();
        for path in files {
            summary.scanned += 1;
            let response = self.score_file(&path);
            let target_dir = if response.success {
                summary.succeeded += 1;
                &processed_dir
            } else {
                summary.failed += 1;
                &failed_dir
            };

            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("application");
            let report = serde_json::to_string_pretty(&response).map_err(std::io::Error::other)?;
            std::fs::write(target_dir.join(format!("{stem}.result.json")), report)?;
            if let Some(name) = path.file_name() {
                std::fs::rename(&path, target_dir.join(name))?;
            }
        }

        info!(
            scanned = summary.scanned,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "inbox pass complete"
        );
        Ok(summary)
    }

    fn score_file(&self, path: &Path) -> ScoringResponse {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|data| {
                serde_json::from_str::<serde_json::Value>(&data).map_err(|e| e.to_string())
            });
        let value = match parsed {
            Ok(v) => v,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable application record");
                return ScoringResponse::failure(format!("unreadable application record: {e}"));
            }
        };

        let application_id = value
            .get("application_id")
            .and_then(|v| {
                v.as_str()
                    .map(String::from)
                    .or_else(|| v.as_i64().map(|n| n.to_string()))
            })
            .or_else(|| path.file_stem().and_then(|s| s.to_str()).map(String::from))
            .unwrap_or_default();

        match serde_json::from_value::<RawApplicationInput>(value) {
            Ok(input) => self.run_with_retry(&application_id, &input),
            Err(e) => ScoringResponse::failure(format!("malformed application record: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PredictionError, ValidationError};

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
    }

    #[test]
    fn only_transient_failures_retry() {
        let validation = OrchestratorError::Scoring(ScoringError::Validation(ValidationError {
            violations: vec!["dti is required".into()],
        }));
        assert!(!validation.is_retryable());
        assert!(!OrchestratorError::LeaseHeld("a".into()).is_retryable());
        let prediction = OrchestratorError::Scoring(ScoringError::Prediction(
            PredictionError::new("model inference", "boom"),
        ));
        assert!(prediction.is_retryable());
    }
}
