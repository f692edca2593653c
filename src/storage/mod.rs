//! Encrypted local persistence for completed assessments and scoring leases.

mod encrypted;

pub use encrypted::AssessmentStore;

use crate::scoring::PredictionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("crypto: {0}")]
    Crypto(String),
    #[error("encoding: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("serialization: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt row: {0}")]
    Corrupt(String),
    #[error("store lock poisoned")]
    Poisoned,
}

/// One persisted assessment per application; re-scoring replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub application_id: String,
    pub assessment_id: String,
    pub scored_at: DateTime<Utc>,
    /// SHA-256 of the canonical input JSON
    pub input_hash: String,
    pub result: PredictionResult,
}
