//! Error taxonomy for the scoring core.
//!
//! Everything except [`ArtifactLoadError`] is recoverable per request. An
//! artifact load failure is cached by the scorer and reported to every caller
//! for the rest of the process lifetime.

use thiserror::Error;

/// The model, metadata or encoder tables could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("model artifact unavailable: {message}")]
pub struct ArtifactLoadError {
    pub message: String,
}

impl ArtifactLoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Required-field or range checks failed; no inference was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid application input: {}", violations.join("; "))]
pub struct ValidationError {
    pub violations: Vec<String>,
}

/// Unexpected failure inside preprocessing or inference after validation passed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("prediction failed during {context}: {message}")]
pub struct PredictionError {
    pub context: String,
    pub message: String,
}

impl PredictionError {
    pub fn new(context: impl Into<String>, message: impl ToString) -> Self {
        Self {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error(transparent)]
    ArtifactLoad(#[from] ArtifactLoadError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

impl ScoringError {
    /// Field-level messages for validation failures; empty otherwise.
    pub fn violations(&self) -> &[String] {
        match self {
            ScoringError::Validation(err) => &err.violations,
            _ => &[],
        }
    }
}
