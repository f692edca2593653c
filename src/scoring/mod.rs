//! Inference, calibration and confidence estimation.

pub mod confidence;
mod engine;
pub mod scaling;

pub use confidence::{ConfidenceEstimate, ConfidenceFactor, ConfidenceFactorKind, ConfidenceLevel};
pub use engine::{
    self_test_input, validate, ComponentStatus, CreditScorer, HealthReport, LoadState,
    PredictionResult, ScalingAudit, ScoringResponse, SelfTest,
};
pub use scaling::rescale;
