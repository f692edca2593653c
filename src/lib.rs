//! Credit-scoring inference service.
//!
//! Modular structure:
//! - [`employment`]: Ghana job-title classification and employment scoring
//! - [`features`]: Raw application → ordered model feature vector
//! - [`model`]: Regressor backends (ONNX, linear) and artifact loading
//! - [`scoring`]: Inference, 300–850 calibration, confidence estimation
//! - [`risk`]: Credit-score bands and risk labels
//! - [`storage`]: Encrypted assessment store
//! - [`orchestrator`]: Lease, retry, persist and notify around the scorer
//! - [`logging`]: Structured JSON logging

pub mod config;
pub mod employment;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;
pub mod notify;
pub mod orchestrator;
pub mod risk;
pub mod scoring;
pub mod storage;

pub use config::ServiceConfig;
pub use error::{ArtifactLoadError, PredictionError, ScoringError, ValidationError};
pub use features::{FeaturePreprocessor, FeatureVector, RawApplicationInput};
pub use logging::StructuredLogger;
pub use model::ModelArtifact;
pub use orchestrator::ScoringOrchestrator;
pub use scoring::{CreditScorer, PredictionResult, ScoringResponse};
pub use storage::AssessmentStore;
