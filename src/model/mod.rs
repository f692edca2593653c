//! Trained regression model backends and the on-disk artifact bundle.

mod artifact;
mod linear;
mod onnx;

pub use artifact::{
    ArtifactPaths, FeatureImportance, MetadataFormat, ModelArtifact, ModelMetadata, ModelMetrics,
    ScalingConstants, CALIBRATION, ENCODER_CANDIDATES, METADATA_CANDIDATES, MODEL_CANDIDATES,
};
pub use linear::LinearRegressor;
pub use onnx::OnnxRegressor;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("onnx runtime: {0}")]
    Onnx(#[from] ort::Error),
    #[error("input shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },
    #[error("model produced no output")]
    EmptyOutput,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("model definition: {0}")]
    Definition(#[from] serde_json::Error),
}

/// Single-row regression inference. Implementations hold no per-call state
/// and are shared read-only across threads.
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError>;

    /// Short backend label for health reports and logs.
    fn backend(&self) -> &'static str;
}
