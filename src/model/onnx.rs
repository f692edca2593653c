//! ONNX Runtime regression inference. Input: [1, 16] f32, output: one score.

use super::{ModelError, Regressor};
use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

pub struct OnnxRegressor {
    session: Session,
    input_name: String,
    output_name: String,
    feature_dim: usize,
}

impl OnnxRegressor {
    pub fn load(path: &Path, feature_dim: usize) -> Result<Self, ModelError> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(1)?
            .commit_from_file(path)?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "variable".to_string());

        info!(
            path = %path.display(),
            input = %input_name,
            output = %output_name,
            "onnx model loaded"
        );

        Ok(Self {
            session,
            input_name,
            output_name,
            feature_dim,
        })
    }
}

impl Regressor for OnnxRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.feature_dim {
            return Err(ModelError::FeatureCount {
                expected: self.feature_dim,
                actual: features.len(),
            });
        }
        let row: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let arr = Array2::from_shape_vec((1, self.feature_dim), row)?;
        let input = ort::value::Tensor::from_array(arr)?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input]?)?;
        let view = outputs[self.output_name.as_str()].try_extract_tensor::<f32>()?;
        let score = view.iter().next().copied().ok_or(ModelError::EmptyOutput)?;
        Ok(f64::from(score))
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }
}
