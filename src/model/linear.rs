//! Linear regressor exported as JSON coefficients: `intercept + Σ wᵢ·xᵢ`.

use super::{ModelError, Regressor};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearRegressor {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }

    pub fn load(path: &Path, feature_dim: usize) -> Result<Self, ModelError> {
        let data = std::fs::read_to_string(path)?;
        let model: LinearRegressor = serde_json::from_str(&data)?;
        if model.coefficients.len() != feature_dim {
            return Err(ModelError::FeatureCount {
                expected: feature_dim,
                actual: model.coefficients.len(),
            });
        }
        Ok(model)
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.coefficients.len() {
            return Err(ModelError::FeatureCount {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }
        Ok(self
            .coefficients
            .iter()
            .zip(features)
            .fold(self.intercept, |acc, (w, x)| acc + w * x))
    }

    fn backend(&self) -> &'static str {
        "linear"
    }
}
