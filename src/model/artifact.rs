//! Model artifact bundle: regressor, canonical metadata, encoder tables and the
//! fixed calibration constants.
//!
//! Two historical metadata layouts exist. The nested layout keeps metrics
//! under `performance` and feature importance as a list of records; the flat
//! layout keeps metrics at the top level and importance as a name → value map.
//! Both are normalized here, once, into [`ModelMetadata`].

use super::{LinearRegressor, OnnxRegressor, Regressor};
use crate::error::ArtifactLoadError;
use crate::features::{EncoderTables, FEATURE_NAMES, MODEL_FEATURE_COUNT};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Model files, first existing wins.
pub const MODEL_CANDIDATES: [&str; 5] = [
    "credit_model.onnx",
    "credit_score_model.onnx",
    "model.onnx",
    "credit_model.json",
    "linear_model.json",
];
pub const METADATA_CANDIDATES: [&str; 3] = [
    "model_metadata.json",
    "credit_model_metadata.json",
    "metadata.json",
];
pub const ENCODER_CANDIDATES: [&str; 2] = ["label_encoders.json", "encoders.json"];

/// Linear rescaling constants observed at calibration time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingConstants {
    pub raw_min: f64,
    pub raw_max: f64,
    pub scale_factor: f64,
}

pub const CALIBRATION: ScalingConstants = ScalingConstants {
    raw_min: 488.23,
    raw_max: 559.0,
    scale_factor: 7.77,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub test_r2: f64,
    pub test_rmse: f64,
    pub test_mae: f64,
    pub train_r2: f64,
}

impl Default for ModelMetrics {
    fn default() -> Self {
        Self {
            test_r2: 0.9839,
            test_rmse: 6.12,
            test_mae: 4.73,
            train_r2: 0.9851,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataFormat {
    Nested,
    Flat,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
    pub importance_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_version: String,
    pub metrics: ModelMetrics,
    pub feature_importance: Vec<FeatureImportance>,
    pub format: MetadataFormat,
}

impl Default for ModelMetadata {
    fn default() -> Self {
        Self {
            model_version: "1.0.0".to_string(),
            metrics: ModelMetrics::default(),
            feature_importance: Vec::new(),
            format: MetadataFormat::Absent,
        }
    }
}

impl ModelMetadata {
    pub fn from_value(value: &Value) -> Result<Self, ArtifactLoadError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ArtifactLoadError::new("metadata must be a JSON object"))?;

        let nested = obj.get("performance").and_then(Value::as_object);
        let format = if nested.is_some() {
            MetadataFormat::Nested
        } else {
            MetadataFormat::Flat
        };
        let metrics_src = nested.unwrap_or(obj);
        let metric = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| metrics_src.get(*k).and_then(Value::as_f64))
        };

        let defaults = ModelMetrics::default();
        let metrics = ModelMetrics {
            test_r2: metric(&["test_r2", "r2_score", "r2"]).unwrap_or(defaults.test_r2),
            test_rmse: metric(&["test_rmse", "rmse"]).unwrap_or(defaults.test_rmse),
            test_mae: metric(&["test_mae", "mae"]).unwrap_or(defaults.test_mae),
            train_r2: metric(&["train_r2"]).unwrap_or(defaults.train_r2),
        };

        check_feature_order(obj)?;

        let model_version = obj
            .get("model_version")
            .or_else(|| obj.get("version"))
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| ModelMetadata::default().model_version);

        Ok(Self {
            model_version,
            metrics,
            feature_importance: normalize_importance(raw_importance(obj.get("feature_importance"))),
            format,
        })
    }
}

/// A declared feature list must equal the training order exactly.
fn check_feature_order(obj: &Map<String, Value>) -> Result<(), ArtifactLoadError> {
    let Some(declared) = obj
        .get("feature_names")
        .or_else(|| obj.get("features"))
        .and_then(Value::as_array)
    else {
        return Ok(());
    };
    let declared: Vec<&str> = declared.iter().filter_map(Value::as_str).collect();
    if declared != FEATURE_NAMES {
        return Err(ArtifactLoadError::new(format!(
            "metadata feature order {:?} does not match model input order",
            declared
        )));
    }
    Ok(())
}

fn raw_importance(value: Option<&Value>) -> Vec<(String, f64)> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                let name = item.get("feature").or_else(|| item.get("name"))?.as_str()?;
                let score = item.get("importance").or_else(|| item.get("value"))?.as_f64()?;
                Some((name.to_string(), score))
            })
            .collect(),
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(name, score)| Some((name.clone(), score.as_f64()?)))
            .collect(),
        _ => Vec::new(),
    }
}

fn normalize_importance(raw: Vec<(String, f64)>) -> Vec<FeatureImportance> {
    let raw: Vec<(String, f64)> = raw.into_iter().filter(|(_, v)| v.is_finite()).collect();
    let total: f64 = raw.iter().map(|(_, v)| v).sum();
    let mut out: Vec<FeatureImportance> = raw
        .into_iter()
        .map(|(feature, importance)| {
            let percent = if total > 0.0 { importance / total * 100.0 } else { 0.0 };
            FeatureImportance {
                feature,
                importance,
                importance_percent: (percent * 100.0).round() / 100.0,
            }
        })
        .collect();
    out.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.feature.cmp(&b.feature))
    });
    out
}

/// Files resolved from the artifact directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub metadata: Option<PathBuf>,
    pub encoders: Option<PathBuf>,
}

fn first_existing(dir: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates.iter().map(|name| dir.join(name)).find(|p| p.is_file())
}

impl ArtifactPaths {
    pub fn discover(dir: &Path) -> Result<Self, ArtifactLoadError> {
        let model = first_existing(dir, &MODEL_CANDIDATES).ok_or_else(|| {
            ArtifactLoadError::new(format!(
                "no model file in {} (tried {})",
                dir.display(),
                MODEL_CANDIDATES.join(", ")
            ))
        })?;
        Ok(Self {
            model,
            metadata: first_existing(dir, &METADATA_CANDIDATES),
            encoders: first_existing(dir, &ENCODER_CANDIDATES),
        })
    }
}

/// Process-wide immutable model state.
pub struct ModelArtifact {
    pub regressor: Box<dyn Regressor>,
    pub metadata: ModelMetadata,
    pub encoders: EncoderTables,
    pub scaling: ScalingConstants,
    pub paths: Option<ArtifactPaths>,
}

impl ModelArtifact {
    /// Assemble from already-loaded parts; calibration constants are fixed.
    pub fn from_parts(
        regressor: Box<dyn Regressor>,
        metadata: ModelMetadata,
        encoders: EncoderTables,
    ) -> Self {
        Self {
            regressor,
            metadata,
            encoders,
            scaling: CALIBRATION,
            paths: None,
        }
    }

    pub fn load(dir: &Path) -> Result<Self, ArtifactLoadError> {
        let paths = ArtifactPaths::discover(dir)?;

        let is_onnx = paths.model.extension().and_then(|e| e.to_str()) == Some("onnx");
        let to_load_error = |e| model_error(&paths.model, e);
        let regressor: Box<dyn Regressor> = if is_onnx {
            Box::new(OnnxRegressor::load(&paths.model, MODEL_FEATURE_COUNT).map_err(to_load_error)?)
        } else {
            Box::new(
                LinearRegressor::load(&paths.model, MODEL_FEATURE_COUNT).map_err(to_load_error)?,
            )
        };

        let metadata = match &paths.metadata {
            Some(path) => {
                let value: Value = serde_json::from_str(&read(path)?)
                    .map_err(|e| ArtifactLoadError::new(format!("{}: {}", path.display(), e)))?;
                ModelMetadata::from_value(&value)?
            }
            None => {
                warn!(dir = %dir.display(), "no model metadata found; using default metrics");
                ModelMetadata::default()
            }
        };

        let encoders = match &paths.encoders {
            Some(path) => EncoderTables::from_json_str(&read(path)?)
                .map_err(|e| ArtifactLoadError::new(format!("{}: {}", path.display(), e)))?,
            None => EncoderTables::default(),
        };

        info!(
            model = %paths.model.display(),
            backend = regressor.backend(),
            version = %metadata.model_version,
            metadata_format = ?metadata.format,
            "model artifact loaded"
        );

        Ok(Self {
            regressor,
            metadata,
            encoders,
            scaling: CALIBRATION,
            paths: Some(paths),
        })
    }
}

fn read(path: &Path) -> Result<String, ArtifactLoadError> {
    std::fs::read_to_string(path)
        .map_err(|e| ArtifactLoadError::new(format!("{}: {}", path.display(), e)))
}

fn model_error(path: &Path, err: super::ModelError) -> ArtifactLoadError {
    ArtifactLoadError::new(format!("{}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn importance_percentages_sum_to_hundred() {
        let out = normalize_importance(vec![("a".into(), 1.0), ("b".into(), 3.0)]);
        assert_eq!(out[0].feature, "b");
        assert_eq!(out[0].importance_percent, 75.0);
        assert_eq!(out[1].importance_percent, 25.0);
    }

    #[test]
    fn zero_total_importance_has_zero_percent() {
        let out = normalize_importance(vec![("a".into(), 0.0)]);
        assert_eq!(out[0].importance_percent, 0.0);
    }

    #[test]
    fn non_object_metadata_is_rejected() {
        assert!(ModelMetadata::from_value(&json!([1, 2, 3])).is_err());
    }
}
