//! Credit scorer: validate → preprocess → infer → rescale → band → confidence.
//!
//! The artifact is loaded on first use behind a `OnceLock`: concurrent first
//! callers block on a single load, and a failed load is cached and reported
//! to every later caller. After load all state is read-only.

use super::confidence::{self, ConfidenceFactor, ConfidenceInputs, ConfidenceLevel};
use super::scaling::{rescale, unclipped_score};
use crate::employment::EmploymentAnalysis;
use crate::error::{ArtifactLoadError, PredictionError, ScoringError, ValidationError};
use crate::features::{FeaturePreprocessor, FeatureVector, RawApplicationInput};
use crate::model::{FeatureImportance, ModelArtifact, ScalingConstants};
use crate::risk::{categorize_score, CreditCategory, RiskLevel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info};

const MAX_DTI: f64 = 100.0;
const MAX_REVOL_UTIL: f64 = 150.0;
const MAX_INT_RATE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    LoadFailed,
}

/// Scaling inputs kept on every result for audit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingAudit {
    pub raw_min: f64,
    pub raw_max: f64,
    pub scale_factor: f64,
    pub unclipped_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub credit_score: u16,
    pub category: CreditCategory,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub confidence_factors: [ConfidenceFactor; 5],
    pub raw_prediction: f64,
    pub model_version: String,
    pub ghana_employment: EmploymentAnalysis,
    pub scaling: ScalingAudit,
}

/// Outcome as data: what callers persist or relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<PredictionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub violations: Vec<String>,
}

impl ScoringResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(message.into()),
            violations: Vec::new(),
        }
    }
}

impl From<Result<PredictionResult, ScoringError>> for ScoringResponse {
    fn from(outcome: Result<PredictionResult, ScoringError>) -> Self {
        match outcome {
            Ok(result) => Self {
                success: true,
                result: Some(result),
                error: None,
                violations: Vec::new(),
            },
            Err(err) => Self {
                success: false,
                result: None,
                violations: err.violations().to_vec(),
                error: Some(err.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub model: bool,
    pub metadata: bool,
    pub encoders: bool,
    pub job_classifier: bool,
    pub employment_scorer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfTest {
    pub credit_score: u16,
    pub category: CreditCategory,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub model_loaded: bool,
    pub state: LoadState,
    pub model_version: Option<String>,
    pub backend: Option<String>,
    pub self_test: Option<SelfTest>,
    pub self_test_error: Option<String>,
    pub components: ComponentStatus,
}

struct LoadedScorer {
    artifact: ModelArtifact,
    preprocessor: FeaturePreprocessor,
}

impl LoadedScorer {
    fn new(artifact: ModelArtifact) -> Self {
        let preprocessor = FeaturePreprocessor::new(artifact.encoders.clone());
        Self {
            artifact,
            preprocessor,
        }
    }
}

pub struct CreditScorer {
    artifact_dir: PathBuf,
    loaded: OnceLock<Result<Arc<LoadedScorer>, ArtifactLoadError>>,
    loading: AtomicBool,
}

impl CreditScorer {
    /// Lazy scorer: the artifact is read from `artifact_dir` on first use.
    pub fn new(artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            artifact_dir: artifact_dir.into(),
            loaded: OnceLock::new(),
            loading: AtomicBool::new(false),
        }
    }

    /// Scorer around an artifact constructed at startup.
    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        Self {
            artifact_dir: PathBuf::new(),
            loaded: OnceLock::from(Ok(Arc::new(LoadedScorer::new(artifact)))),
            loading: AtomicBool::new(false),
        }
    }

    pub fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }

    pub fn state(&self) -> LoadState {
        match self.loaded.get() {
            Some(Ok(_)) => LoadState::Loaded,
            Some(Err(_)) => LoadState::LoadFailed,
            None if self.loading.load(Ordering::Acquire) => LoadState::Loading,
            None => LoadState::Unloaded,
        }
    }

    fn loaded(&self) -> Result<&Arc<LoadedScorer>, ArtifactLoadError> {
        self.loaded
            .get_or_init(|| {
                self.loading.store(true, Ordering::Release);
                info!(dir = %self.artifact_dir.display(), "loading model artifact");
                let outcome =
                    ModelArtifact::load(&self.artifact_dir).map(|a| Arc::new(LoadedScorer::new(a)));
                if let Err(err) = &outcome {
                    error!(
                        error = %err,
                        "model artifact load failed; scoring disabled until restart"
                    );
                }
                self.loading.store(false, Ordering::Release);
                outcome
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Force the one-time load; useful at startup to surface failures early.
    pub fn ensure_loaded(&self) -> Result<(), ArtifactLoadError> {
        self.loaded().map(|_| ())
    }

    /// Build features without scoring. Uses the artifact's encoder tables.
    pub fn build_features(
        &self,
        input: &RawApplicationInput,
    ) -> Result<FeatureVector, ArtifactLoadError> {
        Ok(self.loaded()?.preprocessor.build(input))
    }

    pub fn predict(&self, input: &RawApplicationInput) -> Result<PredictionResult, ScoringError> {
        let loaded = self.loaded()?;
        validate(input)?;

        let features = loaded.preprocessor.build(input);
        let artifact = &loaded.artifact;

        let raw_prediction = artifact
            .regressor
            .predict(features.model_input())
            .map_err(|e| PredictionError::new("model inference", e))?;
        if !raw_prediction.is_finite() {
            let message = format!("non-finite output {raw_prediction}");
            return Err(PredictionError::new("model inference", message).into());
        }

        let credit_score = rescale(raw_prediction, &artifact.scaling);
        let band = categorize_score(credit_score)
            .ok_or_else(|| {
                let message = format!("score {credit_score} outside 300..=850");
                PredictionError::new("score banding", message)
            })?;

        let employment = features.employment().clone();
        let estimate = confidence::estimate(&ConfidenceInputs {
            credit_score,
            raw_prediction,
            metrics: &artifact.metadata.metrics,
            missing_critical: input.missing_critical_count(),
            employment_score: employment.employment_score,
            stability_score: employment.stability_score,
        });

        debug!(
            raw_prediction,
            credit_score,
            category = %band.category,
            confidence = estimate.confidence,
            "prediction complete"
        );

        Ok(PredictionResult {
            credit_score,
            category: band.category,
            risk_level: band.risk_level,
            confidence: estimate.confidence,
            confidence_level: estimate.level,
            confidence_factors: estimate.factors,
            raw_prediction,
            model_version: artifact.metadata.model_version.clone(),
            ghana_employment: employment,
            scaling: audit(raw_prediction, &artifact.scaling),
        })
    }

    /// Normalized training-time feature importance; empty when the metadata
    /// carried none.
    pub fn feature_importance(&self) -> Result<Vec<FeatureImportance>, ArtifactLoadError> {
        Ok(self.loaded()?.artifact.metadata.feature_importance.clone())
    }

    pub fn health_check(&self) -> HealthReport {
        let loaded = match self.loaded() {
            Ok(loaded) => loaded,
            Err(err) => {
                return HealthReport {
                    model_loaded: false,
                    state: self.state(),
                    model_version: None,
                    backend: None,
                    self_test: None,
                    self_test_error: Some(err.to_string()),
                    components: ComponentStatus {
                        model: false,
                        metadata: false,
                        encoders: false,
                        job_classifier: true,
                        employment_scorer: true,
                    },
                }
            }
        };

        let artifact = &loaded.artifact;
        let (self_test, self_test_error) = match self.predict(&self_test_input()) {
            Ok(result) => (
                Some(SelfTest {
                    credit_score: result.credit_score,
                    category: result.category,
                    confidence: result.confidence,
                }),
                None,
            ),
            Err(err) => (None, Some(err.to_string())),
        };
        let paths = artifact.paths.as_ref();

        HealthReport {
            model_loaded: true,
            state: self.state(),
            model_version: Some(artifact.metadata.model_version.clone()),
            backend: Some(artifact.regressor.backend().to_string()),
            self_test,
            self_test_error,
            components: ComponentStatus {
                model: true,
                metadata: paths.map_or(true, |p| p.metadata.is_some()),
                encoders: paths.map_or(true, |p| p.encoders.is_some()),
                job_classifier: true,
                employment_scorer: true,
            },
        }
    }
}

fn audit(raw_prediction: f64, scaling: &ScalingConstants) -> ScalingAudit {
    ScalingAudit {
        raw_min: scaling.raw_min,
        raw_max: scaling.raw_max,
        scale_factor: scaling.scale_factor,
        unclipped_score: unclipped_score(raw_prediction, scaling),
    }
}

/// Required-field and range checks. All violations are reported together.
pub fn validate(input: &RawApplicationInput) -> Result<(), ValidationError> {
    let limits = [
        ("annual_inc", input.annual_inc, None),
        ("dti", input.dti, Some(MAX_DTI)),
        ("int_rate", input.int_rate, Some(MAX_INT_RATE)),
        ("revol_util", input.revol_util, Some(MAX_REVOL_UTIL)),
    ];

    let mut violations = Vec::new();
    for (field, value, max) in limits {
        match value {
            None => violations.push(format!("{field} is required")),
            Some(v) if !v.is_finite() => {
                violations.push(format!("{field} must be a finite number"))
            }
            Some(v) if v < 0.0 => violations.push(format!("{field} must be non-negative, got {v}")),
            Some(v) => {
                if let Some(max) = max.filter(|max| v > *max) {
                    violations.push(format!("{field} must be at most {max}, got {v}"));
                }
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

/// Synthetic applicant used by the health check.
pub fn self_test_input() -> RawApplicationInput {
    RawApplicationInput {
        annual_inc: Some(75_000.0),
        dti: Some(15.5),
        int_rate: Some(8.5),
        revol_util: Some(30.0),
        delinq_2yrs: Some(0.0),
        inq_last_6mths: Some(1.0),
        emp_length: Some("5 years".to_string()),
        job_title: Some("Teacher".to_string()),
        open_acc: Some(8.0),
        collections_12_mths_ex_med: Some(0.0),
        loan_amnt: Some(25_000.0),
        credit_history_length: Some(10.0),
        max_bal_bc: Some(5_000.0),
        total_acc: Some(15.0),
        open_rv_12m: Some(2.0),
        pub_rec: Some(0.0),
        home_ownership: Some("RENT".to_string()),
    }
}
