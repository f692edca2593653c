#![allow(dead_code)]

use credit_scoring::features::{EncoderTables, RawApplicationInput, FEATURE_NAMES};
use credit_scoring::model::{LinearRegressor, ModelArtifact, ModelMetadata, ModelError, Regressor};
use credit_scoring::scoring::CreditScorer;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const INTERCEPT: f64 = 520.0;
pub const COEFFICIENTS: [f64; 16] = [
    0.0001,  // annual_inc
    -0.3,    // dti
    -0.8,    // int_rate
    -0.05,   // revol_util
    -4.0,    // delinq_2yrs
    -1.5,    // inq_last_6mths
    0.6,     // emp_length_encoded
    0.2,     // open_acc
    -3.0,    // collections_12_mths_ex_med
    -0.0001, // loan_amnt
    0.7,     // credit_history_length
    0.0,     // max_bal_bc
    0.1,     // total_acc
    0.0,     // open_rv_12m
    -5.0,    // pub_rec
    -0.5,    // home_ownership_encoded
];

/// Raw output of the fixture model for [`example_input`].
pub const EXAMPLE_RAW: f64 = 522.65;

pub fn nested_metadata() -> Value {
    json!({
        "model_version": "2.1.0",
        "performance": {
            "test_r2": 0.9839,
            "test_rmse": 6.12,
            "test_mae": 4.73,
            "train_r2": 0.9851
        },
        "feature_names": FEATURE_NAMES,
        "feature_importance": [
            {"feature": "int_rate", "importance": 0.4},
            {"feature": "annual_inc", "importance": 0.35},
            {"feature": "dti", "importance": 0.25}
        ]
    })
}

pub fn flat_metadata() -> Value {
    json!({
        "version": "1.4.0",
        "r2_score": 0.97,
        "rmse": 7.5,
        "mae": 5.2,
        "train_r2": 0.98,
        "feature_importance": {"dti": 2.0, "int_rate": 6.0, "annual_inc": 2.0}
    })
}

pub fn linear_model() -> LinearRegressor {
    LinearRegressor::new(INTERCEPT, COEFFICIENTS.to_vec())
}

/// Write a linear model and nested metadata into `dir`.
pub fn write_artifact(dir: &Path) {
    std::fs::write(
        dir.join("credit_model.json"),
        serde_json::to_string(&linear_model()).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join("model_metadata.json"),
        serde_json::to_string(&nested_metadata()).unwrap(),
    )
    .unwrap();
}

pub fn artifact_with(regressor: Box<dyn Regressor>) -> ModelArtifact {
    let metadata = ModelMetadata::from_value(&nested_metadata()).unwrap();
    ModelArtifact::from_parts(regressor, metadata, EncoderTables::default())
}

pub fn linear_scorer() -> CreditScorer {
    CreditScorer::from_artifact(artifact_with(Box::new(linear_model())))
}

/// The reference application from the scoring contract.
pub fn example_input() -> RawApplicationInput {
    RawApplicationInput {
        annual_inc: Some(75_000.0),
        dti: Some(15.5),
        int_rate: Some(8.5),
        revol_util: Some(30.0),
        delinq_2yrs: Some(0.0),
        inq_last_6mths: Some(1.0),
        emp_length: Some("5 years".to_string()),
        job_title: None,
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

/// Fails the first `failures` calls, then delegates to the fixture model.
pub struct FlakyRegressor {
    pub failures: usize,
    pub calls: AtomicUsize,
}

impl FlakyRegressor {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Regressor for FlakyRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(ModelError::EmptyOutput);
        }
        linear_model().predict(features)
    }

    fn backend(&self) -> &'static str {
        "flaky"
    }
}

/// Always returns NaN.
pub struct NanRegressor;

impl Regressor for NanRegressor {
    fn predict(&self, _features: &[f64]) -> Result<f64, ModelError> {
        Ok(f64::NAN)
    }

    fn backend(&self) -> &'static str {
        "nan"
    }
}
