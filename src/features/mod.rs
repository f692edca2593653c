//! Model feature construction from raw application records.

mod input;
mod preprocessor;

pub use input::RawApplicationInput;
pub use preprocessor::{EncoderTables, FeaturePreprocessor, FeatureDefaults};

use crate::employment::EmploymentAnalysis;
use serde::{Deserialize, Serialize};

pub const MODEL_FEATURE_COUNT: usize = 16;

/// Training-time column order. Reordering silently corrupts predictions.
pub const FEATURE_NAMES: [&str; MODEL_FEATURE_COUNT] = [
    "annual_inc",
    "dti",
    "int_rate",
    "revol_util",
    "delinq_2yrs",
    "inq_last_6mths",
    "emp_length_encoded",
    "open_acc",
    "collections_12_mths_ex_med",
    "loan_amnt",
    "credit_history_length",
    "max_bal_bc",
    "total_acc",
    "open_rv_12m",
    "pub_rec",
    "home_ownership_encoded",
];

/// Metadata columns appended after the model slice; never fed to the model.
pub const AUXILIARY_FEATURE_NAMES: [&str; 2] =
    ["ghana_employment_score", "ghana_job_stability_score"];

/// Ordered model features plus the Ghana employment metadata columns.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; MODEL_FEATURE_COUNT],
    auxiliary: [f64; 2],
    employment: EmploymentAnalysis,
}

impl FeatureVector {
    pub(crate) fn new(values: [f64; MODEL_FEATURE_COUNT], employment: EmploymentAnalysis) -> Self {
        let auxiliary = [employment.employment_score, employment.stability_score];
        Self {
            values,
            auxiliary,
            employment,
        }
    }

    /// The exact 16-column slice the model consumes.
    pub fn model_input(&self) -> &[f64] {
        &self.values
    }

    pub fn auxiliary(&self) -> &[f64] {
        &self.auxiliary
    }

    pub fn employment(&self) -> &EmploymentAnalysis {
        &self.employment
    }

    /// Look up any model or auxiliary column by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// All 18 columns in output order.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES
            .iter()
            .copied()
            .zip(self.values.iter().copied())
            .chain(AUXILIARY_FEATURE_NAMES.iter().copied().zip(self.auxiliary.iter().copied()))
    }
}
