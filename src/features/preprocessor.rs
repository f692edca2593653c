//! Raw application → ordered model features.
//!
//! Each column is derived independently. Missing or non-finite inputs take the
//! per-feature default, never zero unless zero is the documented default.

use super::{FeatureVector, RawApplicationInput, MODEL_FEATURE_COUNT};
use crate::employment::{self, EmploymentAnalysis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Values substituted for absent numeric inputs.
pub struct FeatureDefaults;

impl FeatureDefaults {
    pub const ANNUAL_INC: f64 = 50_000.0;
    pub const DTI: f64 = 20.0;
    pub const INT_RATE: f64 = 12.0;
    pub const REVOL_UTIL: f64 = 50.0;
    pub const DELINQ_2YRS: f64 = 0.0;
    pub const INQ_LAST_6MTHS: f64 = 1.0;
    pub const EMP_LENGTH: f64 = 5.0;
    pub const OPEN_ACC: f64 = 8.0;
    pub const COLLECTIONS: f64 = 0.0;
    pub const LOAN_AMNT: f64 = 10_000.0;
    pub const CREDIT_HISTORY_LENGTH: f64 = 10.0;
    pub const TOTAL_ACC: f64 = 15.0;
    pub const PUB_REC: f64 = 0.0;
    pub const HOME_OWNERSHIP: f64 = 2.0;
}

/// Categorical encodings. Built-ins can be extended by the artifact's
/// encoder file; file entries win on conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderTables {
    #[serde(default)]
    pub home_ownership: BTreeMap<String, f64>,
    #[serde(default)]
    pub emp_length: BTreeMap<String, f64>,
}

impl Default for EncoderTables {
    fn default() -> Self {
        let home_ownership = [
            ("OWN", 0.0),
            ("MORTGAGE", 1.0),
            ("RENT", 2.0),
            ("OTHER", 3.0),
            ("NONE", 3.0),
            ("ANY", 3.0),
        ]
        .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let mut emp_length: BTreeMap<String, f64> = [
            ("< 1 year", 0.0),
            ("<1 year", 0.0),
            ("less than 1 year", 0.0),
            ("1 year", 1.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        for years in 2..=9 {
            emp_length.insert(format!("{years} years"), years as f64);
        }
        emp_length.insert("10 years".to_string(), 10.0);
        emp_length.insert("10+ years".to_string(), 10.0);

        Self {
            home_ownership,
            emp_length,
        }
    }
}

fn home_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn emp_key(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

impl EncoderTables {
    /// Parse an encoder file and layer it over the built-in tables.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let overrides: EncoderTables = serde_json::from_str(json)?;
        Ok(Self::default().merged(overrides))
    }

    pub fn merged(mut self, overrides: EncoderTables) -> Self {
        for (k, v) in overrides.home_ownership {
            self.home_ownership.insert(home_key(&k), v);
        }
        for (k, v) in overrides.emp_length {
            self.emp_length.insert(emp_key(&k), v);
        }
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeaturePreprocessor {
    encoders: EncoderTables,
}

impl FeaturePreprocessor {
    pub fn new(encoders: EncoderTables) -> Self {
        Self { encoders }
    }

    pub fn encoders(&self) -> &EncoderTables {
        &self.encoders
    }

    /// Build the ordered feature vector. Never fails: every column defaults.
    pub fn build(&self, raw: &RawApplicationInput) -> FeatureVector {
        let values: [f64; MODEL_FEATURE_COUNT] = [
            or_default(raw.annual_inc, FeatureDefaults::ANNUAL_INC),
            or_default(raw.dti, FeatureDefaults::DTI),
            or_default(raw.int_rate, FeatureDefaults::INT_RATE),
            or_default(raw.revol_util, FeatureDefaults::REVOL_UTIL),
            or_default(raw.delinq_2yrs, FeatureDefaults::DELINQ_2YRS),
            or_default(raw.inq_last_6mths, FeatureDefaults::INQ_LAST_6MTHS),
            self.encode_emp_length(raw.emp_length.as_deref()),
            or_default(raw.open_acc, FeatureDefaults::OPEN_ACC),
            or_default(raw.collections_12_mths_ex_med, FeatureDefaults::COLLECTIONS),
            or_default(raw.loan_amnt, FeatureDefaults::LOAN_AMNT),
            or_default(raw.credit_history_length, FeatureDefaults::CREDIT_HISTORY_LENGTH),
            // max_bal_bc and open_rv_12m were ~100% missing at training time and
            // the model was fit with them pinned to zero. Input is ignored.
            0.0,
            or_default(raw.total_acc, FeatureDefaults::TOTAL_ACC),
            0.0,
            or_default(raw.pub_rec, FeatureDefaults::PUB_REC),
            self.encode_home_ownership(raw.home_ownership.as_deref()),
        ];

        FeatureVector::new(values, employment_features(raw))
    }

    pub fn encode_emp_length(&self, raw: Option<&str>) -> f64 {
        let Some(text) = raw.map(emp_key).filter(|s| !s.is_empty()) else {
            return FeatureDefaults::EMP_LENGTH;
        };
        if let Some(encoded) = self.encoders.emp_length.get(&text) {
            return *encoded;
        }
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        match digits.parse::<f64>() {
            Ok(years) => years.clamp(0.0, 10.0),
            Err(_) => FeatureDefaults::EMP_LENGTH,
        }
    }

    pub fn encode_home_ownership(&self, raw: Option<&str>) -> f64 {
        raw.and_then(|value| self.encoders.home_ownership.get(&home_key(value)))
            .copied()
            .unwrap_or(FeatureDefaults::HOME_OWNERSHIP)
    }
}

fn or_default(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(default)
}

/// Ghana employment metadata. Failure here must not fail the vector.
fn employment_features(raw: &RawApplicationInput) -> EmploymentAnalysis {
    match employment::analyze(raw.job_title.as_deref(), raw.emp_length.as_deref(), raw.annual_inc) {
        Ok(analysis) => analysis,
        Err(err) => {
            warn!(error = %err, "employment analysis failed; using neutral defaults");
            EmploymentAnalysis::neutral()
        }
    }
}
