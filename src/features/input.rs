//! Raw loan-application fields as supplied by the application-management system.

use serde::{Deserialize, Serialize};

/// Every field is optional; the preprocessor fills documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawApplicationInput {
    pub annual_inc: Option<f64>,
    pub dti: Option<f64>,
    pub int_rate: Option<f64>,
    pub revol_util: Option<f64>,
    pub delinq_2yrs: Option<f64>,
    pub inq_last_6mths: Option<f64>,
    pub emp_length: Option<String>,
    #[serde(alias = "emp_title", alias = "job_title_text")]
    pub job_title: Option<String>,
    pub open_acc: Option<f64>,
    pub collections_12_mths_ex_med: Option<f64>,
    pub loan_amnt: Option<f64>,
    pub credit_history_length: Option<f64>,
    pub max_bal_bc: Option<f64>,
    pub total_acc: Option<f64>,
    pub open_rv_12m: Option<f64>,
    pub pub_rec: Option<f64>,
    pub home_ownership: Option<String>,
}

impl RawApplicationInput {
    /// The four fields without which no prediction is attempted, in report order.
    pub fn critical_fields(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("annual_inc", self.annual_inc),
            ("dti", self.dti),
            ("int_rate", self.int_rate),
            ("revol_util", self.revol_util),
        ]
    }

    /// Critical fields that are absent or exactly zero.
    pub fn missing_critical_count(&self) -> usize {
        self.critical_fields()
            .iter()
            .filter(|(_, value)| value.map_or(true, |v| v == 0.0))
            .count()
    }
}
