//! Ghana employment analysis: job-title sector classification and the
//! composite employment score used as auxiliary model metadata.

mod classifier;
mod scorer;

pub use classifier::{categorize, normalize_title, JobCategory, KEYWORD_RULES};
pub use scorer::{
    category_stability, expected_monthly_income, length_score, risk_tier, EmploymentScore,
    EmploymentScorer, IncomeRange,
};

use crate::risk::RiskLevel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category label reported when the analysis could not run.
pub const NEUTRAL_CATEGORY: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmploymentError {
    #[error("annual income {0} is not a usable amount")]
    InvalidIncome(f64),
}

/// Outcome of the employment sub-analysis as carried on feature vectors and
/// prediction results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentAnalysis {
    pub job_category: String,
    /// Composite 0–120 score.
    pub employment_score: f64,
    /// Sector stability, 0–100.
    pub stability_score: f64,
    pub risk_tier: Option<RiskLevel>,
    pub breakdown: Option<EmploymentScore>,
}

impl EmploymentAnalysis {
    pub fn neutral() -> Self {
        Self {
            job_category: NEUTRAL_CATEGORY.to_string(),
            employment_score: 0.0,
            stability_score: 0.0,
            risk_tier: None,
            breakdown: None,
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.breakdown.is_none()
    }
}

impl From<EmploymentScore> for EmploymentAnalysis {
    fn from(score: EmploymentScore) -> Self {
        Self {
            job_category: score.job_category.as_str().to_string(),
            employment_score: score.total_score,
            stability_score: score.category_stability,
            risk_tier: Some(score.risk_tier),
            breakdown: Some(score),
        }
    }
}

/// Classify the title and score employment. Missing title or tenure fall back
/// to `Unknown` and the default length score.
pub fn analyze(
    job_title: Option<&str>,
    emp_length: Option<&str>,
    annual_income: Option<f64>,
) -> Result<EmploymentAnalysis, EmploymentError> {
    let category = categorize(job_title.unwrap_or_default());
    let score =
        EmploymentScorer::new().score(emp_length.unwrap_or_default(), category, annual_income)?;
    Ok(score.into())
}
