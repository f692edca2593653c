//! Composite employment score: length (0–40) + sector stability (0–60) +
//! income consistency (0–20), banded into a risk tier.

use super::classifier::JobCategory;
use super::EmploymentError;
use crate::risk::RiskLevel;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LENGTH_SCORE: f64 = 15.0;
pub const DEFAULT_INCOME_SCORE: f64 = 10.0;
const STABILITY_WEIGHT: f64 = 0.6;

/// Sector stability on a 0–100 scale.
pub fn category_stability(category: JobCategory) -> f64 {
    match category {
        JobCategory::GovernmentWorker => 85.0,
        JobCategory::BankingFinance => 80.0,
        JobCategory::Healthcare => 80.0,
        JobCategory::Legal => 75.0,
        JobCategory::Education => 75.0,
        JobCategory::InformationTechnology => 70.0,
        JobCategory::Telecommunications => 70.0,
        JobCategory::Engineering => 70.0,
        JobCategory::ManagementExecutive => 70.0,
        JobCategory::MiningOilGas => 65.0,
        JobCategory::ReligiousNgo => 55.0,
        JobCategory::SalesMarketing => 50.0,
        JobCategory::Manufacturing => 50.0,
        JobCategory::SecurityServices => 45.0,
        JobCategory::TradingCommerce => 45.0,
        JobCategory::TransportLogistics => 40.0,
        JobCategory::SkilledTrades => 40.0,
        JobCategory::Hospitality => 40.0,
        JobCategory::OtherServices => 40.0,
        JobCategory::Agriculture => 35.0,
        JobCategory::Construction => 35.0,
        JobCategory::CreativeMedia => 35.0,
        JobCategory::InformalSelfEmployed => 30.0,
        JobCategory::DomesticServices => 20.0,
        JobCategory::Unknown => 15.0,
    }
}

/// Expected monthly income range in GHS, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeRange {
    pub min: f64,
    pub max: f64,
}

pub fn expected_monthly_income(category: JobCategory) -> IncomeRange {
    let (min, max) = match category {
        JobCategory::GovernmentWorker => (2500.0, 8000.0),
        JobCategory::BankingFinance => (3000.0, 15000.0),
        JobCategory::Healthcare => (3000.0, 12000.0),
        JobCategory::Legal => (4000.0, 20000.0),
        JobCategory::Education => (2000.0, 6000.0),
        JobCategory::InformationTechnology => (3500.0, 15000.0),
        JobCategory::Telecommunications => (3000.0, 10000.0),
        JobCategory::MiningOilGas => (3500.0, 15000.0),
        JobCategory::Engineering => (3500.0, 12000.0),
        JobCategory::ManagementExecutive => (5000.0, 25000.0),
        JobCategory::SalesMarketing => (1500.0, 6000.0),
        JobCategory::SecurityServices => (1000.0, 3000.0),
        JobCategory::TransportLogistics => (1200.0, 4000.0),
        JobCategory::Agriculture => (800.0, 4000.0),
        JobCategory::Manufacturing => (1200.0, 4000.0),
        JobCategory::Construction => (1000.0, 4000.0),
        JobCategory::SkilledTrades => (1000.0, 4500.0),
        JobCategory::Hospitality => (1000.0, 3500.0),
        JobCategory::CreativeMedia => (1500.0, 8000.0),
        JobCategory::ReligiousNgo => (1500.0, 5000.0),
        JobCategory::DomesticServices => (600.0, 1500.0),
        JobCategory::TradingCommerce => (1000.0, 8000.0),
        JobCategory::InformalSelfEmployed => (600.0, 3000.0),
        JobCategory::OtherServices => (1000.0, 5000.0),
        JobCategory::Unknown => (1000.0, 5000.0),
    };
    IncomeRange { min, max }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentScore {
    pub job_category: JobCategory,
    pub employment_length_score: f64,
    pub job_stability_score: f64,
    pub income_consistency_score: f64,
    pub total_score: f64,
    /// Raw sector stability, 0–100.
    pub category_stability: f64,
    pub risk_tier: RiskLevel,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmploymentScorer;

impl EmploymentScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(
        &self,
        emp_length: &str,
        category: JobCategory,
        annual_income: Option<f64>,
    ) -> Result<EmploymentScore, EmploymentError> {
        let length = length_score(emp_length);
        let stability = category_stability(category);
        let stability_sub = stability * STABILITY_WEIGHT;
        let income = income_score(category, annual_income)?;
        let total = length + stability_sub + income;

        Ok(EmploymentScore {
            job_category: category,
            employment_length_score: length,
            job_stability_score: stability_sub,
            income_consistency_score: income,
            total_score: total,
            category_stability: stability,
            risk_tier: risk_tier(total),
        })
    }
}

/// Piecewise 0–40 mapping of free-text tenure. "< 1 year" style input scores
/// 5, "10+ years" scores 40, text without a digit token scores 15.
pub fn length_score(emp_length: &str) -> f64 {
    let text = emp_length.trim().to_lowercase();
    if text.contains('<') || text.contains("less than") {
        return 5.0;
    }
    let Some(years) = first_integer(&text) else {
        return DEFAULT_LENGTH_SCORE;
    };
    match years {
        10.. => 40.0,
        7..=9 => 35.0,
        5..=6 => 30.0,
        3..=4 => 25.0,
        2 => 20.0,
        1 => 10.0,
        0 => 5.0,
    }
}

fn first_integer(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    // Absurdly long digit runs saturate rather than fail.
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}

fn income_score(category: JobCategory, annual_income: Option<f64>) -> Result<f64, EmploymentError> {
    let Some(annual) = annual_income else {
        return Ok(DEFAULT_INCOME_SCORE);
    };
    if !annual.is_finite() || annual < 0.0 {
        return Err(EmploymentError::InvalidIncome(annual));
    }
    let monthly = annual / 12.0;
    let range = expected_monthly_income(category);
    let score = if monthly > range.max {
        18.0
    } else if monthly >= range.min {
        20.0
    } else if monthly >= range.min * 0.8 {
        15.0
    } else if monthly >= range.min * 0.6 {
        10.0
    } else {
        5.0
    };
    Ok(score)
}

pub fn risk_tier(total_score: f64) -> RiskLevel {
    if total_score >= 90.0 {
        RiskLevel::VeryLow
    } else if total_score >= 75.0 {
        RiskLevel::Low
    } else if total_score >= 60.0 {
        RiskLevel::Medium
    } else if total_score >= 45.0 {
        RiskLevel::High
    } else {
        RiskLevel::VeryHigh
    }
}
