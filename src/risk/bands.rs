//! Credit-score bands: closed, non-overlapping intervals covering 300..=850.

use super::RiskLevel;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_CREDIT_SCORE: u16 = 300;
pub const MAX_CREDIT_SCORE: u16 = 850;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CreditCategory {
    Poor,
    Fair,
    Good,
    #[serde(rename = "Very Good")]
    VeryGood,
    Exceptional,
}

impl CreditCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CreditCategory::Poor => "Poor",
            CreditCategory::Fair => "Fair",
            CreditCategory::Good => "Good",
            CreditCategory::VeryGood => "Very Good",
            CreditCategory::Exceptional => "Exceptional",
        }
    }
}

impl fmt::Display for CreditCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditBand {
    pub min: u16,
    pub max: u16,
    pub category: CreditCategory,
    pub risk_level: RiskLevel,
}

impl CreditBand {
    pub fn contains(&self, score: u16) -> bool {
        score >= self.min && score <= self.max
    }
}

pub const CREDIT_BANDS: [CreditBand; 5] = [
    CreditBand {
        min: 300,
        max: 579,
        category: CreditCategory::Poor,
        risk_level: RiskLevel::VeryHigh,
    },
    CreditBand {
        min: 580,
        max: 669,
        category: CreditCategory::Fair,
        risk_level: RiskLevel::High,
    },
    CreditBand {
        min: 670,
        max: 739,
        category: CreditCategory::Good,
        risk_level: RiskLevel::Medium,
    },
    CreditBand {
        min: 740,
        max: 799,
        category: CreditCategory::VeryGood,
        risk_level: RiskLevel::Low,
    },
    CreditBand {
        min: 800,
        max: 850,
        category: CreditCategory::Exceptional,
        risk_level: RiskLevel::VeryLow,
    },
];

/// Band lookup; `None` only for scores outside 300..=850.
pub fn categorize_score(score: u16) -> Option<&'static CreditBand> {
    CREDIT_BANDS.iter().find(|band| band.contains(score))
}
