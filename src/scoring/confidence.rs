//! Multi-factor confidence estimate.
//!
//! Five factors, each scored 0–100, are combined as a plain weighted sum. The
//! weights total 1.10: the employment factor was added without rebalancing
//! the other four, and the result is clamped to 99.9 rather than normalized.

use crate::model::ModelMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_CONFIDENCE: f64 = 99.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceFactorKind {
    ModelPerformance,
    ScoreRange,
    PredictionStability,
    FeatureCompleteness,
    GhanaEmployment,
}

impl ConfidenceFactorKind {
    pub const ALL: [ConfidenceFactorKind; 5] = [
        ConfidenceFactorKind::ModelPerformance,
        ConfidenceFactorKind::ScoreRange,
        ConfidenceFactorKind::PredictionStability,
        ConfidenceFactorKind::FeatureCompleteness,
        ConfidenceFactorKind::GhanaEmployment,
    ];

    pub fn weight(self) -> f64 {
        match self {
            ConfidenceFactorKind::ModelPerformance => 0.35,
            ConfidenceFactorKind::ScoreRange => 0.25,
            ConfidenceFactorKind::PredictionStability => 0.20,
            ConfidenceFactorKind::FeatureCompleteness => 0.15,
            ConfidenceFactorKind::GhanaEmployment => 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceFactor {
    pub factor: ConfidenceFactorKind,
    pub score: f64,
    pub weight: f64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 90.0 {
            ConfidenceLevel::VeryHigh
        } else if confidence >= 80.0 {
            ConfidenceLevel::High
        } else if confidence >= 70.0 {
            ConfidenceLevel::Medium
        } else if confidence >= 60.0 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::VeryLow
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceLevel::VeryHigh => "Very High",
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::Low => "Low",
            ConfidenceLevel::VeryLow => "Very Low",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the estimate reads.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceInputs<'a> {
    pub credit_score: u16,
    pub raw_prediction: f64,
    pub metrics: &'a ModelMetrics,
    pub missing_critical: usize,
    pub employment_score: f64,
    pub stability_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceEstimate {
    pub confidence: f64,
    pub level: ConfidenceLevel,
    pub factors: [ConfidenceFactor; 5],
}

pub fn model_performance_score(metrics: &ModelMetrics) -> f64 {
    metrics.test_r2 * 100.0
}

pub fn score_range_score(score: u16) -> f64 {
    match score {
        580..=750 => 95.0,
        520..=579 | 751..=800 => 90.0,
        450..=519 | 801..=820 => 85.0,
        300..=449 | 821..=850 => 75.0,
        _ => 80.0,
    }
}

pub fn prediction_stability_score(
    credit_score: u16,
    raw_prediction: f64,
    metrics: &ModelMetrics,
) -> f64 {
    let deviation = (f64::from(credit_score) - raw_prediction).abs();
    if deviation <= metrics.test_mae {
        95.0
    } else if deviation <= 2.0 * metrics.test_rmse {
        85.0
    } else {
        70.0
    }
}

pub fn feature_completeness_score(missing_critical: usize) -> f64 {
    match missing_critical {
        0 => 95.0,
        1 => 85.0,
        2 => 75.0,
        _ => 65.0,
    }
}

pub fn employment_factor_score(employment_score: f64, stability_score: f64) -> f64 {
    if employment_score >= 90.0 && stability_score >= 70.0 {
        95.0
    } else if employment_score >= 75.0 {
        85.0
    } else if employment_score >= 60.0 {
        75.0
    } else {
        65.0
    }
}

fn factor(kind: ConfidenceFactorKind, score: f64, description: String) -> ConfidenceFactor {
    ConfidenceFactor {
        factor: kind,
        score,
        weight: kind.weight(),
        description,
    }
}

pub fn estimate(inputs: &ConfidenceInputs<'_>) -> ConfidenceEstimate {
    let factors = [
        factor(
            ConfidenceFactorKind::ModelPerformance,
            model_performance_score(inputs.metrics),
            format!("test R² {:.4}", inputs.metrics.test_r2),
        ),
        factor(
            ConfidenceFactorKind::ScoreRange,
            score_range_score(inputs.credit_score),
            format!("score {} relative to well-populated bands", inputs.credit_score),
        ),
        factor(
            ConfidenceFactorKind::PredictionStability,
            prediction_stability_score(inputs.credit_score, inputs.raw_prediction, inputs.metrics),
            format!(
                "deviation {:.2} against MAE {:.2} / RMSE {:.2}",
                (f64::from(inputs.credit_score) - inputs.raw_prediction).abs(),
                inputs.metrics.test_mae,
                inputs.metrics.test_rmse
            ),
        ),
        factor(
            ConfidenceFactorKind::FeatureCompleteness,
            feature_completeness_score(inputs.missing_critical),
            format!("{} of 4 critical fields missing or zero", inputs.missing_critical),
        ),
        factor(
            ConfidenceFactorKind::GhanaEmployment,
            employment_factor_score(inputs.employment_score, inputs.stability_score),
            format!(
                "employment score {:.1}, sector stability {:.1}",
                inputs.employment_score, inputs.stability_score
            ),
        ),
    ];

    let weighted: f64 = factors.iter().map(|f| f.score * f.weight).sum();
    let confidence = round2(weighted.clamp(0.0, MAX_CONFIDENCE));

    ConfidenceEstimate {
        confidence,
        level: ConfidenceLevel::from_confidence(confidence),
        factors,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one_ten() {
        let total: f64 = ConfidenceFactorKind::ALL.iter().map(|k| k.weight()).sum();
        assert!((total - 1.10).abs() < 1e-12);
    }

    #[test]
    fn score_range_bands() {
        assert_eq!(score_range_score(580), 95.0);
        assert_eq!(score_range_score(750), 95.0);
        assert_eq!(score_range_score(520), 90.0);
        assert_eq!(score_range_score(800), 90.0);
        assert_eq!(score_range_score(450), 85.0);
        assert_eq!(score_range_score(820), 85.0);
        assert_eq!(score_range_score(300), 75.0);
        assert_eq!(score_range_score(850), 75.0);
        assert_eq!(score_range_score(900), 80.0);
    }

    #[test]
    fn stability_against_error_bounds() {
        let m = ModelMetrics::default();
        assert_eq!(prediction_stability_score(500, 497.0, &m), 95.0);
        assert_eq!(prediction_stability_score(500, 490.0, &m), 85.0);
        assert_eq!(prediction_stability_score(700, 520.0, &m), 70.0);
    }

    #[test]
    fn completeness_tiers() {
        assert_eq!(feature_completeness_score(0), 95.0);
        assert_eq!(feature_completeness_score(1), 85.0);
        assert_eq!(feature_completeness_score(2), 75.0);
        assert_eq!(feature_completeness_score(4), 65.0);
    }

    #[test]
    fn levels() {
        assert_eq!(ConfidenceLevel::from_confidence(99.9), ConfidenceLevel::VeryHigh);
        assert_eq!(ConfidenceLevel::from_confidence(80.0), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_confidence(70.0), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_confidence(60.0), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_confidence(59.99), ConfidenceLevel::VeryLow);
    }

    #[test]
    fn perfect_inputs_clamp_at_ceiling() {
        let metrics = ModelMetrics {
            test_r2: 1.0,
            ..ModelMetrics::default()
        };
        let est = estimate(&ConfidenceInputs {
            credit_score: 650,
            raw_prediction: 650.0,
            metrics: &metrics,
            missing_critical: 0,
            employment_score: 111.0,
            stability_score: 85.0,
        });
        assert_eq!(est.confidence, MAX_CONFIDENCE);
        assert_eq!(est.level, ConfidenceLevel::VeryHigh);
    }
}
