//! Raw model output → calibrated 300–850 credit score.

use crate::model::ScalingConstants;
use crate::risk::{MAX_CREDIT_SCORE, MIN_CREDIT_SCORE};

/// `300 + (raw − raw_min) · scale_factor`, before clipping and rounding.
pub fn unclipped_score(raw_prediction: f64, scaling: &ScalingConstants) -> f64 {
    f64::from(MIN_CREDIT_SCORE) + (raw_prediction - scaling.raw_min) * scaling.scale_factor
}

/// Clip to [300, 850] and round to the nearest integer. Monotonic
/// non-decreasing in `raw_prediction`; non-finite input maps to the floor.
pub fn rescale(raw_prediction: f64, scaling: &ScalingConstants) -> u16 {
    let scaled = unclipped_score(raw_prediction, scaling);
    if scaled.is_nan() {
        return MIN_CREDIT_SCORE;
    }
    scaled
        .clamp(f64::from(MIN_CREDIT_SCORE), f64::from(MAX_CREDIT_SCORE))
        .round() as u16
}
