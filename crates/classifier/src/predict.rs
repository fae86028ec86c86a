use std::fmt;

use runner_core::Runner;
use tracing::debug;

use crate::error::InferenceError;
use crate::preprocess::PreprocessedTensor;

/// Scores strictly above this are dogs.
pub const THRESHOLD: f32 = 0.5;

/// Rounding slack tolerated on either side of `[0, 1]`.
const SCORE_TOLERANCE: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Cat,
    Dog,
}

impl Label {
    pub fn emoji(self) -> &'static str {
        match self {
            Label::Cat => "🐱",
            Label::Dog => "🐶",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Cat => f.write_str("Cat"),
            Label::Dog => f.write_str("Dog"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    /// P(Dog) as reported by the model.
    pub score: f32,
    pub label: Label,
    /// Probability of the chosen label, in percent. Always within [50, 100].
    /// Kept in `f64` so the one-decimal rendering rounds the exact score.
    pub confidence_percent: f64,
}

impl PredictionResult {
    pub fn from_score(score: f32) -> Self {
        let wide = f64::from(score);
        let (label, confidence_percent) = if score > THRESHOLD {
            (Label::Dog, wide * 100.0)
        } else {
            (Label::Cat, (1.0 - wide) * 100.0)
        };
        Self {
            score,
            label,
            confidence_percent,
        }
    }

    pub fn confidence_display(&self) -> String {
        format!("{:.1}%", self.confidence_percent)
    }
}

/// Run one forward pass and turn the `(1, 1)` output into a prediction.
pub fn classify<R: Runner + ?Sized>(
    tensor: &PreprocessedTensor,
    runner: &R,
) -> Result<PredictionResult, InferenceError> {
    let output = runner
        .run(&tensor.to_dyn())
        .map_err(|e| InferenceError::Runtime(format!("{e:#}")))?;
    debug!(output_shape = ?output.shape(), "forward pass complete");

    // Row-major first element, i.e. [0][0] of the (1, 1) output.
    let raw = *output.iter().next().ok_or(InferenceError::EmptyOutput)?;
    let score = validate_score(raw)?;
    Ok(PredictionResult::from_score(score))
}

fn validate_score(raw: f32) -> Result<f32, InferenceError> {
    if !raw.is_finite() || raw < -SCORE_TOLERANCE || raw > 1.0 + SCORE_TOLERANCE {
        return Err(InferenceError::InvalidScore(raw));
    }
    Ok(raw.clamp(0.0, 1.0))
}
