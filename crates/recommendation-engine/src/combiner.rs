use analysis_core::{
    ensure_finite, Action, AlgorithmResult, AnalysisError, Direction, PricePrediction, SentimentLabel,
    SentimentSummary,
};
use serde::{Deserialize, Serialize};

/// Sentiment strength needed to veto the algorithm's BUY or SELL.
pub const SENTIMENT_OVERRIDE: f64 = 0.3;
/// Prediction confidence above which the price outlook is mentioned.
pub const PREDICTION_NOTE_CONFIDENCE: f64 = 0.7;
/// Prediction confidence above which the price outlook adds confidence.
pub const PREDICTION_BONUS_CONFIDENCE: f64 = 0.5;

pub const COMBINATION_ERROR_REASONING: &str = "Error in recommendation combination - defaulting to HOLD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedDecision {
    pub action: Action,
    pub reasoning: String,
}

impl CombinedDecision {
    pub fn fallback() -> Self {
        Self {
            action: Action::Hold,
            reasoning: COMBINATION_ERROR_REASONING.to_string(),
        }
    }
}

/// Merge the algorithm's action with market sentiment and the price outlook.
///
/// Sentiment can only soften a BUY or SELL into a HOLD. The prediction never
/// changes the action; it is noted in the reasoning when confident.
pub fn try_combine(
    algorithm: &AlgorithmResult,
    sentiment: &SentimentSummary,
    prediction: &PricePrediction,
) -> Result<CombinedDecision, AnalysisError> {
    let sentiment_score = ensure_finite("sentiment score", sentiment.score)?;
    let prediction_confidence = ensure_finite("prediction confidence", prediction.confidence)?;

    let mut reasoning = format!("Algorithm: {} - {}", algorithm.action, algorithm.reasons.join(", "));

    let action = match (algorithm.action, sentiment.label) {
        (Action::Buy, SentimentLabel::Negative) => {
            if sentiment_score < -SENTIMENT_OVERRIDE {
                reasoning.push_str(&format!(
                    " | Sentiment override: Negative market sentiment ({:.2})",
                    sentiment_score
                ));
                Action::Hold
            } else {
                reasoning.push_str(" | Sentiment: Slightly negative but algorithm remains strong");
                Action::Buy
            }
        }
        (Action::Sell, SentimentLabel::Positive) => {
            if sentiment_score > SENTIMENT_OVERRIDE {
                reasoning.push_str(&format!(
                    " | Sentiment override: Positive market sentiment ({:.2})",
                    sentiment_score
                ));
                Action::Hold
            } else {
                reasoning.push_str(" | Sentiment: Slightly positive but algorithm remains strong");
                Action::Sell
            }
        }
        (action, label) => {
            reasoning.push_str(&format!(" | Sentiment: {} ({:.2})", label, sentiment_score));
            action
        }
    };

    if prediction_confidence > PREDICTION_NOTE_CONFIDENCE {
        let note = match (prediction.direction, action) {
            (Direction::Up, Action::Buy) => Some(" | ML: Price prediction supports BUY"),
            (Direction::Down, Action::Sell) => Some(" | ML: Price prediction supports SELL"),
            (Direction::Up, Action::Sell) => Some(" | ML: Price prediction conflicts with SELL - consider HOLD"),
            (Direction::Down, Action::Buy) => Some(" | ML: Price prediction conflicts with BUY - consider HOLD"),
            _ => None,
        };
        if let Some(note) = note {
            reasoning.push_str(note);
        }
    }

    Ok(CombinedDecision { action, reasoning })
}

pub fn combine(
    algorithm: &AlgorithmResult,
    sentiment: &SentimentSummary,
    prediction: &PricePrediction,
) -> CombinedDecision {
    try_combine(algorithm, sentiment, prediction).unwrap_or_else(|e| {
        tracing::warn!("Recommendation combination failed: {}", e);
        CombinedDecision::fallback()
    })
}

/// Overall confidence in [0, 1]: up to 0.6 from the algorithm score, 0.2 to
/// 0.3 from sentiment coverage and up to 0.2 from a confident prediction.
pub fn try_confidence_score(
    algorithm: &AlgorithmResult,
    sentiment: &SentimentSummary,
    prediction: &PricePrediction,
) -> Result<f64, AnalysisError> {
    let prediction_confidence = ensure_finite("prediction confidence", prediction.confidence)?;

    let base = (algorithm.score.unsigned_abs() as f64 / 5.0).min(1.0) * 0.6;
    let sentiment_part = if sentiment.count > 0 { 0.3 } else { 0.2 };
    let prediction_part = if prediction_confidence > PREDICTION_BONUS_CONFIDENCE {
        prediction_confidence * 0.2
    } else {
        0.0
    };

    Ok((base + sentiment_part + prediction_part).clamp(0.0, 1.0))
}

pub fn confidence_score(
    algorithm: &AlgorithmResult,
    sentiment: &SentimentSummary,
    prediction: &PricePrediction,
) -> f64 {
    try_confidence_score(algorithm, sentiment, prediction).unwrap_or_else(|e| {
        tracing::warn!("Confidence calculation failed: {}", e);
        0.5
    })
}
