use crate::combiner;
use analysis_core::{
    AlgorithmResult, Bar, EvaluationError, IndicatorBundle, PricePoint, PricePrediction, Recommendation,
    SentimentObservation, SentimentSummary,
};
use chrono::Utc;
use price_predictor::PricePredictor;
use rayon::prelude::*;
use sentiment_analysis::SentimentAggregator;
use serde::{Deserialize, Serialize};
use technical_analysis::TechnicalScorer;

/// Everything the engine needs to evaluate one symbol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationInput {
    pub symbol: String,
    pub indicators: IndicatorBundle,
    pub price: PricePoint,
    pub sentiments: Vec<SentimentObservation>,
    pub history: Vec<Bar>,
}

/// A recommendation together with the component outputs behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub recommendation: Recommendation,
    pub indicators: IndicatorBundle,
    pub algorithm: AlgorithmResult,
    pub sentiment: SentimentSummary,
    pub prediction: PricePrediction,
}

/// Stateless evaluator combining technical score, news mood and price outlook.
#[derive(Clone, Default)]
pub struct RecommendationEngine {
    scorer: TechnicalScorer,
    aggregator: SentimentAggregator,
    predictor: PricePredictor,
}

impl RecommendationEngine {
    pub fn new(predictor: PricePredictor) -> Self {
        Self {
            scorer: TechnicalScorer::new(),
            aggregator: SentimentAggregator::new(),
            predictor,
        }
    }

    /// Evaluate one symbol. Always returns a well-formed recommendation.
    pub fn evaluate(
        &self,
        symbol: &str,
        indicators: &IndicatorBundle,
        price: &PricePoint,
        sentiments: &[SentimentObservation],
        history: &[Bar],
    ) -> Recommendation {
        self.evaluate_detailed(symbol, indicators, price, sentiments, history)
            .recommendation
    }

    pub fn evaluate_detailed(
        &self,
        symbol: &str,
        indicators: &IndicatorBundle,
        price: &PricePoint,
        sentiments: &[SentimentObservation],
        history: &[Bar],
    ) -> RecommendationReport {
        match self.try_evaluate(symbol, indicators, price, sentiments, history) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!("Evaluation failed, defaulting to HOLD: {}", e);
                RecommendationReport {
                    recommendation: Recommendation::fallback(symbol),
                    indicators: *indicators,
                    algorithm: AlgorithmResult::fallback(),
                    sentiment: SentimentSummary::empty(),
                    prediction: PricePrediction::fallback(),
                }
            }
        }
    }

    pub fn try_evaluate(
        &self,
        symbol: &str,
        indicators: &IndicatorBundle,
        price: &PricePoint,
        sentiments: &[SentimentObservation],
        history: &[Bar],
    ) -> Result<RecommendationReport, EvaluationError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(EvaluationError::InvalidSymbol(symbol));
        }

        let algorithm = self.scorer.score(indicators, price);
        let sentiment = self.aggregator.aggregate(sentiments);
        let prediction = self.predictor.predict(&symbol, history);

        let decision = combiner::combine(&algorithm, &sentiment, &prediction);
        let confidence_score = combiner::confidence_score(&algorithm, &sentiment, &prediction);

        tracing::debug!(
            symbol = %symbol,
            action = %decision.action,
            algorithm_score = algorithm.score,
            sentiment = sentiment.score,
            confidence = confidence_score,
            "Evaluated symbol"
        );

        let recommendation = Recommendation {
            symbol,
            recommendation: decision.action,
            confidence_score,
            algorithm_recommendation: algorithm.action,
            sentiment_score: sentiment.score,
            current_price: price.current_price,
            target_price: prediction.target_price,
            reasoning: decision.reasoning,
            created_at: Utc::now(),
        };

        Ok(RecommendationReport {
            recommendation,
            indicators: *indicators,
            algorithm,
            sentiment,
            prediction,
        })
    }

    /// Evaluate many symbols in parallel. Output order follows input order.
    pub fn evaluate_batch(&self, inputs: &[EvaluationInput]) -> Vec<Recommendation> {
        inputs
            .par_iter()
            .map(|input| {
                self.evaluate(
                    &input.symbol,
                    &input.indicators,
                    &input.price,
                    &input.sentiments,
                    &input.history,
                )
            })
            .collect()
    }
}
