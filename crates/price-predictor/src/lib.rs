use analysis_core::{ensure_finite, AnalysisError, Bar, Direction, PriceModel, PricePrediction, PredictionModel};
use std::sync::Arc;

pub mod features;
pub mod model;
pub mod statistical;

pub use features::{build_features, feature_confidence, FEATURE_COUNT, MIN_MODEL_BARS, MODEL_LOOKBACK};
pub use model::LinearPriceModel;
pub use statistical::{SidewaysDraw, TrendEstimate, MIN_STAT_BARS, STAT_LOOKBACK};

/// Short-horizon price predictor.
///
/// Tries the injected model first, then the trend/volatility heuristic, and
/// finally returns [`PricePrediction::fallback`].
#[derive(Clone)]
pub struct PricePredictor {
    model: Option<Arc<dyn PriceModel>>,
    sideways: SidewaysDraw,
    days_ahead: u32,
}

impl Default for PricePredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl PricePredictor {
    pub fn new() -> Self {
        Self {
            model: None,
            sideways: SidewaysDraw::default(),
            days_ahead: PricePrediction::DEFAULT_DAYS_AHEAD,
        }
    }

    pub fn with_model(mut self, model: Arc<dyn PriceModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_sideways_draw(mut self, sideways: SidewaysDraw) -> Self {
        self.sideways = sideways;
        self
    }

    pub fn with_days_ahead(mut self, days_ahead: u32) -> Self {
        self.days_ahead = days_ahead;
        self
    }

    pub fn is_model_available(&self) -> bool {
        self.model.is_some()
    }

    pub fn days_ahead(&self) -> u32 {
        self.days_ahead
    }

    /// Predict from a chronological history, never failing.
    pub fn predict(&self, symbol: &str, bars: &[Bar]) -> PricePrediction {
        if let Some(model) = &self.model {
            match self.try_predict_with_model(model.as_ref(), bars) {
                Ok(prediction) => return prediction,
                Err(e) => {
                    tracing::warn!("Model prediction failed for {}, using statistics: {}", symbol, e);
                }
            }
        }

        match self.try_predict_statistical(symbol, bars) {
            Ok(prediction) => prediction,
            Err(e) => {
                tracing::warn!("Statistical prediction failed for {}: {}", symbol, e);
                PricePrediction::fallback()
            }
        }
    }

    pub fn try_predict_with_model(
        &self,
        model: &dyn PriceModel,
        bars: &[Bar],
    ) -> Result<PricePrediction, AnalysisError> {
        let features = build_features(bars)?;
        let predicted_price = ensure_finite("model prediction", model.predict(&features)?)?;
        let current_price = features[0];

        let direction = if predicted_price > current_price {
            Direction::Up
        } else {
            Direction::Down
        };

        Ok(PricePrediction {
            current_price,
            predicted_price,
            target_price: predicted_price,
            days_ahead: self.days_ahead,
            confidence: feature_confidence(&features),
            direction,
            model: PredictionModel::Ml,
        })
    }

    pub fn try_predict_statistical(&self, symbol: &str, bars: &[Bar]) -> Result<PricePrediction, AnalysisError> {
        let estimate = statistical::estimate_trend(bars)?;
        let (change, direction) = statistical::projected_change(&estimate, symbol, &self.sideways)?;
        let predicted_price = estimate.current_price * (1.0 + change);

        tracing::debug!(
            symbol,
            trend = estimate.trend,
            volatility = estimate.volatility,
            "Statistical prediction"
        );

        Ok(PricePrediction {
            current_price: estimate.current_price,
            predicted_price,
            target_price: predicted_price,
            days_ahead: self.days_ahead,
            confidence: statistical::statistical_confidence(&estimate),
            direction,
            model: PredictionModel::Statistical,
        })
    }
}
