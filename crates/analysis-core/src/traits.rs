use async_trait::async_trait;
use crate::{AnalysisError, Bar, NewsArticle, PricePoint, Recommendation, SentimentObservation};

/// Source of price snapshots and OHLCV history
#[async_trait]
pub trait PriceDataSource: Send + Sync {
    /// Up to `bars` most recent bars, oldest first.
    async fn history(&self, symbol: &str, bars: usize) -> Result<Vec<Bar>, AnalysisError>;

    /// Latest snapshot. The default derives it from the last two bars.
    async fn price_point(&self, symbol: &str) -> Result<PricePoint, AnalysisError> {
        let bars = self.history(symbol, 2).await?;
        if bars.is_empty() {
            return Err(AnalysisError::InsufficientData(format!("no bars for {}", symbol)));
        }
        Ok(PricePoint::from_bars(&bars))
    }
}

/// Source of raw news for a symbol
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn news_for_symbol(&self, symbol: &str, limit: usize) -> Result<Vec<NewsArticle>, AnalysisError>;
}

/// Persistence sink for finished recommendations
#[async_trait]
pub trait RecommendationSink: Send + Sync {
    async fn store(&self, recommendation: &Recommendation) -> Result<(), AnalysisError>;
}

/// Trained per-item sentiment classifier
pub trait SentimentModel: Send + Sync {
    fn classify(&self, text: &str) -> Result<SentimentObservation, AnalysisError>;
}

/// Trained price regressor over a fixed feature vector
pub trait PriceModel: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64, AnalysisError>;
}
