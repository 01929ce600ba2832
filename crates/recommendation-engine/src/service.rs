use crate::engine::{RecommendationEngine, RecommendationReport};
use analysis_core::{
    Bar, EvaluationError, NewsArticle, NewsSource, PriceDataSource, PricePoint, RecommendationSink,
};
use sentiment_analysis::SentimentAnalysisEngine;
use std::sync::Arc;
use technical_analysis::indicators_from_bars;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub const DEFAULT_NEWS_LIMIT: usize = 10;
pub const DEFAULT_HISTORY_BARS: usize = 60;

/// Wires the data collaborators, classifiers and engine together and
/// persists each finished recommendation.
#[derive(Clone)]
pub struct RecommendationService {
    prices: Arc<dyn PriceDataSource>,
    news: Arc<dyn NewsSource>,
    sink: Arc<dyn RecommendationSink>,
    sentiment: Arc<SentimentAnalysisEngine>,
    engine: Arc<RecommendationEngine>,
    news_limit: usize,
    history_bars: usize,
}

impl RecommendationService {
    pub fn new(
        prices: Arc<dyn PriceDataSource>,
        news: Arc<dyn NewsSource>,
        sink: Arc<dyn RecommendationSink>,
        engine: RecommendationEngine,
    ) -> Self {
        Self {
            prices,
            news,
            sink,
            sentiment: Arc::new(SentimentAnalysisEngine::new()),
            engine: Arc::new(engine),
            news_limit: DEFAULT_NEWS_LIMIT,
            history_bars: DEFAULT_HISTORY_BARS,
        }
    }

    pub fn with_sentiment_engine(mut self, sentiment: SentimentAnalysisEngine) -> Self {
        self.sentiment = Arc::new(sentiment);
        self
    }

    pub fn with_news_limit(mut self, news_limit: usize) -> Self {
        self.news_limit = news_limit;
        self
    }

    pub fn with_history_bars(mut self, history_bars: usize) -> Self {
        self.history_bars = history_bars;
        self
    }

    /// Fetch, evaluate and persist one symbol. Collaborator failures degrade
    /// to empty inputs; a storage failure is logged and the result returned.
    pub async fn recommend(&self, symbol: &str) -> RecommendationReport {
        let symbol = symbol.trim().to_uppercase();

        let history = self.fetch_history(&symbol).await.unwrap_or_else(|e| {
            tracing::warn!(symbol = %symbol, "{}", e);
            Vec::new()
        });
        let price = self.fetch_price(&symbol).await.unwrap_or_else(|e| {
            tracing::warn!(symbol = %symbol, "{}", e);
            PricePoint::default()
        });
        let articles = self.fetch_news(&symbol).await.unwrap_or_else(|e| {
            tracing::warn!(symbol = %symbol, "{}", e);
            Vec::new()
        });

        let indicators = indicators_from_bars(&history);
        let sentiments = self.sentiment.classify_articles(&articles);

        let report = self
            .engine
            .evaluate_detailed(&symbol, &indicators, &price, &sentiments, &history);

        if let Err(e) = self.sink.store(&report.recommendation).await {
            tracing::warn!("Failed to store recommendation for {}: {}", symbol, e);
        }

        tracing::info!(
            "{}: {} (confidence {:.2})",
            report.recommendation.symbol,
            report.recommendation.recommendation,
            report.recommendation.confidence_score
        );

        report
    }

    /// Recommend every symbol with at most `concurrency` in flight. Output
    /// order follows input order.
    pub async fn recommend_many(&self, symbols: &[String], concurrency: usize) -> Vec<RecommendationReport> {
        let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (index, symbol) in symbols.iter().cloned().enumerate() {
            let service = self.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                (index, service.recommend(&symbol).await)
            });
        }

        let mut results: Vec<Option<RecommendationReport>> = vec![None; symbols.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, report)) => results[index] = Some(report),
                Err(e) => tracing::error!("Recommendation task failed: {}", e),
            }
        }

        results
            .into_iter()
            .zip(symbols)
            .map(|(report, symbol)| {
                report.unwrap_or_else(|| {
                    self.engine
                        .evaluate_detailed(symbol, &Default::default(), &PricePoint::default(), &[], &[])
                })
            })
            .collect()
    }

    async fn fetch_history(&self, symbol: &str) -> Result<Vec<Bar>, EvaluationError> {
        self.prices
            .history(symbol, self.history_bars)
            .await
            .map_err(|source| EvaluationError::Component { component: "price history", source })
    }

    async fn fetch_price(&self, symbol: &str) -> Result<PricePoint, EvaluationError> {
        self.prices
            .price_point(symbol)
            .await
            .map_err(|source| EvaluationError::Component { component: "price snapshot", source })
    }

    async fn fetch_news(&self, symbol: &str) -> Result<Vec<NewsArticle>, EvaluationError> {
        let articles = self
            .news
            .news_for_symbol(symbol, self.news_limit)
            .await
            .map_err(|source| EvaluationError::Component { component: "news", source })?;

        if articles.is_empty() {
            tracing::debug!("No news for {}", symbol);
        }
        Ok(articles.into_iter().take(self.news_limit).collect())
    }
}
