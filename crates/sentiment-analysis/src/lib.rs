use analysis_core::{
    ensure_finite, AnalysisError, NewsArticle, SentimentModel, SentimentObservation, SentimentSummary,
};
use std::sync::Arc;

pub mod aggregator;
pub mod keywords;

pub use aggregator::SentimentAggregator;
pub use keywords::{classify_keywords, count_keywords, KeywordCounts, NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS};

/// Longest input handed to a trained classifier, in characters.
pub const MODEL_MAX_CHARS: usize = 512;

/// Per-item news classifier. Uses the injected trained model when there is
/// one and the keyword heuristic otherwise, or when the model fails.
#[derive(Clone, Default)]
pub struct SentimentAnalysisEngine {
    model: Option<Arc<dyn SentimentModel>>,
    aggregator: SentimentAggregator,
}

impl SentimentAnalysisEngine {
    /// Keyword-only engine.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(model: Arc<dyn SentimentModel>) -> Self {
        Self {
            model: Some(model),
            aggregator: SentimentAggregator::new(),
        }
    }

    pub fn is_model_available(&self) -> bool {
        self.model.is_some()
    }

    pub fn classify(&self, text: &str) -> SentimentObservation {
        if let Some(model) = &self.model {
            match self.try_classify_with_model(model.as_ref(), text) {
                Ok(obs) => return obs,
                Err(e) => {
                    tracing::debug!("Sentiment model failed, using keyword heuristic: {}", e);
                }
            }
        }

        classify_keywords(text)
    }

    fn try_classify_with_model(
        &self,
        model: &dyn SentimentModel,
        text: &str,
    ) -> Result<SentimentObservation, AnalysisError> {
        let truncated: String = text.chars().take(MODEL_MAX_CHARS).collect();
        let obs = model.classify(&truncated)?;

        Ok(SentimentObservation {
            score: ensure_finite("model score", obs.score)?.clamp(-1.0, 1.0),
            label: obs.label,
            confidence: ensure_finite("model confidence", obs.confidence)?.clamp(0.0, 1.0),
        })
    }

    pub fn classify_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<SentimentObservation> {
        texts.iter().map(|t| self.classify(t.as_ref())).collect()
    }

    pub fn classify_articles(&self, articles: &[NewsArticle]) -> Vec<SentimentObservation> {
        articles.iter().map(|a| self.classify(&a.text())).collect()
    }

    /// Classify every article and reduce the results to a market mood.
    pub fn summarize(&self, articles: &[NewsArticle]) -> SentimentSummary {
        let observations = self.classify_articles(articles);
        tracing::debug!("Classified {} news items", observations.len());
        self.aggregator.aggregate(&observations)
    }
}
