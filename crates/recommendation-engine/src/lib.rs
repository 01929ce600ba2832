pub mod combiner;
pub mod engine;
pub mod service;

pub use combiner::{combine, confidence_score, CombinedDecision};
pub use engine::{EvaluationInput, RecommendationEngine, RecommendationReport};
pub use service::{RecommendationService, DEFAULT_HISTORY_BARS, DEFAULT_NEWS_LIMIT};
