use crate::db::RecommendationDb;
use crate::models::{format_timestamp, StoredRecommendation};
use analysis_core::{AnalysisError, Recommendation, RecommendationSink};
use anyhow::Result;
use async_trait::async_trait;

/// Recommendation log backed by the `stock_recommendations` table.
#[derive(Clone)]
pub struct SqliteRecommendationStore {
    db: RecommendationDb,
}

impl SqliteRecommendationStore {
    pub fn new(db: RecommendationDb) -> Self {
        Self { db }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        Ok(Self::new(RecommendationDb::new(database_url).await?))
    }

    pub async fn insert(&self, rec: &Recommendation) -> Result<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO stock_recommendations
            (symbol, recommendation, confidence_score, algorithm_recommendation, sentiment_score,
             current_price, target_price, reasoning, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&rec.symbol)
        .bind(rec.recommendation.as_str())
        .bind(rec.confidence_score)
        .bind(rec.algorithm_recommendation.as_str())
        .bind(rec.sentiment_score)
        .bind(rec.current_price)
        .bind(rec.target_price)
        .bind(&rec.reasoning)
        .bind(format_timestamp(&rec.created_at))
        .fetch_one(self.db.pool())
        .await?;

        Ok(id)
    }

    /// Most recent recommendations across all symbols, newest first.
    pub async fn latest(&self, limit: usize) -> Result<Vec<StoredRecommendation>> {
        let rows = sqlx::query_as::<_, StoredRecommendation>(
            r#"
            SELECT * FROM stock_recommendations
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }

    /// Most recent recommendations for one symbol, newest first.
    pub async fn for_symbol(&self, symbol: &str, limit: usize) -> Result<Vec<StoredRecommendation>> {
        let rows = sqlx::query_as::<_, StoredRecommendation>(
            r#"
            SELECT * FROM stock_recommendations
            WHERE symbol = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(symbol.trim().to_uppercase())
        .bind(limit as i64)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl RecommendationSink for SqliteRecommendationStore {
    async fn store(&self, recommendation: &Recommendation) -> Result<(), AnalysisError> {
        let id = self
            .insert(recommendation)
            .await
            .map_err(|e| AnalysisError::StorageError(e.to_string()))?;
        tracing::debug!("Stored recommendation {} for {}", id, recommendation.symbol);
        Ok(())
    }
}
