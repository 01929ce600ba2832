use crate::models::StoredRecommendation;
use analysis_core::{AnalysisError, Recommendation, RecommendationSink};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-local recommendation log with the same read side as the SQLite store.
#[derive(Debug, Default)]
pub struct MemoryRecommendationStore {
    rows: RwLock<Vec<StoredRecommendation>>,
}

impl MemoryRecommendationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, rec: &Recommendation) -> i64 {
        let mut rows = self.rows.write().await;
        let id = rows.len() as i64 + 1;
        rows.push(StoredRecommendation::new(id, rec));
        id
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    pub async fn latest(&self, limit: usize) -> Vec<StoredRecommendation> {
        self.newest_first(|_| true, limit).await
    }

    pub async fn for_symbol(&self, symbol: &str, limit: usize) -> Vec<StoredRecommendation> {
        let symbol = symbol.trim().to_uppercase();
        self.newest_first(|row| row.symbol == symbol, limit).await
    }

    async fn newest_first<F>(&self, keep: F, limit: usize) -> Vec<StoredRecommendation>
    where
        F: Fn(&StoredRecommendation) -> bool,
    {
        let rows = self.rows.read().await;
        let mut matched: Vec<StoredRecommendation> = rows.iter().filter(|r| keep(r)).cloned().collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        matched.truncate(limit);
        matched
    }
}

#[async_trait]
impl RecommendationSink for MemoryRecommendationStore {
    async fn store(&self, recommendation: &Recommendation) -> Result<(), AnalysisError> {
        self.insert(recommendation).await;
        Ok(())
    }
}
