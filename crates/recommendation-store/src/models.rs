use analysis_core::{Action, AnalysisError, Recommendation};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LATEST_LIMIT: usize = 10;
pub const DEFAULT_SYMBOL_LIMIT: usize = 5;

/// Row of the `stock_recommendations` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredRecommendation {
    pub id: i64,
    pub symbol: String,
    pub recommendation: String,
    pub confidence_score: f64,
    pub algorithm_recommendation: String,
    pub sentiment_score: f64,
    pub current_price: f64,
    pub target_price: f64,
    pub reasoning: String,
    pub created_at: String,
}

impl StoredRecommendation {
    pub fn new(id: i64, rec: &Recommendation) -> Self {
        Self {
            id,
            symbol: rec.symbol.clone(),
            recommendation: rec.recommendation.to_string(),
            confidence_score: rec.confidence_score,
            algorithm_recommendation: rec.algorithm_recommendation.to_string(),
            sentiment_score: rec.sentiment_score,
            current_price: rec.current_price,
            target_price: rec.target_price,
            reasoning: rec.reasoning.clone(),
            created_at: format_timestamp(&rec.created_at),
        }
    }

    pub fn to_recommendation(&self) -> Result<Recommendation, AnalysisError> {
        let parse_action = |value: &str| {
            Action::parse(value)
                .ok_or_else(|| AnalysisError::StorageError(format!("unknown action {:?}", value)))
        };

        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| AnalysisError::StorageError(format!("bad timestamp {:?}: {}", self.created_at, e)))?
            .with_timezone(&Utc);

        Ok(Recommendation {
            symbol: self.symbol.clone(),
            recommendation: parse_action(&self.recommendation)?,
            confidence_score: self.confidence_score,
            algorithm_recommendation: parse_action(&self.algorithm_recommendation)?,
            sentiment_score: self.sentiment_score,
            current_price: self.current_price,
            target_price: self.target_price,
            reasoning: self.reasoning.clone(),
            created_at,
        })
    }
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_row_conversion() {
        let mut rec = Recommendation::fallback("aapl");
        rec.created_at = Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap();

        let row = StoredRecommendation::new(7, &rec);
        assert_eq!(row.symbol, "AAPL");
        assert_eq!(row.recommendation, "HOLD");
        assert_eq!(row.created_at, "2024-03-01T14:30:00.000000Z");
        assert_eq!(row.to_recommendation().unwrap(), rec);
    }

    #[test]
    fn test_bad_rows_are_rejected() {
        let mut row = StoredRecommendation::new(1, &Recommendation::fallback("X"));
        row.recommendation = "MAYBE".to_string();
        assert!(row.to_recommendation().is_err());

        let mut row = StoredRecommendation::new(1, &Recommendation::fallback("X"));
        row.created_at = "yesterday".to_string();
        assert!(row.to_recommendation().is_err());
    }
}
