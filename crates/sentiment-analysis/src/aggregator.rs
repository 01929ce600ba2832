use analysis_core::{ensure_finite, AnalysisError, SentimentLabel, SentimentObservation, SentimentSummary};

/// Reduces per-article observations into one market-mood summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentAggregator;

impl SentimentAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate, degrading to the neutral empty summary on invalid input.
    pub fn aggregate(&self, observations: &[SentimentObservation]) -> SentimentSummary {
        match self.try_aggregate(observations) {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("Sentiment aggregation failed, using neutral summary: {}", e);
                SentimentSummary::empty()
            }
        }
    }

    pub fn try_aggregate(
        &self,
        observations: &[SentimentObservation],
    ) -> Result<SentimentSummary, AnalysisError> {
        if observations.is_empty() {
            return Ok(SentimentSummary::empty());
        }

        let mut total_score = 0.0;
        let mut positive_count = 0;
        let mut negative_count = 0;
        let mut neutral_count = 0;

        for obs in observations {
            total_score += ensure_finite("sentiment score", obs.score)?.clamp(-1.0, 1.0);

            match obs.label {
                SentimentLabel::Positive => positive_count += 1,
                SentimentLabel::Negative => negative_count += 1,
                SentimentLabel::Neutral => neutral_count += 1,
            }
        }

        let score = total_score / observations.len() as f64;

        Ok(SentimentSummary {
            score,
            label: SentimentLabel::from_score(score),
            count: observations.len(),
            positive_count,
            negative_count,
            neutral_count,
        })
    }
}
