use analysis_core::{ensure_finite, Action, AlgorithmResult, AnalysisError, IndicatorBundle, PricePoint};

/// Daily volume above which the "High trading volume" rule fires.
pub const HIGH_VOLUME_THRESHOLD: f64 = 1_000_000.0;

/// Rule-based scorer turning indicators and a price snapshot into an action.
///
/// Each rule adds a signed weight and, when it fires, a reason. Rules are
/// evaluated momentum, RSI, moving averages, MACD, volume; the order only
/// affects the order of reasons.
#[derive(Debug, Clone, Copy, Default)]
pub struct TechnicalScorer;

impl TechnicalScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score the inputs, never failing. Invalid inputs produce the HOLD fallback.
    pub fn score(&self, indicators: &IndicatorBundle, price: &PricePoint) -> AlgorithmResult {
        match self.try_score(indicators, price) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Technical scoring failed, defaulting to HOLD: {}", e);
                AlgorithmResult::fallback()
            }
        }
    }

    pub fn try_score(
        &self,
        indicators: &IndicatorBundle,
        price: &PricePoint,
    ) -> Result<AlgorithmResult, AnalysisError> {
        let change_percent = ensure_finite("change_percent", price.change_percent)?;
        let current_price = ensure_finite("current_price", price.current_price)?;
        let volume = ensure_finite("volume", price.volume)?;
        let rsi = ensure_finite("rsi", indicators.rsi)?;
        let sma_20 = ensure_finite("sma_20", indicators.sma_20)?;
        let sma_50 = ensure_finite("sma_50", indicators.sma_50)?;
        let macd = ensure_finite("macd", indicators.macd)?;
        let macd_signal = ensure_finite("macd_signal", indicators.macd_signal)?;

        if !(0.0..=100.0).contains(&rsi) {
            return Err(AnalysisError::InvalidData(format!("rsi out of range: {}", rsi)));
        }

        let mut signals: Vec<(&'static str, i32)> = Vec::new();

        // Price momentum
        if change_percent > 2.0 {
            signals.push(("Strong positive momentum", 2));
        } else if change_percent > 0.0 {
            signals.push(("Positive momentum", 1));
        } else if change_percent < -2.0 {
            signals.push(("Strong negative momentum", -2));
        } else if change_percent < 0.0 {
            signals.push(("Negative momentum", -1));
        }

        // RSI: (30, 40) and (60, 70) contribute nothing
        if rsi < 30.0 {
            signals.push(("Oversold condition (RSI < 30)", 2));
        } else if rsi > 70.0 {
            signals.push(("Overbought condition (RSI > 70)", -2));
        } else if (40.0..=60.0).contains(&rsi) {
            signals.push(("Neutral RSI range", 1));
        }

        // Moving averages. A zero SMA could not be computed and skips the rule.
        let averages_known = sma_20 > 0.0 && sma_50 > 0.0;
        if averages_known && sma_20 > sma_50 && current_price > sma_20 {
            signals.push(("Price above both moving averages", 2));
        } else if averages_known && current_price < sma_20 && current_price < sma_50 {
            signals.push(("Price below both moving averages", -2));
        }

        // MACD always votes
        if macd > macd_signal {
            signals.push(("MACD above signal line", 1));
        } else {
            signals.push(("MACD below signal line", -1));
        }

        if volume > HIGH_VOLUME_THRESHOLD {
            signals.push(("High trading volume", 1));
        }

        let score: i32 = signals.iter().map(|(_, weight)| weight).sum();
        let reasons = signals.into_iter().map(|(name, _)| name.to_string()).collect();

        Ok(AlgorithmResult {
            action: Action::from_score(score),
            score,
            reasons,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::compute_indicators;

    fn bullish_inputs() -> (IndicatorBundle, PricePoint) {
        (
            IndicatorBundle {
                rsi: 25.0,
                sma_20: 105.0,
                sma_50: 100.0,
                macd: 1.5,
                macd_signal: 1.0,
            },
            PricePoint {
                current_price: 110.0,
                change: 3.2,
                change_percent: 3.0,
                volume: 2_000_000.0,
            },
        )
    }

    #[test]
    fn test_every_bullish_rule_fires() {
        let (indicators, price) = bullish_inputs();
        let result = TechnicalScorer::new().score(&indicators, &price);

        assert_eq!(result.score, 8);
        assert_eq!(result.action, Action::Buy);
        assert_eq!(
            result.reasons,
            vec![
                "Strong positive momentum",
                "Oversold condition (RSI < 30)",
                "Price above both moving averages",
                "MACD above signal line",
                "High trading volume",
            ]
        );
    }

    #[test]
    fn test_bearish_inputs_sell() {
        let indicators = IndicatorBundle {
            rsi: 80.0,
            sma_20: 100.0,
            sma_50: 105.0,
            macd: -1.0,
            macd_signal: 0.5,
        };
        let price = PricePoint {
            current_price: 90.0,
            change: -3.0,
            change_percent: -3.2,
            volume: 500_000.0,
        };
        let result = TechnicalScorer::new().score(&indicators, &price);

        assert_eq!(result.score, -7);
        assert_eq!(result.action, Action::Sell);
        assert_eq!(result.reasons.len(), 4);
    }

    #[test]
    fn test_rsi_dead_zones_contribute_nothing() {
        let scorer = TechnicalScorer::new();
        let price = PricePoint::default();
        for rsi in [30.0, 35.0, 65.0, 70.0] {
            let indicators = IndicatorBundle { rsi, ..Default::default() };
            let result = scorer.score(&indicators, &price);
            // Only the MACD rule fires: 0 > 0 is false
            assert_eq!(result.score, -1, "rsi = {}", rsi);
            assert_eq!(result.reasons, vec!["MACD below signal line"]);
        }
    }

    #[test]
    fn test_neutral_rsi_band_is_inclusive() {
        let scorer = TechnicalScorer::new();
        let price = PricePoint::default();
        for rsi in [40.0, 50.0, 60.0] {
            let indicators = IndicatorBundle { rsi, ..Default::default() };
            assert_eq!(scorer.score(&indicators, &price).score, 0);
        }
    }

    #[test]
    fn test_momentum_boundaries() {
        let scorer = TechnicalScorer::new();
        let indicators = IndicatorBundle { rsi: 35.0, macd: 1.0, ..Default::default() };

        let at = |change_percent: f64| {
            let price = PricePoint { change_percent, ..Default::default() };
            scorer.score(&indicators, &price).score
        };

        // MACD contributes +1 in every case
        assert_eq!(at(2.0), 2);
        assert_eq!(at(2.01), 3);
        assert_eq!(at(0.0), 1);
        assert_eq!(at(-2.0), 0);
        assert_eq!(at(-2.5), -1);
    }

    #[test]
    fn test_threshold_edges() {
        let indicators = IndicatorBundle { rsi: 50.0, macd: 1.0, ..Default::default() };
        let price = PricePoint { change_percent: 0.5, ..Default::default() };
        let result = TechnicalScorer::new().score(&indicators, &price);
        assert_eq!(result.score, 3);
        assert_eq!(result.action, Action::Buy);

        let price = PricePoint { change_percent: -0.5, ..Default::default() };
        let result = TechnicalScorer::new().score(&indicators, &price);
        assert_eq!(result.score, 1);
        assert_eq!(result.action, Action::Hold);
    }

    #[test]
    fn test_non_finite_input_falls_back() {
        let (mut indicators, price) = bullish_inputs();
        indicators.macd = f64::NAN;

        let scorer = TechnicalScorer::new();
        assert!(matches!(
            scorer.try_score(&indicators, &price),
            Err(AnalysisError::InvalidData(_))
        ));
        assert_eq!(scorer.score(&indicators, &price), AlgorithmResult::fallback());
    }

    #[test]
    fn test_missing_sma_skips_moving_average_rule() {
        let (mut indicators, price) = bullish_inputs();
        indicators.sma_50 = 0.0;
        let result = TechnicalScorer::new().score(&indicators, &price);
        assert_eq!(result.score, 6);
        assert!(!result.reasons.iter().any(|r| r.contains("moving averages")));

        let indicators = IndicatorBundle { sma_20: 0.0, sma_50: 0.0, ..indicators };
        let falling = PricePoint { current_price: 50.0, ..price };
        let result = TechnicalScorer::new().score(&indicators, &falling);
        assert!(!result.reasons.iter().any(|r| r.contains("moving averages")));
    }

    #[test]
    fn test_partial_history_scores_without_sma_50() {
        // 30 rising closes: SMA-20 exists, SMA-50 does not
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let indicators = compute_indicators(&closes);
        assert!(indicators.sma_20 > 0.0);
        assert_eq!(indicators.sma_50, 0.0);

        let price = PricePoint {
            current_price: 129.0,
            change: 1.0,
            change_percent: 0.78,
            volume: 500_000.0,
        };
        let result = TechnicalScorer::new().score(&indicators, &price);

        assert_eq!(
            result.reasons,
            vec!["Positive momentum", "Overbought condition (RSI > 70)", "MACD above signal line"]
        );
        assert_eq!(result.score, 0);
        assert_eq!(result.action, Action::Hold);
    }

    #[test]
    fn test_full_history_fires_moving_average_rule() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let indicators = compute_indicators(&closes);
        let price = PricePoint { current_price: 159.0, ..Default::default() };
        let result = TechnicalScorer::new().score(&indicators, &price);
        assert!(result.reasons.contains(&"Price above both moving averages".to_string()));
    }

    #[test]
    fn test_rsi_out_of_range_falls_back() {
        let (mut indicators, price) = bullish_inputs();
        indicators.rsi = 140.0;
        let result = TechnicalScorer::new().score(&indicators, &price);
        assert_eq!(result.action, Action::Hold);
        assert_eq!(result.reasons, vec!["Algorithm error - defaulting to HOLD"]);
    }
}
