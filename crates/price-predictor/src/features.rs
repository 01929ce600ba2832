use analysis_core::{stats, AnalysisError, Bar};
use technical_analysis::{last_sma, rolling_std, rsi, RSI_PERIOD};

/// Length of the model input vector.
pub const FEATURE_COUNT: usize = 15;
/// Fewest bars the model path accepts.
pub const MIN_MODEL_BARS: usize = 20;
/// Bars of history fed into the featurizer.
pub const MODEL_LOOKBACK: usize = 60;

const EXTREME_Z: f64 = 3.0;

/// Build the model feature vector from the most recent bars (oldest first).
///
/// Layout:
/// - 0..4: close now, 5, 10 and 20 bars back (counting the latest bar)
/// - 4..8: SMA-5, SMA-10, SMA-20, SMA-5 minus SMA-20
/// - 8..11: latest volume, 5-bar and 20-bar mean volume
/// - 11..14: return volatility over the window, last 10 and last 20 returns
/// - 14: RSI-14
///
/// Any value that cannot be computed is 0.
pub fn build_features(bars: &[Bar]) -> Result<Vec<f64>, AnalysisError> {
    if bars.len() < MIN_MODEL_BARS {
        return Err(AnalysisError::InsufficientData(format!(
            "model path needs {} bars, got {}",
            MIN_MODEL_BARS,
            bars.len()
        )));
    }

    let window = &bars[bars.len().saturating_sub(MODEL_LOOKBACK)..];
    let closes: Vec<f64> = window.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = window.iter().map(|b| b.volume).collect();
    let n = closes.len();

    let sma = |data: &[f64], period: usize| last_sma(data, period).unwrap_or(f64::NAN);
    let sma_5 = sma(&closes, 5);
    let sma_20 = sma(&closes, 20);

    let returns = stats::pct_changes(&closes);
    let tail_std = |count: usize| rolling_std(&returns, count).last().copied().unwrap_or(f64::NAN);

    let features = vec![
        closes[n - 1],
        closes[n - 5],
        closes[n - 10],
        closes[n - 20],
        sma_5,
        sma(&closes, 10),
        sma_20,
        sma_5 - sma_20,
        volumes[n - 1],
        sma(&volumes, 5),
        sma(&volumes, 20),
        stats::std_dev(&returns),
        tail_std(10),
        tail_std(20),
        rsi(&closes, RSI_PERIOD).last().copied().unwrap_or(f64::NAN),
    ];

    Ok(features.into_iter().map(stats::finite_or_zero).collect())
}

/// Confidence in a model prediction, judged by how many features sit more
/// than three standard deviations from the feature-vector mean.
pub fn feature_confidence(features: &[f64]) -> f64 {
    let mean = stats::mean(features);
    let std = stats::population_std_dev(features);

    let extreme_count = features
        .iter()
        .filter(|f| ((**f - mean) / (std + 1e-8)).abs() > EXTREME_Z)
        .count();

    let confidence = match extreme_count {
        0 => 0.9,
        1..=2 => 0.8,
        _ => 0.6,
    };

    f64::clamp(confidence, 0.3, 0.9)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, Utc};

    fn linear_bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64;
                Bar {
                    timestamp: Utc::now() - Duration::days((n - i) as i64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1_000.0 * (i + 1) as f64,
                }
            })
            .collect()
    }

    #[test]
    fn test_feature_layout() {
        let features = build_features(&linear_bars(30)).unwrap();
        assert_eq!(features.len(), FEATURE_COUNT);

        assert_relative_eq!(features[0], 129.0);
        assert_relative_eq!(features[1], 125.0);
        assert_relative_eq!(features[2], 120.0);
        assert_relative_eq!(features[3], 110.0);
        assert_relative_eq!(features[4], 127.0);
        assert_relative_eq!(features[5], 124.5);
        assert_relative_eq!(features[6], 119.5);
        assert_relative_eq!(features[7], 7.5);
        assert_relative_eq!(features[8], 30_000.0);
        assert_relative_eq!(features[9], 28_000.0);
        assert_relative_eq!(features[10], 20_500.0);
        assert!(features[11] > 0.0);
        assert_relative_eq!(features[14], 100.0);
    }

    #[test]
    fn test_short_window_features_are_zero() {
        // 20 bars give 19 returns, not enough for the 20-return volatility
        let features = build_features(&linear_bars(20)).unwrap();
        assert_eq!(features.len(), FEATURE_COUNT);
        assert!(features[12] > 0.0);
        assert_eq!(features[13], 0.0);
    }

    #[test]
    fn test_lookback_is_capped() {
        let long = linear_bars(100);
        let features = build_features(&long).unwrap();
        let recent = build_features(&long[40..]).unwrap();
        assert_eq!(features, recent);
    }

    #[test]
    fn test_insufficient_bars() {
        assert!(matches!(
            build_features(&linear_bars(19)),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_confidence_bands() {
        assert_relative_eq!(feature_confidence(&[5.0; FEATURE_COUNT]), 0.9);

        let mut one_outlier = vec![0.0; 14];
        one_outlier.push(1_000.0);
        assert_relative_eq!(feature_confidence(&one_outlier), 0.8);

        let mut many_outliers = vec![0.0; 100];
        many_outliers.extend([100.0, 100.0, 100.0]);
        assert_relative_eq!(feature_confidence(&many_outliers), 0.6);
    }
}
