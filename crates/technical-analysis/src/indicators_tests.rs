#[cfg(test)]
mod tests {
    use super::super::indicators::*;
    use analysis_core::Bar;
    use approx::assert_relative_eq;
    use chrono::Utc;

    // Helper function to create sample price data
    fn sample_prices() -> Vec<f64> {
        vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ]
    }

    fn trending_closes(n: usize, start: f64, step: f64) -> Vec<f64> {
        (0..n).map(|i| start + step * i as f64).collect()
    }

    #[test]
    fn test_sma_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3);

        assert_eq!(result.len(), 3);
        assert!((result[0] - 2.0).abs() < 0.001); // (1+2+3)/3 = 2
        assert!((result[1] - 3.0).abs() < 0.001); // (2+3+4)/3 = 3
        assert!((result[2] - 4.0).abs() < 0.001); // (3+4+5)/3 = 4
    }

    #[test]
    fn test_sma_insufficient_data() {
        let data = vec![1.0, 2.0];
        assert_eq!(sma(&data, 5).len(), 0);
        assert_eq!(last_sma(&data, 5), None);
    }

    #[test]
    fn test_last_sma_matches_series() {
        let prices = sample_prices();
        let series = sma(&prices, 5);
        assert_relative_eq!(last_sma(&prices, 5).unwrap(), *series.last().unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn test_ema_starts_at_first_observation() {
        let data = vec![22.0, 24.0, 23.0, 25.0, 26.0];
        let result = ema(&data, 3);

        assert_eq!(result.len(), data.len());
        assert_relative_eq!(result[0], 22.0);
        // alpha = 0.5: (24 + 0.5 * 22) / (1 + 0.5)
        assert_relative_eq!(result[1], 35.0 / 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_ema_empty_data() {
        let data: Vec<f64> = vec![];
        assert_eq!(ema(&data, 5).len(), 0);
    }

    #[test]
    fn test_ema_increases_with_uptrend() {
        let data = trending_closes(10, 1.0, 1.0);
        let result = ema(&data, 3);

        for i in 1..result.len() {
            assert!(result[i] > result[i - 1]);
        }
    }

    #[test]
    fn test_rsi_basic() {
        let prices = sample_prices();
        let result = rsi(&prices, 14);

        assert_eq!(result.len(), prices.len() - 14);
        for &value in &result {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_rsi_simple_average_window() {
        // 14 changes: seven +2 and seven -1
        let mut data = vec![100.0];
        for i in 0..14 {
            let last = *data.last().unwrap();
            data.push(if i % 2 == 0 { last + 2.0 } else { last - 1.0 });
        }
        let result = rsi(&data, 14);
        assert_eq!(result.len(), 1);
        // avg gain 1.0, avg loss 0.5 => rs 2 => 66.67
        assert_relative_eq!(result[0], 100.0 - 100.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let data = vec![1.0, 2.0, 3.0];
        assert_eq!(rsi(&data, 14).len(), 0);
    }

    #[test]
    fn test_rsi_without_losses() {
        let uptrend = trending_closes(20, 100.0, 1.0);
        assert_eq!(*rsi(&uptrend, 14).last().unwrap(), 100.0);

        let flat = vec![50.0; 20];
        assert_eq!(*rsi(&flat, 14).last().unwrap(), 50.0);
    }

    #[test]
    fn test_macd_basic() {
        let prices = sample_prices();
        let result = macd(&prices, 12, 26, 9);

        assert_eq!(result.macd_line.len(), prices.len());
        assert_eq!(result.signal_line.len(), prices.len());
        assert_eq!(result.histogram.len(), prices.len());
    }

    #[test]
    fn test_macd_histogram() {
        let prices = sample_prices();
        let result = macd(&prices, 12, 26, 9);

        for (i, &hist) in result.histogram.iter().enumerate() {
            let expected = result.macd_line[i] - result.signal_line[i];
            assert!((hist - expected).abs() < 0.001);
        }
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let closes = trending_closes(60, 100.0, 0.5);
        let result = macd(&closes, 12, 26, 9);
        assert!(*result.macd_line.last().unwrap() > 0.0);
        assert!(result.macd_line.last().unwrap() > result.signal_line.last().unwrap());
    }

    #[test]
    fn test_macd_invalid_periods() {
        let result = macd(&sample_prices(), 26, 12, 9);
        assert!(result.macd_line.is_empty());
    }

    #[test]
    fn test_rolling_std() {
        let data = vec![1.0, 1.0, 1.0, 3.0];
        let result = rolling_std(&data, 3);
        assert_eq!(result.len(), 2);
        assert_relative_eq!(result[0], 0.0);
        assert!(result[1] > 1.0);
        assert!(rolling_std(&data, 10).is_empty());
    }

    #[test]
    fn test_compute_indicators_full_history() {
        let closes = trending_closes(60, 100.0, 1.0);
        let bundle = compute_indicators(&closes);

        assert_eq!(bundle.rsi, 100.0);
        // Last 20 closes are 140..=159
        assert_relative_eq!(bundle.sma_20, 149.5);
        // Last 50 closes are 110..=159
        assert_relative_eq!(bundle.sma_50, 134.5);
        assert!(bundle.macd > bundle.macd_signal);
    }

    #[test]
    fn test_compute_indicators_short_history_is_zero() {
        let bundle = compute_indicators(&[100.0, 101.0]);
        assert_eq!(bundle.rsi, 0.0);
        assert_eq!(bundle.sma_20, 0.0);
        assert_eq!(bundle.sma_50, 0.0);

        let empty = compute_indicators(&[]);
        assert_eq!(empty, analysis_core::IndicatorBundle::default());
    }

    #[test]
    fn test_indicators_from_bars() {
        let bars: Vec<Bar> = trending_closes(30, 10.0, 0.1)
            .into_iter()
            .enumerate()
            .map(|(i, close)| Bar {
                timestamp: Utc::now() - chrono::Duration::days(30 - i as i64),
                open: close,
                high: close + 0.2,
                low: close - 0.2,
                close,
                volume: 1_000_000.0,
            })
            .collect();

        let from_bars = indicators_from_bars(&bars);
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(from_bars, compute_indicators(&closes));
        assert!(from_bars.sma_20 > 0.0);
        assert_eq!(from_bars.sma_50, 0.0);
    }
}
