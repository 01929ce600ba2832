use analysis_core::{stats, Bar, IndicatorBundle};
use serde::{Deserialize, Serialize};

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// Simple Moving Average
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len() - period + 1);
    for i in period - 1..data.len() {
        let sum: f64 = data[i + 1 - period..=i].iter().sum();
        result.push(sum / period as f64);
    }
    result
}

/// Latest value of an SMA, if enough data exists.
pub fn last_sma(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }
    Some(data[data.len() - period..].iter().sum::<f64>() / period as f64)
}

/// Exponential Moving Average with adjusted weighting.
///
/// Every observation carries weight `(1 - alpha)^age`, normalised by the sum of
/// weights seen so far, with `alpha = 2 / (span + 1)`. The output has one value
/// per input value, so the first value equals the first observation.
pub fn ema(data: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || data.is_empty() {
        return vec![];
    }

    let decay = 1.0 - 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len());
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for &value in data {
        numerator = value + decay * numerator;
        denominator = 1.0 + decay * denominator;
        result.push(numerator / denominator);
    }

    result
}

/// Relative Strength Index over rolling simple means of gains and losses.
///
/// Output index `i` corresponds to input index `i + period`. A window with no
/// losses reads 100, a completely flat window reads 50.
pub fn rsi(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period + 1 {
        return vec![];
    }

    let changes: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();

    changes
        .windows(period)
        .map(|window| {
            let avg_gain = window.iter().filter(|c| **c > 0.0).sum::<f64>() / period as f64;
            let avg_loss = -window.iter().filter(|c| **c < 0.0).sum::<f64>() / period as f64;

            if avg_loss == 0.0 {
                if avg_gain > 0.0 { 100.0 } else { 50.0 }
            } else {
                let rs = avg_gain / avg_loss;
                100.0 - (100.0 / (1.0 + rs))
            }
        })
        .collect()
}

/// MACD (Moving Average Convergence Divergence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(data: &[f64], fast_period: usize, slow_period: usize, signal_period: usize) -> MacdResult {
    if fast_period == 0 || slow_period == 0 || signal_period == 0 || slow_period < fast_period {
        return MacdResult { macd_line: vec![], signal_line: vec![], histogram: vec![] };
    }

    let ema_fast = ema(data, fast_period);
    let ema_slow = ema(data, slow_period);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(fast, slow)| fast - slow)
        .collect();

    let signal_line = ema(&macd_line, signal_period);

    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    MacdResult {
        macd_line,
        signal_line,
        histogram,
    }
}

/// Rolling sample standard deviation. Output index `i` covers
/// `data[i..i + window]`.
pub fn rolling_std(data: &[f64], window: usize) -> Vec<f64> {
    if window < 2 || data.len() < window {
        return vec![];
    }
    data.windows(window).map(stats::std_dev).collect()
}

/// Indicator bundle from a chronological close series. Anything that cannot
/// be computed from the available closes is reported as 0; the scorer skips
/// the moving-average rule when either SMA is 0.
pub fn compute_indicators(closes: &[f64]) -> IndicatorBundle {
    let macd_result = macd(closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);

    let latest = |values: &[f64]| values.last().copied().map(stats::finite_or_zero).unwrap_or(0.0);

    IndicatorBundle {
        rsi: latest(&rsi(closes, RSI_PERIOD)),
        sma_20: last_sma(closes, 20).map(stats::finite_or_zero).unwrap_or(0.0),
        sma_50: last_sma(closes, 50).map(stats::finite_or_zero).unwrap_or(0.0),
        macd: latest(&macd_result.macd_line),
        macd_signal: latest(&macd_result.signal_line),
    }
}

/// Convenience wrapper over [`compute_indicators`] for OHLCV bars.
pub fn indicators_from_bars(bars: &[Bar]) -> IndicatorBundle {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    compute_indicators(&closes)
}
