use analysis_core::{ensure_finite, stats, AnalysisError, Bar, Direction};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use statrs::distribution::Normal;
use technical_analysis::last_sma;

/// Bars of history considered by the statistical path.
pub const STAT_LOOKBACK: usize = 30;
/// Fewest bars the statistical path accepts.
pub const MIN_STAT_BARS: usize = 20;

/// SMA-5 vs SMA-20 spread beyond which the trend counts as directional.
pub const TREND_BAND: f64 = 0.02;

/// How the sideways case picks its price change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SidewaysDraw {
    /// Sample N(0, 0.3 * volatility). A seeded draw is derived from the seed
    /// and the symbol, so the same symbol always gets the same draw.
    Random { seed: Option<u64> },
    /// Use this fractional change verbatim.
    Fixed(f64),
}

impl Default for SidewaysDraw {
    fn default() -> Self {
        SidewaysDraw::Random { seed: None }
    }
}

impl SidewaysDraw {
    pub fn draw(&self, symbol: &str, std_dev: f64) -> Result<f64, AnalysisError> {
        match *self {
            SidewaysDraw::Fixed(change) => ensure_finite("fixed sideways change", change),
            SidewaysDraw::Random { .. } if std_dev == 0.0 => Ok(0.0),
            SidewaysDraw::Random { seed } => {
                let normal = Normal::new(0.0, std_dev)
                    .map_err(|e| AnalysisError::CalculationError(format!("sideways distribution: {}", e)))?;
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(mix_symbol(seed, symbol)),
                    None => StdRng::from_entropy(),
                };
                Ok(normal.sample(&mut rng))
            }
        }
    }
}

/// FNV-1a over the symbol, starting from the caller's seed.
fn mix_symbol(seed: u64, symbol: &str) -> u64 {
    symbol
        .bytes()
        .fold(seed ^ 0xcbf2_9ce4_8422_2325, |acc, b| (acc ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3))
}

/// Trend and volatility over the lookback window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendEstimate {
    pub current_price: f64,
    pub sma_5: f64,
    pub sma_20: f64,
    pub volatility: f64,
    pub trend: f64,
}

pub fn estimate_trend(bars: &[Bar]) -> Result<TrendEstimate, AnalysisError> {
    if bars.len() < MIN_STAT_BARS {
        return Err(AnalysisError::InsufficientData(format!(
            "statistical path needs {} bars, got {}",
            MIN_STAT_BARS,
            bars.len()
        )));
    }

    let window = &bars[bars.len() - bars.len().min(STAT_LOOKBACK)..];
    let closes: Vec<f64> = window.iter().map(|b| b.close).collect();

    let current_price = ensure_finite("current price", closes[closes.len() - 1])?;
    let sma_5 = ensure_finite("sma_5", last_sma(&closes, 5).unwrap_or(f64::NAN))?;
    let sma_20 = ensure_finite("sma_20", last_sma(&closes, 20).unwrap_or(f64::NAN))?;

    if sma_20 == 0.0 {
        return Err(AnalysisError::CalculationError("sma_20 is zero".to_string()));
    }

    let returns = stats::pct_changes(&closes);
    if returns.len() < 2 {
        return Err(AnalysisError::InsufficientData("fewer than two returns".to_string()));
    }
    let volatility = ensure_finite("volatility", stats::std_dev(&returns))?;

    Ok(TrendEstimate {
        current_price,
        sma_5,
        sma_20,
        volatility,
        trend: (sma_5 - sma_20) / sma_20,
    })
}

/// Projected fractional change and direction for an estimate.
pub fn projected_change(
    estimate: &TrendEstimate,
    symbol: &str,
    sideways: &SidewaysDraw,
) -> Result<(f64, Direction), AnalysisError> {
    let vol = estimate.volatility;

    if estimate.trend > TREND_BAND {
        Ok((0.01 + vol * 0.5, Direction::Up))
    } else if estimate.trend < -TREND_BAND {
        Ok((-0.01 - vol * 0.5, Direction::Down))
    } else {
        let change = sideways.draw(symbol, vol * 0.3)?;
        // A zero draw counts as down
        let direction = if change > 0.0 { Direction::Up } else { Direction::Down };
        Ok((change, direction))
    }
}

pub fn statistical_confidence(estimate: &TrendEstimate) -> f64 {
    (0.5 + estimate.trend.abs() * 2.0 - estimate.volatility * 10.0).clamp(0.3, 0.8)
}
