use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// OHLCV bar data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// News article as returned by a news collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
}

impl NewsArticle {
    /// Text handed to the sentiment classifier.
    pub fn text(&self) -> String {
        if self.summary.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.title, self.summary)
        }
    }
}

/// Final trading decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
        }
    }

    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 3 => Action::Buy,
            s if s <= -3 => Action::Sell,
            _ => Action::Hold,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BUY" => Some(Action::Buy),
            "SELL" => Some(Action::Sell),
            "HOLD" => Some(Action::Hold),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    /// Market-mood label for an aggregate score.
    pub fn from_score(score: f64) -> Self {
        if score > 0.2 {
            SentimentLabel::Positive
        } else if score < -0.2 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Neutral,
}

/// Which path produced a price prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionModel {
    Statistical,
    Ml,
    Default,
}

/// Technical indicators derived from the close series. Values that could not
/// be computed are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorBundle {
    pub rsi: f64,
    pub sma_20: f64,
    pub sma_50: f64,
    pub macd: f64,
    pub macd_signal: f64,
}

/// Point-in-time price snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub current_price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: f64,
}

impl PricePoint {
    /// Snapshot from the last two bars of a chronological history. Returns the
    /// zero-valued snapshot when there are no bars.
    pub fn from_bars(bars: &[Bar]) -> Self {
        let Some(last) = bars.last() else {
            return Self::default();
        };

        let (change, change_percent) = match bars.len().checked_sub(2).map(|i| &bars[i]) {
            Some(prev) if prev.close != 0.0 => {
                let change = last.close - prev.close;
                (change, change / prev.close * 100.0)
            }
            _ => (0.0, 0.0),
        };

        Self {
            current_price: last.close,
            change,
            change_percent,
            volume: last.volume,
        }
    }
}

/// Sentiment of a single news item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentObservation {
    pub score: f64,
    pub label: SentimentLabel,
    pub confidence: f64,
}

/// Aggregate market mood over a batch of observations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub score: f64,
    pub label: SentimentLabel,
    pub count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
}

impl SentimentSummary {
    pub fn empty() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            count: 0,
            positive_count: 0,
            negative_count: 0,
            neutral_count: 0,
        }
    }
}

impl Default for SentimentSummary {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePrediction {
    pub current_price: f64,
    pub predicted_price: f64,
    pub target_price: f64,
    pub days_ahead: u32,
    pub confidence: f64,
    pub direction: Direction,
    pub model: PredictionModel,
}

impl PricePrediction {
    pub const DEFAULT_DAYS_AHEAD: u32 = 5;

    /// Zero-valued prediction used when neither prediction path can run.
    pub fn fallback() -> Self {
        Self {
            current_price: 0.0,
            predicted_price: 0.0,
            target_price: 0.0,
            days_ahead: Self::DEFAULT_DAYS_AHEAD,
            confidence: 0.3,
            direction: Direction::Neutral,
            model: PredictionModel::Default,
        }
    }
}

impl Default for PricePrediction {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Output of the rule-based technical scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmResult {
    pub action: Action,
    pub score: i32,
    pub reasons: Vec<String>,
}

impl AlgorithmResult {
    pub fn fallback() -> Self {
        Self {
            action: Action::Hold,
            score: 0,
            reasons: vec!["Algorithm error - defaulting to HOLD".to_string()],
        }
    }
}

/// Final recommendation handed to the storage collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub symbol: String,
    pub recommendation: Action,
    pub confidence_score: f64,
    pub algorithm_recommendation: Action,
    pub sentiment_score: f64,
    pub current_price: f64,
    pub target_price: f64,
    pub reasoning: String,
    pub created_at: DateTime<Utc>,
}

impl Recommendation {
    /// Well-formed HOLD returned when an evaluation cannot run at all.
    pub fn fallback(symbol: &str) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            recommendation: Action::Hold,
            confidence_score: 0.3,
            algorithm_recommendation: Action::Hold,
            sentiment_score: 0.0,
            current_price: 0.0,
            target_price: 0.0,
            reasoning: "Unable to generate recommendation - defaulting to HOLD".to_string(),
            created_at: Utc::now(),
        }
    }
}
