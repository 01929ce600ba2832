use analysis_core::{SentimentLabel, SentimentObservation};

/// Financial terms counted as bullish. Matching is a case-insensitive
/// substring test, so "surges" matches "surge".
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "surge", "jump", "rise", "gain", "profit", "earnings", "growth",
    "positive", "bullish", "rally", "breakout", "strong", "up", "higher",
    "beat", "exceed", "outperform", "recovery", "bounce", "climb",
];

/// Financial terms counted as bearish.
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "fall", "drop", "decline", "loss", "crash", "bearish", "weak",
    "negative", "down", "plunge", "slump", "concern", "risk", "lower",
    "miss", "disappoint", "underperform", "selloff", "correction",
];

const SCORE_PER_MATCH: f64 = 0.2;
const MAX_SCORE: f64 = 0.8;
const MAX_CONFIDENCE: f64 = 0.9;
const TIE_CONFIDENCE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordCounts {
    pub positive: usize,
    pub negative: usize,
}

/// Number of keywords from each list that occur in `text`. Each keyword
/// counts at most once.
pub fn count_keywords(text: &str) -> KeywordCounts {
    let text_lower = text.to_lowercase();
    KeywordCounts {
        positive: POSITIVE_KEYWORDS.iter().filter(|k| text_lower.contains(*k)).count(),
        negative: NEGATIVE_KEYWORDS.iter().filter(|k| text_lower.contains(*k)).count(),
    }
}

/// Keyword-count sentiment used when no trained classifier is available.
pub fn classify_keywords(text: &str) -> SentimentObservation {
    let counts = count_keywords(text);
    let (positive, negative) = (counts.positive as f64, counts.negative as f64);
    let total = positive + negative;

    if counts.positive > counts.negative {
        SentimentObservation {
            score: (positive * SCORE_PER_MATCH).min(MAX_SCORE),
            label: SentimentLabel::Positive,
            confidence: (positive / total * MAX_CONFIDENCE).min(MAX_CONFIDENCE),
        }
    } else if counts.negative > counts.positive {
        SentimentObservation {
            score: -(negative * SCORE_PER_MATCH).min(MAX_SCORE),
            label: SentimentLabel::Negative,
            confidence: (negative / total * MAX_CONFIDENCE).min(MAX_CONFIDENCE),
        }
    } else {
        SentimentObservation {
            score: 0.0,
            label: SentimentLabel::Neutral,
            confidence: TIE_CONFIDENCE,
        }
    }
}
