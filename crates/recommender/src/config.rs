use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommenderConfig {
    // Storage
    pub database_url: String,

    // Inputs
    pub market_data_path: Option<PathBuf>,
    pub price_model_path: Option<PathBuf>,

    // Prediction
    pub prediction_seed: Option<u64>,
    pub days_ahead: u32,

    // Collaborator limits
    pub news_limit: usize,
    pub history_bars: usize,
    pub max_concurrency: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:recommendations.db".to_string(),
            market_data_path: None,
            price_model_path: None,
            prediction_seed: None,
            days_ahead: 5,
            news_limit: 10,
            history_bars: 60,
            max_concurrency: 4,
        }
    }
}

impl RecommenderConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            market_data_path: lookup("MARKET_DATA_PATH").map(PathBuf::from),
            price_model_path: lookup("PRICE_MODEL_PATH").map(PathBuf::from),
            prediction_seed: parse_optional(&lookup, "PREDICTION_SEED")?,
            days_ahead: parse_optional(&lookup, "PREDICTION_DAYS_AHEAD")?.unwrap_or(defaults.days_ahead),
            news_limit: parse_optional(&lookup, "NEWS_LIMIT")?.unwrap_or(defaults.news_limit),
            history_bars: parse_optional(&lookup, "HISTORY_BARS")?.unwrap_or(defaults.history_bars),
            max_concurrency: parse_optional(&lookup, "MAX_CONCURRENCY")?.unwrap_or(defaults.max_concurrency),
        })
    }
}

fn parse_optional<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| raw.trim().parse::<T>().with_context(|| format!("{} has invalid value {:?}", key, raw)))
        .transpose()
}
