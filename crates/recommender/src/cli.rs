use crate::config::RecommenderConfig;
use anyhow::{bail, Context, Result};
use recommendation_store::DEFAULT_LATEST_LIMIT;
use std::path::PathBuf;
use std::str::FromStr;

/// Parsed command line. Flags override the environment configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub symbols: Vec<String>,
    pub data: Option<PathBuf>,
    pub db: Option<String>,
    pub seed: Option<u64>,
    pub model: Option<PathBuf>,
    pub latest: Option<usize>,
    pub history: Option<String>,
    pub concurrency: Option<usize>,
}

impl CliArgs {
    /// Parse arguments, excluding the program name.
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut parsed = Self::default();
        let mut i = 0;

        while i < args.len() {
            let flag = args[i].as_str();
            i += 1;

            match flag {
                "--symbols" => {
                    while i < args.len() && !args[i].starts_with("--") {
                        parsed.symbols.push(args[i].trim().to_uppercase());
                        i += 1;
                    }
                    if parsed.symbols.is_empty() {
                        bail!("--symbols needs at least one symbol");
                    }
                }
                "--data" => parsed.data = Some(PathBuf::from(value(args, &mut i, flag)?)),
                "--db" => parsed.db = Some(value(args, &mut i, flag)?.to_string()),
                "--seed" => parsed.seed = Some(parse_value(args, &mut i, flag)?),
                "--model" => parsed.model = Some(PathBuf::from(value(args, &mut i, flag)?)),
                "--latest" => {
                    let has_value = args.get(i).is_some_and(|v| !v.starts_with("--"));
                    parsed.latest = Some(if has_value {
                        parse_value(args, &mut i, flag)?
                    } else {
                        DEFAULT_LATEST_LIMIT
                    });
                }
                "--history" => parsed.history = Some(value(args, &mut i, flag)?.trim().to_uppercase()),
                "--concurrency" => parsed.concurrency = Some(parse_value(args, &mut i, flag)?),
                other => bail!("unknown argument {:?}", other),
            }
        }

        Ok(parsed)
    }

    pub fn has_work(&self) -> bool {
        !self.symbols.is_empty() || self.latest.is_some() || self.history.is_some()
    }

    pub fn apply(&self, config: &mut RecommenderConfig) {
        if let Some(data) = &self.data {
            config.market_data_path = Some(data.clone());
        }
        if let Some(db) = &self.db {
            config.database_url = db.clone();
        }
        if let Some(seed) = self.seed {
            config.prediction_seed = Some(seed);
        }
        if let Some(model) = &self.model {
            config.price_model_path = Some(model.clone());
        }
        if let Some(concurrency) = self.concurrency {
            config.max_concurrency = concurrency;
        }
    }
}

pub fn usage() -> &'static str {
    "Usage:
  recommender --symbols AAPL MSFT ...   Evaluate and store recommendations
  recommender --latest [N]              Print the N (default 10) most recent stored recommendations
  recommender --history SYMBOL          Print stored recommendations for one symbol

Options:
  --data PATH          JSON market data (bars and news per symbol)
  --db URL             SQLite database (default: sqlite:recommendations.db)
  --seed N             Seed for the sideways price draw
  --model PATH         Linear price model artifact (JSON)
  --concurrency N      Max symbols evaluated at once (default: 4)"
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    let v = args
        .get(*i)
        .filter(|v| !v.starts_with("--"))
        .with_context(|| format!("{} needs a value", flag))?;
    *i += 1;
    Ok(v.as_str())
}

fn parse_value<T>(args: &[String], i: &mut usize, flag: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = value(args, i, flag)?;
    raw.parse().with_context(|| format!("{} has invalid value {:?}", flag, raw))
}
