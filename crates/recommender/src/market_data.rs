use analysis_core::{AnalysisError, Bar, NewsArticle, NewsSource, PriceDataSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolData {
    #[serde(default)]
    pub bars: Vec<Bar>,
    #[serde(default)]
    pub news: Vec<NewsArticle>,
}

/// Price and news collaborator backed by a JSON snapshot:
///
/// ```json
/// { "AAPL": { "bars": [{ "timestamp": "...", "open": 1.0, ... }], "news": [{ "title": "..." }] } }
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonMarketData {
    symbols: HashMap<String, SymbolData>,
}

impl JsonMarketData {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, SymbolData> = serde_json::from_str(json).context("invalid market data")?;

        let symbols = raw
            .into_iter()
            .map(|(symbol, mut data)| {
                data.bars.sort_by_key(|b| b.timestamp);
                (symbol.trim().to_uppercase(), data)
            })
            .collect();

        Ok(Self { symbols })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read market data from {}", path.display()))?;
        let data = Self::from_json(&json)?;
        tracing::info!("Loaded market data for {} symbols from {}", data.symbols.len(), path.display());
        Ok(data)
    }

    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.symbols.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    fn get(&self, symbol: &str) -> Result<&SymbolData, AnalysisError> {
        self.symbols
            .get(&symbol.trim().to_uppercase())
            .ok_or_else(|| AnalysisError::DataSourceError(format!("no market data for {}", symbol)))
    }
}

#[async_trait]
impl PriceDataSource for JsonMarketData {
    async fn history(&self, symbol: &str, bars: usize) -> Result<Vec<Bar>, AnalysisError> {
        let all = &self.get(symbol)?.bars;
        Ok(all[all.len().saturating_sub(bars)..].to_vec())
    }
}

#[async_trait]
impl NewsSource for JsonMarketData {
    async fn news_for_symbol(&self, symbol: &str, limit: usize) -> Result<Vec<NewsArticle>, AnalysisError> {
        Ok(self.get(symbol)?.news.iter().take(limit).cloned().collect())
    }
}
