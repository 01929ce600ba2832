//! recommender: Evaluate BUY/SELL/HOLD recommendations and keep a log of them.
//!
//! Usage:
//!   cargo run -p recommender -- --symbols AAPL MSFT --data market.json
//!   cargo run -p recommender -- --symbols AAPL --data market.json --seed 42 --model price-model.json
//!   cargo run -p recommender -- --latest 10
//!   cargo run -p recommender -- --history AAPL

mod cli;
mod config;
mod market_data;

use anyhow::{bail, Context, Result};
use cli::CliArgs;
use config::RecommenderConfig;
use market_data::JsonMarketData;
use price_predictor::{LinearPriceModel, PricePredictor, SidewaysDraw};
use recommendation_engine::{RecommendationEngine, RecommendationService};
use recommendation_store::{SqliteRecommendationStore, DEFAULT_SYMBOL_LIMIT};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match CliArgs::parse(&args) {
        Ok(cli) if cli.has_work() => cli,
        Ok(_) => {
            eprintln!("{}", cli::usage());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {:#}\n\n{}", e, cli::usage());
            std::process::exit(2);
        }
    };

    let mut config = RecommenderConfig::from_env().context("invalid environment configuration")?;
    cli.apply(&mut config);

    tracing::info!(
        "recommender: {} symbols, db={}, concurrency={}",
        cli.symbols.len(),
        config.database_url,
        config.max_concurrency
    );

    let store = Arc::new(SqliteRecommendationStore::connect(&config.database_url).await?);

    if !cli.symbols.is_empty() {
        let service = build_service(&config, store.clone())?;
        let reports = service.recommend_many(&cli.symbols, config.max_concurrency).await;
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    if let Some(limit) = cli.latest {
        let rows = store.latest(limit).await?;
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }

    if let Some(symbol) = &cli.history {
        let rows = store.for_symbol(symbol, DEFAULT_SYMBOL_LIMIT).await?;
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "recommender=info,recommendation_engine=info".into());

    let json = std::env::var("LOG_FORMAT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false);

    // stdout carries the JSON results
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn build_service(config: &RecommenderConfig, store: Arc<SqliteRecommendationStore>) -> Result<RecommendationService> {
    let Some(data_path) = &config.market_data_path else {
        bail!("--data (or MARKET_DATA_PATH) is required to evaluate symbols");
    };
    let market = Arc::new(JsonMarketData::load(data_path)?);
    tracing::debug!("Market data symbols: {:?}", market.symbols());

    let mut predictor = PricePredictor::new()
        .with_days_ahead(config.days_ahead)
        .with_sideways_draw(SidewaysDraw::Random { seed: config.prediction_seed });

    if let Some(model_path) = &config.price_model_path {
        match LinearPriceModel::load(model_path) {
            Ok(model) => predictor = predictor.with_model(Arc::new(model)),
            Err(e) => tracing::warn!("Price model unavailable, using statistical prediction: {}", e),
        }
    }

    let service = RecommendationService::new(market.clone(), market, store, RecommendationEngine::new(predictor))
        .with_news_limit(config.news_limit)
        .with_history_bars(config.history_bars);

    Ok(service)
}
