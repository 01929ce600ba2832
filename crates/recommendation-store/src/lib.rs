pub mod db;
pub mod memory;
pub mod models;
pub mod sqlite;

pub use db::RecommendationDb;
pub use memory::MemoryRecommendationStore;
pub use models::{StoredRecommendation, DEFAULT_LATEST_LIMIT, DEFAULT_SYMBOL_LIMIT};
pub use sqlite::SqliteRecommendationStore;
