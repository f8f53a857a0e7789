//! Database module for selecting and connecting the document store
//!
//! A `memory://` URL selects the in-process store; anything else is handed to
//! the MongoDB driver.

use std::{env, sync::Arc};

use serde::Deserialize;
use tracing::info;

use crate::{
    error::StoreResult,
    memory::MemoryStore,
    mongo::MongoStore,
    store::DocumentStore,
};

/// URL scheme selecting the in-process store
pub const MEMORY_SCHEME: &str = "memory://";

/// Database configuration struct
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Database holding the application collections
    #[serde(default = "default_database_name")]
    pub database_name: String,
}

fn default_database_url() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database_name() -> String {
    "dishDynamoDB".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            database_name: default_database_name(),
        }
    }
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `DATABASE_URL`: connection URL (default: "mongodb://localhost:27017")
    /// - `DATABASE_NAME`: database name (default: "dishDynamoDB")
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| default_database_url()),
            database_name: env::var("DATABASE_NAME").unwrap_or_else(|_| default_database_name()),
        }
    }

    pub fn is_memory(&self) -> bool {
        self.database_url.starts_with(MEMORY_SCHEME)
    }
}

/// Connect the document store described by `config`
pub async fn connect(config: &DatabaseConfig) -> StoreResult<Arc<dyn DocumentStore>> {
    if config.is_memory() {
        info!("Using in-memory document store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = MongoStore::connect(config).await?;
    Ok(Arc::new(store))
}

/// Check document store connectivity
///
/// # Returns
///
/// * `StoreResult<bool>` - True if the store answered a ping
pub async fn health_check(store: &dyn DocumentStore) -> StoreResult<bool> {
    store.ping().await?;
    Ok(true)
}
