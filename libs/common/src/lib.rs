//! Common library for the DishDynamo API
//!
//! This crate provides the document store the API service persists to: the
//! store abstraction, its MongoDB and in-memory backends, connection
//! configuration and error types.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, connect, health_check};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let store = connect(&config).await?;
//!     let is_healthy = health_check(store.as_ref()).await?;
//!     println!("Document store health check: {}", is_healthy);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod memory;
pub mod mongo;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::{Document, DocumentId, DocumentStore, Filter, FindQuery, Projection, Update};
