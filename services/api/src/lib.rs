//! DishDynamo API service
//!
//! REST backend for the DishDynamo food-ordering front end: catalog browsing
//! and search, user-submitted listings, orders and blog content, with
//! cookie-carried JWT authentication guarding per-user data.

pub mod config;
pub mod cookie;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
