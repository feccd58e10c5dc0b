//! # rolegate-api
//!
//! HTTP API layer for Rolegate built on Axum.
//!
//! Provides all REST endpoints, the bearer-token extractor, the admin
//! guard, DTOs, CORS, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
