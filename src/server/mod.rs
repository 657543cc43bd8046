//! Axum-based HTTP server for wildlife-id.
//!
//! Exposes the identification session to a browser page: select an image,
//! run the identification, read back the result or the error banner.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual endpoints.
//! - `routes`: The router configuration and shared state.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod routes;

pub use handlers::{HealthResponse, HealthStatus};
pub use routes::{create_router, AppState};
