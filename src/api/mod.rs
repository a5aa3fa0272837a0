//! API Module
//!
//! HTTP handlers and routing for the cache operations API.
//!
//! # Endpoints
//! - `GET /health` - Health and connection status
//! - `GET /stats` - Cache service counters
//! - `GET /cache/:namespace/:key` - Read a cached value
//! - `PUT /cache/:namespace/:key` - Store a value
//! - `DELETE /cache/:namespace/:key` - Delete a value
//! - `DELETE /cache/:namespace` - Flush a namespace

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
