//! HTTP API Module
//!
//! Routing, handlers, and middleware for the batch generation endpoint and
//! the status endpoints.

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use middleware::start_cleanup_task;
pub use routes::create_router;
pub use types::*;
