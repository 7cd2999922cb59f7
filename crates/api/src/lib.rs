//! HTTP API layer for bizlist.
//!
//! - **Endpoints**: JSON command-style routes for buyers, brokers and admins
//! - **Extractors**: the authenticated caller
//! - **Middleware**: bearer-token authentication and shared state
//!
//! Built on Axum 0.8 with a Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod views;

pub use endpoints::router;
pub use middleware::AppState;
