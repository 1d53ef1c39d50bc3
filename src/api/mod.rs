//! HTTP API: router, handlers, error mapping, server lifecycle.

pub mod error;
pub mod router;
pub mod routes;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::{app_router, build_router};
pub use types::ApiContext;
