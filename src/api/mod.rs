//! HTTP API layer.
//!
//! Exposes the lab mock service and the DiagnoML API health endpoints as
//! composable axum routers, plus a small server lifecycle wrapper.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::{diagnoml_router, lab_mock_router, lab_mock_router_with_ctx};
pub use server::{start_server, ServerError, ServerHandle, ServerSession};
pub use types::ApiContext;
