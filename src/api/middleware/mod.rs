//! HTTP middleware.
//!
//! Execution order (outermost → innermost):
//! 1. CORS — answers preflight requests before routing
//! 2. Access log — method, path, status, latency

pub mod audit;
