//! HTTP endpoint handlers.
//!
//! Handlers are thin: lab logic lives in `crate::lab`.

pub mod health;
pub mod labs;
pub mod root;
