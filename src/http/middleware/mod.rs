//! Request middleware.
//!
//! - `cors`: origin mirroring and preflight short-circuit
//! - `recovery`: panic to error envelope

pub mod cors;
pub mod recovery;

pub use cors::cors_middleware;
pub use recovery::recovery_layer;
