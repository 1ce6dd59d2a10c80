//! Web service bootstrap library.
//!
//! Hot-reloadable configuration, structured logging, and an axum HTTP
//! surface that answers with a uniform `{code, message, data}` envelope.

pub mod config;
pub mod db;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::{AppConfig, ConfigStore};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
