//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!
//! Consumers (logging.rs):
//!     → console (pretty, ANSI in debug mode)
//!     → log file (JSON lines)
//! ```
//!
//! # Design Decisions
//! - Subscriber is built once from the startup snapshot
//! - Request ID flows through the HTTP trace span

pub mod logging;

pub use logging::{init_logging, LoggingError};
