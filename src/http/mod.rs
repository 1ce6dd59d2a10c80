//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup)
//!     → request.rs (request ID)
//!     → middleware/cors.rs (preflight answered here)
//!     → middleware/recovery.rs (panics become envelopes)
//!     → handler → Result<ApiResponse<T>, AppError>
//!     → response.rs / error.rs (envelope)
//!     → Send to client
//! ```

pub mod error;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use error::{AppError, AppResult};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{ApiResponse, PageResult};
pub use server::{AppState, HttpServer};
