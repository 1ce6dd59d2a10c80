//! Panic recovery.
//!
//! A panic anywhere below this layer becomes the standard 500 envelope. The
//! connection and the server stay up.

use std::any::Any;

use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;

use crate::http::response::{ApiResponse, SERVER_ERROR_CODE, SERVER_ERROR_MESSAGE};

pub type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

pub fn recovery_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(handle_panic as PanicHandler)
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    ApiResponse::error(SERVER_ERROR_CODE, SERVER_ERROR_MESSAGE).into_response()
}
