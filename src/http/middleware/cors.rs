//! CORS Middleware.
//! Echoes the caller's origin so credentialed requests are allowed, and
//! answers every preflight itself.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

pub const ALLOW_HEADERS: &str = "Content-Type, Authorization, Token, x-token";
pub const ALLOW_METHODS: &str = "POST, GET, OPTIONS, DELETE, PATCH, PUT";
pub const EXPOSE_HEADERS: &str =
    "Content-Length, Access-Control-Allow-Origin, Access-Control-Allow-Headers, Content-Type, x-token";

pub async fn cors_middleware(request: Request<Body>, next: Next) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();

    // OPTIONS never reaches a handler.
    let mut response = if request.method() == Method::OPTIONS {
        tracing::trace!(uri = %request.uri(), "Answering preflight");
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    apply_cors_headers(response.headers_mut(), origin);
    response
}

fn apply_cors_headers(headers: &mut HeaderMap, origin: Option<HeaderValue>) {
    // A wildcard would forbid cookies on XMLHttpRequest, so the origin is mirrored.
    if let Some(origin) = origin {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static(EXPOSE_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
}
