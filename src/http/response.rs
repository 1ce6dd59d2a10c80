//! Uniform response envelope.
//!
//! Every outcome, success or failure, is rendered as
//! `{"code": <int>, "message": <string>, "data": <any>}` with transport
//! status 200. The business result lives in `code`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

pub const SUCCESS_CODE: i32 = 200;
pub const BAD_REQUEST_CODE: i32 = 400;
pub const UNAUTHORIZED_CODE: i32 = 401;
pub const FORBIDDEN_CODE: i32 = 403;
pub const NOT_FOUND_CODE: i32 = 404;
pub const METHOD_NOT_ALLOWED_CODE: i32 = 405;
pub const SERVER_ERROR_CODE: i32 = 500;

pub const SUCCESS_MESSAGE: &str = "成功";
pub const SERVER_ERROR_MESSAGE: &str = "服务器错误";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::custom(SUCCESS_CODE, SUCCESS_MESSAGE, Some(data))
    }

    pub fn custom(code: i32, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }
}

impl ApiResponse<()> {
    /// Failure envelope; `data` is always `null`.
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self::custom(code, message, None)
    }
}

impl<T> ApiResponse<PageResult<T>> {
    pub fn page(list: Vec<T>, total: i64, page: u64, page_size: u64) -> Self {
        Self::success(PageResult {
            list,
            total,
            page,
            page_size,
        })
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub list: Vec<T>,
    pub total: i64,
    pub page: u64,
    #[serde(rename = "pageSize")]
    pub page_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::success(json!({"id": 7}))).unwrap();
        assert_eq!(body, json!({"code": 200, "message": "成功", "data": {"id": 7}}));
    }

    #[test]
    fn error_envelope_has_null_data() {
        let body = serde_json::to_value(ApiResponse::error(FORBIDDEN_CODE, "denied")).unwrap();
        assert_eq!(body, json!({"code": 403, "message": "denied", "data": null}));
    }

    #[test]
    fn page_envelope_uses_camel_case_page_size() {
        let body = serde_json::to_value(ApiResponse::page(vec!["a", "b"], 12, 2, 2)).unwrap();
        assert_eq!(
            body,
            json!({
                "code": 200,
                "message": "成功",
                "data": {"list": ["a", "b"], "total": 12, "page": 2, "pageSize": 2}
            })
        );
    }

    #[test]
    fn transport_status_is_always_ok() {
        let response = ApiResponse::error(SERVER_ERROR_CODE, SERVER_ERROR_MESSAGE).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
