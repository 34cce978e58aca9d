use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON body shared by every error response: `{"kind": "...", "detail": "..."}`.
///
/// `detail` is the human-readable message clients display; `kind` is a stable
/// SCREAMING_SNAKE_CASE code.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub kind: &'a str,
    pub detail: String,
}

/// Build an error response with the shared JSON body.
pub fn error_response(status: StatusCode, kind: &str, detail: impl Into<String>) -> Response {
    let body = ErrorBody {
        kind,
        detail: detail.into(),
    };
    (status, axum::Json(body)).into_response()
}

/// Build a 401 response carrying a `WWW-Authenticate: Bearer` challenge.
pub fn unauthorized_response(kind: &str, detail: impl Into<String>) -> Response {
    let mut response = error_response(StatusCode::UNAUTHORIZED, kind, detail);
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}
