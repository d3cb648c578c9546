use axum::{
    Json,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

/// JSON body of an error response
///
/// `error` holds the structured payload when there is one, otherwise the
/// message again.
///
/// ```json
/// {"message": "Bad request", "error": {"Field": "Not empty"}}
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub error: Value,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>, error: Value) -> Self {
        Self {
            message: message.into(),
            error,
        }
    }
}

pub(crate) fn json(status: StatusCode, body: ErrorBody) -> Response {
    (status, Json(body)).into_response()
}

pub(crate) fn plain_text(status: StatusCode, message: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        message,
    )
        .into_response()
}

pub(crate) fn html(status: StatusCode, page: String) -> Response {
    (status, Html(page)).into_response()
}

/// What the client gets when a custom handler leaves an error unanswered
pub(crate) fn unhandled() -> Response {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    plain_text(status, status.canonical_reason().unwrap_or("Internal Server Error").to_string())
}
