use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::exception::CaughtError;

/// An error with an explicit status code and an optional payload.
///
/// Return it from a handler when you want control over what the client sees.
/// A status of `0` means "unspecified" and is answered with
/// `500 Internal Server Error`.
///
/// # Example
/// ```
/// use axum_errhandler::HttpError;
/// use serde_json::json;
///
/// async fn create_user() -> Result<String, HttpError> {
///     Err(HttpError::new(400, "Bad request").with_data(json!({ "Field": "Not empty" })))
/// }
/// ```
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HttpError {
    status: u16,
    message: String,
    data: Option<Value>,
}

impl HttpError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            data: None,
        }
    }

    /// Attach a structured payload, e.g. per-field validation messages.
    ///
    /// A payload that cannot be represented as JSON is dropped with a warning.
    pub fn with_data<T: Serialize>(mut self, data: T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => self.data = Some(value),
            Err(err) => {
                tracing::warn!(
                    reason = %self.message,
                    error = %err,
                    "Dropping unserializable error payload"
                );
            }
        }
        self
    }

    /// The status sent to the client
    pub fn status_code(&self) -> StatusCode {
        resolve_status(self.status)
    }

    /// The status exactly as given to [`HttpError::new`]
    pub fn raw_status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

pub(crate) fn resolve_status(status: u16) -> StatusCode {
    if status == 0 {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        CaughtError::Http(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zero_status_resolves_to_500() {
        let error = HttpError::new(0, "custom error handler");
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.raw_status(), 0);
    }

    #[test]
    fn test_explicit_status_is_kept() {
        let error = HttpError::new(403, "Cannot access this");
        assert_eq!(error.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_out_of_range_status_resolves_to_500() {
        assert_eq!(
            HttpError::new(1000, "nope").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            HttpError::new(42, "nope").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_is_message() {
        let error = HttpError::new(400, "Bad request").with_data(json!({ "Field": "Not empty" }));
        assert_eq!(error.to_string(), "Bad request");
        assert_eq!(error.data(), Some(&json!({ "Field": "Not empty" })));
    }

    #[test]
    fn test_with_data_accepts_serializable_structs() {
        #[derive(Serialize)]
        struct Person {
            #[serde(rename = "FirstName")]
            first_name: &'static str,
            #[serde(rename = "LastName")]
            last_name: &'static str,
        }

        let error = HttpError::new(401, "unauthorized").with_data(Person {
            first_name: "John",
            last_name: "Wick",
        });
        assert_eq!(
            error.data(),
            Some(&json!({ "FirstName": "John", "LastName": "Wick" }))
        );
    }

    #[test]
    fn test_unserializable_data_is_dropped() {
        use std::collections::HashMap;

        // JSON object keys must be strings
        let mut bad = HashMap::new();
        bad.insert(vec![1u8], "x");
        let error = HttpError::new(400, "Bad request").with_data(bad);
        assert!(error.data().is_none());
    }
}
