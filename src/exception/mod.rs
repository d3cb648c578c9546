use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

use crate::error::BoxError;

pub mod http;

pub use http::HttpError;

/// Message used when a panic payload is neither `&str` nor `String`
const UNKNOWN_PANIC: &str = "handler panicked";

/// An error caught by the middleware
///
/// Every variant is answered with exactly one response and never propagates
/// past the middleware.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CaughtError {
    /// Raised by application code with an explicit status and payload
    #[error(transparent)]
    Http(HttpError),

    /// Any other error; always answered with 500
    #[error("{0}")]
    Other(Arc<dyn std::error::Error + Send + Sync>),

    /// A panic recovered while the handler was running
    #[error("{0}")]
    Panic(String),
}

impl CaughtError {
    /// Wrap an arbitrary error
    pub fn other(error: impl Into<BoxError>) -> Self {
        Self::Other(Arc::from(error.into()))
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            UNKNOWN_PANIC.to_string()
        };
        Self::Panic(message)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CaughtError::Http(error) => error.status_code(),
            CaughtError::Other(_) | CaughtError::Panic(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            CaughtError::Http(error) => error.message().to_string(),
            other => other.to_string(),
        }
    }

    /// The structured payload, if the error carries one
    pub fn data(&self) -> Option<&Value> {
        match self {
            CaughtError::Http(error) => error.data(),
            _ => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            CaughtError::Http(_) => "http",
            CaughtError::Other(_) => "other",
            CaughtError::Panic(_) => "panic",
        }
    }
}

impl From<HttpError> for CaughtError {
    fn from(error: HttpError) -> Self {
        CaughtError::Http(error)
    }
}

impl From<anyhow::Error> for CaughtError {
    fn from(error: anyhow::Error) -> Self {
        CaughtError::other(error)
    }
}

/// The raised error travels to the middleware in the response extensions.
///
/// Without the middleware (or when its filter skips the request) the client
/// sees this bare response: the resolved status and an empty body.
impl IntoResponse for CaughtError {
    fn into_response(self) -> Response {
        let mut response = self.status_code().into_response();
        response.extensions_mut().insert(self);
        response
    }
}
