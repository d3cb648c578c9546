//! The default error response policy

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, Uri, header},
    response::Response,
};
use serde_json::Value;
use std::sync::Arc;

use crate::common::{ErrorBody, response};
use crate::config::Config;
use crate::exception::CaughtError;
use crate::negotiate::{ResponseFormat, negotiate};
use crate::template::TemplateContext;

/// What a custom [`ErrorHandler`](crate::ErrorHandler) gets to see of the
/// request
///
/// The request itself has been consumed by the time an error is caught, so
/// the middleware keeps a copy of its head.
#[derive(Debug, Clone)]
pub struct RequestHead {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
}

impl RequestHead {
    pub(crate) fn from_request(request: &Request<Body>) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// What the middleware keeps of a request while the inner service runs
pub(crate) enum Captured {
    /// Everything a custom handler may look at
    Head(RequestHead),
    /// Only the headers `negotiate` reads
    Negotiation(HeaderMap),
}

impl Captured {
    pub(crate) fn from_request(config: &Config, request: &Request<Body>) -> Self {
        if config.handler.is_some() {
            return Self::Head(RequestHead::from_request(request));
        }

        let mut headers = HeaderMap::with_capacity(2);
        for name in [header::ACCEPT, header::CONTENT_TYPE] {
            if let Some(value) = request.headers().get(&name) {
                headers.insert(name, value.clone());
            }
        }
        Self::Negotiation(headers)
    }

    fn headers(&self) -> &HeaderMap {
        match self {
            Self::Head(head) => head.headers(),
            Self::Negotiation(headers) => headers,
        }
    }
}

/// The default policy, handed to custom error handlers
///
/// Consuming it produces the response the middleware would have written
/// without a custom handler.
pub struct Fallback {
    config: Arc<Config>,
    format: ResponseFormat,
    error: CaughtError,
}

impl Fallback {
    pub(crate) fn new(config: Arc<Config>, format: ResponseFormat, error: CaughtError) -> Self {
        Self { config, format, error }
    }

    /// Respond using the error's own message
    pub fn respond(self) -> Response {
        let message = self.error.message();
        respond(&self.config, self.format, &self.error, message)
    }

    /// Respond with `message` in place of the error's message
    pub fn respond_with(self, message: impl Into<String>) -> Response {
        respond(&self.config, self.format, &self.error, message.into())
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }
}

/// Write the response for `error` in the negotiated `format`.
pub(crate) fn respond(
    config: &Config,
    format: ResponseFormat,
    error: &CaughtError,
    message: String,
) -> Response {
    let status = error.status_code();
    let data = error
        .data()
        .cloned()
        .unwrap_or_else(|| Value::String(message.clone()));

    match format {
        ResponseFormat::Json => response::json(status, ErrorBody::new(message, data)),
        ResponseFormat::PlainText => response::plain_text(status, message),
        ResponseFormat::Template => {
            let context = TemplateContext { message, data };
            match config.templates.render(&config.template_name, &context) {
                Ok(page) => response::html(status, page),
                Err(err) => {
                    tracing::error!(
                        template = %config.template_name,
                        error = %err,
                        "Failed to render error template; answering in plain text"
                    );
                    response::plain_text(status, context.message)
                }
            }
        }
    }
}

/// Answer `error` for the captured request, honouring a custom handler if
/// one is configured.
pub(crate) fn handle(config: &Arc<Config>, captured: &Captured, error: CaughtError) -> Response {
    let format = negotiate(captured.headers(), config.use_template);

    if config.log {
        log_error(&error);
    }

    match (&config.handler, captured) {
        (Some(handler), Captured::Head(head)) => {
            let fallback = Fallback::new(Arc::clone(config), format, error.clone());
            handler.handle(head, &error, fallback).unwrap_or_else(|| {
                tracing::debug!(
                    path = head.path(),
                    "Custom error handler left the error unhandled"
                );
                response::unhandled()
            })
        }
        _ => {
            let message = error.message();
            respond(config, format, &error, message)
        }
    }
}

fn log_error(error: &CaughtError) {
    let status = error.status_code().as_u16();
    match error.data() {
        Some(data) => tracing::error!(
            status,
            kind = error.kind(),
            reason = %error.message(),
            data = %data,
            "Request failed"
        ),
        None => tracing::error!(
            status,
            kind = error.kind(),
            reason = %error.message(),
            "Request failed"
        ),
    }
}
