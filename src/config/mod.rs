use axum::{body::Body, http::Request, response::Response};
use std::fmt;
use std::sync::Arc;

use crate::exception::CaughtError;
use crate::responder::{Fallback, RequestHead};
use crate::template::{ERROR_TEMPLATE, ErrorPage, TemplateEngine};

/// Decides whether the middleware should stay out of a request
///
/// Returning `true` skips error handling entirely: raised errors keep their
/// bare response and panics are not caught.
pub trait Filter: Send + Sync + 'static {
    fn skip(&self, request: &Request<Body>) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&Request<Body>) -> bool + Send + Sync + 'static,
{
    fn skip(&self, request: &Request<Body>) -> bool {
        self(request)
    }
}

/// Replaces the default response policy
///
/// Return `Some(response)` to answer the request yourself, or delegate with
/// [`Fallback::respond`] / [`Fallback::respond_with`]. Returning `None`
/// leaves the error unhandled and the client receives a bare
/// `500 Internal Server Error`.
///
/// # Example
/// ```
/// use axum::{Json, http::StatusCode, response::IntoResponse};
/// use axum_errhandler::{CaughtError, Config, Fallback, RequestHead};
/// use serde_json::json;
///
/// let config = Config::builder()
///     .handler(|head: &RequestHead, error: &CaughtError, fallback: Fallback| {
///         if head.path() == "/err" {
///             let body = Json(json!({ "message": error.message() }));
///             return Some((StatusCode::BAD_REQUEST, body).into_response());
///         }
///         Some(fallback.respond())
///     })
///     .build();
/// ```
pub trait ErrorHandler: Send + Sync + 'static {
    fn handle(
        &self,
        request: &RequestHead,
        error: &CaughtError,
        fallback: Fallback,
    ) -> Option<Response>;
}

impl<F> ErrorHandler for F
where
    F: Fn(&RequestHead, &CaughtError, Fallback) -> Option<Response> + Send + Sync + 'static,
{
    fn handle(
        &self,
        request: &RequestHead,
        error: &CaughtError,
        fallback: Fallback,
    ) -> Option<Response> {
        self(request, error, fallback)
    }
}

/// Middleware configuration
///
/// Built once when the layer is registered and shared, read-only, by every
/// request.
#[derive(Clone)]
pub struct Config {
    pub(crate) filter: Option<Arc<dyn Filter>>,
    pub(crate) handler: Option<Arc<dyn ErrorHandler>>,
    pub(crate) use_template: bool,
    pub(crate) log: bool,
    pub(crate) templates: Arc<dyn TemplateEngine>,
    pub(crate) template_name: String,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn use_template(&self) -> bool {
        self.use_template
    }

    pub fn log(&self) -> bool {
        self.log
    }

    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    pub(crate) fn skips(&self, request: &Request<Body>) -> bool {
        self.filter.as_ref().is_some_and(|f| f.skip(request))
    }
}

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::new().build()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("filter", &self.filter.is_some())
            .field("handler", &self.handler.is_some())
            .field("use_template", &self.use_template)
            .field("log", &self.log)
            .field("template_name", &self.template_name)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Config`]
///
/// # Example
/// ```
/// use axum::{body::Body, http::Request};
/// use axum_errhandler::Config;
///
/// let config = Config::builder()
///     .filter(|req: &Request<Body>| req.uri().path().starts_with("/health"))
///     .use_template(true)
///     .log(true)
///     .build();
/// ```
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config {
                filter: None,
                handler: None,
                use_template: false,
                log: false,
                templates: Arc::new(ErrorPage),
                template_name: ERROR_TEMPLATE.to_string(),
            },
        }
    }

    /// Skip error handling for requests matching `filter`
    pub fn filter(mut self, filter: impl Filter) -> Self {
        self.config.filter = Some(Arc::new(filter));
        self
    }

    /// Replace the default response policy
    pub fn handler(mut self, handler: impl ErrorHandler) -> Self {
        self.config.handler = Some(Arc::new(handler));
        self
    }

    /// Render a template for clients that accept HTML
    ///
    /// When off, those clients get the JSON body instead.
    pub fn use_template(mut self, use_template: bool) -> Self {
        self.config.use_template = use_template;
        self
    }

    /// Emit every handled error as a `tracing` event
    pub fn log(mut self, log: bool) -> Self {
        self.config.log = log;
        self
    }

    /// Use your own template engine instead of [`ErrorPage`]
    pub fn templates(mut self, templates: impl TemplateEngine) -> Self {
        self.config.templates = Arc::new(templates);
        self
    }

    pub fn template_name(mut self, name: impl Into<String>) -> Self {
        self.config.template_name = name.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.filter.is_none());
        assert!(config.handler.is_none());
        assert!(!config.use_template());
        assert!(!config.log());
        assert_eq!(config.template_name(), "error");
    }

    #[test]
    fn test_filter_closure() {
        let config = Config::builder()
            .filter(|req: &Request<Body>| req.uri().path() == "/err")
            .build();

        let filtered = Request::get("/err").body(Body::empty()).unwrap();
        let kept = Request::get("/400").body(Body::empty()).unwrap();
        assert!(config.skips(&filtered));
        assert!(!config.skips(&kept));
    }

    #[test]
    fn test_no_filter_skips_nothing() {
        let request = Request::get("/err").body(Body::empty()).unwrap();
        assert!(!Config::default().skips(&request));
    }

    #[test]
    fn test_debug_hides_callbacks() {
        let config = Config::builder().log(true).build();
        let debug = format!("{config:?}");
        assert!(debug.contains("log: true"));
        assert!(debug.contains("filter: false"));
    }
}
