//! # axum-errhandler
//!
//! Error-handling middleware for axum. It catches errors raised by handlers,
//! errors returned by inner services and panics, and answers each with a
//! response shaped by what the client accepts:
//!
//! - **JSON** when `Accept` lists `application/json` or the request body is JSON:
//!   `{"message": "...", "error": <payload or message>}`
//! - **HTML** rendered from the `error` template when templates are enabled and
//!   the client accepts HTML
//! - **plain text** (the message) otherwise
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use axum_errhandler::{CaughtError, Config, ErrorHandlerLayer, HttpError};
//! use serde_json::json;
//!
//! async fn validate() -> Result<&'static str, HttpError> {
//!     Err(HttpError::new(400, "Bad request").with_data(json!({ "Field": "Not empty" })))
//! }
//!
//! async fn load() -> Result<String, CaughtError> {
//!     let text = std::fs::read_to_string("missing.txt").map_err(CaughtError::other)?;
//!     Ok(text)
//! }
//!
//! async fn boom() -> &'static str {
//!     panic!("i'm panic")
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .route("/400", get(validate))
//!         .route("/load", get(load))
//!         .route("/panic", get(boom))
//!         .layer(ErrorHandlerLayer::new(Config::builder().log(true).build()));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod common;
pub mod config;
pub mod error;
pub mod exception;
pub mod middleware;
pub mod negotiate;
pub mod responder;
pub mod template;

// Re-export core types
pub use common::ErrorBody;
pub use config::{Config, ConfigBuilder, ErrorHandler, Filter};
pub use error::{BoxError, TemplateError};
pub use exception::{CaughtError, HttpError};
pub use middleware::{ErrorHandlerLayer, ErrorHandlerMiddleware};
pub use negotiate::ResponseFormat;
pub use responder::{Fallback, RequestHead};
pub use template::{ERROR_TEMPLATE, ErrorPage, TemplateContext, TemplateEngine};

/// The middleware with default settings: no filter, no custom handler, no
/// templates, no logging.
pub fn layer() -> ErrorHandlerLayer {
    ErrorHandlerLayer::default()
}

/// The middleware with the given settings
pub fn layer_with(config: Config) -> ErrorHandlerLayer {
    ErrorHandlerLayer::new(config)
}

/// Prelude module for convenient imports
///
/// ```
/// use axum_errhandler::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{Config, ConfigBuilder, ErrorHandler, Filter};
    pub use crate::exception::{CaughtError, HttpError};
    pub use crate::middleware::ErrorHandlerLayer;
    pub use crate::responder::{Fallback, RequestHead};
    pub use crate::template::{TemplateContext, TemplateEngine};
    pub use crate::{layer, layer_with};
}
