//! Server-rendered error pages
//!
//! The middleware does not know about any particular template engine. It
//! hands a [`TemplateContext`] and a template name to a [`TemplateEngine`],
//! which decides how values are escaped. [`ErrorPage`] is the built-in
//! engine, backed by askama.

use askama::Template;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, TemplateError};

/// Name of the template rendered for errors
pub const ERROR_TEMPLATE: &str = "error";

/// Data passed to the error template
///
/// Serializes as `{"Message": ..., "Data": ...}` for engines that consume
/// JSON-like contexts.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext {
    #[serde(rename = "Message")]
    pub message: String,
    /// The error payload, or the message again when there is none
    #[serde(rename = "Data")]
    pub data: Value,
}

/// A renderer for named templates
///
/// Implement this to plug your application's template engine into the
/// middleware.
pub trait TemplateEngine: Send + Sync + 'static {
    fn render(&self, name: &str, context: &TemplateContext) -> Result<String>;
}

#[derive(Debug, Template)]
#[template(source = "{{ message }}<br />{{ data }}", ext = "html")]
struct ErrorPageTemplate<'a> {
    message: &'a str,
    data: &'a str,
}

/// The default engine: a minimal HTML page with the message and a
/// human-readable summary of the payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorPage;

impl TemplateEngine for ErrorPage {
    fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        if name != ERROR_TEMPLATE {
            return Err(TemplateError::not_found(name));
        }

        let data = summarize(&context.data);
        ErrorPageTemplate {
            message: &context.message,
            data: &data,
        }
        .render()
        .map_err(|e| TemplateError::render(name, e))
    }
}

/// Flatten a payload into a single line of text.
fn summarize(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(summarize).collect::<Vec<_>>().join(", "),
        Value::Object(fields) => fields.values().map(summarize).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}
