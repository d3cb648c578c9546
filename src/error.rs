use thiserror::Error;

/// A type-erased error, as produced by tower services
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, TemplateError>;

/// Failures while rendering an error page.
///
/// These never reach the client: the middleware logs them and answers in
/// plain text instead.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {name}")]
    NotFound { name: String },

    #[error("Failed to render template {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: BoxError,
    },
}

impl TemplateError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn render(name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Render {
            name: name.into(),
            source: source.into(),
        }
    }
}
