//! Picks the representation of an error response from the request headers.

use axum::http::{HeaderMap, header};

mod accept;

use accept::AcceptHeader;

const APPLICATION_XHTML: &str = "application/xhtml+xml";

/// The representation chosen for an error response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Template,
    PlainText,
}

/// Choose a response format for the given request headers.
///
/// JSON wins when the client accepts it or sent JSON itself. A client that
/// accepts HTML gets the template when templates are enabled and JSON when
/// they are not. Everything else, including a missing `Accept` header and
/// `*/*`, gets plain text.
pub fn negotiate(headers: &HeaderMap, use_template: bool) -> ResponseFormat {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(AcceptHeader::parse);

    let accepts = |essence: &str| accept.as_ref().is_some_and(|a| a.accepts_explicit(essence));

    if accepts(mime::APPLICATION_JSON.essence_str()) || sends_json(headers) {
        ResponseFormat::Json
    } else if accepts(mime::TEXT_HTML.essence_str()) || accepts(APPLICATION_XHTML) {
        if use_template {
            ResponseFormat::Template
        } else {
            ResponseFormat::Json
        }
    } else {
        ResponseFormat::PlainText
    }
}

// Clients send things like `application/json; utf-8`, which is not a valid
// media type, so this is a prefix check rather than a parse.
fn sends_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| {
            ct.trim_start()
                .to_ascii_lowercase()
                .starts_with(mime::APPLICATION_JSON.essence_str())
        })
}
