//! Diagnostics for failed requests.
//!
//! Third-party clients disagree on the protocol in many small ways. Every
//! error response is logged with enough of the request to reproduce it,
//! with credentials redacted.

use crate::error::ApiError;
use axum::http::{header, HeaderMap, Method};

const REDACTED: &str = "<redacted>";

/// Form and query fields never written to the log.
const SECRET_FIELDS: [&str; 2] = ["Passwd", "T"];

/// The request as seen by the error log.
#[derive(Debug, Clone, Copy)]
pub struct RequestSummary<'a> {
    /// HTTP method.
    pub method: &'a Method,
    /// Request path.
    pub path: &'a str,
    /// Raw query string.
    pub query: Option<&'a str>,
    /// Request headers.
    pub headers: &'a HeaderMap,
    /// Raw body.
    pub body: &'a [u8],
}

/// Log an error response.
pub fn log_error(err: &ApiError, request: &RequestSummary<'_>) {
    tracing::warn!(
        "{} on {} {}: {}",
        err.kind(),
        request.method,
        request.path,
        err
    );
    tracing::debug!(
        "Failed request query={} headers={} body={}",
        redact_urlencoded(request.query.unwrap_or_default().as_bytes()),
        redact_headers(request.headers),
        redact_urlencoded(request.body)
    );
}

/// Render headers for the log, hiding `Authorization`.
pub fn redact_headers(headers: &HeaderMap) -> String {
    let rendered: Vec<String> = headers
        .iter()
        .map(|(name, value)| {
            if name == header::AUTHORIZATION {
                format!("{name}: {REDACTED}")
            } else {
                format!("{}: {}", name, value.to_str().unwrap_or("<binary>"))
            }
        })
        .collect();
    format!("[{}]", rendered.join(", "))
}

/// Re-encode urlencoded input with secret fields hidden.
pub fn redact_urlencoded(input: &[u8]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in url::form_urlencoded::parse(input) {
        if SECRET_FIELDS.contains(&key.as_ref()) {
            serializer.append_pair(&key, REDACTED);
        } else {
            serializer.append_pair(&key, &value);
        }
    }
    serializer.finish()
}
