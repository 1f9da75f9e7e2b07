//! Error types for greader-api.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// Terminal outcome of a failed API request.
///
/// Each variant maps to exactly one status code and a fixed plain-text
/// body. The carried string is for the diagnostics log only and never
/// reaches the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or missing parameters, unresolved identifiers.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials or action token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Unsupported output format.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Required runtime configuration absent, or a read from the store failed.
    #[error("internal server error: {0}")]
    InternalServerError(String),

    /// The API is disabled by configuration.
    #[error("service unavailable")]
    ServiceUnavailable,
}

impl ApiError {
    /// Shorthand for [`ApiError::BadRequest`].
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest(reason.into())
    }

    /// Shorthand for [`ApiError::Unauthorized`].
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized(reason.into())
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Short name of the error kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BadRequest",
            Self::Unauthorized(_) => "Unauthorized",
            Self::NotImplemented(_) => "NotImplemented",
            Self::InternalServerError(_) => "InternalServerError",
            Self::ServiceUnavailable => "ServiceUnavailable",
        }
    }

    fn body(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "Bad Request!",
            Self::Unauthorized(_) => "Unauthorized!",
            Self::NotImplemented(_) => "Not Implemented!",
            Self::InternalServerError(_) => "Internal Server Error!",
            Self::ServiceUnavailable => "Service Unavailable!",
        }
    }
}

/// A store failure on a read path is a server error.
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::InternalServerError(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status(), self.body()).into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=UTF-8"),
        );
        if matches!(self, Self::Unauthorized(_)) {
            headers.insert("Google-Bad-Token", HeaderValue::from_static("true"));
        }
        response
    }
}

/// Storage layer errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Feed URL is not an absolute http(s) URL.
    #[error("invalid feed URL: {url}")]
    InvalidFeedUrl {
        /// The rejected URL.
        url: String,
    },

    /// A feed with this URL is already subscribed.
    #[error("feed already subscribed: {url}")]
    DuplicateFeed {
        /// The duplicated URL.
        url: String,
    },

    /// The default category cannot be deleted.
    #[error("the default category cannot be deleted")]
    ProtectedCategory,

    /// Referenced row does not exist.
    #[error("{what} not found: {id}")]
    NotFound {
        /// Kind of row.
        what: &'static str,
        /// Its id.
        id: u64,
    },
}

/// Result type alias for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::NotImplemented("x".into()).status(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            ApiError::InternalServerError("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::ServiceUnavailable.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn unauthorized_carries_marker_header() {
        let response = ApiError::unauthorized("bad token").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()["Google-Bad-Token"], "true");
    }

    #[test]
    fn other_errors_have_no_marker_header() {
        let response = ApiError::bad_request("nope").into_response();
        assert!(response.headers().get("Google-Bad-Token").is_none());
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=UTF-8"
        );
    }

    #[test]
    fn storage_errors_become_server_errors() {
        let err: ApiError = StorageError::ProtectedCategory.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
