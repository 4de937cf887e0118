//! Internal error helpers for mapping HTTP/reqwest errors to [`CoordError`].

use peerbrush_core::CoordError;

/// Map a non-success HTTP status to a [`CoordError`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> CoordError {
    CoordError::RequestFailed(format!("HTTP {status}: {body}"))
}

/// Map a [`reqwest::Error`] to a [`CoordError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> CoordError {
    if err.is_timeout() {
        CoordError::Timeout
    } else if err.is_decode() {
        CoordError::InvalidResponse(err.to_string())
    } else {
        CoordError::RequestFailed(err.to_string())
    }
}
