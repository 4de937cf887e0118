//! Internal error helpers for mapping HTTP/reqwest errors to [`DispatchError`].

use peerbrush_core::DispatchError;

/// Marker text hosts return when a fire-and-forget packet produced no reply.
const NO_DATA_RETURNED: &str = "No data returned";

/// Map a non-success HTTP status to a [`DispatchError`].
pub(crate) fn map_http_status(
    action: &str,
    status: reqwest::StatusCode,
    body: &str,
) -> DispatchError {
    match status.as_u16() {
        401 | 403 => DispatchError::Failed {
            action: action.to_string(),
            retcode: i64::from(status.as_u16()),
            message: "access token rejected".to_string(),
        },
        _ => DispatchError::Transport(format!("HTTP {status}: {body}")),
    }
}

/// Map a [`reqwest::Error`] to a [`DispatchError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> DispatchError {
    DispatchError::Transport(err.to_string())
}

/// Whether a failure reason is the harmless "no reply" notice.
pub(crate) fn is_no_data_returned(reason: &str) -> bool {
    reason.contains(NO_DATA_RETURNED)
}
