//! Error types for each protocol.

use thiserror::Error;

/// Coordination service errors.
///
/// Callers never propagate these past the driver. They are logged and
/// degraded to "no effect" or "no peers".
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CoordError {
    /// The HTTP request could not be sent or completed.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The response body was not the expected JSON shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The service answered with a non-zero result code.
    #[error("action {action} rejected with code {code}")]
    Rejected {
        /// Action code that was invoked.
        action: u32,
        /// Result code returned by the service.
        code: i64,
    },

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Runtime action dispatch errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The action could not be delivered to the runtime.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The runtime accepted the call and reported a failure.
    #[error("action {action} failed with retcode {retcode}: {message}")]
    Failed {
        /// Runtime action name.
        action: String,
        /// Runtime return code.
        retcode: i64,
        /// Runtime-provided reason.
        message: String,
    },

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Run ledger persistence errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Reading the backing store failed.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// Writing the backing store failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
