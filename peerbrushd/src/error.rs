//! Daemon errors.

use thiserror::Error;

/// Errors that stop the daemon from starting or reading events.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Bad command line or configuration values.
    #[error("config error: {0}")]
    Config(String),

    /// The configuration file is not valid JSON for [`crate::DaemonConfig`].
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reading the configuration file or stdin failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
