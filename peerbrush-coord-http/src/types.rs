//! Coordination service request/response types.
//!
//! The service takes a form-encoded POST whose `action` field selects the
//! operation and answers with `{"code": <int>, "data": <any>}`. `code == 0`
//! means success; anything else is a failure with no further detail.

use serde::{Deserialize, Serialize};

/// Operation selector sent as the `action` form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Mark a bot as currently online.
    PublishOnline,
    /// List the other bots currently online.
    ListOnlinePeers,
}

impl Action {
    /// Numeric action code understood by the service.
    pub const fn code(self) -> u32 {
        match self {
            Action::PublishOnline => 2,
            Action::ListOnlinePeers => 3,
        }
    }
}

/// Uniform response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResponse {
    /// Result code. `0` is success.
    pub code: i64,
    /// Operation-specific payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CallResponse {
    /// Code used when the call never produced a parseable response.
    pub const FAILED: i64 = -1;

    /// The envelope reported for transport and parse failures.
    pub fn failed() -> Self {
        Self {
            code: Self::FAILED,
            data: None,
        }
    }

    /// Whether the service reported success.
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}
