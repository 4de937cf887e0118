//! OneBot v11 action request/response types.

use peerbrush_core::ReplyScope;
use serde::{Deserialize, Serialize};

/// `send_packet` parameters. `rsp: false` asks the host not to wait for
/// a server reply.
#[derive(Debug, Serialize)]
pub struct SendPacket<'a> {
    /// Service command name.
    pub cmd: &'a str,
    /// Lowercase hex payload.
    pub data: &'a str,
    /// Whether to wait for a reply packet.
    pub rsp: bool,
}

/// `send_private_msg` parameters. IDs are sent as strings, which hosts
/// accept for both 32- and 64-bit account numbers.
#[derive(Debug, Serialize)]
pub struct SendPrivateMsg<'a> {
    /// Recipient account number.
    pub user_id: String,
    /// Message text.
    pub message: &'a str,
}

/// `send_msg` parameters for replying in the originating chat.
#[derive(Debug, Serialize)]
pub struct SendMsg<'a> {
    /// `"group"` or `"private"`.
    pub message_type: &'static str,
    /// Group number, for group replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Account number, for private replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Message text.
    pub message: &'a str,
}

impl<'a> SendMsg<'a> {
    /// Build a reply addressed to `scope`.
    pub fn reply(scope: &ReplyScope, message: &'a str) -> Self {
        match *scope {
            ReplyScope::Group { group_id } => Self {
                message_type: "group",
                group_id: Some(group_id.to_string()),
                user_id: None,
                message,
            },
            ReplyScope::Private { user_id } => Self {
                message_type: "private",
                group_id: None,
                user_id: Some(user_id.to_string()),
                message,
            },
            _ => Self {
                message_type: "private",
                group_id: None,
                user_id: None,
                message,
            },
        }
    }
}

/// Action response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionResponse {
    /// `"ok"`, `"async"` or `"failed"`.
    #[serde(default)]
    pub status: String,
    /// `0` on success.
    #[serde(default)]
    pub retcode: i64,
    /// Action-specific result.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// Failure reason (go-cqhttp / NapCat style).
    #[serde(default)]
    pub message: Option<String>,
    /// Human-readable failure reason.
    #[serde(default)]
    pub wording: Option<String>,
}

impl ActionResponse {
    /// Whether the host reported success.
    pub fn is_ok(&self) -> bool {
        self.retcode == 0 && self.status != "failed"
    }

    /// Best available failure description.
    pub fn reason(&self) -> String {
        self.wording
            .clone()
            .or_else(|| self.message.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.status.clone())
    }
}
