//! The runtime action protocol: how packets and messages leave the bot.

use crate::error::DispatchError;
use crate::id::PeerId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Where a reply to an inbound message should go.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message_type", rename_all = "snake_case")]
pub enum ReplyScope {
    /// Reply in a group chat.
    Group {
        /// Group number.
        group_id: u64,
    },
    /// Reply in a private chat.
    Private {
        /// Account number of the other side.
        user_id: u64,
    },
}

/// Action capability exposed by the host runtime.
///
/// All three calls are fire-and-forget from the caller's point of view:
/// success carries no payload, and a failure is something to log.
#[async_trait]
pub trait ActionDispatch: Send + Sync {
    /// Send a raw protocol packet. `hex_payload` is lowercase hex.
    async fn dispatch_packet(&self, cmd: &str, hex_payload: &str) -> Result<(), DispatchError>;

    /// Send a private text message to `target`.
    async fn dispatch_message(&self, target: PeerId, text: &str) -> Result<(), DispatchError>;

    /// Reply to the chat an inbound message came from.
    async fn dispatch_reply(&self, scope: &ReplyScope, text: &str) -> Result<(), DispatchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_scope_serializes_onebot_style() {
        let group = serde_json::to_value(ReplyScope::Group { group_id: 7 }).unwrap();
        assert_eq!(group, json!({"message_type": "group", "group_id": 7}));

        let private = serde_json::to_value(ReplyScope::Private { user_id: 9 }).unwrap();
        assert_eq!(private, json!({"message_type": "private", "user_id": 9}));
    }
}
