//! Runtime events: the only input channel from the host.
//!
//! The host delivers OneBot v11 style JSON objects. Only the fields the
//! scheduler reacts to are interpreted; everything else is [`RuntimeEvent::Other`].

use crate::dispatch::ReplyScope;
use crate::id::BotId;
use serde::Deserialize;

/// A host notification relevant to scheduling.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// The bot connected to the host (`meta_event/lifecycle/connect`).
    Connected {
        /// The connecting bot's own account number.
        self_id: BotId,
    },
    /// Periodic liveness ping (`meta_event/heartbeat`).
    Heartbeat {
        /// The bot's account number, when the host includes it.
        self_id: Option<BotId>,
    },
    /// An inbound chat message.
    Message(MessageEvent),
    /// Anything else. Ignored by the scheduler.
    Other,
}

/// An inbound chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// Account number of the bot that received the message.
    pub self_id: Option<BotId>,
    /// Message text as the host rendered it.
    pub raw_message: String,
    /// Where a reply should go, when the event identifies the chat.
    pub reply_scope: Option<ReplyScope>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    post_type: Option<String>,
    meta_event_type: Option<String>,
    sub_type: Option<String>,
    self_id: Option<u64>,
    raw_message: Option<String>,
    message_type: Option<String>,
    group_id: Option<u64>,
    user_id: Option<u64>,
}

impl RuntimeEvent {
    /// Interpret a host event object.
    ///
    /// Fails only when `value` is not an object with the expected field
    /// types; unknown event kinds map to [`RuntimeEvent::Other`].
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let raw: RawEvent = serde_json::from_value(value)?;
        let self_id = raw.self_id.map(BotId);

        let event = match (raw.post_type.as_deref(), raw.meta_event_type.as_deref()) {
            (Some("meta_event"), Some("lifecycle")) => match (raw.sub_type.as_deref(), self_id) {
                (Some("connect"), Some(self_id)) => RuntimeEvent::Connected { self_id },
                _ => RuntimeEvent::Other,
            },
            (Some("meta_event"), Some("heartbeat")) => RuntimeEvent::Heartbeat { self_id },
            (Some("message"), _) => {
                let reply_scope = match (raw.message_type.as_deref(), raw.group_id, raw.user_id) {
                    (Some("group"), Some(group_id), _) => Some(ReplyScope::Group { group_id }),
                    (Some("private"), _, Some(user_id)) => Some(ReplyScope::Private { user_id }),
                    _ => None,
                };
                RuntimeEvent::Message(MessageEvent {
                    self_id,
                    raw_message: raw.raw_message.unwrap_or_default(),
                    reply_scope,
                })
            }
            _ => RuntimeEvent::Other,
        };
        Ok(event)
    }

    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeEvent::Connected { .. } => "connected",
            RuntimeEvent::Heartbeat { .. } => "heartbeat",
            RuntimeEvent::Message(_) => "message",
            RuntimeEvent::Other => "other",
        }
    }
}
