//! RecordingDispatch: records every action and can fail on demand.

use crate::dispatch::{ActionDispatch, ReplyScope};
use crate::error::DispatchError;
use crate::id::PeerId;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// A dispatched action, captured for inspection in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchRecord {
    /// A raw packet.
    Packet {
        /// Packet command name.
        cmd: String,
        /// Lowercase hex payload.
        hex: String,
    },
    /// A private message.
    Message {
        /// Recipient.
        target: PeerId,
        /// Message text.
        text: String,
    },
    /// A reply to an inbound message.
    Reply {
        /// Reply destination.
        scope: ReplyScope,
        /// Reply text.
        text: String,
    },
}

/// An [`ActionDispatch`] that records every call.
///
/// Messages to a peer registered with [`RecordingDispatch::fail_for`] and
/// packets registered with [`RecordingDispatch::fail_packet`] are still
/// recorded, then reported as failed.
pub struct RecordingDispatch {
    records: Mutex<Vec<DispatchRecord>>,
    failing_peers: Mutex<HashSet<PeerId>>,
    failing_packets: Mutex<HashSet<String>>,
}

impl RecordingDispatch {
    /// Create a dispatcher that accepts everything.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            failing_peers: Mutex::new(HashSet::new()),
            failing_packets: Mutex::new(HashSet::new()),
        }
    }

    /// Fail private messages to `peer`.
    pub fn fail_for(&self, peer: PeerId) {
        self.failing_peers.lock().unwrap().insert(peer);
    }

    /// Fail packets whose payload equals `hex`.
    pub fn fail_packet(&self, hex: impl Into<String>) {
        self.failing_packets.lock().unwrap().insert(hex.into());
    }

    /// Snapshot of everything dispatched so far, in order.
    pub fn records(&self) -> Vec<DispatchRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Recipients of private messages, in order.
    pub fn message_targets(&self) -> Vec<PeerId> {
        self.records()
            .into_iter()
            .filter_map(|r| match r {
                DispatchRecord::Message { target, .. } => Some(target),
                _ => None,
            })
            .collect()
    }

    /// Number of packets dispatched.
    pub fn packet_count(&self) -> usize {
        self.records()
            .iter()
            .filter(|r| matches!(r, DispatchRecord::Packet { .. }))
            .count()
    }
}

impl Default for RecordingDispatch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionDispatch for RecordingDispatch {
    async fn dispatch_packet(&self, cmd: &str, hex_payload: &str) -> Result<(), DispatchError> {
        self.records.lock().unwrap().push(DispatchRecord::Packet {
            cmd: cmd.to_owned(),
            hex: hex_payload.to_owned(),
        });
        if self.failing_packets.lock().unwrap().contains(hex_payload) {
            return Err(DispatchError::Transport("injected packet failure".into()));
        }
        Ok(())
    }

    async fn dispatch_message(&self, target: PeerId, text: &str) -> Result<(), DispatchError> {
        self.records.lock().unwrap().push(DispatchRecord::Message {
            target,
            text: text.to_owned(),
        });
        if self.failing_peers.lock().unwrap().contains(&target) {
            return Err(DispatchError::Failed {
                action: "send_private_msg".into(),
                retcode: 100,
                message: "injected message failure".into(),
            });
        }
        Ok(())
    }

    async fn dispatch_reply(&self, scope: &ReplyScope, text: &str) -> Result<(), DispatchError> {
        self.records.lock().unwrap().push(DispatchRecord::Reply {
            scope: *scope,
            text: text.to_owned(),
        });
        Ok(())
    }
}
