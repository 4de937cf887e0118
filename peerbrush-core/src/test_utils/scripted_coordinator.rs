//! ScriptedCoordinator: canned peer lists and call counting.

use crate::coordinator::Coordinator;
use crate::error::CoordError;
use crate::id::{BotId, PeerId};
use async_trait::async_trait;
use std::sync::Mutex;

/// A coordination call, captured for inspection in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordCall {
    /// `publish_online` for this bot.
    PublishOnline(BotId),
    /// `list_online_peers` for this bot.
    ListOnlinePeers(BotId),
}

/// A [`Coordinator`] that returns a configurable peer list.
pub struct ScriptedCoordinator {
    peers: Mutex<Vec<PeerId>>,
    fail_publish: Mutex<bool>,
    fail_list: Mutex<bool>,
    calls: Mutex<Vec<CoordCall>>,
}

impl ScriptedCoordinator {
    /// Report `peers` as online.
    pub fn with_peers(peers: impl IntoIterator<Item = u64>) -> Self {
        Self {
            peers: Mutex::new(peers.into_iter().map(PeerId).collect()),
            fail_publish: Mutex::new(false),
            fail_list: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Report nobody as online.
    pub fn empty() -> Self {
        Self::with_peers([])
    }

    /// Replace the online peer list.
    pub fn set_peers(&self, peers: impl IntoIterator<Item = u64>) {
        *self.peers.lock().unwrap() = peers.into_iter().map(PeerId).collect();
    }

    /// Make `publish_online` fail as if the service rejected it.
    pub fn fail_publish(&self, fail: bool) {
        *self.fail_publish.lock().unwrap() = fail;
    }

    /// Make `list_online_peers` fail as if the transport broke.
    pub fn fail_list(&self, fail: bool) {
        *self.fail_list.lock().unwrap() = fail;
    }

    /// Snapshot of every call, in order.
    pub fn calls(&self) -> Vec<CoordCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `publish_online` calls.
    pub fn publish_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, CoordCall::PublishOnline(_)))
            .count()
    }

    /// Number of `list_online_peers` calls.
    pub fn list_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, CoordCall::ListOnlinePeers(_)))
            .count()
    }
}

#[async_trait]
impl Coordinator for ScriptedCoordinator {
    async fn publish_online(&self, bot: &BotId) -> Result<(), CoordError> {
        self.calls.lock().unwrap().push(CoordCall::PublishOnline(*bot));
        if *self.fail_publish.lock().unwrap() {
            return Err(CoordError::Rejected { action: 2, code: 1 });
        }
        Ok(())
    }

    async fn list_online_peers(&self, bot: &BotId) -> Result<Vec<PeerId>, CoordError> {
        self.calls.lock().unwrap().push(CoordCall::ListOnlinePeers(*bot));
        if *self.fail_list.lock().unwrap() {
            return Err(CoordError::RequestFailed("injected transport failure".into()));
        }
        Ok(self.peers.lock().unwrap().clone())
    }
}
