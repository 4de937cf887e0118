#![deny(missing_docs)]
//! The interaction cycle.
//!
//! One cycle refreshes this bot's online status, asks the coordination
//! service who else is online, and walks those peers one at a time:
//! friend-add packet, short pause, greeting message, longer pause. When
//! the walk finishes the run ledger is marked so the cycle does not
//! repeat until the next UTC day.
//!
//! Remote failures never escape. Each is logged and replaced by a safe
//! default, and a failing peer never stops the walk.

use peerbrush_core::{ActionDispatch, BotId, Coordinator, PeerId};
use peerbrush_ledger::RunLedger;
use peerbrush_wire::{INTERACTION_PACKET_CMD, build_interaction_packet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Greeting sent to each peer after the friend-add packet.
pub const DEFAULT_GREETING: &str = "菜单";

/// Pauses between per-peer steps.
///
/// These rate-limit the host's dispatch channel and the receiving side.
/// Steps are always sequential; pacing only sets how long to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Wait after dispatching the packet, before the greeting.
    pub after_packet: Duration,
    /// Wait after the greeting, before the next peer.
    pub after_message: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            after_packet: Duration::from_secs(1),
            after_message: Duration::from_secs(6),
        }
    }
}

impl Pacing {
    /// No waiting at all.
    pub const fn none() -> Self {
        Self {
            after_packet: Duration::ZERO,
            after_message: Duration::ZERO,
        }
    }

    /// Time spent waiting per peer.
    pub fn per_peer(&self) -> Duration {
        self.after_packet + self.after_message
    }
}

/// What a call to [`InteractionDriver::run_cycle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The ledger already shows a completed cycle today. Nothing was called.
    AlreadyRanToday,
    /// Another cycle is still running on this driver. Nothing was called.
    InFlight,
    /// Discovery returned nobody. The ledger was left unmarked.
    NoPeers,
    /// Every peer was visited and the ledger was marked.
    Completed {
        /// Peers visited.
        peers: usize,
        /// Peers where at least one dispatch failed.
        failures: usize,
    },
}

/// Executes status refreshes and interaction cycles for one bot.
///
/// At most one cycle and one refresh run at a time; an overlapping call
/// returns immediately instead of queueing. A started cycle is never
/// cancelled.
pub struct InteractionDriver {
    coordinator: Arc<dyn Coordinator>,
    dispatch: Arc<dyn ActionDispatch>,
    ledger: Arc<RunLedger>,
    pacing: Pacing,
    greeting: String,
    cycle_gate: Mutex<()>,
    refresh_gate: Mutex<()>,
}

impl InteractionDriver {
    /// Create a driver with default pacing and greeting.
    pub fn new(
        coordinator: Arc<dyn Coordinator>,
        dispatch: Arc<dyn ActionDispatch>,
        ledger: Arc<RunLedger>,
    ) -> Self {
        Self {
            coordinator,
            dispatch,
            ledger,
            pacing: Pacing::default(),
            greeting: DEFAULT_GREETING.to_string(),
            cycle_gate: Mutex::new(()),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Override the per-peer pauses.
    #[must_use]
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Override the greeting text.
    #[must_use]
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// The ledger this driver marks.
    pub fn ledger(&self) -> &Arc<RunLedger> {
        &self.ledger
    }

    /// The action capability this driver dispatches through.
    pub fn dispatch(&self) -> &Arc<dyn ActionDispatch> {
        &self.dispatch
    }

    /// The per-peer pauses in effect.
    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Announce `bot` as online. Failures are logged only.
    pub async fn refresh_status(&self, bot: &BotId) {
        let Ok(_guard) = self.refresh_gate.try_lock() else {
            tracing::debug!(bot = %bot, "peerbrush.refresh.in_flight");
            return;
        };
        match self.coordinator.publish_online(bot).await {
            Ok(()) => tracing::debug!(bot = %bot, "peerbrush.refresh.ok"),
            Err(e) => tracing::warn!(bot = %bot, error = %e, "peerbrush.refresh.failed"),
        }
    }

    async fn discover(&self, bot: &BotId) -> Vec<PeerId> {
        match self.coordinator.list_online_peers(bot).await {
            Ok(peers) => peers,
            Err(e) => {
                tracing::warn!(bot = %bot, error = %e, "peerbrush.discover.failed");
                Vec::new()
            }
        }
    }

    /// Run one cycle for `bot`, unless it already completed one today.
    pub async fn run_cycle(&self, bot: &BotId) -> CycleOutcome {
        let Ok(_guard) = self.cycle_gate.try_lock() else {
            tracing::info!(bot = %bot, "peerbrush.cycle.in_flight");
            return CycleOutcome::InFlight;
        };

        if self.ledger.has_run_today(bot).await {
            tracing::info!(bot = %bot, "peerbrush.cycle.already_ran_today");
            return CycleOutcome::AlreadyRanToday;
        }

        self.refresh_status(bot).await;

        let peers = self.discover(bot).await;
        if peers.is_empty() {
            tracing::info!(bot = %bot, "peerbrush.cycle.no_peers");
            return CycleOutcome::NoPeers;
        }

        tracing::info!(bot = %bot, peers = peers.len(), "peerbrush.cycle.start");
        let mut failures = 0;
        for peer in &peers {
            if !self.interact(*peer).await {
                failures += 1;
            }
        }

        self.ledger.mark_run_today(bot).await;
        tracing::info!(bot = %bot, peers = peers.len(), failures, "peerbrush.cycle.complete");
        CycleOutcome::Completed {
            peers: peers.len(),
            failures,
        }
    }

    /// Packet, pause, greeting, pause. Returns whether both dispatches
    /// succeeded; a failed step does not skip the rest.
    async fn interact(&self, peer: PeerId) -> bool {
        tracing::debug!(peer = %peer, "peerbrush.peer.start");
        let mut ok = true;

        let hex = build_interaction_packet(peer.get());
        if let Err(e) = self
            .dispatch
            .dispatch_packet(INTERACTION_PACKET_CMD, &hex)
            .await
        {
            tracing::warn!(peer = %peer, error = %e, "peerbrush.peer.packet_failed");
            ok = false;
        }
        tokio::time::sleep(self.pacing.after_packet).await;

        if let Err(e) = self.dispatch.dispatch_message(peer, &self.greeting).await {
            tracing::warn!(peer = %peer, error = %e, "peerbrush.peer.message_failed");
            ok = false;
        }
        tokio::time::sleep(self.pacing.after_message).await;

        ok
    }
}
