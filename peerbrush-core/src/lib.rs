//! # peerbrush-core: protocol types for the daily peer-interaction scheduler
//!
//! This crate defines the boundaries the rest of the workspace composes
//! across. Nothing here talks to the network or the filesystem.
//!
//! ## The Protocols
//!
//! | Protocol | Trait | What it does |
//! |----------|-------|-------------|
//! | Coordination | [`Coordinator`] | Online status and peer discovery |
//! | Dispatch | [`ActionDispatch`] | Packets and messages out through the host |
//! | Ledger | [`LedgerStore`] | Whole-document persistence of run dates |
//! | Clock | [`Clock`] | "Today" for the once-per-day gate |
//!
//! Host notifications arrive as [`RuntimeEvent`]s.
//!
//! ## Error Policy
//!
//! Every protocol returns a typed error. None of them is fatal to the
//! scheduler: call sites log the error and fall back to a safe default,
//! and the timers retry on their own cadence.

#![deny(missing_docs)]

pub mod clock;
pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod id;
pub mod ledger;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-exports for convenience
pub use clock::{Clock, SystemClock};
pub use coordinator::Coordinator;
pub use dispatch::{ActionDispatch, ReplyScope};
pub use error::{CoordError, DispatchError, LedgerError};
pub use event::{MessageEvent, RuntimeEvent};
pub use id::{BotId, PeerId};
pub use ledger::{LedgerDoc, LedgerStore};
