//! In-memory implementations for testing.
//!
//! Available behind the `test-utils` feature flag. Each fake records what
//! it was asked to do so tests can assert on calls, not just outcomes.

mod fixed_clock;
mod in_memory_ledger;
mod recording_dispatch;
mod scripted_coordinator;

pub use fixed_clock::FixedClock;
pub use in_memory_ledger::InMemoryLedgerStore;
pub use recording_dispatch::{DispatchRecord, RecordingDispatch};
pub use scripted_coordinator::{CoordCall, ScriptedCoordinator};
