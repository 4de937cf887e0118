//! The coordination protocol: online status and peer discovery.

use crate::error::CoordError;
use crate::id::{BotId, PeerId};
use async_trait::async_trait;

/// Remote service that tracks which bots are currently online.
///
/// Implementations report failures as [`CoordError`]; they never retry.
/// Deciding that a failure is harmless (log it, carry on with no peers)
/// is the caller's job, so the decision shows up at the call site.
#[async_trait]
pub trait Coordinator: Send + Sync {
    /// Announce that `bot` is active right now.
    async fn publish_online(&self, bot: &BotId) -> Result<(), CoordError>;

    /// Other bots currently reported as online.
    async fn list_online_peers(&self, bot: &BotId) -> Result<Vec<PeerId>, CoordError>;
}
