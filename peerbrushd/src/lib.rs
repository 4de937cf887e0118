#![deny(missing_docs)]
//! peerbrush daemon.
//!
//! Wires the HTTP coordination client, the OneBot action adapter and the
//! file-backed run ledger into a [`Scheduler`], then feeds it host events.

mod config;
mod error;
pub mod intake;

pub use config::{DaemonConfig, ENV_COORDINATION_URL, ENV_ONEBOT_TOKEN, ENV_ONEBOT_URL};
pub use error::DaemonError;

use peerbrush_coord_http::HttpCoordinator;
use peerbrush_core::{ActionDispatch, Coordinator};
use peerbrush_driver::InteractionDriver;
use peerbrush_ledger::{FsLedgerStore, RunLedger};
use peerbrush_onebot::OneBotActions;
use peerbrush_scheduler::Scheduler;
use std::sync::Arc;

/// Build the production scheduler described by `config`.
pub fn build_scheduler(config: &DaemonConfig) -> Result<Scheduler, DaemonError> {
    let coordinator = HttpCoordinator::new(config.coordination_url()?)
        .with_timeout(config.request_timeout());

    let mut onebot = OneBotActions::new()
        .with_url(config.onebot_url.clone())
        .with_timeout(config.request_timeout());
    if let Some(token) = &config.onebot_token {
        onebot = onebot.with_access_token(token.clone());
    }

    tracing::info!(
        coordination_url = coordinator.api_url(),
        onebot_url = %config.onebot_url,
        ledger = %config.ledger_file().display(),
        "peerbrush.daemon.configured"
    );
    Ok(assemble(config, Arc::new(coordinator), Arc::new(onebot)))
}

/// Build a scheduler from `config` around the given remote collaborators.
///
/// The ledger is always file-backed at [`DaemonConfig::ledger_file`].
pub fn assemble(
    config: &DaemonConfig,
    coordinator: Arc<dyn Coordinator>,
    dispatch: Arc<dyn ActionDispatch>,
) -> Scheduler {
    let store = FsLedgerStore::new(&config.ledger_file());
    let ledger = Arc::new(RunLedger::new(Arc::new(store)));
    let driver = InteractionDriver::new(coordinator, dispatch, ledger)
        .with_pacing(config.pacing())
        .with_greeting(config.greeting.clone());
    Scheduler::new(Arc::new(driver), config.schedule_config())
}
