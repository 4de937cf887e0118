//! Runtime event intake.
//!
//! Events arrive as OneBot JSON objects, one per line. Each accepted event
//! is handed to the scheduler on its own task so a long cycle never stalls
//! reading.

use peerbrush_core::RuntimeEvent;
use peerbrush_scheduler::Scheduler;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;

/// Line counts from one intake run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntakeStats {
    /// Lines parsed into events and handed to the scheduler.
    pub accepted: usize,
    /// Non-empty lines that were not valid event JSON.
    pub rejected: usize,
}

/// Parse one line of host output.
pub fn parse_event_line(line: &str) -> Result<RuntimeEvent, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(line)?;
    RuntimeEvent::from_json(value)
}

/// Feed every line of `reader` to `scheduler` until EOF, then wait for the
/// handlers still running.
///
/// Malformed lines are logged and skipped. Timers armed along the way keep
/// running after this returns.
pub async fn run_intake<R>(reader: R, scheduler: Scheduler) -> std::io::Result<IntakeStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut handlers = JoinSet::new();
    let mut stats = IntakeStats::default();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_event_line(line) {
            Ok(event) => {
                stats.accepted += 1;
                let scheduler = scheduler.clone();
                handlers.spawn(async move { scheduler.handle_event(event).await });
            }
            Err(e) => {
                stats.rejected += 1;
                tracing::warn!(error = %e, "peerbrush.intake.bad_line");
            }
        }
        // Reap finished handlers as we go.
        while let Some(done) = handlers.try_join_next() {
            log_handler(done);
        }
    }

    tracing::info!(accepted = stats.accepted, rejected = stats.rejected, "peerbrush.intake.eof");
    while let Some(done) = handlers.join_next().await {
        log_handler(done);
    }
    Ok(stats)
}

fn log_handler(done: Result<peerbrush_scheduler::SignalOutcome, tokio::task::JoinError>) {
    match done {
        Ok(outcome) => tracing::debug!(?outcome, "peerbrush.intake.handled"),
        Err(e) => tracing::warn!(error = %e, "peerbrush.intake.handler_failed"),
    }
}
