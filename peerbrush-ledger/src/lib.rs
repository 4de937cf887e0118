#![deny(missing_docs)]
//! Once-per-day run ledger.
//!
//! Remembers, per bot identity, the last UTC date on which a full
//! interaction cycle completed. The ledger never fails its callers: an
//! unreadable store reads as empty and a failed write is logged and
//! dropped. Losing a write only risks one redundant cycle later.
//!
//! [`FsLedgerStore`] persists the ledger as a single JSON document.

mod fs;

pub use fs::{FsLedgerStore, RECORD_FILE_NAME};

use chrono::NaiveDate;
use peerbrush_core::{BotId, Clock, LedgerDoc, LedgerError, LedgerStore, SystemClock};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Most entries the ledger keeps.
pub const MAX_ENTRIES: usize = 7;

/// Per-identity record of the last completed cycle date.
///
/// Eviction is by key order, not by age: once more than [`MAX_ENTRIES`]
/// identities are recorded, the lexicographically smallest keys go first.
pub struct RunLedger {
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
    max_entries: usize,
    write_lock: Mutex<()>,
}

impl RunLedger {
    /// Create a ledger over `store` using the system clock.
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            max_entries: MAX_ENTRIES,
            write_lock: Mutex::new(()),
        }
    }

    /// Use `clock` as the source of "today".
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Override the entry cap. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    /// Today's UTC date according to the injected clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Read the document, reporting store failures.
    pub async fn load(&self) -> Result<LedgerDoc, LedgerError> {
        self.store.load().await
    }

    async fn load_or_empty(&self) -> LedgerDoc {
        match self.store.load().await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(error = %e, "peerbrush.ledger.load_failed; treating as empty");
                LedgerDoc::new()
            }
        }
    }

    /// Whether `bot` already completed a cycle today.
    pub async fn has_run_today(&self, bot: &BotId) -> bool {
        let today = self.today();
        self.load_or_empty().await.last_run(bot) == Some(today)
    }

    /// Record today for `bot` and persist, reporting write failures.
    ///
    /// Returns the keys evicted to stay within the entry cap.
    pub async fn try_mark_run_today(&self, bot: &BotId) -> Result<Vec<String>, LedgerError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load_or_empty().await;
        doc.record(bot, self.today());
        let evicted = prune(&mut doc, &bot.to_string(), self.max_entries);
        self.store.save(&doc).await?;
        Ok(evicted)
    }

    /// Record today for `bot`. Persistence failures are logged, not returned.
    pub async fn mark_run_today(&self, bot: &BotId) {
        match self.try_mark_run_today(bot).await {
            Ok(evicted) => {
                if !evicted.is_empty() {
                    tracing::debug!(bot = %bot, ?evicted, "peerbrush.ledger.evicted");
                }
                tracing::debug!(bot = %bot, date = %self.today(), "peerbrush.ledger.marked");
            }
            Err(e) => {
                tracing::warn!(bot = %bot, error = %e, "peerbrush.ledger.write_failed");
            }
        }
    }
}

/// Evict smallest keys (never `keep`) until at most `max` remain.
fn prune(doc: &mut LedgerDoc, keep: &str, max: usize) -> Vec<String> {
    let mut evicted = Vec::new();
    while doc.len() > max {
        match doc.evict_first_except(keep) {
            Some(key) => evicted.push(key),
            None => break,
        }
    }
    evicted
}
