//! The ledger storage protocol: where run dates persist.

use crate::error::LedgerError;
use crate::id::BotId;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The persisted ledger document: bot identity → last completed run date.
///
/// Serializes as a flat JSON object, e.g. `{"10001": "2024-05-01"}`.
/// Keys are kept sorted, which is also the eviction order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerDoc(BTreeMap<String, NaiveDate>);

impl LedgerDoc {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last recorded run date for `bot`.
    pub fn last_run(&self, bot: &BotId) -> Option<NaiveDate> {
        self.0.get(&bot.to_string()).copied()
    }

    /// Record `date` for `bot`, replacing any earlier entry.
    pub fn record(&mut self, bot: &BotId, date: NaiveDate) {
        self.0.insert(bot.to_string(), date);
    }

    /// Remove the entry with the smallest key other than `keep`.
    ///
    /// Returns the evicted key, or `None` when nothing else is left.
    pub fn evict_first_except(&mut self, keep: &str) -> Option<String> {
        let victim = self.0.keys().find(|k| k.as_str() != keep)?.clone();
        self.0.remove(&victim);
        Some(victim)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Backing store for the run ledger.
///
/// The whole document is read and written at once. `load` reports a
/// missing store as an empty document; malformed content is an error the
/// ledger chooses to treat as empty.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Read the full document.
    async fn load(&self) -> Result<LedgerDoc, LedgerError>;

    /// Replace the full document.
    async fn save(&self, doc: &LedgerDoc) -> Result<(), LedgerError>;
}
