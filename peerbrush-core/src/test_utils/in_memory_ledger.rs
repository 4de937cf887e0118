//! InMemoryLedgerStore: LedgerStore kept in a Mutex for testing.

use crate::error::LedgerError;
use crate::ledger::{LedgerDoc, LedgerStore};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory ledger store.
///
/// Can be told to fail reads or writes, and counts saves, so tests can
/// check that persistence failures are swallowed.
pub struct InMemoryLedgerStore {
    doc: Mutex<LedgerDoc>,
    fail_load: AtomicBool,
    fail_save: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryLedgerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::with_doc(LedgerDoc::new())
    }

    /// Create a store pre-populated with `doc`.
    pub fn with_doc(doc: LedgerDoc) -> Self {
        Self {
            doc: Mutex::new(doc),
            fail_load: AtomicBool::new(false),
            fail_save: AtomicBool::new(false),
            saves: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent `load` fail.
    pub fn fail_loads(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `save` fail.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of the stored document.
    pub fn snapshot(&self) -> LedgerDoc {
        self.doc.lock().unwrap().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn load(&self) -> Result<LedgerDoc, LedgerError> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(LedgerError::ReadFailed("injected read failure".into()));
        }
        let doc = self
            .doc
            .lock()
            .map_err(|e| LedgerError::ReadFailed(e.to_string()))?;
        Ok(doc.clone())
    }

    async fn save(&self, doc: &LedgerDoc) -> Result<(), LedgerError> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(LedgerError::WriteFailed("injected write failure".into()));
        }
        let mut stored = self
            .doc
            .lock()
            .map_err(|e| LedgerError::WriteFailed(e.to_string()))?;
        *stored = doc.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
