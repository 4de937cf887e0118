//! Filesystem-backed ledger store.

use async_trait::async_trait;
use peerbrush_core::{LedgerDoc, LedgerError, LedgerStore};
use std::path::{Path, PathBuf};

/// Conventional file name, placed next to the daemon's config file.
pub const RECORD_FILE_NAME: &str = "brush_record.json";

/// Ledger store kept in one pretty-printed JSON file.
///
/// ```text
/// {
///   "10001": "2024-05-01",
///   "10002": "2024-05-01"
/// }
/// ```
///
/// Writes go to a sibling `.tmp` file that is then renamed over the
/// target, so readers see either the old or the new document.
pub struct FsLedgerStore {
    path: PathBuf,
}

impl FsLedgerStore {
    /// Store the ledger at `path`. Parent directories are created lazily
    /// on first write.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Store the ledger as [`RECORD_FILE_NAME`] inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(&dir.join(RECORD_FILE_NAME))
    }

    /// Location of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| RECORD_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl LedgerStore for FsLedgerStore {
    async fn load(&self) -> Result<LedgerDoc, LedgerError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| LedgerError::Serialization(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(LedgerDoc::new()),
            Err(e) => Err(LedgerError::ReadFailed(e.to_string())),
        }
    }

    async fn save(&self, doc: &LedgerDoc) -> Result<(), LedgerError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| LedgerError::WriteFailed(e.to_string()))?;
        }

        let contents = serde_json::to_string_pretty(doc)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|e| LedgerError::WriteFailed(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| LedgerError::WriteFailed(e.to_string()))?;
        Ok(())
    }
}
