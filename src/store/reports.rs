//! Report archive
//!
//! Sled-backed persistence for generated [`Report`] snapshots. Keys are the
//! report's generation timestamp as big-endian u64 bytes so entries sort
//! chronologically; values are JSON.
//!
//! Writes are not flushed individually; sled's background flushing is enough
//! here since a lost snapshot can be regenerated from the entity store.

use std::path::Path;
use std::sync::Arc;

use crate::types::Report;

/// Error type for report archive operations
#[derive(Debug, thiserror::Error)]
pub enum ReportStoreError {
    #[error("database error: {0}")]
    Database(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("no report stored at timestamp {0}")]
    NotFound(u64),
}

/// Persistent archive of generated reports.
#[derive(Clone)]
pub struct ReportArchive {
    db: Arc<sled::Db>,
    tree: sled::Tree,
}

impl ReportArchive {
    /// Open or create the archive at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReportStoreError> {
        let db = sled::open(path)?;
        let tree = db.open_tree("reports")?;
        Ok(Self {
            db: Arc::new(db),
            tree,
        })
    }

    fn key_for(report: &Report) -> [u8; 8] {
        let ts = report.generated_at.timestamp().max(0) as u64;
        ts.to_be_bytes()
    }

    /// Persist a report snapshot.
    ///
    /// Two reports generated in the same second overwrite each other, which
    /// is acceptable for on-demand snapshots.
    pub fn store(&self, report: &Report) -> Result<(), ReportStoreError> {
        let value = serde_json::to_vec(report)?;
        self.tree.insert(Self::key_for(report), value)?;
        Ok(())
    }

    /// The most recent N reports (newest first). Unparseable entries are
    /// skipped.
    pub fn recent(&self, limit: usize) -> Vec<Report> {
        let mut reports = Vec::with_capacity(limit);
        for item in self.tree.iter().rev() {
            if reports.len() >= limit {
                break;
            }
            if let Ok((_key, value)) = item {
                if let Ok(report) = serde_json::from_slice::<Report>(&value) {
                    reports.push(report);
                }
            }
        }
        reports
    }

    /// All reports generated within `[start_ts, end_ts]` (unix seconds).
    pub fn range(&self, start_ts: u64, end_ts: u64) -> Vec<Report> {
        let mut reports = Vec::new();
        for item in self.tree.range(start_ts.to_be_bytes()..=end_ts.to_be_bytes()) {
            if let Ok((_key, value)) = item {
                if let Ok(report) = serde_json::from_slice::<Report>(&value) {
                    reports.push(report);
                }
            }
        }
        reports
    }

    /// Flag the report stored at `ts` (unix seconds) as archived.
    pub fn archive(&self, ts: u64) -> Result<(), ReportStoreError> {
        let key = ts.to_be_bytes();
        let value = self.tree.get(key)?.ok_or(ReportStoreError::NotFound(ts))?;
        let mut report: Report = serde_json::from_slice(&value)?;
        report.archived = true;
        self.tree.insert(key, serde_json::to_vec(&report)?)?;
        Ok(())
    }

    /// Number of stored reports.
    pub fn count(&self) -> usize {
        self.tree.len()
    }

    /// Database size on disk in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.db.size_on_disk().unwrap_or(0)
    }

    /// Drop all stored reports.
    pub fn clear(&self) -> Result<(), ReportStoreError> {
        self.tree.clear()?;
        self.db.flush()?;
        Ok(())
    }
}
