//! Where record sets come from.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::StoreError;
use crate::record_set::RecordSet;

/// An upstream that can produce a complete, current [`RecordSet`].
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short human-readable description for logs.
    fn describe(&self) -> String;

    /// Load every live record. Called once at startup and again on each
    /// catalog refresh.
    async fn fetch(&self) -> Result<RecordSet, StoreError>;
}

// ---------------------------------------------------------------------------
// JsonSnapshotSource
// ---------------------------------------------------------------------------

/// Reads a JSON snapshot exported from the record store.
#[derive(Debug, Clone)]
pub struct JsonSnapshotSource {
    path: PathBuf,
}

impl JsonSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSource for JsonSnapshotSource {
    fn describe(&self) -> String {
        format!("snapshot {}", self.path.display())
    }

    async fn fetch(&self) -> Result<RecordSet, StoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        let records: RecordSet = serde_json::from_slice(&bytes)?;
        records.validate()?;

        tracing::debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            actions = records.actions.len(),
            "Read record snapshot"
        );
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// StaticSource
// ---------------------------------------------------------------------------

/// A fixed in-memory record set.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: RecordSet,
}

impl StaticSource {
    pub fn new(records: RecordSet) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    fn describe(&self) -> String {
        "static records".to_string()
    }

    async fn fetch(&self) -> Result<RecordSet, StoreError> {
        self.records.validate()?;
        Ok(self.records.clone())
    }
}
