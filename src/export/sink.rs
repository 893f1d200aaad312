use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use log::info;

use crate::conf::ExportConfig;
use crate::core::DashError;

/// A downloaded export, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportBlob {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Where finished exports go.
#[async_trait]
pub trait BlobSink: Send + Sync {
    /// Returns a description of where the blob ended up.
    async fn save(&self, blob: ExportBlob) -> Result<String, DashError>;
}

/// Writes exports into one directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.dir.clone())
    }
}

#[async_trait]
impl BlobSink for DirectorySink {
    async fn save(&self, blob: ExportBlob) -> Result<String, DashError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            DashError::IoError(format!("creating directory {}: {}", self.dir.display(), e))
        })?;
        let path = self.dir.join(&blob.filename);
        tokio::fs::write(&path, &blob.bytes)
            .await
            .map_err(|e| DashError::IoError(format!("writing {}: {}", path.display(), e)))?;
        info!("Wrote {} bytes to {}", blob.bytes.len(), path.display());
        Ok(path.display().to_string())
    }
}
