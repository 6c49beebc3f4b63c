// src/storage/checkpoint.rs

//! Durable checkpoint store.
//!
//! Holds a single JSON checkpoint record. Saves go through a temp file and
//! an atomic rename, so an interrupted write can never leave a truncated
//! checkpoint behind; the prior valid one (or none) survives.

use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Checkpoint;

/// File-backed checkpoint store.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    /// Create a store for the given checkpoint file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the checkpoint file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the checkpoint, if one exists.
    ///
    /// A file that fails to parse is treated as absent: the run starts
    /// fresh and logs a warning rather than aborting, since the output
    /// file remains the source of truth.
    pub async fn load(&self) -> Result<Option<Checkpoint>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::Io(e)),
        };

        match serde_json::from_slice::<Checkpoint>(&bytes) {
            Ok(checkpoint) => Ok(Some(checkpoint)),
            Err(e) => {
                log::warn!(
                    "Checkpoint at {:?} is unreadable ({}); starting fresh",
                    self.path,
                    e
                );
                Ok(None)
            }
        }
    }

    /// Overwrite the checkpoint atomically (write to temp, then rename).
    pub async fn save(&self, checkpoint: &Checkpoint) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(checkpoint)?;
        let tmp = self.path.with_extension("tmp");

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| AppError::checkpoint(format!("rename failed: {e}")))?;

        Ok(())
    }

    /// Remove the checkpoint. Returns whether a file was removed.
    ///
    /// Never touches already-emitted output records.
    pub async fn clear(&self) -> Result<bool> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
