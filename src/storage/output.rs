// src/storage/output.rs

//! Append-only JSONL output store.
//!
//! Each line is one merged entity record. Downstream conversion tools treat
//! this file as the durable source of truth for what has been processed, so
//! every append is flushed before the orchestrator moves on.

use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::error::{AppError, Result};
use crate::models::MergedRecord;

/// Append-only line-delimited JSON writer.
pub struct OutputStore {
    path: PathBuf,
    file: tokio::fs::File,
}

/// Summary counts over an output file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputStats {
    pub lines: usize,
    pub unique_ids: usize,
    pub null_id_records: usize,
}

impl OutputStore {
    /// Open (or create) the output file for appending.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        Ok(Self { path, file })
    }

    /// Path of the output file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Append one record as a JSONL line and flush it to disk.
    pub async fn append(&mut self, record: &MergedRecord) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        self.file.write_all(&line).await?;
        self.file.flush().await?;
        Ok(())
    }

    /// Read all records back, skipping unparsable lines.
    pub async fn read_all(path: impl AsRef<Path>) -> Result<Vec<MergedRecord>> {
        let file = match tokio::fs::File::open(path.as_ref()).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut records = Vec::new();
        let mut lines = BufReader::new(file).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<MergedRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Skipping unparsable output line: {}", e),
            }
        }

        Ok(records)
    }

    /// Count lines, unique ids, and null-id records in an output file.
    pub async fn stats(path: impl AsRef<Path>) -> Result<OutputStats> {
        let records = Self::read_all(path).await?;
        let mut stats = OutputStats {
            lines: records.len(),
            ..OutputStats::default()
        };

        let mut ids = std::collections::HashSet::new();
        for record in &records {
            match &record.entity_id {
                Some(id) => {
                    ids.insert(id.clone());
                }
                None => stats.null_id_records += 1,
            }
        }
        stats.unique_ids = ids.len();

        Ok(stats)
    }
}
