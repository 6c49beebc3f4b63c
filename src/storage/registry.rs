// src/storage/registry.rs

//! Processed-entity registry.
//!
//! The set of entity ids already present in the output store. Rebuilt from
//! the output file at every startup (the file is the source of truth, even
//! if it was edited between runs) and grown in memory as entities are
//! emitted. Never persisted separately.
//!
//! Entities without an id cannot be registered and therefore cannot be
//! deduplicated across runs.

use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;
use crate::storage::output::OutputStore;

/// In-memory set of durably emitted entity ids.
#[derive(Debug, Default)]
pub struct ProcessedRegistry {
    ids: HashSet<String>,
}

impl ProcessedRegistry {
    /// Build the registry by scanning the output file.
    ///
    /// Missing file means an empty registry; unparsable lines are skipped.
    pub async fn load(output_path: impl AsRef<Path>) -> Result<Self> {
        let records = OutputStore::read_all(output_path).await?;
        let ids = records
            .into_iter()
            .filter_map(|record| record.entity_id)
            .collect::<HashSet<_>>();

        if !ids.is_empty() {
            log::info!("Registry: {} entities already processed", ids.len());
        }

        Ok(Self { ids })
    }

    /// Whether an entity id has already been emitted.
    ///
    /// A `None` id is never considered processed.
    pub fn contains(&self, entity_id: Option<&str>) -> bool {
        entity_id.is_some_and(|id| self.ids.contains(id))
    }

    /// Record an id as emitted. No-op for `None`.
    pub fn insert(&mut self, entity_id: Option<&str>) {
        if let Some(id) = entity_id {
            self.ids.insert(id.to_string());
        }
    }

    /// Number of registered ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
