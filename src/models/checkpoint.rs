// src/models/checkpoint.rs

//! Checkpoint wire format.
//!
//! A checkpoint is a snapshot of orchestrator progress: how many units have
//! been fully enumerated and which entities are still queued. It records
//! *what was queued*; the output file records *what was durably emitted*.
//! Both are consulted on resume so a crash between "dequeued" and "emitted"
//! neither loses nor duplicates work.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::Entity;

/// Current checkpoint schema version.
pub const CHECKPOINT_VERSION: &str = "1.0";

/// Snapshot of orchestrator progress, written atomically as one JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Checkpoint {
    /// Cursor into the ordered unit list (units below this are enumerated)
    pub current_unit_index: usize,

    /// Unit count observed when the cursor was recorded
    pub total_units: usize,

    /// Entities enumerated but not yet drained, in emission order
    pub queued_entities: Vec<Entity>,

    /// Unix timestamp of the save
    pub timestamp: i64,

    /// Schema version
    pub version: String,
}

impl Checkpoint {
    /// Create a checkpoint for the given progress, stamped now.
    pub fn new(current_unit_index: usize, total_units: usize, queued_entities: Vec<Entity>) -> Self {
        Self {
            current_unit_index,
            total_units,
            queued_entities,
            timestamp: Utc::now().timestamp(),
            version: CHECKPOINT_VERSION.to_string(),
        }
    }

    /// Unit enumeration progress as a percentage.
    pub fn progress_percent(&self) -> f64 {
        if self.total_units == 0 {
            return 0.0;
        }
        (self.current_unit_index as f64 / self.total_units as f64) * 100.0
    }

    /// Whether all units have been enumerated.
    pub fn units_complete(&self) -> bool {
        self.total_units > 0 && self.current_unit_index >= self.total_units
    }
}
