// src/models/unit.rs

//! Unit (department) data structure.

use serde::{Deserialize, Serialize};

/// A parent grouping discovered from the portal's search form.
///
/// Units are enumerated once per run from a single request and are immutable
/// thereafter. They are never persisted individually; the checkpoint's unit
/// cursor records how far enumeration has advanced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Unit {
    /// Stable external identifier (the form option value)
    pub unit_id: String,

    /// Human-readable name (the form option text)
    pub display_name: String,
}

impl Unit {
    pub fn new(unit_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            unit_id: unit_id.into(),
            display_name: display_name.into(),
        }
    }
}
