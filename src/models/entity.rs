// src/models/entity.rs

//! Entity data structures.
//!
//! An entity is a leaf record (a faculty member) captured in two stages:
//! listing fields at enumeration time, detail fields after visiting the
//! entity's own profile page.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A leaf record queued for processing.
///
/// Identity is the `entity_id` when the portal exposes one in the profile
/// link. When it is absent the entity falls back to structural identity
/// (unit + row index) and cannot be deduplicated across runs; this is a
/// source-data limitation, not something to paper over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entity {
    /// Stable external identifier, if the source exposes one
    pub entity_id: Option<String>,

    /// Owning unit identifier
    pub unit_id: String,

    /// Owning unit display name
    pub unit_name: String,

    /// Zero-based row position within the unit's listing
    pub row_index: usize,

    /// Fields captured from the listing row at enumeration time
    pub listing_fields: BTreeMap<String, String>,

    /// Absolute URL of the entity's detail page, if a link was found
    pub detail_url: Option<String>,
}

impl Entity {
    /// Identity string for logging and diagnostics.
    ///
    /// Falls back to `unit:row` position when the source omits the id.
    pub fn identity(&self) -> String {
        match &self.entity_id {
            Some(id) => id.clone(),
            None => format!("{}:row{}", self.unit_id, self.row_index),
        }
    }

    /// Best-effort display name from the listing fields.
    pub fn display_name(&self) -> String {
        self.listing_fields
            .get("name")
            .cloned()
            .unwrap_or_else(|| self.identity())
    }
}

/// A fully processed entity record, one JSONL line in the output store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergedRecord {
    /// Entity identifier (null when the source omits it)
    pub entity_id: Option<String>,

    /// Owning unit identifier
    pub unit_id: String,

    /// Owning unit display name
    pub unit_name: String,

    /// Listing fields merged with detail fields; detail wins on collision
    pub fields: BTreeMap<String, String>,

    /// URL the detail page was fetched from
    pub source_url: String,

    /// Unix timestamp of processing
    pub processed_at: i64,
}

impl MergedRecord {
    /// Merge listing and detail fields into an output record.
    ///
    /// Detail fields take precedence on key collision. Detail fields that
    /// extracted as `None` do not overwrite listing values.
    pub fn merge(
        entity: &Entity,
        detail_fields: BTreeMap<String, Option<String>>,
        source_url: impl Into<String>,
    ) -> Self {
        let mut fields = entity.listing_fields.clone();
        for (name, value) in detail_fields {
            if let Some(value) = value {
                fields.insert(name, value);
            }
        }

        Self {
            entity_id: entity.entity_id.clone(),
            unit_id: entity.unit_id.clone(),
            unit_name: entity.unit_name.clone(),
            fields,
            source_url: source_url.into(),
            processed_at: Utc::now().timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entity() -> Entity {
        Entity {
            entity_id: Some("1001".to_string()),
            unit_id: "10".to_string(),
            unit_name: "Dept A".to_string(),
            row_index: 0,
            listing_fields: BTreeMap::from([
                ("name".to_string(), "Alice".to_string()),
                ("title".to_string(), "Professor".to_string()),
            ]),
            detail_url: Some("https://portal.test/profile?id=1001".to_string()),
        }
    }

    #[test]
    fn test_identity_prefers_entity_id() {
        let entity = sample_entity();
        assert_eq!(entity.identity(), "1001");
    }

    #[test]
    fn test_identity_falls_back_to_position() {
        let mut entity = sample_entity();
        entity.entity_id = None;
        entity.row_index = 3;
        assert_eq!(entity.identity(), "10:row3");
    }

    #[test]
    fn test_merge_detail_wins_on_collision() {
        let entity = sample_entity();
        let detail = BTreeMap::from([
            ("name".to_string(), Some("Alice Smith".to_string())),
            ("email".to_string(), Some("a@x.org".to_string())),
        ]);

        let record = MergedRecord::merge(&entity, detail, "https://portal.test/p");

        assert_eq!(record.fields.get("name").unwrap(), "Alice Smith");
        assert_eq!(record.fields.get("email").unwrap(), "a@x.org");
        assert_eq!(record.fields.get("title").unwrap(), "Professor");
    }

    #[test]
    fn test_merge_null_detail_keeps_listing_value() {
        let entity = sample_entity();
        let detail = BTreeMap::from([("name".to_string(), None)]);

        let record = MergedRecord::merge(&entity, detail, "https://portal.test/p");

        assert_eq!(record.fields.get("name").unwrap(), "Alice");
    }
}
