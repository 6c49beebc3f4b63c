// src/models/mod.rs

//! Domain models for the crawler application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod checkpoint;
mod config;
mod entity;
mod unit;

// Re-export all public types
pub use checkpoint::{CHECKPOINT_VERSION, Checkpoint};
pub use config::{Config, CrawlerConfig, FieldSpec, PipelineConfig, PortalConfig};
pub use entity::{Entity, MergedRecord};
pub use unit::Unit;
