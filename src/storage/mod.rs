// src/storage/mod.rs

//! Durable state for the crawl.
//!
//! Three files back a run, all under the data directory:
//!
//! ```text
//! data/
//! ├── config.toml        # Crawler configuration
//! ├── checkpoint.json    # Progress snapshot (atomic overwrite)
//! └── records.jsonl      # Append-only output, the source of truth
//! ```
//!
//! The output file is authoritative for "what has been processed"; the
//! checkpoint is advisory and only shortcuts re-enumeration on resume.

pub mod checkpoint;
pub mod output;
pub mod registry;

pub use checkpoint::CheckpointStore;
pub use output::{OutputStats, OutputStore};
pub use registry::ProcessedRegistry;
