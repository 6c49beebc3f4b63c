// src/pipeline/mod.rs

//! Stage pipeline driving the crawl.

mod orchestrator;
mod state;

pub use orchestrator::Orchestrator;
pub use state::{CrawlState, CrawlSummary};
