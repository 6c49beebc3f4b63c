// src/pipeline/state.rs

//! Orchestrator state machine and run summary.

/// Current stage of the crawl, as a tagged variant.
///
/// ```text
/// Init → EnumeratingUnits → EnumeratingEntities(cursor) → FetchingEntity → Done
/// ```
///
/// The unit cursor lives inside the variant; the driver loop in the
/// orchestrator owns all transitions, so there is no progress counter
/// mutated from multiple places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    /// Loading checkpoint and registry
    Init,

    /// Fetching the search page and extracting the unit list.
    /// `resume_from` is the unit cursor restored from a checkpoint.
    EnumeratingUnits { resume_from: usize },

    /// Submitting the listing form for the unit at `unit_index`
    EnumeratingEntities { unit_index: usize },

    /// Draining the entity queue one detail fetch at a time
    FetchingEntity,

    /// Terminal; triggers the final checkpoint save
    Done,
}

/// Final counts reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Units discovered on the search page
    pub units_total: usize,

    /// Units whose listings were enumerated this run
    pub units_enumerated: usize,

    /// Entities queued this run (excludes entities restored from checkpoint)
    pub entities_queued: usize,

    /// Records appended to the output store
    pub emitted: usize,

    /// Entities skipped because their id was already in the registry
    pub skipped: usize,

    /// Entities whose detail fetch or extraction failed
    pub failed: usize,

    /// Whether the run stopped early on a shutdown signal
    pub interrupted: bool,
}

impl CrawlSummary {
    /// Log the summary at info level.
    pub fn log(&self) {
        if self.interrupted {
            log::info!("Run interrupted; progress checkpointed");
        }
        log::info!(
            "Units: {}/{} enumerated, {} entities queued",
            self.units_enumerated,
            self.units_total,
            self.entities_queued
        );
        log::info!(
            "Entities: {} emitted, {} skipped (already processed), {} failed",
            self.emitted,
            self.skipped,
            self.failed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions_are_comparable() {
        assert_eq!(
            CrawlState::EnumeratingEntities { unit_index: 2 },
            CrawlState::EnumeratingEntities { unit_index: 2 }
        );
        assert_ne!(CrawlState::Init, CrawlState::Done);
    }
}
