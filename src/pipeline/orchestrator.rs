// src/pipeline/orchestrator.rs

//! Stage pipeline orchestrator.
//!
//! Drives the four-stage crawl as an explicit state machine: enumerate
//! units, enumerate each unit's entities into a queue, then drain the
//! queue one detail fetch at a time, emitting merged records. Progress is
//! checkpointed periodically so an interrupted run resumes where it left
//! off, and the registry (rebuilt from the output file) makes re-runs
//! idempotent.
//!
//! Execution is strictly sequential by design: one outstanding request at
//! a time, to respect the portal's rate limit. The driver is an iterative
//! loop, never recursion, so a long queue cannot grow a call chain.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{AppError, Result};
use crate::models::{Checkpoint, Config, Entity, MergedRecord};
use crate::services::{
    FetchClient, FetchRequest, enumerate_entities, enumerate_units, extract_fields,
};
use crate::storage::{CheckpointStore, OutputStore, ProcessedRegistry};

use super::state::{CrawlState, CrawlSummary};

/// Outcome of processing one queued entity.
enum EntityOutcome {
    Emitted,
    Skipped,
    Failed,
}

/// The crawl orchestrator. One instance drives one run.
pub struct Orchestrator {
    config: Arc<Config>,
    fetcher: Arc<dyn FetchClient>,
    checkpoints: CheckpointStore,
    output: OutputStore,
    registry: ProcessedRegistry,
    shutdown: Arc<AtomicBool>,

    state: CrawlState,
    units: Vec<crate::models::Unit>,
    search_page: String,
    total_units: usize,
    queue: VecDeque<Entity>,
    drained_since_checkpoint: usize,
    summary: CrawlSummary,
}

impl Orchestrator {
    /// Create an orchestrator over the given data directory.
    ///
    /// Uses `checkpoint.json` and `records.jsonl` inside it.
    pub async fn new(
        config: Arc<Config>,
        fetcher: Arc<dyn FetchClient>,
        data_dir: impl AsRef<Path>,
    ) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let checkpoints = CheckpointStore::new(data_dir.join("checkpoint.json"));
        let output = OutputStore::open(data_dir.join("records.jsonl")).await?;

        Ok(Self {
            config,
            fetcher,
            checkpoints,
            output,
            registry: ProcessedRegistry::default(),
            shutdown: Arc::new(AtomicBool::new(false)),
            state: CrawlState::Init,
            units: Vec::new(),
            search_page: String::new(),
            total_units: 0,
            queue: VecDeque::new(),
            drained_since_checkpoint: 0,
            summary: CrawlSummary::default(),
        })
    }

    /// Replace the shutdown flag (lets callers share it with a signal task).
    pub fn with_shutdown(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Flag that requests a graceful stop after the current entity.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Run the pipeline to completion (or graceful interruption).
    ///
    /// Only a failed unit enumeration aborts the run; per-unit and
    /// per-entity failures are logged and the loop advances.
    pub async fn run(mut self) -> Result<CrawlSummary> {
        loop {
            self.state = match self.state {
                CrawlState::Init => self.step_init().await?,
                CrawlState::EnumeratingUnits { resume_from } => {
                    self.step_enumerate_units(resume_from).await?
                }
                CrawlState::EnumeratingEntities { unit_index } => {
                    self.step_enumerate_entities(unit_index).await
                }
                CrawlState::FetchingEntity => self.step_fetch_entity().await,
                CrawlState::Done => break,
            };

            if self.summary.interrupted {
                break;
            }
        }

        if !self.summary.interrupted {
            // Terminal state: final checkpoint with an empty queue, then
            // confirm what the registry holds.
            self.save_checkpoint(self.total_units).await;
            log::info!(
                "Crawl complete; registry holds {} processed entities",
                self.registry.len()
            );
        }

        self.summary.log();
        Ok(self.summary.clone())
    }

    /// Load checkpoint and registry, then decide where to resume.
    async fn step_init(&mut self) -> Result<CrawlState> {
        self.registry = ProcessedRegistry::load(self.output.path()).await?;

        let Some(checkpoint) = self.checkpoints.load().await? else {
            log::info!("No checkpoint found; starting from scratch");
            return Ok(CrawlState::EnumeratingUnits { resume_from: 0 });
        };

        log::info!(
            "Resuming from checkpoint: unit {}/{}, {} entities queued",
            checkpoint.current_unit_index,
            checkpoint.total_units,
            checkpoint.queued_entities.len()
        );

        self.total_units = checkpoint.total_units;
        self.summary.units_total = checkpoint.total_units;
        self.queue = checkpoint.queued_entities.clone().into();

        if checkpoint.units_complete() {
            // All units enumerated; no need to touch the search page again.
            Ok(CrawlState::FetchingEntity)
        } else {
            Ok(CrawlState::EnumeratingUnits {
                resume_from: checkpoint.current_unit_index,
            })
        }
    }

    /// Fetch the search page and extract the unit list. Fatal on failure.
    async fn step_enumerate_units(&mut self, resume_from: usize) -> Result<CrawlState> {
        let enumeration = enumerate_units(self.fetcher.as_ref(), &self.config.portal).await?;

        if self.total_units != 0 && enumeration.units.len() != self.total_units {
            log::warn!(
                "Unit count changed since checkpoint ({} -> {}); trusting the live listing",
                self.total_units,
                enumeration.units.len()
            );
        }

        self.units = enumeration.units;
        self.search_page = enumeration.search_page;
        self.total_units = self.units.len();
        self.summary.units_total = self.total_units;

        Ok(CrawlState::EnumeratingEntities {
            unit_index: resume_from,
        })
    }

    /// Enumerate one unit's entities and advance the cursor.
    ///
    /// A malformed or empty listing skips the unit; the run continues.
    async fn step_enumerate_entities(&mut self, unit_index: usize) -> CrawlState {
        if self.shutdown.load(Ordering::Relaxed) {
            self.save_checkpoint(unit_index).await;
            self.summary.interrupted = true;
            return CrawlState::Done;
        }

        if unit_index >= self.units.len() {
            return CrawlState::FetchingEntity;
        }

        let unit = self.units[unit_index].clone();
        match enumerate_entities(
            self.fetcher.as_ref(),
            &self.config.portal,
            &unit,
            &self.search_page,
        )
        .await
        {
            Ok(entities) => {
                if entities.is_empty() {
                    log::info!("No entities in unit {} ({})", unit.unit_id, unit.display_name);
                }
                self.summary.entities_queued += entities.len();
                self.queue.extend(entities);
            }
            Err(e) => {
                log::warn!(
                    "Listing failed for unit {} ({}): {}; skipping unit",
                    unit.unit_id,
                    unit.display_name,
                    e
                );
            }
        }

        self.summary.units_enumerated += 1;
        let next = unit_index + 1;
        self.save_checkpoint(next).await;

        CrawlState::EnumeratingEntities { unit_index: next }
    }

    /// Drain one entity from the queue.
    async fn step_fetch_entity(&mut self) -> CrawlState {
        if self.shutdown.load(Ordering::Relaxed) {
            self.save_checkpoint(self.total_units).await;
            self.summary.interrupted = true;
            return CrawlState::Done;
        }

        let Some(entity) = self.queue.front().cloned() else {
            return CrawlState::Done;
        };

        match self.process_entity(&entity).await {
            EntityOutcome::Emitted => self.summary.emitted += 1,
            EntityOutcome::Skipped => self.summary.skipped += 1,
            EntityOutcome::Failed => self.summary.failed += 1,
        }

        // The entity leaves the queue only after its attempt completed, so
        // a crash mid-fetch re-attempts it on resume; the registry check
        // prevents duplicate emission if the attempt did land.
        self.queue.pop_front();
        self.drained_since_checkpoint += 1;
        if self.drained_since_checkpoint >= self.config.pipeline.checkpoint_every {
            self.save_checkpoint(self.total_units).await;
        }

        CrawlState::FetchingEntity
    }

    /// Process a single entity: skip, or fetch + extract + emit.
    async fn process_entity(&mut self, entity: &Entity) -> EntityOutcome {
        if self.registry.contains(entity.entity_id.as_deref()) {
            log::debug!("Skipping {} (already processed)", entity.identity());
            return EntityOutcome::Skipped;
        }

        match self.fetch_and_emit(entity).await {
            Ok(()) => EntityOutcome::Emitted,
            Err(e) => {
                log::warn!("Entity {} failed: {}", entity.identity(), e);
                EntityOutcome::Failed
            }
        }
    }

    /// Fetch the detail page, merge fields, and append the record.
    ///
    /// The registry is updated only after the append succeeded: ids in the
    /// registry are durably on disk.
    async fn fetch_and_emit(&mut self, entity: &Entity) -> Result<()> {
        let url = entity
            .detail_url
            .as_ref()
            .ok_or_else(|| AppError::fetch(entity.identity(), "no detail page link"))?;

        let response = self.fetcher.fetch(&FetchRequest::get(url)).await?;
        let detail_fields = extract_fields(&response.body, &self.config.portal.detail_fields)?;
        let record = MergedRecord::merge(entity, detail_fields, &response.final_url);

        self.output.append(&record).await?;
        self.registry.insert(entity.entity_id.as_deref());

        log::info!("Emitted {} ({})", entity.identity(), entity.display_name());
        Ok(())
    }

    /// Best-effort checkpoint save; failure is logged, never fatal.
    async fn save_checkpoint(&mut self, unit_cursor: usize) {
        let checkpoint = Checkpoint::new(
            unit_cursor,
            self.total_units,
            self.queue.iter().cloned().collect(),
        );

        match self.checkpoints.save(&checkpoint).await {
            Ok(()) => {
                self.drained_since_checkpoint = 0;
                log::debug!(
                    "Checkpoint saved: unit {}/{}, {} queued",
                    unit_cursor,
                    self.total_units,
                    checkpoint.queued_entities.len()
                );
            }
            Err(e) => {
                // Availability over durability: progress since the last
                // good checkpoint is at risk, but the run continues.
                log::warn!("Checkpoint save failed: {}; continuing", e);
            }
        }
    }
}
