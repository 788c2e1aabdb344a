//! Update pipeline.
//!
//! Pipeline flow:
//! CSV → Records → Resume filter (checkpoint) → Row updater → Remote table

use crate::checkpoint::{CheckpointStore, resume_after};
use crate::client::RowStore;
use crate::models::{InputConfig, Result, RunStats, Target};
use crate::pipeline::{RowUpdater, load_records};
use std::path::Path;
use std::time::Instant;
use tracing::{Instrument, error, info, info_span};

/// Loads a CSV and applies it to the remote table, resuming from the checkpoint.
pub struct UpdatePipeline<S> {
    updater: RowUpdater<S>,
    input: InputConfig,
}

impl<S: RowStore> UpdatePipeline<S> {
    pub fn new(store: S, checkpoint: CheckpointStore, target: Target, input: InputConfig) -> Self {
        Self {
            updater: RowUpdater::new(store, checkpoint, target),
            input,
        }
    }

    /// Run the pipeline over `csv_path`.
    ///
    /// Fails before any remote call when the CSV cannot be loaded or the
    /// checkpointed id is not in it.
    pub async fn run(&self, csv_path: &Path) -> Result<RunStats> {
        let target = self.updater.target();
        let span = info_span!("update", table = %target.table, column = %target.column);
        self.run_inner(csv_path).instrument(span).await
    }

    async fn run_inner(&self, csv_path: &Path) -> Result<RunStats> {
        let start = Instant::now();

        let records = load_records(csv_path, &self.input)?;
        let total = records.len();

        let checkpoint = self.updater.checkpoint();
        let last_id = checkpoint.read()?;
        let pending = resume_after(records, last_id.as_deref()).inspect_err(|e| {
            error!(
                error = %e,
                checkpoint = %checkpoint.path().display(),
                "Cannot resume, aborting"
            );
        })?;

        if pending.is_empty() {
            info!("All rows already processed, nothing to do");
        } else {
            info!(total_rows = total, pending = pending.len(), "Starting update");
        }

        let mut stats = self.updater.run(&pending).await?;
        stats.total_rows = total;
        stats.resumed_past = total - pending.len();
        if stats.last_checkpoint.is_none() {
            stats.last_checkpoint = last_id;
        }
        stats.runtime_secs = start.elapsed().as_secs_f64();

        info!(
            updated = stats.updated,
            skipped = stats.skipped,
            failed = stats.failed,
            unexpected = stats.unexpected,
            checkpoint = stats.last_checkpoint.as_deref().unwrap_or("-"),
            runtime = %format!("{:.1}s", stats.runtime_secs),
            "Update complete"
        );

        Ok(stats)
    }

    pub fn updater(&self) -> &RowUpdater<S> {
        &self.updater
    }
}
