//! Row updater: one remote update per record, checkpoint on confirmed success.
//!
//! Epistemic foundation:
//! - K_i: The checkpoint only ever names a row the store confirmed
//! - B_i: Each row may be malformed or rejected → logged, never fatal
//! - I^B: A checkpoint that cannot be written → fatal, the invariant is gone

use crate::checkpoint::CheckpointStore;
use crate::client::RowStore;
use crate::models::{
    ListFormatError, Record, RemoteError, Result, RunStats, Target, parse_list_literal,
};
use tracing::{error, info, warn};

/// Terminal outcome of processing one record.
#[derive(Debug)]
pub enum RowOutcome {
    /// The store returned the updated row(s); checkpoint advanced
    Updated { rows: usize },
    /// The record could not be turned into an update
    Skipped { reason: SkipReason },
    /// The store rejected the update or could not be reached
    Failed { error: RemoteError },
    /// The store accepted the request but reported no updated row
    Unexpected,
}

/// Why a record was skipped without contacting the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingId,
    InvalidList(ListFormatError),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => f.write_str("empty id"),
            Self::InvalidList(e) => write!(f, "invalid list format: {e}"),
        }
    }
}

/// Applies records to a remote store one at a time.
pub struct RowUpdater<S> {
    store: S,
    checkpoint: CheckpointStore,
    target: Target,
}

impl<S: RowStore> RowUpdater<S> {
    pub fn new(store: S, checkpoint: CheckpointStore, target: Target) -> Self {
        Self {
            store,
            checkpoint,
            target,
        }
    }

    /// Process a single record.
    ///
    /// Only a failed checkpoint write is returned as an error.
    pub async fn process(&self, record: &Record) -> Result<RowOutcome> {
        let id = record.id.as_str();

        if id.is_empty() {
            warn!(line = record.line, "Skipping row without id");
            return Ok(RowOutcome::Skipped {
                reason: SkipReason::MissingId,
            });
        }

        let values = match parse_list_literal(&record.list_literal) {
            Ok(values) => values,
            Err(e) => {
                warn!(id, line = record.line, error = %e, "Skipping row: invalid list format");
                return Ok(RowOutcome::Skipped {
                    reason: SkipReason::InvalidList(e),
                });
            }
        };

        match self.store.update_column(self.target, id, &values).await {
            Ok(rows) if !rows.is_empty() => {
                info!(id, items = values.len(), "Successfully updated {}", self.target);
                self.checkpoint.write(id)?;
                Ok(RowOutcome::Updated { rows: rows.len() })
            }
            Ok(_) => {
                warn!(id, "Unexpected response: update accepted but no row returned");
                Ok(RowOutcome::Unexpected)
            }
            Err(e) => {
                error!(id, error = %e, "Failed to update {}", self.target);
                Ok(RowOutcome::Failed { error: e })
            }
        }
    }

    /// Process records in order until the input is exhausted.
    pub async fn run(&self, records: &[Record]) -> Result<RunStats> {
        let mut stats = RunStats::default();

        for record in records {
            match self.process(record).await? {
                RowOutcome::Updated { .. } => {
                    stats.updated += 1;
                    stats.last_checkpoint = Some(record.id.clone());
                }
                RowOutcome::Skipped { .. } => stats.skipped += 1,
                RowOutcome::Failed { .. } => stats.failed += 1,
                RowOutcome::Unexpected => stats.unexpected += 1,
            }
        }

        Ok(stats)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn checkpoint(&self) -> &CheckpointStore {
        &self.checkpoint
    }

    pub fn target(&self) -> Target {
        self.target
    }
}
