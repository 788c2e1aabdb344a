//! topic-updater - Resumable CSV-driven column updates for Supabase tables.
//!
//! ## Architecture
//!
//! One sequential pipeline:
//! - **Loader**: Reads the CSV into ordered records
//! - **Checkpoint**: Persists the id of the last row confirmed updated
//! - **Resume filter**: Skips rows up to and including the checkpoint
//! - **Row updater**: Parses each list literal and PATCHes the remote row
//!
//! ## Epistemic Design
//!
//! - K_i (Knowledge): Tables and columns are closed enums
//! - B_i (Beliefs): Rows may be malformed or rejected → logged and skipped
//! - I^R (Resolvable): Credentials and column names resolved once at startup
//! - I^B (Bounded): Interruptions recovered by the checkpoint on the next run

pub mod checkpoint;
pub mod client;
pub mod models;
pub mod pipeline;

// Re-exports for convenience
pub use checkpoint::{CheckpointStore, resume_after};
pub use client::{RowStore, SupabaseClient};
pub use models::{
    Column, Config, Record, RemoteError, Result, RunStats, Table, Target, UpdaterError,
    parse_list_literal,
};
pub use pipeline::{RowOutcome, RowUpdater, UpdatePipeline, load_records};
