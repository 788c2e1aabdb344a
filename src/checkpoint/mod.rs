//! Checkpoint module for resumable runs.
//!
//! Provides:
//! - `CheckpointStore`: Persistence of the last confirmed identifier
//! - `resume_after`: Truncation of the input to rows after the checkpoint

mod resume;
mod store;

pub use resume::*;
pub use store::*;
