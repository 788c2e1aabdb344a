//! Pipeline module - CSV loading, row updates and the resumable run.

mod loader;
mod run;
pub(crate) mod updater;

pub use loader::*;
pub use run::*;
pub use updater::{RowOutcome, RowUpdater, SkipReason};
