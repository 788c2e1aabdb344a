//! Core data models for topic-updater.
//!
//! Epistemic mapping:
//! - K_i (Knowledge): Concrete types with compile-time guarantees (Table, Column)
//! - B_i (Beliefs): Wrapped in Result/Option (list literals, checkpoints)
//! - I^R (Resolvable): Config parameters
//! - I^B (Bounded): Error variants per failure scope

mod config;
mod error;
mod record;
mod topics;

pub use config::*;
pub use error::*;
pub use record::*;
pub use topics::*;
