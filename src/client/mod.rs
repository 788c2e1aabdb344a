//! Remote store client module.

mod store;
mod supabase;

pub use store::*;
pub use supabase::*;
