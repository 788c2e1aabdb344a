//! Remote row store abstraction.

use crate::models::{RemoteError, Target};
use serde_json::Value;
use std::future::Future;

/// A remote table that supports "update the row whose id equals X".
///
/// B_i: The store confirms an update by returning the updated rows. An empty
/// result means the request was accepted but nothing matched the id.
pub trait RowStore {
    /// Set `target.column` to `values` on the row with primary key `id`.
    fn update_column(
        &self,
        target: Target,
        id: &str,
        values: &[Value],
    ) -> impl Future<Output = Result<Vec<Value>, RemoteError>> + Send;
}
