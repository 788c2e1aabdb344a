//! Resume filter: skip records already covered by the checkpoint.

use crate::models::{Record, Result, UpdaterError};
use tracing::info;

/// Drop every record up to and including the one with `last_id`.
///
/// With no checkpoint the input is returned untouched. A checkpoint id absent
/// from the input is an error: the CSV probably changed between runs and
/// continuing could update rows twice or skip some silently.
pub fn resume_after(records: Vec<Record>, last_id: Option<&str>) -> Result<Vec<Record>> {
    let Some(last_id) = last_id.map(str::trim) else {
        return Ok(records);
    };

    let position = records
        .iter()
        .position(|r| r.id.trim() == last_id)
        .ok_or_else(|| UpdaterError::Resume {
            id: last_id.to_string(),
        })?;

    info!(
        last_id,
        skipped = position + 1,
        remaining = records.len() - position - 1,
        "Resuming after checkpoint"
    );

    Ok(records.into_iter().skip(position + 1).collect())
}
