//! Reads a users file into records.

use std::path::Path;

use anyhow::{Context, Result};
use ncprov_core::{parse_records, UserRecord};

/// Read and parse the users file at `path`.
///
/// Structural problems (not JSON, not an array, an element that is not an
/// object) are returned as errors carrying a
/// [`ncprov_core::RecordSourceError`] source.
pub fn load_records(path: &Path) -> Result<Vec<UserRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read user JSON at {}", path.display()))?;
    let records = parse_records(&content)
        .with_context(|| format!("could not parse user JSON at {}", path.display()))?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded user records");
    Ok(records)
}
