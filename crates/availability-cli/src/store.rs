//! JSON-file persistence for the in-memory repository.
//!
//! The whole store is read at the start of a command and written back after a
//! successful write, so each invocation works on one consistent snapshot.

use std::path::Path;

use anyhow::{Context, Result};
use availability_engine::MemoryRepository;
use tracing::debug;

/// Load the store at `path`, or start empty when the file does not exist yet.
pub fn load(path: &Path) -> Result<MemoryRepository> {
    if !path.exists() {
        debug!(path = %path.display(), "store not found; starting empty");
        return Ok(MemoryRepository::new());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read store: {}", path.display()))?;
    MemoryRepository::from_json(&json)
        .with_context(|| format!("Store is not valid JSON: {}", path.display()))
}

/// Write the store to `path`, replacing it atomically.
pub fn save(path: &Path, repo: &MemoryRepository) -> Result<()> {
    let json = repo.to_json().context("Failed to serialise store")?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)
        .with_context(|| format!("Failed to write store: {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace store: {}", path.display()))?;
    debug!(path = %path.display(), "store saved");
    Ok(())
}
