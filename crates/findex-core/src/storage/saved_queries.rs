//! Saved search repositories
//!
//! - [`MemorySavedQueryRepository`]: process-local, for tests and embedding
//! - [`JsonFileSavedQueryRepository`]: a single pretty-printed JSON array on
//!   disk, replaced atomically on every write

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::domain::search::SavedQueryRepository;
use crate::error::Result;

/// In-memory repository
#[derive(Debug, Clone, Default)]
pub struct MemorySavedQueryRepository {
    entries: Vec<Value>,
}

impl MemorySavedQueryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with already-persisted entries
    pub fn with_entries(entries: Vec<Value>) -> Self {
        Self { entries }
    }

    /// Entries as they would be persisted
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }
}

impl SavedQueryRepository for MemorySavedQueryRepository {
    fn load_raw(&self) -> Result<Vec<Value>> {
        Ok(self.entries.clone())
    }

    fn store_raw(&mut self, entries: Vec<Value>) -> Result<()> {
        self.entries = entries;
        Ok(())
    }
}

/// JSON file repository
///
/// A missing file reads as an empty store. A file that is not a JSON array
/// (including one that is not UTF-8) is set aside as `<name>.corrupt`, or
/// `<name>.corrupt.N` when earlier copies exist, and also reads as empty.
#[derive(Debug, Clone)]
pub struct JsonFileSavedQueryRepository {
    path: PathBuf,
}

impl JsonFileSavedQueryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sidecar(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "saved_searches.json".into());
        name.push(suffix);
        self.path.with_file_name(name)
    }

    /// First `<name>.corrupt`, `<name>.corrupt.1`, ... not already on disk
    fn quarantine_path(&self) -> PathBuf {
        let first = self.sidecar(".corrupt");
        if !first.exists() {
            return first;
        }
        (1u32..)
            .map(|n| self.sidecar(&format!(".corrupt.{}", n)))
            .find(|candidate| !candidate.exists())
            .unwrap_or(first)
    }

    fn quarantine(&self, reason: &str) -> Result<()> {
        let corrupt = self.quarantine_path();
        warn!(
            path = %self.path.display(),
            moved_to = %corrupt.display(),
            reason,
            "Saved search file is unreadable; starting with an empty store"
        );
        fs::rename(&self.path, &corrupt)?;
        Ok(())
    }
}

impl SavedQueryRepository for JsonFileSavedQueryRepository {
    fn load_raw(&self) -> Result<Vec<Value>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No saved search file yet");
            return Ok(Vec::new());
        }

        // Bytes, not a String: invalid UTF-8 is quarantined like any other parse failure
        let contents = fs::read(&self.path)?;
        if contents.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice::<Value>(&contents) {
            Ok(Value::Array(entries)) => {
                debug!(path = %self.path.display(), count = entries.len(), "Loaded saved searches");
                Ok(entries)
            }
            Ok(_) => {
                self.quarantine("top-level value is not an array")?;
                Ok(Vec::new())
            }
            Err(e) => {
                self.quarantine(&e.to_string())?;
                Ok(Vec::new())
            }
        }
    }

    fn store_raw(&mut self, entries: Vec<Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let count = entries.len();
        let contents = serde_json::to_string_pretty(&Value::Array(entries))?;
        let tmp = self.sidecar(".tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;

        info!(path = %self.path.display(), count, "Saved searches written");
        Ok(())
    }
}
