//! Team persistence between invocations
//!
//! The team is stored as a selection snapshot (`session.json`) in the
//! platform data directory, unless `--session` points elsewhere.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use teamdex_core::store::{PersistedSelection, SelectionStore};

const SESSION_FILE: &str = "session.json";

pub struct Session {
    path: PathBuf,
}

impl Session {
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// `session.json` in the platform data directory
    pub fn default_location() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("dev", "teamdex", "teamdex")
            .context("Could not determine data directory")?;
        Ok(Self::at(dirs.data_dir().join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored team, or an empty store if there is none yet
    pub fn load(&self) -> Result<SelectionStore> {
        if !self.path.exists() {
            debug!("No session at {}, starting empty", self.path.display());
            return Ok(SelectionStore::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session {}", self.path.display()))?;
        let snapshot = PersistedSelection::from_json(&content)
            .with_context(|| format!("Failed to parse session {}", self.path.display()))?;

        Ok(SelectionStore::from_snapshot(snapshot))
    }

    pub fn save(&self, store: &SelectionStore) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = store.snapshot().to_json()?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session {}", self.path.display()))?;
        debug!("Saved {} entries to {}", store.count(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamdex_core::CatalogItem;
    use tempfile::TempDir;

    #[test]
    fn test_missing_session_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let session = Session::at(temp_dir.path().join("none.json"));
        assert_eq!(session.load().unwrap().count(), 0);
    }

    #[test]
    fn test_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let session = Session::at(temp_dir.path().join("nested").join(SESSION_FILE));

        let mut store = SelectionStore::new();
        store.add(CatalogItem::new(25, "pikachu", ["electric"], "p.png"));
        session.save(&store).unwrap();

        let loaded = session.load().unwrap();
        assert_eq!(loaded.selection(), store.selection());
    }

    #[test]
    fn test_corrupt_session_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SESSION_FILE);
        std::fs::write(&path, "{not json").unwrap();
        assert!(Session::at(path).load().is_err());
    }
}
