use std::path::{Path, PathBuf};

use crate::config;
use crate::error::{Result, TrackerError};
use crate::model::MilestoneCollectionState;

const SESSION_FILE: &str = "session.json";

/// Durable home of the milestone snapshot between runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory, or at `override_path` if set.
    pub fn open(override_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = override_path {
            return Ok(Self::new(path));
        }
        let dirs = config::project_dirs().ok_or(TrackerError::NoDataDir)?;
        Ok(Self::new(dirs.data_dir().join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved snapshot. A missing file is not an error.
    pub fn load(&self) -> Result<Option<MilestoneCollectionState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&self.path)?;
        let state = serde_json::from_str(&json)?;
        tracing::info!(path = %self.path.display(), "session loaded");
        Ok(Some(state))
    }

    /// Save the snapshot, writing a temp file and renaming it into place.
    pub fn save(&self, state: &MilestoneCollectionState) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json.as_bytes())?;
        std::fs::rename(&tmp_path, &self.path)?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Forget the saved session.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            tracing::info!(path = %self.path.display(), "session cleared");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join(SESSION_FILE));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            SessionStore::new(path).load(),
            Err(TrackerError::Json(_))
        ));
    }

    #[test]
    fn clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join(SESSION_FILE));
        store.save(&MilestoneCollectionState::default()).unwrap();
        assert!(store.path().exists());
        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }
}
