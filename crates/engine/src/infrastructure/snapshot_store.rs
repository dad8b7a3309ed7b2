//! Snapshot store adapters.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use essencecalc_domain::CharacterSnapshot;
use essencecalc_shared::{parse_snapshot, to_json_pretty};

use crate::infrastructure::ports::{SnapshotStore, StoreError};

/// Stores the snapshot as pretty JSON in a single file.
///
/// Writes go to a `.tmp` sibling first and are renamed into place, so a
/// crash mid-write never leaves a truncated file behind.
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn load(&self) -> Result<Option<CharacterSnapshot>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io("load", e)),
        };
        Ok(Some(parse_snapshot(&text)?))
    }

    fn save(&self, snapshot: &CharacterSnapshot) -> Result<(), StoreError> {
        let json = to_json_pretty(snapshot)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io("create_dir", e))?;
        }
        let temp = self.temp_path();
        fs::write(&temp, json).map_err(|e| StoreError::io("write", e))?;
        fs::rename(&temp, &self.path).map_err(|e| StoreError::io("rename", e))?;
        tracing::debug!(path = %self.path.display(), "Snapshot saved");
        Ok(())
    }
}

/// Keeps the snapshot in memory; nothing survives a restart. The binary
/// persists through [`JsonFileSnapshotStore`] whatever the autosave setting.
#[derive(Default)]
pub struct InMemorySnapshotStore {
    snapshot: Mutex<Option<CharacterSnapshot>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: CharacterSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
        }
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<Option<CharacterSnapshot>, StoreError> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|e| StoreError::io("load", e))?;
        Ok(guard.clone())
    }

    fn save(&self, snapshot: &CharacterSnapshot) -> Result<(), StoreError> {
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|e| StoreError::io("save", e))?;
        *guard = Some(snapshot.clone());
        Ok(())
    }
}
