//! Application state and composition.

use std::sync::Arc;

use thiserror::Error;

use crate::infrastructure::{
    catalog_loader::{CatalogLoader, CatalogLoaderError},
    clock::SystemClock,
    ports::{ClockPort, SnapshotStore},
    settings::EngineSettings,
    snapshot_store::JsonFileSnapshotStore,
};
use crate::use_cases::{EssenceSession, SessionError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogLoaderError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Main application state.
///
/// Holds the settings it was built from and the open session.
pub struct App {
    pub settings: EngineSettings,
    pub session: EssenceSession,
}

impl App {
    /// Loads the catalog and restores the saved character from the
    /// configured snapshot file.
    pub fn new(settings: EngineSettings) -> Result<Self, AppError> {
        let catalog = Arc::new(CatalogLoader::new(&settings.catalog_path).load()?);
        let store: Arc<dyn SnapshotStore> =
            Arc::new(JsonFileSnapshotStore::new(&settings.snapshot_path));
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

        tracing::debug!(
            catalog = %settings.catalog_path.display(),
            snapshot = %settings.snapshot_path.display(),
            autosave = settings.autosave,
            "Composing application"
        );

        let session = EssenceSession::open(catalog, store, clock, &settings)?;
        Ok(Self { settings, session })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use serde_json::json;

    #[test]
    fn autosave_off_still_saves_to_snapshot_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let catalog_path = dir.path().join("catalog.json");
        let doc = json!({
            "abilities": {
                "earth": [
                    { "id": "earth_initiate_stonecunning", "name": "Stonecunning", "tier": "initiate", "isPassive": true }
                ]
            }
        });
        fs::write(&catalog_path, doc.to_string()).expect("write catalog");
        let settings = EngineSettings {
            catalog_path,
            snapshot_path: dir.path().join("essence-config.json"),
            autosave: false,
            ..EngineSettings::default()
        };

        let mut app = App::new(settings).expect("app");
        app.session
            .select("earth_initiate_stonecunning")
            .expect("select");
        assert!(!app.settings.snapshot_path.exists());

        app.session.save().expect("save");
        let reopened = App::new(app.settings.clone()).expect("reopen");
        assert!(reopened
            .session
            .engine()
            .is_selected("earth_initiate_stonecunning"));
    }
}
