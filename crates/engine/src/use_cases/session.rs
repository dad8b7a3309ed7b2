//! Essence session use case.
//!
//! Wraps the allocation engine with persistence: the stored character is
//! loaded on open, and every successful change is written back when autosave
//! is enabled.

use std::sync::Arc;

use essencecalc_domain::{
    AbilityCatalog, AllocationEngine, AllocationError, Deselection, EssencePath, Level,
    LevelChange, Revalidation, ToggleOutcome,
};
use essencecalc_shared::{parse_snapshot, to_json_pretty, CharacterSummary, SnapshotError};
use thiserror::Error;

use crate::infrastructure::ports::{ClockPort, SnapshotStore, StoreError};
use crate::infrastructure::settings::EngineSettings;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Ability not found in the catalog: {0}")]
    UnknownAbility(String),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One player's character build, backed by a snapshot store.
pub struct EssenceSession {
    engine: AllocationEngine,
    store: Arc<dyn SnapshotStore>,
    clock: Arc<dyn ClockPort>,
    autosave: bool,
}

impl EssenceSession {
    /// Session with a fresh character; the store is not read.
    pub fn new(
        catalog: Arc<AbilityCatalog>,
        store: Arc<dyn SnapshotStore>,
        clock: Arc<dyn ClockPort>,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            engine: AllocationEngine::new(catalog, settings.default_level),
            store,
            clock,
            autosave: settings.autosave,
        }
    }

    /// Session restored from the store.
    ///
    /// A stored snapshot that fails validation is skipped with a warning and
    /// the character starts fresh. Storage failures are returned.
    pub fn open(
        catalog: Arc<AbilityCatalog>,
        store: Arc<dyn SnapshotStore>,
        clock: Arc<dyn ClockPort>,
        settings: &EngineSettings,
    ) -> Result<Self, SessionError> {
        let mut session = Self::new(catalog, store, clock, settings);
        match session.store.load() {
            Ok(Some(snapshot)) => {
                session.engine.load_snapshot(snapshot);
                let unknown = session.engine.unknown_selections();
                if !unknown.is_empty() {
                    tracing::warn!(
                        count = unknown.len(),
                        "Saved character references abilities missing from the catalog"
                    );
                }
                tracing::info!(level = %session.engine.level(), "Restored saved character");
            }
            Ok(None) => {
                tracing::info!(level = %session.engine.level(), "No saved character, starting fresh");
            }
            Err(e) if e.is_invalid_snapshot() => {
                tracing::warn!(error = %e, "Ignoring invalid saved character, starting fresh");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(session)
    }

    pub fn engine(&self) -> &AllocationEngine {
        &self.engine
    }

    pub fn summary(&self) -> CharacterSummary {
        CharacterSummary::from_engine(&self.engine)
    }

    fn resolve_path(&self, ability_id: &str) -> Result<EssencePath, SessionError> {
        self.engine
            .catalog()
            .path_of(ability_id)
            .ok_or_else(|| SessionError::UnknownAbility(ability_id.to_string()))
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn select(&mut self, ability_id: &str) -> Result<(), SessionError> {
        let path = self.resolve_path(ability_id)?;
        if let Err(e) = self.engine.select(ability_id, path) {
            tracing::debug!(ability_id, path = %path, error = %e, "Selection rejected");
            return Err(e.into());
        }
        tracing::info!(ability_id, path = %path, "Ability selected");
        self.persist()
    }

    /// Returns `None` when the ability was not selected; nothing is saved then.
    pub fn deselect(&mut self, ability_id: &str) -> Result<Option<Deselection>, SessionError> {
        let path = self.resolve_path(ability_id)?;
        let Some(deselection) = self.engine.deselect(ability_id, path) else {
            return Ok(None);
        };
        log_deselection(&deselection);
        self.persist()?;
        Ok(Some(deselection))
    }

    pub fn toggle(&mut self, ability_id: &str) -> Result<ToggleOutcome, SessionError> {
        let path = self.resolve_path(ability_id)?;
        let outcome = self.engine.toggle(ability_id, path)?;
        match &outcome {
            ToggleOutcome::Selected(id) => {
                tracing::info!(ability_id = %id, path = %path, "Ability selected");
            }
            ToggleOutcome::Deselected(deselection) => log_deselection(deselection),
        }
        self.persist()?;
        Ok(outcome)
    }

    // =========================================================================
    // Level
    // =========================================================================

    pub fn set_level(&mut self, level: Level) -> Result<LevelChange, SessionError> {
        let change = self.engine.set_level(level);
        tracing::info!(
            previous = %change.previous,
            current = %change.current,
            removed = change.revalidation.removed.len(),
            "Character level changed"
        );
        log_revalidation(&change.revalidation);
        self.persist()?;
        Ok(change)
    }

    /// Drops every selection that is no longer unlocked.
    pub fn revalidate(&mut self) -> Result<Revalidation, SessionError> {
        let revalidation = self.engine.revalidate();
        log_revalidation(&revalidation);
        if !revalidation.is_empty() {
            self.persist()?;
        }
        Ok(revalidation)
    }

    // =========================================================================
    // Active essence
    // =========================================================================

    pub fn adjust_active_essence(
        &mut self,
        path: EssencePath,
        delta: i32,
    ) -> Result<u32, SessionError> {
        let value = self.engine.adjust_active_essence(path, delta);
        tracing::debug!(path = %path, delta, value, "Active essence adjusted");
        self.persist()?;
        Ok(value)
    }

    pub fn restore_all(&mut self) -> Result<(), SessionError> {
        self.engine.restore_all_active_essence();
        tracing::info!("Active essence restored on every path");
        self.persist()
    }

    pub fn clear_all(&mut self) -> Result<(), SessionError> {
        self.engine.clear_active_essence();
        tracing::info!("Active essence cleared on every path");
        self.persist()
    }

    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.engine.reset();
        tracing::info!(level = %self.engine.level(), "Character reset");
        self.persist()
    }

    // =========================================================================
    // Import / export
    // =========================================================================

    pub fn export_json(&self) -> Result<String, SessionError> {
        Ok(to_json_pretty(&self.engine.export_snapshot())?)
    }

    /// `essence-config-YYYY-MM-DD.json`, dated by the injected clock.
    pub fn export_file_name(&self) -> String {
        format!("essence-config-{}.json", self.clock.now().format("%Y-%m-%d"))
    }

    /// Replaces the character with an imported one. Invalid input leaves
    /// the current character untouched.
    pub fn import_json(&mut self, text: &str) -> Result<(), SessionError> {
        let snapshot = match parse_snapshot(text) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "Import rejected");
                return Err(e.into());
            }
        };
        self.engine.load_snapshot(snapshot);
        tracing::info!(
            level = %self.engine.level(),
            selected = self.engine.selection().len(),
            "Character imported"
        );
        self.persist()
    }

    /// Writes the current character regardless of the autosave setting.
    pub fn save(&self) -> Result<(), SessionError> {
        self.store.save(&self.engine.export_snapshot())?;
        Ok(())
    }

    fn persist(&self) -> Result<(), SessionError> {
        if !self.autosave {
            return Ok(());
        }
        if let Err(e) = self.save() {
            tracing::warn!(error = %e, "Failed to save character");
            return Err(e);
        }
        Ok(())
    }
}

fn log_deselection(deselection: &Deselection) {
    tracing::info!(
        ability_id = %deselection.ability_id,
        path = %deselection.path,
        refunded = deselection.refunded,
        "Ability deselected"
    );
    for id in &deselection.cascaded {
        tracing::info!(ability_id = %id, path = %deselection.path, "Ability unallocated by cascade");
    }
}

fn log_revalidation(revalidation: &Revalidation) {
    for id in &revalidation.removed {
        tracing::info!(ability_id = %id, "Ability unallocated, tier no longer unlocked");
    }
    for id in &revalidation.unknown {
        tracing::warn!(ability_id = %id, "Dropped selection missing from the catalog");
    }
    for path in &revalidation.zeroed_paths {
        tracing::info!(path = %path, "Active essence reset after losing active abilities");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockClockPort, MockSnapshotStore};
    use crate::infrastructure::snapshot_store::InMemorySnapshotStore;
    use chrono::{TimeZone, Utc};
    use essencecalc_domain::{AbilityId, CharacterSnapshot};
    use essencecalc_shared::parse_catalog;
    use serde_json::json;

    fn catalog() -> Arc<AbilityCatalog> {
        let doc = json!({
            "abilities": {
                "earth": [
                    { "id": "earth_initiate_stonecunning", "name": "Stonecunning", "tier": "initiate", "isPassive": true },
                    { "id": "earth_active_earthen_ward", "name": "Earthen Ward", "tier": "initiate", "isActive": true },
                    { "id": "earth_adept_stone_skin", "name": "Stone Skin", "tier": "adept", "isActive": true }
                ]
            }
        });
        Arc::new(parse_catalog(&doc.to_string()).expect("valid catalog"))
    }

    fn clock() -> Arc<dyn ClockPort> {
        let now = Utc
            .with_ymd_and_hms(2025, 6, 15, 10, 30, 0)
            .single()
            .expect("valid time");
        Arc::new(FixedClock(now))
    }

    fn settings(level: u8, autosave: bool) -> EngineSettings {
        EngineSettings {
            default_level: Level::new(level).expect("valid level"),
            autosave,
            ..EngineSettings::default()
        }
    }

    fn session_with_store(store: MockSnapshotStore, level: u8) -> EssenceSession {
        EssenceSession::new(catalog(), Arc::new(store), clock(), &settings(level, true))
    }

    #[test]
    fn open_without_saved_character_uses_default_level() {
        let mut store = MockSnapshotStore::new();
        store.expect_load().times(1).returning(|| Ok(None));

        let session = EssenceSession::open(catalog(), Arc::new(store), clock(), &settings(5, true))
            .expect("opens");
        assert_eq!(session.engine().level().value(), 5);
        assert!(session.engine().selection().is_empty());
    }

    #[test]
    fn open_restores_saved_character() {
        let mut snapshot = CharacterSnapshot::empty(Level::new(9).expect("valid level"));
        snapshot.selected_abilities = vec![AbilityId::from("earth_active_earthen_ward")];
        let store = InMemorySnapshotStore::with_snapshot(snapshot);

        let session = EssenceSession::open(catalog(), Arc::new(store), clock(), &settings(1, true))
            .expect("opens");
        assert_eq!(session.engine().level().value(), 9);
        assert!(session.engine().is_selected("earth_active_earthen_ward"));
    }

    #[test]
    fn open_skips_invalid_saved_character() {
        let mut store = MockSnapshotStore::new();
        store
            .expect_load()
            .returning(|| Err(StoreError::InvalidSnapshot("missing character level".into())));

        let session = EssenceSession::open(catalog(), Arc::new(store), clock(), &settings(3, true))
            .expect("falls back to defaults");
        assert_eq!(session.engine().level().value(), 3);
    }

    #[test]
    fn open_propagates_storage_failure() {
        let mut store = MockSnapshotStore::new();
        store
            .expect_load()
            .returning(|| Err(StoreError::io("load", "permission denied")));

        let result = EssenceSession::open(catalog(), Arc::new(store), clock(), &settings(1, true));
        assert!(matches!(result, Err(SessionError::Store(StoreError::Io { .. }))));
    }

    #[test]
    fn successful_select_autosaves() {
        let mut store = MockSnapshotStore::new();
        store
            .expect_save()
            .withf(|snapshot| snapshot.selected_abilities.len() == 1)
            .times(1)
            .returning(|_| Ok(()));

        let mut session = session_with_store(store, 1);
        session
            .select("earth_initiate_stonecunning")
            .expect("select");
    }

    #[test]
    fn rejected_select_does_not_save() {
        let mut store = MockSnapshotStore::new();
        store.expect_save().never();

        let mut session = session_with_store(store, 1);
        let err = session
            .select("earth_adept_stone_skin")
            .expect_err("adept locked at level 1");
        assert!(matches!(
            err,
            SessionError::Allocation(AllocationError::TierLocked { .. })
        ));
        assert!(matches!(
            session.select("earth_missing"),
            Err(SessionError::UnknownAbility(_))
        ));
    }

    #[test]
    fn autosave_disabled_never_writes() {
        let mut store = MockSnapshotStore::new();
        store.expect_save().never();

        let mut session =
            EssenceSession::new(catalog(), Arc::new(store), clock(), &settings(5, false));
        session
            .toggle("earth_active_earthen_ward")
            .expect("toggle on");
        session.restore_all().expect("rest");
        session.reset().expect("reset");
    }

    #[test]
    fn deselecting_unselected_ability_does_not_save() {
        let mut store = MockSnapshotStore::new();
        store.expect_save().never();

        let mut session = session_with_store(store, 5);
        assert!(session
            .deselect("earth_initiate_stonecunning")
            .expect("deselect")
            .is_none());
    }

    #[test]
    fn level_drop_cascades_and_saves() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let mut session = EssenceSession::new(catalog(), store.clone(), clock(), &settings(9, true));
        session
            .select("earth_active_earthen_ward")
            .expect("select initiate");
        session.select("earth_adept_stone_skin").expect("select adept");

        let change = session
            .set_level(Level::new(1).expect("valid level"))
            .expect("level change");
        assert_eq!(
            change.revalidation.removed,
            vec![AbilityId::from("earth_adept_stone_skin")]
        );

        let saved = store.load().expect("load").expect("saved");
        assert_eq!(saved.level.value(), 1);
        assert_eq!(saved.active_essence_by_path[&EssencePath::Earth], 0);
    }

    #[test]
    fn revalidate_heals_retired_ability_from_import() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let mut session = EssenceSession::new(catalog(), store.clone(), clock(), &settings(5, true));
        session
            .import_json(r#"{ "level": 5, "selectedAbilities": ["retired_ability"] }"#)
            .expect("import");
        assert!(session.engine().is_selected("retired_ability"));

        let healed = session.revalidate().expect("revalidate");
        assert_eq!(healed.unknown, vec![AbilityId::from("retired_ability")]);
        assert!(!session.engine().is_selected("retired_ability"));
        assert!(store
            .load()
            .expect("load")
            .expect("saved")
            .selected_abilities
            .is_empty());
    }

    #[test]
    fn export_file_name_uses_clock_date() {
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(|| {
            Utc.with_ymd_and_hms(2024, 2, 9, 23, 59, 0)
                .single()
                .expect("valid time")
        });
        let session = EssenceSession::new(
            catalog(),
            Arc::new(InMemorySnapshotStore::new()),
            Arc::new(clock),
            &settings(1, true),
        );
        assert_eq!(session.export_file_name(), "essence-config-2024-02-09.json");
    }

    #[test]
    fn import_is_all_or_nothing() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let mut session = EssenceSession::new(catalog(), store.clone(), clock(), &settings(5, true));
        session
            .select("earth_initiate_stonecunning")
            .expect("select");
        let before = session.engine().character().clone();

        let err = session
            .import_json(r#"{ "level": 0, "selectedAbilities": [] }"#)
            .expect_err("level zero");
        assert!(matches!(
            err,
            SessionError::Snapshot(SnapshotError::InvalidSnapshot(_))
        ));
        assert_eq!(session.engine().character(), &before);

        session
            .import_json(r#"{ "characterLevel": 13, "selectedAbilities": ["earth_active_earthen_ward"] }"#)
            .expect("legacy import");
        assert_eq!(session.engine().level().value(), 13);
        assert_eq!(
            store.load().expect("load").expect("saved").selected_abilities,
            vec![AbilityId::from("earth_active_earthen_ward")]
        );
    }

    #[test]
    fn export_round_trips_through_import() {
        let mut session = EssenceSession::new(
            catalog(),
            Arc::new(InMemorySnapshotStore::new()),
            clock(),
            &settings(5, true),
        );
        session
            .select("earth_active_earthen_ward")
            .expect("select");
        session.select("earth_adept_stone_skin").expect("select");
        session
            .adjust_active_essence(EssencePath::Earth, -2)
            .expect("adjust");
        let exported = session.export_json().expect("export");

        let mut other = EssenceSession::new(
            catalog(),
            Arc::new(InMemorySnapshotStore::new()),
            clock(),
            &settings(1, true),
        );
        other.import_json(&exported).expect("import");
        assert_eq!(other.engine().character(), session.engine().character());
    }
}
