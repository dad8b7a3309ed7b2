//! Character aggregate - the player's essence build
//!
//! # Rustic DDD Design
//!
//! This aggregate follows Rustic DDD principles:
//! - **Private fields**: All fields are encapsulated
//! - **Newtypes**: `Level` for the validated character level, `AbilityId` for selections
//! - **Valid by construction**: every path has an active essence entry from `new()` on
//!
//! Budget and prerequisite rules live in [`crate::allocation::AllocationEngine`],
//! which is the only writer; the mutators here are crate-private.

use std::collections::{BTreeMap, BTreeSet};

use crate::ids::AbilityId;
use crate::snapshot::{CharacterSnapshot, SNAPSHOT_VERSION};
use crate::types::{EssencePath, Level};

/// A character's essence selection state.
///
/// # Invariants
///
/// - `active_essence_by_path` holds an entry for every [`EssencePath`]
///
/// When mutated through the engine, additionally every selected ability is
/// unlocked and every active essence counter stays within the cost of the
/// path's selected actives and spells. A loaded snapshot is trusted and may
/// violate these until the next revalidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    level: Level,
    selected_abilities: BTreeSet<AbilityId>,
    active_essence_by_path: BTreeMap<EssencePath, u32>,
}

impl Character {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// A character at `level` with nothing selected.
    pub fn new(level: Level) -> Self {
        Self {
            level,
            selected_abilities: BTreeSet::new(),
            active_essence_by_path: zeroed_counters(),
        }
    }

    /// Restores a character from a snapshot without checking any rule.
    pub fn from_snapshot(snapshot: CharacterSnapshot) -> Self {
        let mut active_essence_by_path = zeroed_counters();
        active_essence_by_path.extend(snapshot.active_essence_by_path);
        Self {
            level: snapshot.level,
            selected_abilities: snapshot.selected_abilities.into_iter().collect(),
            active_essence_by_path,
        }
    }

    pub fn to_snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            level: self.level,
            selected_abilities: self.selected_abilities.iter().cloned().collect(),
            active_essence_by_path: self.active_essence_by_path.clone(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    #[inline]
    pub fn selected_abilities(&self) -> &BTreeSet<AbilityId> {
        &self.selected_abilities
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_abilities.contains(id)
    }

    /// Active essence currently marked "in use" for a path.
    pub fn active_essence(&self, path: EssencePath) -> u32 {
        self.active_essence_by_path.get(&path).copied().unwrap_or(0)
    }

    #[inline]
    pub fn active_essence_by_path(&self) -> &BTreeMap<EssencePath, u32> {
        &self.active_essence_by_path
    }

    // =========================================================================
    // Mutators (engine only)
    // =========================================================================

    pub(crate) fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    pub(crate) fn insert(&mut self, id: AbilityId) -> bool {
        self.selected_abilities.insert(id)
    }

    pub(crate) fn replace_selection(&mut self, selection: BTreeSet<AbilityId>) {
        self.selected_abilities = selection;
    }

    pub(crate) fn set_active_essence(&mut self, path: EssencePath, amount: u32) {
        self.active_essence_by_path.insert(path, amount);
    }

    pub(crate) fn add_active_essence(&mut self, path: EssencePath, amount: u32) {
        let current = self.active_essence(path);
        self.set_active_essence(path, current.saturating_add(amount));
    }

    pub(crate) fn subtract_active_essence(&mut self, path: EssencePath, amount: u32) {
        let current = self.active_essence(path);
        self.set_active_essence(path, current.saturating_sub(amount));
    }
}

impl Default for Character {
    fn default() -> Self {
        Self::new(Level::default())
    }
}

fn zeroed_counters() -> BTreeMap<EssencePath, u32> {
    EssencePath::ALL.iter().map(|path| (*path, 0)).collect()
}
