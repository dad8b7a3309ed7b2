//! Point-in-time copy of a character, used for save/load.
//!
//! This is the typed form. The JSON wire form and its structural validation
//! live in `essencecalc-shared`.

use std::collections::BTreeMap;

use crate::ids::AbilityId;
use crate::types::{EssencePath, Level};

/// Format version written with every exported snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Serializable copy of a [`crate::aggregates::Character`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSnapshot {
    pub version: String,
    pub level: Level,
    /// Selected ability ids; order carries no meaning.
    pub selected_abilities: Vec<AbilityId>,
    pub active_essence_by_path: BTreeMap<EssencePath, u32>,
}

impl CharacterSnapshot {
    /// Snapshot of a fresh character at `level`.
    pub fn empty(level: Level) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            level,
            selected_abilities: Vec::new(),
            active_essence_by_path: BTreeMap::new(),
        }
    }
}
