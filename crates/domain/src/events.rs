//! Outcome values returned by allocation engine mutations.
//!
//! Mutations report what changed instead of emitting side effects, so the
//! application layer decides what to log, persist, or show.

use crate::ids::AbilityId;
use crate::types::{EssencePath, Level};

/// An ability removed by `deselect`, plus whatever fell out with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deselection {
    pub path: EssencePath,
    /// The ability the caller asked to remove.
    pub ability_id: AbilityId,
    /// Abilities of the same path whose tier locked as a consequence.
    pub cascaded: Vec<AbilityId>,
    /// Active essence taken off the path's counter.
    pub refunded: u32,
}

impl Deselection {
    /// The target followed by every cascade victim.
    pub fn removed(&self) -> impl Iterator<Item = &AbilityId> {
        std::iter::once(&self.ability_id).chain(self.cascaded.iter())
    }
}

/// Abilities removed by a global re-validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revalidation {
    /// Catalog abilities whose tier locked.
    pub removed: Vec<AbilityId>,
    /// Selected ids the catalog does not know, dropped outright.
    pub unknown: Vec<AbilityId>,
    /// Paths whose active essence counter was reset to zero.
    pub zeroed_paths: Vec<EssencePath>,
}

impl Revalidation {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.unknown.is_empty()
    }
}

/// Result of changing the character level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelChange {
    pub previous: Level,
    pub current: Level,
    pub revalidation: Revalidation,
}

/// Result of toggling an ability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected(AbilityId),
    Deselected(Deselection),
}
