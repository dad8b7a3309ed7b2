//! Essence allocation engine.
//!
//! Owns a [`Character`] against an injected [`AbilityCatalog`] and keeps it
//! consistent: every mutation either fails without touching state or leaves
//! the selection within budget with every selected tier unlocked.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::aggregates::Character;
use crate::catalog::AbilityCatalog;
use crate::entities::Ability;
use crate::events::{Deselection, LevelChange, Revalidation, ToggleOutcome};
use crate::ids::AbilityId;
use crate::rules;
use crate::snapshot::CharacterSnapshot;
use crate::types::{AbilityTier, EssencePath, Level};

/// Rejected allocation. State is never modified when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("Not enough essence points: ability costs {required}, {spent} of {total} already spent")]
    InsufficientPoints { required: u32, spent: u32, total: u32 },

    #[error("Ability `{ability_id}` is locked: the {tier} tier is not unlocked at level {level}")]
    TierLocked {
        ability_id: AbilityId,
        tier: AbilityTier,
        level: Level,
    },

    #[error("Ability `{0}` is already selected")]
    AlreadySelected(AbilityId),

    #[error("Ability `{ability_id}` not found in the {path} path")]
    UnknownAbility {
        ability_id: AbilityId,
        path: EssencePath,
    },
}

/// Active essence figures for one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathEssenceStatus {
    pub path: EssencePath,
    /// Counter currently marked "in use".
    pub spent: u32,
    /// `max - spent`.
    pub available: u32,
    /// Smaller of the effective max and the path's selected active/spell cost.
    pub max: u32,
    /// Cost of the path's selected passives and cantrips.
    pub passive_reduction: u32,
}

/// Character-wide point figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EssenceBudget {
    pub level: Level,
    pub total_points: u32,
    pub spent: u32,
    pub passive_reduction: u32,
    pub effective_max: u32,
    pub available: u32,
}

/// Rules engine for a single character.
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    catalog: Arc<AbilityCatalog>,
    default_level: Level,
    character: Character,
}

impl AllocationEngine {
    /// Engine with a fresh character at `default_level`.
    pub fn new(catalog: Arc<AbilityCatalog>, default_level: Level) -> Self {
        Self {
            catalog,
            default_level,
            character: Character::new(default_level),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn catalog(&self) -> &AbilityCatalog {
        &self.catalog
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn default_level(&self) -> Level {
        self.default_level
    }

    pub fn level(&self) -> Level {
        self.character.level()
    }

    pub fn is_selected(&self, ability_id: &str) -> bool {
        self.character.is_selected(ability_id)
    }

    pub fn total_points(&self) -> u32 {
        rules::total_points(self.level())
    }

    pub fn spent_points(&self) -> u32 {
        rules::spent_points(self.character.selected_abilities(), &self.catalog)
    }

    pub fn passive_reduction(&self) -> u32 {
        rules::passive_reduction(self.character.selected_abilities(), &self.catalog)
    }

    pub fn effective_max_points(&self) -> u32 {
        rules::effective_max_points(
            self.level(),
            self.character.selected_abilities(),
            &self.catalog,
        )
    }

    /// Effective max minus the cost of selected actives and spells.
    pub fn available_points(&self) -> u32 {
        let active = rules::active_points(self.character.selected_abilities(), &self.catalog);
        self.effective_max_points().saturating_sub(active)
    }

    pub fn budget(&self) -> EssenceBudget {
        EssenceBudget {
            level: self.level(),
            total_points: self.total_points(),
            spent: self.spent_points(),
            passive_reduction: self.passive_reduction(),
            effective_max: self.effective_max_points(),
            available: self.available_points(),
        }
    }

    /// Cost of the selected actives and spells in `path`.
    pub fn max_active_for_path(&self, path: EssencePath) -> u32 {
        rules::max_active_for_path(path, self.character.selected_abilities(), &self.catalog)
    }

    pub fn path_status(&self, path: EssencePath) -> PathEssenceStatus {
        let spent = self.character.active_essence(path);
        let max = self
            .effective_max_points()
            .min(self.max_active_for_path(path));
        PathEssenceStatus {
            path,
            spent,
            available: max.saturating_sub(spent),
            max,
            passive_reduction: rules::path_passive_reduction(
                path,
                self.character.selected_abilities(),
                &self.catalog,
            ),
        }
    }

    /// Paths with at least one selected active ability or spell.
    pub fn paths_with_active_abilities(&self) -> Vec<EssencePath> {
        EssencePath::ALL
            .into_iter()
            .filter(|path| self.max_active_for_path(*path) > 0)
            .collect()
    }

    /// Whether `tier` is currently unlocked in `path`.
    pub fn is_tier_unlocked(&self, path: EssencePath, tier: AbilityTier) -> bool {
        rules::is_tier_unlocked(
            tier,
            self.character.selected_abilities(),
            self.catalog.path_abilities(path),
            self.level(),
        )
    }

    /// Selected abilities grouped by path, in catalog order.
    pub fn selected_by_path(&self) -> BTreeMap<EssencePath, Vec<&Ability>> {
        let mut groups: BTreeMap<EssencePath, Vec<&Ability>> = BTreeMap::new();
        for (path, ability) in self.catalog.iter() {
            if self.character.is_selected(ability.id().as_str()) {
                groups.entry(path).or_default().push(ability);
            }
        }
        groups
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds an ability to the selection.
    ///
    /// Guards run in order: the ability must belong to `path`, must not be
    /// selected yet, its tier must be unlocked, and its cost must fit in the
    /// remaining budget. Actives and spells commit their cost to the path's
    /// active essence counter.
    pub fn select(&mut self, ability_id: &str, path: EssencePath) -> Result<(), AllocationError> {
        let ability = self.catalog.get_in_path(ability_id, path).ok_or_else(|| {
            AllocationError::UnknownAbility {
                ability_id: AbilityId::from(ability_id),
                path,
            }
        })?;
        if self.character.is_selected(ability_id) {
            return Err(AllocationError::AlreadySelected(ability.id().clone()));
        }

        let tier = ability.tier();
        let level = self.character.level();
        if !rules::is_tier_unlocked(
            tier,
            self.character.selected_abilities(),
            self.catalog.path_abilities(path),
            level,
        ) {
            return Err(AllocationError::TierLocked {
                ability_id: ability.id().clone(),
                tier,
                level,
            });
        }

        let required = tier.cost();
        let spent = self.spent_points();
        let total = self.total_points();
        if required + spent > total {
            return Err(AllocationError::InsufficientPoints {
                required,
                spent,
                total,
            });
        }

        let draws_active = ability.kind().draws_active_essence();
        let id = ability.id().clone();
        self.character.insert(id);
        if draws_active {
            self.character.add_active_essence(path, required);
        }
        Ok(())
    }

    /// Removes an ability and cascades to abilities of the same path whose
    /// tier locks without it. Returns `None`, leaving state untouched, when
    /// the ability is not selected or does not belong to `path`.
    pub fn deselect(&mut self, ability_id: &str, path: EssencePath) -> Option<Deselection> {
        if !self.character.is_selected(ability_id)
            || self.catalog.get_in_path(ability_id, path).is_none()
        {
            return None;
        }

        let level = self.character.level();
        let mut remaining = self.character.selected_abilities().clone();
        remaining.remove(ability_id);
        let cascaded = rules::cascade_unallocate(&self.catalog, path, &mut remaining, level);

        let target = AbilityId::from(ability_id);
        let refunded: u32 = std::iter::once(&target)
            .chain(cascaded.iter())
            .filter_map(|id| self.catalog.get(id.as_str()))
            .filter(|ability| ability.kind().draws_active_essence())
            .map(Ability::cost)
            .sum();

        self.character.replace_selection(remaining);
        self.character.subtract_active_essence(path, refunded);

        Some(Deselection {
            path,
            ability_id: target,
            cascaded,
            refunded,
        })
    }

    /// Deselects when selected, selects otherwise.
    pub fn toggle(
        &mut self,
        ability_id: &str,
        path: EssencePath,
    ) -> Result<ToggleOutcome, AllocationError> {
        if let Some(deselection) = self.deselect(ability_id, path) {
            return Ok(ToggleOutcome::Deselected(deselection));
        }
        self.select(ability_id, path)?;
        Ok(ToggleOutcome::Selected(AbilityId::from(ability_id)))
    }

    /// Changes the level and re-validates the whole selection.
    pub fn set_level(&mut self, level: Level) -> LevelChange {
        let previous = self.character.level();
        self.character.set_level(level);
        LevelChange {
            previous,
            current: level,
            revalidation: self.revalidate(),
        }
    }

    /// Removes every selected ability whose tier is locked, across all paths,
    /// and every selected id the catalog does not know.
    ///
    /// A path that loses an active ability or spell has its active essence
    /// counter reset to zero; other paths keep theirs.
    pub fn revalidate(&mut self) -> Revalidation {
        let level = self.character.level();
        let mut selection = self.character.selected_abilities().clone();
        let mut revalidation = Revalidation::default();

        selection.retain(|id| {
            let known = self.catalog.get(id.as_str()).is_some();
            if !known {
                revalidation.unknown.push(id.clone());
            }
            known
        });

        for path in EssencePath::ALL {
            let removed = rules::cascade_unallocate(&self.catalog, path, &mut selection, level);
            let lost_active = removed.iter().any(|id| {
                self.catalog
                    .get(id.as_str())
                    .is_some_and(|ability| ability.kind().draws_active_essence())
            });
            if lost_active {
                revalidation.zeroed_paths.push(path);
            }
            revalidation.removed.extend(removed);
        }

        if !revalidation.is_empty() {
            self.character.replace_selection(selection);
            for path in &revalidation.zeroed_paths {
                self.character.set_active_essence(*path, 0);
            }
        }
        revalidation
    }

    /// Moves a path's "in use" marker by `delta`, saturating within
    /// `[0, max_active_for_path]`. Returns the new value.
    pub fn adjust_active_essence(&mut self, path: EssencePath, delta: i32) -> u32 {
        let max = i64::from(self.max_active_for_path(path));
        let current = i64::from(self.character.active_essence(path));
        let next = (current + i64::from(delta)).clamp(0, max);
        let next = u32::try_from(next).unwrap_or(0);
        self.character.set_active_essence(path, next);
        next
    }

    /// Full rest: every path's counter goes to its maximum.
    pub fn restore_all_active_essence(&mut self) {
        for path in EssencePath::ALL {
            let max = self.max_active_for_path(path);
            self.character.set_active_essence(path, max);
        }
    }

    /// Every path's counter goes to zero.
    pub fn clear_active_essence(&mut self) {
        for path in EssencePath::ALL {
            self.character.set_active_essence(path, 0);
        }
    }

    /// Back to an empty selection at the default level.
    pub fn reset(&mut self) {
        self.character = Character::new(self.default_level);
    }

    /// Replaces the whole character. No rule is re-checked; call
    /// [`Self::revalidate`] to heal a stale or hand-edited snapshot.
    pub fn load_snapshot(&mut self, snapshot: CharacterSnapshot) {
        self.character = Character::from_snapshot(snapshot);
    }

    pub fn export_snapshot(&self) -> CharacterSnapshot {
        self.character.to_snapshot()
    }

    /// Ids in the current selection that the catalog does not know.
    pub fn unknown_selections(&self) -> Vec<&AbilityId> {
        self.character
            .selected_abilities()
            .iter()
            .filter(|id| self.catalog.get(id.as_str()).is_none())
            .collect()
    }

    /// Selection as a set, for hypothetical rule checks.
    pub fn selection(&self) -> &BTreeSet<AbilityId> {
        self.character.selected_abilities()
    }
}
