//! Essence point math and tier-unlock rules.
//!
//! Pure functions over a selection (set of ability ids) and the catalog. The
//! allocation engine composes these; presentation code can call them directly
//! to render hypothetical states.

use std::collections::BTreeSet;

use crate::catalog::AbilityCatalog;
use crate::entities::Ability;
use crate::ids::AbilityId;
use crate::types::{AbilityTier, EssencePath, Level};

/// Levels at which the essence budget gains a flat bonus.
pub const BONUS_LEVELS: [u8; 4] = [5, 9, 13, 17];

/// Points granted at each bonus level.
pub const BONUS_POINTS: u32 = 4;

/// Hard ceiling on essence points: one per level plus a bonus at each of
/// [`BONUS_LEVELS`] reached.
pub fn total_points(level: Level) -> u32 {
    let reached = BONUS_LEVELS
        .iter()
        .filter(|threshold| level.value() >= **threshold)
        .count() as u32;
    u32::from(level.value()) + reached * BONUS_POINTS
}

fn selected<'a>(
    selection: &'a BTreeSet<AbilityId>,
    catalog: &'a AbilityCatalog,
) -> impl Iterator<Item = &'a Ability> {
    selection.iter().filter_map(|id| catalog.get(id.as_str()))
}

/// Cost of every selected ability, whatever its kind. Ids missing from the
/// catalog contribute nothing.
pub fn spent_points(selection: &BTreeSet<AbilityId>, catalog: &AbilityCatalog) -> u32 {
    selected(selection, catalog).map(Ability::cost).sum()
}

/// Cost of selected passives and cantrips, which shrink the usable pool.
pub fn passive_reduction(selection: &BTreeSet<AbilityId>, catalog: &AbilityCatalog) -> u32 {
    selected(selection, catalog)
        .filter(|ability| ability.kind().reduces_capacity())
        .map(Ability::cost)
        .sum()
}

/// Cost of selected actives and spells.
pub fn active_points(selection: &BTreeSet<AbilityId>, catalog: &AbilityCatalog) -> u32 {
    selected(selection, catalog)
        .filter(|ability| ability.kind().draws_active_essence())
        .map(Ability::cost)
        .sum()
}

/// Total points minus the passive/cantrip reduction.
pub fn effective_max_points(
    level: Level,
    selection: &BTreeSet<AbilityId>,
    catalog: &AbilityCatalog,
) -> u32 {
    total_points(level).saturating_sub(passive_reduction(selection, catalog))
}

/// Upper bound of a path's active essence counter: the cost of its selected
/// actives and spells.
pub fn max_active_for_path(
    path: EssencePath,
    selection: &BTreeSet<AbilityId>,
    catalog: &AbilityCatalog,
) -> u32 {
    catalog
        .path_abilities(path)
        .filter(|ability| {
            selection.contains(ability.id()) && ability.kind().draws_active_essence()
        })
        .map(Ability::cost)
        .sum()
}

/// Passive/cantrip reduction contributed by one path.
pub fn path_passive_reduction(
    path: EssencePath,
    selection: &BTreeSet<AbilityId>,
    catalog: &AbilityCatalog,
) -> u32 {
    catalog
        .path_abilities(path)
        .filter(|ability| selection.contains(ability.id()) && ability.kind().reduces_capacity())
        .map(Ability::cost)
        .sum()
}

/// Whether abilities on `tier` may be held, given the path's abilities, the
/// current selection and the character level.
///
/// - cantrips and 1st-level spells are always unlocked
/// - higher spell levels unlock on level alone
/// - initiate is always unlocked; every later tier needs its level
///   requirement and at least one selected ability of the same path in the
///   previous tier's band
pub fn is_tier_unlocked<'a, I>(
    tier: AbilityTier,
    selection: &BTreeSet<AbilityId>,
    path_abilities: I,
    level: Level,
) -> bool
where
    I: IntoIterator<Item = &'a Ability>,
{
    match tier {
        AbilityTier::Spell(spell_level) => spell_level
            .level_requirement()
            .is_some_and(|required| level.value() >= required),
        AbilityTier::Tier(tier) => {
            let Some(previous) = tier.previous() else {
                return true;
            };
            if level.value() < tier.level_requirement() {
                return false;
            }
            path_abilities.into_iter().any(|ability| {
                ability.tier().band() == previous && selection.contains(ability.id())
            })
        }
    }
}

/// Cascade-invalidation predicate: the ability's tier is no longer unlocked.
pub fn should_unallocate<'a, I>(
    ability: &Ability,
    selection: &BTreeSet<AbilityId>,
    path_abilities: I,
    level: Level,
) -> bool
where
    I: IntoIterator<Item = &'a Ability>,
{
    !is_tier_unlocked(ability.tier(), selection, path_abilities, level)
}

/// Removes every selected ability of `path` whose tier is locked, repeating
/// until nothing else falls out. Returns the removed ids in removal order.
///
/// Removing the last adept ability can lock master, which in turn can lock
/// grandmaster; a single pass would leave those behind.
pub fn cascade_unallocate(
    catalog: &AbilityCatalog,
    path: EssencePath,
    selection: &mut BTreeSet<AbilityId>,
    level: Level,
) -> Vec<AbilityId> {
    let mut removed = Vec::new();
    loop {
        let current: &BTreeSet<AbilityId> = selection;
        let locked: Vec<AbilityId> = catalog
            .path_abilities(path)
            .filter(|ability| {
                current.contains(ability.id())
                    && should_unallocate(ability, current, catalog.path_abilities(path), level)
            })
            .map(|ability| ability.id().clone())
            .collect();
        if locked.is_empty() {
            return removed;
        }
        for id in &locked {
            selection.remove(id);
        }
        removed.extend(locked);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AbilityKind;
    use crate::types::{SpellLevel, Tier};
    use std::collections::BTreeMap;

    fn level(value: u8) -> Level {
        Level::new(value).expect("valid level")
    }

    fn ability(id: &str, kind: AbilityKind) -> Ability {
        Ability::new(id, id, "", kind).expect("valid ability")
    }

    fn catalog() -> AbilityCatalog {
        let mut abilities = BTreeMap::new();
        abilities.insert(
            EssencePath::Fire,
            vec![
                ability("fire_initiate_kindle", AbilityKind::Passive(Tier::Initiate)),
                ability("fire_adept_blaze", AbilityKind::Active(Tier::Adept)),
                ability("fire_master_inferno", AbilityKind::Active(Tier::Master)),
                ability("fire_grandmaster_sun", AbilityKind::Passive(Tier::Grandmaster)),
            ],
        );
        abilities.insert(
            EssencePath::Water,
            vec![ability("water_initiate_flow", AbilityKind::Active(Tier::Initiate))],
        );
        let mut cantrips = BTreeMap::new();
        cantrips.insert(
            EssencePath::Fire,
            vec![ability("fire_cantrip_firebolt", AbilityKind::Cantrip)],
        );
        let mut spells = BTreeMap::new();
        spells.insert(
            EssencePath::Fire,
            vec![
                ability("fire_3rd_fireball", AbilityKind::Spell(SpellLevel::Third)),
                ability("fire_5th_flame_strike", AbilityKind::Spell(SpellLevel::Fifth)),
            ],
        );
        AbilityCatalog::from_sections(abilities, cantrips, spells).expect("valid catalog")
    }

    fn selection(ids: &[&str]) -> BTreeSet<AbilityId> {
        ids.iter().map(|id| AbilityId::from(*id)).collect()
    }

    #[test]
    fn total_points_progression() {
        assert_eq!(total_points(level(1)), 1);
        assert_eq!(total_points(level(4)), 4);
        assert_eq!(total_points(level(5)), 9);
        assert_eq!(total_points(level(8)), 12);
        assert_eq!(total_points(level(9)), 17);
        assert_eq!(total_points(level(13)), 25);
        assert_eq!(total_points(level(17)), 33);
        assert_eq!(total_points(level(20)), 36);
    }

    #[test]
    fn total_points_is_monotonic_with_bonus_jumps() {
        for value in 2..=20u8 {
            let jump = total_points(level(value)) - total_points(level(value - 1));
            let expected = if BONUS_LEVELS.contains(&value) { 5 } else { 1 };
            assert_eq!(jump, expected, "jump at level {}", value);
        }
    }

    #[test]
    fn spent_counts_every_kind() {
        let catalog = catalog();
        let chosen = selection(&[
            "fire_initiate_kindle",
            "fire_adept_blaze",
            "fire_cantrip_firebolt",
            "fire_3rd_fireball",
            "unknown_id",
        ]);
        assert_eq!(spent_points(&chosen, &catalog), 1 + 2 + 1 + 2);
        assert_eq!(passive_reduction(&chosen, &catalog), 2);
        assert_eq!(active_points(&chosen, &catalog), 4);
        assert_eq!(effective_max_points(level(9), &chosen, &catalog), 15);
        assert_eq!(max_active_for_path(EssencePath::Fire, &chosen, &catalog), 4);
        assert_eq!(max_active_for_path(EssencePath::Water, &chosen, &catalog), 0);
        assert_eq!(path_passive_reduction(EssencePath::Fire, &chosen, &catalog), 2);
    }

    #[test]
    fn spell_tiers_unlock_by_level_only() {
        let catalog = catalog();
        let empty = BTreeSet::new();
        let fire = || catalog.path_abilities(EssencePath::Fire);
        let cantrip = AbilityTier::Spell(SpellLevel::Cantrip);
        let second = AbilityTier::Spell(SpellLevel::Second);
        let fourth = AbilityTier::Spell(SpellLevel::Fourth);
        let fifth = AbilityTier::Spell(SpellLevel::Fifth);
        let sixth = AbilityTier::Spell(SpellLevel::Sixth);

        assert!(is_tier_unlocked(cantrip, &empty, fire(), level(1)));
        assert!(is_tier_unlocked(AbilityTier::Spell(SpellLevel::First), &empty, fire(), level(1)));
        assert!(!is_tier_unlocked(second, &empty, fire(), level(4)));
        assert!(is_tier_unlocked(second, &empty, fire(), level(5)));
        assert!(!is_tier_unlocked(fourth, &empty, fire(), level(12)));
        assert!(is_tier_unlocked(fourth, &empty, fire(), level(13)));
        assert!(!is_tier_unlocked(fifth, &empty, fire(), level(17)));
        assert!(!is_tier_unlocked(fifth, &empty, fire(), level(20)));
        assert!(!is_tier_unlocked(sixth, &empty, fire(), level(20)));
    }

    #[test]
    fn character_tiers_need_level_and_previous_band() {
        let catalog = catalog();
        let fire = || catalog.path_abilities(EssencePath::Fire);
        let adept = AbilityTier::Tier(Tier::Adept);
        let with_initiate = selection(&["fire_initiate_kindle"]);

        assert!(is_tier_unlocked(
            AbilityTier::Tier(Tier::Initiate),
            &BTreeSet::new(),
            fire(),
            level(1)
        ));
        assert!(!is_tier_unlocked(adept, &BTreeSet::new(), fire(), level(5)));
        assert!(!is_tier_unlocked(adept, &with_initiate, fire(), level(4)));
        assert!(is_tier_unlocked(adept, &with_initiate, fire(), level(5)));
    }

    #[test]
    fn spells_count_toward_their_band() {
        let catalog = catalog();
        let fire = || catalog.path_abilities(EssencePath::Fire);
        // A cantrip sits in the initiate band.
        let with_cantrip = selection(&["fire_cantrip_firebolt"]);
        assert!(is_tier_unlocked(
            AbilityTier::Tier(Tier::Adept),
            &with_cantrip,
            fire(),
            level(5)
        ));
        // A 3rd-level spell sits in the adept band.
        let with_third = selection(&["fire_3rd_fireball"]);
        assert!(is_tier_unlocked(
            AbilityTier::Tier(Tier::Master),
            &with_third,
            fire(),
            level(9)
        ));
    }

    #[test]
    fn prerequisites_do_not_cross_paths() {
        let catalog = catalog();
        let with_water = selection(&["water_initiate_flow"]);
        assert!(!is_tier_unlocked(
            AbilityTier::Tier(Tier::Adept),
            &with_water,
            catalog.path_abilities(EssencePath::Fire),
            level(10)
        ));
    }

    #[test]
    fn cascade_runs_to_fixpoint() {
        let catalog = catalog();
        let mut chosen = selection(&[
            "fire_adept_blaze",
            "fire_master_inferno",
            "fire_grandmaster_sun",
            "water_initiate_flow",
        ]);
        let removed = cascade_unallocate(&catalog, EssencePath::Fire, &mut chosen, level(20));
        assert_eq!(
            removed,
            vec![
                AbilityId::from("fire_adept_blaze"),
                AbilityId::from("fire_master_inferno"),
                AbilityId::from("fire_grandmaster_sun"),
            ]
        );
        assert_eq!(chosen, selection(&["water_initiate_flow"]));
    }

    #[test]
    fn cascade_keeps_supported_abilities() {
        let catalog = catalog();
        let mut chosen = selection(&["fire_initiate_kindle", "fire_adept_blaze"]);
        let removed = cascade_unallocate(&catalog, EssencePath::Fire, &mut chosen, level(5));
        assert!(removed.is_empty());
        assert_eq!(chosen.len(), 2);
    }
}
