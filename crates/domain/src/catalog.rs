//! Static ability catalog.
//!
//! The catalog is loaded once and injected into the allocation engine. Each
//! path owns three sections (abilities, cantrips, spells); an id index maps
//! every ability back to its path.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use thiserror::Error;

use crate::entities::{Ability, AbilityFilter, AbilityKind};
use crate::ids::AbilityId;
use crate::types::{AbilityTier, EssencePath};

/// Section of a path's catalog an ability was authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogSection {
    Abilities,
    Cantrips,
    Spells,
}

impl CatalogSection {
    fn accepts(&self, kind: AbilityKind) -> bool {
        match self {
            CatalogSection::Abilities => {
                matches!(kind, AbilityKind::Active(_) | AbilityKind::Passive(_))
            }
            CatalogSection::Cantrips => matches!(kind, AbilityKind::Cantrip),
            CatalogSection::Spells => matches!(kind, AbilityKind::Spell(_)),
        }
    }
}

impl fmt::Display for CatalogSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CatalogSection::Abilities => "abilities",
            CatalogSection::Cantrips => "cantrips",
            CatalogSection::Spells => "spells",
        };
        write!(f, "{}", name)
    }
}

/// Malformed catalog content.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("ability `{0}` appears more than once in the catalog")]
    DuplicateId(AbilityId),

    #[error("ability `{ability_id}` is a {kind} but is listed under {path} {section}")]
    MisplacedAbility {
        ability_id: AbilityId,
        path: EssencePath,
        section: CatalogSection,
        kind: &'static str,
    },

    #[error("invalid catalog entry `{ability_id}`: {reason}")]
    InvalidEntry { ability_id: String, reason: String },

    #[error("unknown essence path `{0}` in catalog")]
    UnknownPath(String),
}

impl CatalogError {
    pub fn invalid_entry(ability_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            ability_id: ability_id.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct PathCatalog {
    abilities: Vec<Ability>,
    cantrips: Vec<Ability>,
    spells: Vec<Ability>,
}

impl PathCatalog {
    fn section(&self, section: CatalogSection) -> &[Ability] {
        match section {
            CatalogSection::Abilities => &self.abilities,
            CatalogSection::Cantrips => &self.cantrips,
            CatalogSection::Spells => &self.spells,
        }
    }

    fn section_mut(&mut self, section: CatalogSection) -> &mut Vec<Ability> {
        match section {
            CatalogSection::Abilities => &mut self.abilities,
            CatalogSection::Cantrips => &mut self.cantrips,
            CatalogSection::Spells => &mut self.spells,
        }
    }

    fn iter(&self) -> impl Iterator<Item = &Ability> {
        self.abilities
            .iter()
            .chain(self.cantrips.iter())
            .chain(self.spells.iter())
    }
}

#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    path: EssencePath,
    section: CatalogSection,
    position: usize,
}

/// Validated, read-only ability catalog.
///
/// # Invariants
///
/// - ability ids are unique across all paths
/// - the abilities section holds only active/passive abilities, the cantrips
///   section only cantrips, the spells section only leveled spells
#[derive(Debug, Clone, Default)]
pub struct AbilityCatalog {
    paths: BTreeMap<EssencePath, PathCatalog>,
    index: HashMap<AbilityId, IndexEntry>,
}

impl AbilityCatalog {
    /// Catalog with no abilities.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the catalog from the three per-path mappings.
    pub fn from_sections(
        abilities: BTreeMap<EssencePath, Vec<Ability>>,
        cantrips: BTreeMap<EssencePath, Vec<Ability>>,
        spells: BTreeMap<EssencePath, Vec<Ability>>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::empty();
        for (section, mapping) in [
            (CatalogSection::Abilities, abilities),
            (CatalogSection::Cantrips, cantrips),
            (CatalogSection::Spells, spells),
        ] {
            for (path, entries) in mapping {
                for ability in entries {
                    catalog.insert(path, section, ability)?;
                }
            }
        }
        Ok(catalog)
    }

    fn insert(
        &mut self,
        path: EssencePath,
        section: CatalogSection,
        ability: Ability,
    ) -> Result<(), CatalogError> {
        if self.index.contains_key(ability.id()) {
            return Err(CatalogError::DuplicateId(ability.id().clone()));
        }
        if !section.accepts(ability.kind()) {
            return Err(CatalogError::MisplacedAbility {
                ability_id: ability.id().clone(),
                path,
                section,
                kind: ability.kind().label(),
            });
        }
        let entries = self.paths.entry(path).or_default().section_mut(section);
        self.index.insert(
            ability.id().clone(),
            IndexEntry {
                path,
                section,
                position: entries.len(),
            },
        );
        entries.push(ability);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Ability> {
        let entry = self.index.get(id)?;
        self.paths
            .get(&entry.path)
            .and_then(|p| p.section(entry.section).get(entry.position))
    }

    /// The path an ability belongs to.
    pub fn path_of(&self, id: &str) -> Option<EssencePath> {
        self.index.get(id).map(|entry| entry.path)
    }

    /// Looks up an ability only if it belongs to `path`.
    pub fn get_in_path(&self, id: &str, path: EssencePath) -> Option<&Ability> {
        match self.index.get(id) {
            Some(entry) if entry.path == path => self.get(id),
            _ => None,
        }
    }

    /// Every ability of a path: abilities, then cantrips, then spells.
    pub fn path_abilities(&self, path: EssencePath) -> impl Iterator<Item = &Ability> {
        self.paths.get(&path).into_iter().flat_map(PathCatalog::iter)
    }

    pub fn section(&self, path: EssencePath, section: CatalogSection) -> &[Ability] {
        self.paths
            .get(&path)
            .map(|p| p.section(section))
            .unwrap_or(&[])
    }

    /// Abilities of a path matching a kind filter.
    pub fn filter(&self, path: EssencePath, filter: AbilityFilter) -> Vec<&Ability> {
        self.path_abilities(path)
            .filter(|ability| ability.matches(filter))
            .collect()
    }

    /// Abilities of a path grouped by tier, tiers before spell levels.
    pub fn by_tier(&self, path: EssencePath) -> BTreeMap<AbilityTier, Vec<&Ability>> {
        let mut groups: BTreeMap<AbilityTier, Vec<&Ability>> = BTreeMap::new();
        for ability in self.path_abilities(path) {
            groups.entry(ability.tier()).or_default().push(ability);
        }
        groups
    }

    /// Paths that have at least one ability.
    pub fn paths(&self) -> impl Iterator<Item = EssencePath> + '_ {
        self.paths.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EssencePath, &Ability)> {
        self.paths
            .iter()
            .flat_map(|(path, catalog)| catalog.iter().map(move |ability| (*path, ability)))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
