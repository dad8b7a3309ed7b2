//! Catalog wire format.
//!
//! Authored content marks each ability with four independent flags
//! (`isActive`, `isPassive`, `isSpell`, `isCantrip`) plus a tier string.
//! Conversion classifies each record into exactly one [`AbilityKind`] and
//! rejects anything ambiguous.

use std::collections::BTreeMap;

use essencecalc_domain::{
    Ability, AbilityCatalog, AbilityKind, AbilityTier, CatalogError, EssencePath, SpellLevel,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to turn catalog JSON into an [`AbilityCatalog`].
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("Catalog JSON is malformed: {0}")]
    Json(String),

    #[error(transparent)]
    Invalid(#[from] CatalogError),
}

impl From<serde_json::Error> for CatalogLoadError {
    fn from(e: serde_json::Error) -> Self {
        CatalogLoadError::Json(e.to_string())
    }
}

/// One ability as authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAbility {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub tier: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_passive: bool,
    #[serde(default)]
    pub is_spell: bool,
    #[serde(default)]
    pub is_cantrip: bool,
}

impl RawAbility {
    /// Classifies the flag combination and tier string.
    pub fn kind(&self) -> Result<AbilityKind, CatalogError> {
        let flags = [self.is_active, self.is_passive, self.is_spell, self.is_cantrip];
        if flags.iter().filter(|set| **set).count() != 1 {
            return Err(CatalogError::invalid_entry(
                &self.id,
                "exactly one of isActive, isPassive, isSpell, isCantrip must be set",
            ));
        }

        let tier: AbilityTier = self
            .tier
            .parse()
            .map_err(|e: essencecalc_domain::DomainError| {
                CatalogError::invalid_entry(&self.id, e.to_string())
            })?;

        let kind = match tier {
            AbilityTier::Tier(tier) if self.is_active => AbilityKind::Active(tier),
            AbilityTier::Tier(tier) if self.is_passive => AbilityKind::Passive(tier),
            AbilityTier::Spell(SpellLevel::Cantrip) if self.is_cantrip => AbilityKind::Cantrip,
            AbilityTier::Spell(level) if self.is_spell && !level.is_cantrip() => {
                AbilityKind::Spell(level)
            }
            _ => {
                return Err(CatalogError::invalid_entry(
                    &self.id,
                    format!("tier `{}` does not match the {} flag", self.tier, self.flag_name()),
                ))
            }
        };
        Ok(kind)
    }

    fn flag_name(&self) -> &'static str {
        if self.is_active {
            "isActive"
        } else if self.is_passive {
            "isPassive"
        } else if self.is_spell {
            "isSpell"
        } else {
            "isCantrip"
        }
    }
}

impl TryFrom<RawAbility> for Ability {
    type Error = CatalogError;

    fn try_from(raw: RawAbility) -> Result<Self, Self::Error> {
        let kind = raw.kind()?;
        let id = raw.id.clone();
        Ability::new(raw.id, raw.name, raw.description, kind)
            .map_err(|e| CatalogError::invalid_entry(id, e.to_string()))
    }
}

/// One path's catalog file: `{ "abilities": [..], "cantrips": [..], "spells": [..] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathSections {
    #[serde(default)]
    pub abilities: Vec<RawAbility>,
    #[serde(default)]
    pub cantrips: Vec<RawAbility>,
    #[serde(default)]
    pub spells: Vec<RawAbility>,
}

/// Whole catalog document, each section keyed by path id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSource {
    #[serde(default)]
    pub abilities: BTreeMap<String, Vec<RawAbility>>,
    #[serde(default)]
    pub cantrips: BTreeMap<String, Vec<RawAbility>>,
    #[serde(default)]
    pub spells: BTreeMap<String, Vec<RawAbility>>,
}

impl CatalogSource {
    /// Merges one path's sections into the document.
    pub fn insert_path(&mut self, path: EssencePath, sections: PathSections) {
        let key = path.id().to_string();
        self.abilities
            .entry(key.clone())
            .or_default()
            .extend(sections.abilities);
        self.cantrips
            .entry(key.clone())
            .or_default()
            .extend(sections.cantrips);
        self.spells.entry(key).or_default().extend(sections.spells);
    }

    /// Classifies every record and builds the validated catalog.
    pub fn into_catalog(self) -> Result<AbilityCatalog, CatalogLoadError> {
        let abilities = convert_section(self.abilities)?;
        let cantrips = convert_section(self.cantrips)?;
        let spells = convert_section(self.spells)?;
        let catalog = AbilityCatalog::from_sections(abilities, cantrips, spells)?;
        tracing::debug!(
            abilities = catalog.len(),
            paths = catalog.paths().count(),
            "Catalog built"
        );
        Ok(catalog)
    }
}

fn convert_section(
    section: BTreeMap<String, Vec<RawAbility>>,
) -> Result<BTreeMap<EssencePath, Vec<Ability>>, CatalogError> {
    let mut converted: BTreeMap<EssencePath, Vec<Ability>> = BTreeMap::new();
    for (key, raws) in section {
        let path: EssencePath = key
            .parse()
            .map_err(|_| CatalogError::UnknownPath(key.clone()))?;
        let abilities = raws
            .into_iter()
            .map(Ability::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        converted.entry(path).or_default().extend(abilities);
    }
    Ok(converted)
}

/// Parses a whole catalog document.
pub fn parse_catalog(json: &str) -> Result<AbilityCatalog, CatalogLoadError> {
    let source: CatalogSource = serde_json::from_str(json)?;
    source.into_catalog()
}

/// Parses one path's catalog file.
pub fn parse_path_sections(json: &str) -> Result<PathSections, CatalogLoadError> {
    Ok(serde_json::from_str(json)?)
}
