//! Essence ability entity.
//!
//! An ability is an immutable catalog record. Its kind is a tagged enum, so
//! "active and passive at once" or "spell without a spell level" cannot be
//! represented; raw content with independent flags is classified once, at
//! catalog load time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::AbilityId;
use crate::types::{AbilityTier, SpellLevel, Tier};

/// What kind of ability this is, carrying the tier it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tier", rename_all = "camelCase")]
pub enum AbilityKind {
    /// Used on demand; draws on the path's active essence.
    Active(Tier),
    /// Always on; permanently reduces the usable essence pool.
    Passive(Tier),
    /// Leveled spell (1st through 9th); draws on active essence.
    Spell(SpellLevel),
    /// At-will spell; reduces the usable pool like a passive.
    Cantrip,
}

impl AbilityKind {
    /// Builds a spell kind, rejecting the cantrip level.
    pub fn spell(level: SpellLevel) -> Result<Self, DomainError> {
        if level.is_cantrip() {
            return Err(DomainError::validation(
                "a spell must be 1st level or higher; use AbilityKind::Cantrip",
            ));
        }
        Ok(AbilityKind::Spell(level))
    }

    pub fn tier(&self) -> AbilityTier {
        match self {
            AbilityKind::Active(tier) | AbilityKind::Passive(tier) => AbilityTier::Tier(*tier),
            AbilityKind::Spell(level) => AbilityTier::Spell(*level),
            AbilityKind::Cantrip => AbilityTier::Spell(SpellLevel::Cantrip),
        }
    }

    /// Active abilities and spells count against the per-path active essence.
    pub fn draws_active_essence(&self) -> bool {
        matches!(self, AbilityKind::Active(_) | AbilityKind::Spell(_))
    }

    /// Passives and cantrips shrink the usable essence pool instead.
    pub fn reduces_capacity(&self) -> bool {
        matches!(self, AbilityKind::Passive(_) | AbilityKind::Cantrip)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AbilityKind::Active(_) => "active",
            AbilityKind::Passive(_) => "passive",
            AbilityKind::Spell(_) => "spell",
            AbilityKind::Cantrip => "cantrip",
        }
    }
}

/// Ability description: inline text or a link to external rules content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AbilityDescription {
    Text(String),
    Reference(String),
}

impl AbilityDescription {
    pub fn as_str(&self) -> &str {
        match self {
            AbilityDescription::Text(text) | AbilityDescription::Reference(text) => text,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, AbilityDescription::Reference(_))
    }
}

impl From<String> for AbilityDescription {
    fn from(value: String) -> Self {
        let trimmed = value.trim_start();
        if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
            AbilityDescription::Reference(value)
        } else {
            AbilityDescription::Text(value)
        }
    }
}

impl From<&str> for AbilityDescription {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<AbilityDescription> for String {
    fn from(value: AbilityDescription) -> Self {
        match value {
            AbilityDescription::Text(text) | AbilityDescription::Reference(text) => text,
        }
    }
}

/// An essence ability from the catalog.
///
/// Serializable for presentation; construction goes through [`Ability::new`]
/// so deserialization is left to the raw catalog records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ability {
    id: AbilityId,
    name: String,
    description: AbilityDescription,
    kind: AbilityKind,
}

impl Ability {
    pub fn new(
        id: impl Into<AbilityId>,
        name: impl Into<String>,
        description: impl Into<AbilityDescription>,
        kind: AbilityKind,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        if id.as_str().trim().is_empty() {
            return Err(DomainError::validation("ability id cannot be empty"));
        }
        if let AbilityKind::Spell(level) = kind {
            AbilityKind::spell(level)?;
        }
        Ok(Self {
            id,
            name: name.into(),
            description: description.into(),
            kind,
        })
    }

    #[inline]
    pub fn id(&self) -> &AbilityId {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> &AbilityDescription {
        &self.description
    }

    #[inline]
    pub fn kind(&self) -> AbilityKind {
        self.kind
    }

    pub fn tier(&self) -> AbilityTier {
        self.kind.tier()
    }

    /// Essence points this ability costs.
    pub fn cost(&self) -> u32 {
        self.tier().cost()
    }

    pub fn matches(&self, filter: AbilityFilter) -> bool {
        match filter {
            AbilityFilter::All => true,
            AbilityFilter::Active => matches!(self.kind, AbilityKind::Active(_)),
            AbilityFilter::Passive => matches!(self.kind, AbilityKind::Passive(_)),
            AbilityFilter::Spell => matches!(self.kind, AbilityKind::Spell(_)),
            AbilityFilter::Cantrip => matches!(self.kind, AbilityKind::Cantrip),
        }
    }
}

/// Kind filter offered by the ability browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityFilter {
    #[default]
    All,
    Active,
    Passive,
    Cantrip,
    Spell,
}

impl fmt::Display for AbilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AbilityFilter::All => "all",
            AbilityFilter::Active => "active",
            AbilityFilter::Passive => "passive",
            AbilityFilter::Cantrip => "cantrip",
            AbilityFilter::Spell => "spell",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for AbilityFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(AbilityFilter::All),
            "active" => Ok(AbilityFilter::Active),
            "passive" => Ok(AbilityFilter::Passive),
            "cantrip" => Ok(AbilityFilter::Cantrip),
            "spell" => Ok(AbilityFilter::Spell),
            _ => Err(DomainError::parse(format!("Unknown ability filter: {}", s))),
        }
    }
}
