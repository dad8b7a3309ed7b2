//! Progression tiers, spell levels, and their point costs.
//!
//! Abilities sit either on one of the five character tiers or on a spell
//! level. Both map to a point cost, and every spell level also maps onto a
//! character-tier *band* used by the prerequisite check.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One of the five character-progression bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Initiate,
    Adept,
    Master,
    Grandmaster,
    GreatGrandmaster,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Initiate,
        Tier::Adept,
        Tier::Master,
        Tier::Grandmaster,
        Tier::GreatGrandmaster,
    ];

    /// Zero-based position in the progression.
    pub fn rank(&self) -> usize {
        match self {
            Tier::Initiate => 0,
            Tier::Adept => 1,
            Tier::Master => 2,
            Tier::Grandmaster => 3,
            Tier::GreatGrandmaster => 4,
        }
    }

    /// Essence points an ability of this tier costs (1..=5).
    pub fn point_cost(&self) -> u32 {
        self.rank() as u32 + 1
    }

    /// Minimum character level before the tier can unlock.
    pub fn level_requirement(&self) -> u8 {
        match self {
            Tier::Initiate => 1,
            Tier::Adept => 5,
            Tier::Master => 9,
            Tier::Grandmaster => 13,
            Tier::GreatGrandmaster => 17,
        }
    }

    /// Character levels the tier is associated with, for display.
    pub fn level_range(&self) -> &'static str {
        match self {
            Tier::Initiate => "1-4",
            Tier::Adept => "5-8",
            Tier::Master => "9-12",
            Tier::Grandmaster => "13-16",
            Tier::GreatGrandmaster => "17-20",
        }
    }

    /// The tier that must be represented in the selection before this one unlocks.
    pub fn previous(&self) -> Option<Tier> {
        match self {
            Tier::Initiate => None,
            Tier::Adept => Some(Tier::Initiate),
            Tier::Master => Some(Tier::Adept),
            Tier::Grandmaster => Some(Tier::Master),
            Tier::GreatGrandmaster => Some(Tier::Grandmaster),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Tier::Initiate => "initiate",
            Tier::Adept => "adept",
            Tier::Master => "master",
            Tier::Grandmaster => "grandmaster",
            Tier::GreatGrandmaster => "greatgrandmaster",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Tier::Initiate => "Initiate",
            Tier::Adept => "Adept",
            Tier::Master => "Master",
            Tier::Grandmaster => "Grandmaster",
            Tier::GreatGrandmaster => "Great Grandmaster",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Tier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "initiate" => Ok(Tier::Initiate),
            "adept" => Ok(Tier::Adept),
            "master" => Ok(Tier::Master),
            "grandmaster" => Ok(Tier::Grandmaster),
            "greatgrandmaster" => Ok(Tier::GreatGrandmaster),
            _ => Err(DomainError::parse(format!("Unknown tier: {}", s))),
        }
    }
}

/// Spell level of a cantrip or leveled spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpellLevel {
    #[serde(rename = "cantrip")]
    Cantrip,
    #[serde(rename = "1st")]
    First,
    #[serde(rename = "2nd")]
    Second,
    #[serde(rename = "3rd")]
    Third,
    #[serde(rename = "4th")]
    Fourth,
    #[serde(rename = "5th")]
    Fifth,
    #[serde(rename = "6th")]
    Sixth,
    #[serde(rename = "7th")]
    Seventh,
    #[serde(rename = "8th")]
    Eighth,
    #[serde(rename = "9th")]
    Ninth,
}

impl SpellLevel {
    pub const ALL: [SpellLevel; 10] = [
        SpellLevel::Cantrip,
        SpellLevel::First,
        SpellLevel::Second,
        SpellLevel::Third,
        SpellLevel::Fourth,
        SpellLevel::Fifth,
        SpellLevel::Sixth,
        SpellLevel::Seventh,
        SpellLevel::Eighth,
        SpellLevel::Ninth,
    ];

    /// Numeric spell level (cantrip = 0).
    pub fn number(&self) -> u8 {
        match self {
            SpellLevel::Cantrip => 0,
            SpellLevel::First => 1,
            SpellLevel::Second => 2,
            SpellLevel::Third => 3,
            SpellLevel::Fourth => 4,
            SpellLevel::Fifth => 5,
            SpellLevel::Sixth => 6,
            SpellLevel::Seventh => 7,
            SpellLevel::Eighth => 8,
            SpellLevel::Ninth => 9,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(number as usize).copied()
    }

    pub fn is_cantrip(&self) -> bool {
        matches!(self, SpellLevel::Cantrip)
    }

    pub fn point_cost(&self) -> u32 {
        match self {
            SpellLevel::Cantrip | SpellLevel::First | SpellLevel::Second => 1,
            SpellLevel::Third | SpellLevel::Fourth => 2,
            SpellLevel::Fifth | SpellLevel::Sixth => 3,
            SpellLevel::Seventh | SpellLevel::Eighth => 4,
            SpellLevel::Ninth => 5,
        }
    }

    /// Character tier this spell level counts as when checking prerequisites.
    pub fn band(&self) -> Tier {
        match self {
            SpellLevel::Cantrip | SpellLevel::First | SpellLevel::Second => Tier::Initiate,
            SpellLevel::Third | SpellLevel::Fourth => Tier::Adept,
            SpellLevel::Fifth | SpellLevel::Sixth => Tier::Master,
            SpellLevel::Seventh | SpellLevel::Eighth => Tier::Grandmaster,
            SpellLevel::Ninth => Tier::GreatGrandmaster,
        }
    }

    /// Character level at which this spell level unlocks.
    ///
    /// Cantrips and 1st level are always available; 2nd unlocks at 5, 3rd at
    /// 9 and 4th at 13. 5th level and above never unlock.
    pub fn level_requirement(&self) -> Option<u8> {
        match self {
            SpellLevel::Cantrip | SpellLevel::First => Some(1),
            SpellLevel::Second => Some(5),
            SpellLevel::Third => Some(9),
            SpellLevel::Fourth => Some(13),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            SpellLevel::Cantrip => "cantrip",
            SpellLevel::First => "1st",
            SpellLevel::Second => "2nd",
            SpellLevel::Third => "3rd",
            SpellLevel::Fourth => "4th",
            SpellLevel::Fifth => "5th",
            SpellLevel::Sixth => "6th",
            SpellLevel::Seventh => "7th",
            SpellLevel::Eighth => "8th",
            SpellLevel::Ninth => "9th",
        }
    }
}

impl fmt::Display for SpellLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for SpellLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        SpellLevel::ALL
            .into_iter()
            .find(|level| level.id() == normalized)
            .ok_or_else(|| DomainError::parse(format!("Unknown spell level: {}", s)))
    }
}

/// The `tier` of an ability: a character tier or a spell level.
///
/// Serialized as the bare string (`"adept"`, `"3rd"`, `"cantrip"`).
/// Ordering puts the character tiers first, then spell levels ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AbilityTier {
    Tier(Tier),
    Spell(SpellLevel),
}

impl AbilityTier {
    pub fn cost(&self) -> u32 {
        match self {
            AbilityTier::Tier(tier) => tier.point_cost(),
            AbilityTier::Spell(level) => level.point_cost(),
        }
    }

    pub fn band(&self) -> Tier {
        match self {
            AbilityTier::Tier(tier) => *tier,
            AbilityTier::Spell(level) => level.band(),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            AbilityTier::Tier(tier) => tier.id(),
            AbilityTier::Spell(level) => level.id(),
        }
    }
}

impl From<Tier> for AbilityTier {
    fn from(tier: Tier) -> Self {
        AbilityTier::Tier(tier)
    }
}

impl From<SpellLevel> for AbilityTier {
    fn from(level: SpellLevel) -> Self {
        AbilityTier::Spell(level)
    }
}

impl fmt::Display for AbilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for AbilityTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(tier) = s.parse::<Tier>() {
            return Ok(AbilityTier::Tier(tier));
        }
        s.parse::<SpellLevel>()
            .map(AbilityTier::Spell)
            .map_err(|_| DomainError::parse(format!("Unknown ability tier: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_costs_follow_rank() {
        let costs: Vec<u32> = Tier::ALL.iter().map(Tier::point_cost).collect();
        assert_eq!(costs, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn tier_level_requirements() {
        let levels: Vec<u8> = Tier::ALL.iter().map(Tier::level_requirement).collect();
        assert_eq!(levels, vec![1, 5, 9, 13, 17]);
    }

    #[test]
    fn spell_cost_table() {
        let costs: Vec<u32> = SpellLevel::ALL.iter().map(SpellLevel::point_cost).collect();
        assert_eq!(costs, vec![1, 1, 1, 2, 2, 3, 3, 4, 4, 5]);
    }

    #[test]
    fn spell_bands() {
        assert_eq!(SpellLevel::Cantrip.band(), Tier::Initiate);
        assert_eq!(SpellLevel::Second.band(), Tier::Initiate);
        assert_eq!(SpellLevel::Third.band(), Tier::Adept);
        assert_eq!(SpellLevel::Sixth.band(), Tier::Master);
        assert_eq!(SpellLevel::Eighth.band(), Tier::Grandmaster);
        assert_eq!(SpellLevel::Ninth.band(), Tier::GreatGrandmaster);
    }

    #[test]
    fn spell_level_requirements() {
        assert_eq!(SpellLevel::Cantrip.level_requirement(), Some(1));
        assert_eq!(SpellLevel::First.level_requirement(), Some(1));
        assert_eq!(SpellLevel::Second.level_requirement(), Some(5));
        assert_eq!(SpellLevel::Third.level_requirement(), Some(9));
        assert_eq!(SpellLevel::Fourth.level_requirement(), Some(13));
        assert_eq!(SpellLevel::Fifth.level_requirement(), None);
        assert_eq!(SpellLevel::Sixth.level_requirement(), None);
        assert_eq!(SpellLevel::Ninth.level_requirement(), None);
    }

    #[test]
    fn ability_tier_parses_both_forms() {
        assert_eq!(
            "adept".parse::<AbilityTier>(),
            Ok(AbilityTier::Tier(Tier::Adept))
        );
        assert_eq!(
            "3rd".parse::<AbilityTier>(),
            Ok(AbilityTier::Spell(SpellLevel::Third))
        );
        assert!("active".parse::<AbilityTier>().is_err());
    }

    #[test]
    fn ability_tier_serializes_as_bare_string() {
        let tier: AbilityTier = serde_json::from_str("\"greatgrandmaster\"").expect("tier");
        assert_eq!(tier, AbilityTier::Tier(Tier::GreatGrandmaster));
        let spell: AbilityTier = serde_json::from_str("\"7th\"").expect("spell level");
        assert_eq!(spell, AbilityTier::Spell(SpellLevel::Seventh));
        assert_eq!(serde_json::to_string(&spell).expect("serialize"), "\"7th\"");
    }

    #[test]
    fn ability_tier_ordering_groups_tiers_before_spells() {
        let mut tiers = vec![
            AbilityTier::Spell(SpellLevel::First),
            AbilityTier::Tier(Tier::Adept),
            AbilityTier::Spell(SpellLevel::Cantrip),
            AbilityTier::Tier(Tier::Initiate),
        ];
        tiers.sort();
        assert_eq!(
            tiers,
            vec![
                AbilityTier::Tier(Tier::Initiate),
                AbilityTier::Tier(Tier::Adept),
                AbilityTier::Spell(SpellLevel::Cantrip),
                AbilityTier::Spell(SpellLevel::First),
            ]
        );
    }
}
