//! Elemental essence paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One of the nine elemental categories abilities are grouped under.
///
/// A path is a grouping key only; prerequisite checks are evaluated within a
/// single path, never across paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EssencePath {
    Water,
    Fire,
    Earth,
    Metal,
    Wood,
    Poison,
    Acid,
    Lightning,
    /// Authored as "air" in some content files.
    #[serde(alias = "air")]
    Wind,
}

impl EssencePath {
    /// All paths in display order.
    pub const ALL: [EssencePath; 9] = [
        EssencePath::Water,
        EssencePath::Fire,
        EssencePath::Earth,
        EssencePath::Metal,
        EssencePath::Wood,
        EssencePath::Poison,
        EssencePath::Acid,
        EssencePath::Lightning,
        EssencePath::Wind,
    ];

    /// Stable identifier used in catalog keys and snapshots.
    pub fn id(&self) -> &'static str {
        match self {
            EssencePath::Water => "water",
            EssencePath::Fire => "fire",
            EssencePath::Earth => "earth",
            EssencePath::Metal => "metal",
            EssencePath::Wood => "wood",
            EssencePath::Poison => "poison",
            EssencePath::Acid => "acid",
            EssencePath::Lightning => "lightning",
            EssencePath::Wind => "wind",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EssencePath::Water => "Water",
            EssencePath::Fire => "Fire",
            EssencePath::Earth => "Earth",
            EssencePath::Metal => "Metal",
            EssencePath::Wood => "Wood",
            EssencePath::Poison => "Poison",
            EssencePath::Acid => "Acid",
            EssencePath::Lightning => "Lightning",
            EssencePath::Wind => "Wind",
        }
    }
}

impl fmt::Display for EssencePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for EssencePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "water" => Ok(EssencePath::Water),
            "fire" => Ok(EssencePath::Fire),
            "earth" => Ok(EssencePath::Earth),
            "metal" => Ok(EssencePath::Metal),
            "wood" => Ok(EssencePath::Wood),
            "poison" => Ok(EssencePath::Poison),
            "acid" => Ok(EssencePath::Acid),
            "lightning" => Ok(EssencePath::Lightning),
            "wind" | "air" => Ok(EssencePath::Wind),
            _ => Err(DomainError::parse(format!("Unknown essence path: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_path_id() {
        for path in EssencePath::ALL {
            assert_eq!(path.id().parse::<EssencePath>(), Ok(path));
        }
    }

    #[test]
    fn air_is_an_alias_for_wind() {
        assert_eq!("air".parse::<EssencePath>(), Ok(EssencePath::Wind));
        let parsed: EssencePath = serde_json::from_str("\"air\"").expect("air alias");
        assert_eq!(parsed, EssencePath::Wind);
        assert_eq!(serde_json::to_string(&parsed).expect("serialize"), "\"wind\"");
    }

    #[test]
    fn rejects_unknown_path() {
        assert!(matches!(
            "shadow".parse::<EssencePath>(),
            Err(DomainError::Parse(_))
        ));
    }
}
