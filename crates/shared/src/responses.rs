//! Read-only views of a character for presentation.

use essencecalc_domain::{
    Ability, AbilityFilter, AllocationEngine, EssenceBudget, EssencePath, PathEssenceStatus,
};
use serde::Serialize;

/// One catalog entry as the player sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: &'static str,
    pub tier: String,
    pub cost: u32,
    pub selected: bool,
    /// Selecting it now would fail the tier check.
    pub locked: bool,
}

impl AbilityView {
    pub fn new(engine: &AllocationEngine, path: EssencePath, ability: &Ability) -> Self {
        let selected = engine.is_selected(ability.id().as_str());
        Self {
            id: ability.id().to_string(),
            name: ability.name().to_string(),
            description: ability.description().as_str().to_string(),
            kind: ability.kind().label(),
            tier: ability.tier().to_string(),
            cost: ability.cost(),
            selected,
            locked: !selected && !engine.is_tier_unlocked(path, ability.tier()),
        }
    }

    /// Every ability of `path` matching `filter`, in catalog order.
    pub fn list(engine: &AllocationEngine, path: EssencePath, filter: AbilityFilter) -> Vec<Self> {
        engine
            .catalog()
            .filter(path, filter)
            .into_iter()
            .map(|ability| Self::new(engine, path, ability))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSummary {
    pub path: EssencePath,
    pub name: &'static str,
    pub selected: Vec<String>,
    pub essence: PathEssenceStatus,
}

/// Budget figures plus every path that has something selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    pub budget: EssenceBudget,
    pub paths: Vec<PathSummary>,
}

impl CharacterSummary {
    pub fn from_engine(engine: &AllocationEngine) -> Self {
        let paths = engine
            .selected_by_path()
            .into_iter()
            .map(|(path, abilities)| PathSummary {
                path,
                name: path.display_name(),
                selected: abilities
                    .iter()
                    .map(|ability| ability.name().to_string())
                    .collect(),
                essence: engine.path_status(path),
            })
            .collect();
        Self {
            budget: engine.budget(),
            paths,
        }
    }
}
