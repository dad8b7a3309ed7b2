//! Character snapshot wire format.
//!
//! ```json
//! { "version": "1.0", "level": 5,
//!   "selectedAbilities": ["earth_initiate_stonecunning"],
//!   "activeEssenceByPath": { "earth": 1 } }
//! ```
//!
//! Import is checked field by field against a `serde_json::Value` so every
//! rejection carries a readable reason. Older files store the level under
//! `characterLevel`; that key is still accepted.

use std::collections::BTreeMap;

use essencecalc_domain::{AbilityId, CharacterSnapshot, EssencePath, Level, SNAPSHOT_VERSION};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

const LEGACY_LEVEL_KEY: &str = "characterLevel";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Invalid configuration file: {0}")]
    InvalidSnapshot(String),

    #[error("Snapshot serialization failed: {0}")]
    Serialization(String),
}

impl SnapshotError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidSnapshot(message.into())
    }
}

/// Serialized form written on export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDto {
    pub version: String,
    pub level: u8,
    pub selected_abilities: Vec<String>,
    pub active_essence_by_path: BTreeMap<String, u32>,
}

impl From<&CharacterSnapshot> for SnapshotDto {
    fn from(snapshot: &CharacterSnapshot) -> Self {
        let mut selected_abilities: Vec<String> = snapshot
            .selected_abilities
            .iter()
            .map(|id| id.as_str().to_string())
            .collect();
        selected_abilities.sort();
        Self {
            version: snapshot.version.clone(),
            level: snapshot.level.value(),
            selected_abilities,
            active_essence_by_path: snapshot
                .active_essence_by_path
                .iter()
                .map(|(path, value)| (path.id().to_string(), *value))
                .collect(),
        }
    }
}

/// Pretty-printed JSON for a snapshot.
pub fn to_json_pretty(snapshot: &CharacterSnapshot) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(&SnapshotDto::from(snapshot))
        .map_err(|e| SnapshotError::Serialization(e.to_string()))
}

/// Parses and validates snapshot JSON. Nothing partial is ever returned.
pub fn parse_snapshot(text: &str) -> Result<CharacterSnapshot, SnapshotError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| SnapshotError::invalid(format!("not valid JSON ({e})")))?;
    let Value::Object(object) = value else {
        return Err(SnapshotError::invalid("expected a JSON object"));
    };

    let level = parse_level(&object)?;
    let selected_abilities = parse_selection(&object)?;
    let active_essence_by_path = parse_counters(&object)?;
    let version = match object.get("version") {
        Some(Value::String(version)) => version.clone(),
        _ => SNAPSHOT_VERSION.to_string(),
    };

    Ok(CharacterSnapshot {
        version,
        level,
        selected_abilities,
        active_essence_by_path,
    })
}

fn parse_level(object: &Map<String, Value>) -> Result<Level, SnapshotError> {
    let raw = object
        .get("level")
        .or_else(|| object.get(LEGACY_LEVEL_KEY))
        .filter(|value| is_truthy(value))
        .ok_or_else(|| SnapshotError::invalid("missing character level"))?;
    let number = raw
        .as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| SnapshotError::invalid(format!("level must be an integer, got {raw}")))?;
    Level::new(number).map_err(|e| SnapshotError::invalid(e.to_string()))
}

fn parse_selection(object: &Map<String, Value>) -> Result<Vec<AbilityId>, SnapshotError> {
    let Some(Value::Array(items)) = object.get("selectedAbilities") else {
        return Err(SnapshotError::invalid("selectedAbilities must be an array"));
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(id) if !id.trim().is_empty() => Ok(AbilityId::new(id.as_str())),
            other => Err(SnapshotError::invalid(format!(
                "selectedAbilities entries must be ability ids, got {other}"
            ))),
        })
        .collect()
}

fn parse_counters(object: &Map<String, Value>) -> Result<BTreeMap<EssencePath, u32>, SnapshotError> {
    let counters = match object.get("activeEssenceByPath") {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(Value::Object(counters)) => counters,
        Some(other) => {
            return Err(SnapshotError::invalid(format!(
                "activeEssenceByPath must be an object, got {other}"
            )))
        }
    };

    let mut parsed = BTreeMap::new();
    for (key, value) in counters {
        let path: EssencePath = key
            .parse()
            .map_err(|_| SnapshotError::invalid(format!("unknown essence path `{key}`")))?;
        let amount = value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                SnapshotError::invalid(format!(
                    "active essence for {path} must be a non-negative integer, got {value}"
                ))
            })?;
        if parsed.insert(path, amount).is_some() {
            return Err(SnapshotError::invalid(format!(
                "active essence for {path} is given more than once"
            )));
        }
    }
    Ok(parsed)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
