//! Engine settings loaded from the environment.
//!
//! Supported environment variables:
//! - ESSENCE_DEFAULT_LEVEL: level for a new or reset character (1-20, default 1)
//! - ESSENCE_CATALOG_PATH: catalog file or directory (default `data/catalog`)
//! - ESSENCE_SNAPSHOT_PATH: saved character file (default `essence-config.json`)
//! - ESSENCE_AUTOSAVE: persist after every change (default true)
//!
//! Invalid values are ignored with a warning and the default is used.

use std::path::PathBuf;

use essencecalc_domain::Level;

pub const DEFAULT_CATALOG_PATH: &str = "data/catalog";
pub const DEFAULT_SNAPSHOT_PATH: &str = "essence-config.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub default_level: Level,
    pub catalog_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub autosave: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_level: Level::default(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            autosave: true,
        }
    }
}

impl EngineSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(val) = lookup("ESSENCE_DEFAULT_LEVEL") {
            match val.trim().parse::<u8>().ok().map(Level::new) {
                Some(Ok(level)) => settings.default_level = level,
                _ => tracing::warn!(
                    val = %val,
                    "ESSENCE_DEFAULT_LEVEL is not a level between 1 and 20, ignoring"
                ),
            }
        }

        if let Some(val) = lookup("ESSENCE_CATALOG_PATH").filter(|v| !v.trim().is_empty()) {
            settings.catalog_path = PathBuf::from(val.trim());
        }

        if let Some(val) = lookup("ESSENCE_SNAPSHOT_PATH").filter(|v| !v.trim().is_empty()) {
            settings.snapshot_path = PathBuf::from(val.trim());
        }

        if let Some(val) = lookup("ESSENCE_AUTOSAVE") {
            match parse_bool(&val) {
                Some(autosave) => settings.autosave = autosave,
                None => tracing::warn!(val = %val, "ESSENCE_AUTOSAVE is not a boolean, ignoring"),
            }
        }

        settings
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
