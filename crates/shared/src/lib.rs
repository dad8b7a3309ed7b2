//! EssenceCalc Shared - wire formats around the domain
//!
//! This crate contains the JSON shapes the engine reads and writes:
//! - Raw catalog records with independent boolean flags, and their
//!   classification into domain abilities
//! - The character snapshot format (export/import and persistence)
//! - Summary views of a character for presentation
//!
//! # Design Principles
//!
//! 1. **No rules** - budget and prerequisite logic stays in the domain crate
//! 2. **Validate at the edge** - malformed input never reaches the engine
//! 3. **camelCase on the wire** - field names match the stored JSON files

pub mod catalog;
pub mod responses;
pub mod snapshot;

pub use catalog::{
    parse_catalog, parse_path_sections, CatalogLoadError, CatalogSource, PathSections, RawAbility,
};
pub use responses::{AbilityView, CharacterSummary, PathSummary};
pub use snapshot::{parse_snapshot, to_json_pretty, SnapshotDto, SnapshotError};
