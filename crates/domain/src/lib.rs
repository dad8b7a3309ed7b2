extern crate self as essencecalc_domain;

// Vocabulary types
pub mod types;

pub mod aggregates;
pub mod allocation;
pub mod catalog;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod rules;
pub mod snapshot;

pub use aggregates::Character;
pub use allocation::{AllocationEngine, AllocationError, EssenceBudget, PathEssenceStatus};
pub use catalog::{AbilityCatalog, CatalogError, CatalogSection};
pub use entities::{Ability, AbilityDescription, AbilityFilter, AbilityKind};
pub use error::DomainError;
pub use events::{Deselection, LevelChange, Revalidation, ToggleOutcome};
pub use ids::AbilityId;
pub use snapshot::{CharacterSnapshot, SNAPSHOT_VERSION};
pub use types::{AbilityTier, EssencePath, Level, SpellLevel, Tier};
