//! Domain entities

mod ability;

pub use ability::{Ability, AbilityDescription, AbilityFilter, AbilityKind};
