//! Shared vocabulary types for the essence system.
//!
//! These are the small value types every other module speaks in: which path
//! an ability belongs to, which tier or spell level it sits on, and the
//! character level that gates it.

mod level;
mod path;
mod tier;

pub use level::Level;
pub use path::EssencePath;
pub use tier::{AbilityTier, SpellLevel, Tier};
