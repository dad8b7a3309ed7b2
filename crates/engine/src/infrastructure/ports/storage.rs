//! Snapshot persistence port.

use essencecalc_domain::CharacterSnapshot;

use super::StoreError;

/// Durable home for the single saved character.
///
/// `load` returns `Ok(None)` when nothing was saved yet. `save` replaces the
/// previous snapshot as a whole.
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Result<Option<CharacterSnapshot>, StoreError>;
    fn save(&self, snapshot: &CharacterSnapshot) -> Result<(), StoreError>;
}
