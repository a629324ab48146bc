//! Content loaders for reading game data from files.
//!
//! Loaders deserialize spec types (plain serde structs) and convert them
//! into `skirmish-core` values, so the data format can stay stable while
//! the core types evolve.

pub mod config;
pub mod creatures;
pub mod factory;
pub mod item;

pub use config::ConfigLoader;
pub use creatures::{CreatureLoader, CreaturePreset, SkillSpec, TriggerSpec};
pub use factory::{ContentFactory, CreatureFactory, loadout_is_valid, resolve_loadout_conflicts};
pub use item::{AttackSpec, ItemLoader, ItemSpec, WeaponSpec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
