//! Data-driven content definitions and loaders.
//!
//! This crate houses static game content and provides loaders for RON/TOML
//! data files:
//! - Item catalogs (weapons, shields, armor; data-driven via RON)
//! - Creature presets (data-driven via RON)
//! - Game configuration (data-driven via TOML)
//!
//! Content is consumed when creatures are instantiated and never appears in
//! game state. Unknown preset or item names are content bugs and fail
//! loudly through `anyhow` errors; the loaders never invent defaults for
//! missing data.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AttackSpec, ConfigLoader, ContentFactory, CreatureFactory, CreatureLoader, CreaturePreset,
    ItemLoader, ItemSpec, SkillSpec, TriggerSpec, WeaponSpec,
};
