//! State types for creatures, items, and the grid they fight on.

pub mod common;
pub mod creature;
pub mod item;
pub mod skill;

pub use common::{CreatureId, Facing, Faction, Footprint, Position};
pub use creature::{
    Attributes, CreatureBuilder, CreatureState, DamageOutcome, EquipError, EquipSlot, Equipment,
    Loadout, StatusEffect, StatusEffectKind, StatusEffects, TurnResources,
};
pub use item::{
    ArmorData, Attack, AttackFlags, AttackKind, Item, RangeBand, ShieldData, WeaponData,
};
pub use skill::Skill;
