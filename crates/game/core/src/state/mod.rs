//! Authoritative game state representation.
//!
//! This module owns the data structures that describe creatures, their
//! resources and equipment, and the roster they live in. The combat
//! pipeline mutates this state exclusively through the creature capability
//! surface.
pub mod roster;
pub mod types;

pub use bounded_vector::BoundedVec;
pub use roster::{GroundItem, Roster};
pub use types::{
    ArmorData, Attack, AttackFlags, AttackKind, Attributes, CreatureBuilder, CreatureId,
    CreatureState, DamageOutcome, EquipError, EquipSlot, Equipment, Facing, Faction, Footprint,
    Item, Loadout, Position, RangeBand, ShieldData, Skill, StatusEffect, StatusEffectKind,
    StatusEffects, TurnResources, WeaponData,
};
