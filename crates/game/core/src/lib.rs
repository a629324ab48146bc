//! Deterministic combat rules for a turn-based tactical RPG.
//!
//! `skirmish-core` defines the canonical rules (dice, creature resources,
//! equipment capabilities, the combat resolution pipeline, trigger
//! dispatch) and exposes pure APIs reused by the turn-orchestration layer
//! and offline tools. All randomness, map geometry, validation policy, and
//! narration flow through the capability oracles bundled in [`env::Env`];
//! the crate owns no globals.
pub mod combat;
pub mod config;
pub mod dice;
pub mod env;
pub mod error;
pub mod state;
pub mod triggers;

pub use combat::{
    CombatError, CombatEvent, CombatResult, PushOutcome, RedirectOutcome, execute_combat,
};
pub use config::GameConfig;
pub use dice::{AttributeRoll, attribute_roll, roll_d6, roll_xd6};
pub use env::{
    ApproveAll, CombatBlocked, CombatValidator, DiceOracle, Env, GameEnv, LightLevel,
    MapDimensions, MapOracle, MemorySink, MessageCategory, MessageSink, NullSink, OpenRoom,
    OracleError, PcgDice, ScriptedDice, StaticTile, TerrainKind,
};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    ArmorData, Attack, AttackFlags, AttackKind, Attributes, CreatureBuilder, CreatureId,
    CreatureState, DamageOutcome, EquipError, EquipSlot, Equipment, Facing, Faction, Footprint,
    GroundItem, Item, Loadout, Position, RangeBand, Roster, ShieldData, Skill, StatusEffectKind,
    TurnResources, WeaponData,
};
pub use triggers::{
    CombatEventKind, CombatTrigger, RollCondition, TriggerEffect, TriggerEvents, dispatch,
};
