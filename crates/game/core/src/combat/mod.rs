//! Combat resolution system.
//!
//! `execute_combat` is the single entry point; it validates the attack,
//! selects the applicable attack definition by distance, runs the to-hit
//! contest, then pushback, block, and damage in strict order, firing
//! trigger hooks at each phase boundary and narrating through the injected
//! message sink.

pub mod block;
pub mod damage;
pub mod event;
pub mod execute;
pub mod pushback;
pub mod to_hit;

pub use block::{BlockOutcome, resolve_block};
pub use damage::{ARMOR_MAX, ARMOR_MIN, DamagePool, build_pool, effective_armor, roll_wounds};
pub use event::{CombatEvent, RedirectOutcome};
pub use execute::{CombatError, CombatResult, execute_combat};
pub use pushback::{PushOutcome, resolve_pushback};
pub use to_hit::{
    MeleeContest, decide_melee, decide_ranged, elevation_bonus, movement_penalty,
    range_penalty, ranged_attack_modifier,
};
