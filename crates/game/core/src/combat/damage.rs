//! Damage resolution: pool construction and wound counting.
//!
//! Damage is a pool of d6; each die that meets or beats the target's
//! effective armor is one wound. Effective armor always lands in `[2, 6]`,
//! so no attack is ever completely safe and none completely certain.

use crate::dice::AttributeRoll;
use crate::env::DiceOracle;
use crate::state::{Attack, AttackFlags};

/// Lower and upper clamp for the wound threshold.
pub const ARMOR_MIN: i32 = 2;
pub const ARMOR_MAX: i32 = 6;

/// A built damage pool: how many dice to roll and how much the defender's
/// armor shifts for this resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamagePool {
    pub dice: u32,
    /// Added to effective armor; a floored minimum-damage attack is easier
    /// to absorb.
    pub armor_shift: i32,
}

/// Builds the damage pool for a resolved hit.
///
/// `bonus` carries pushback bonus damage and trigger bonuses. Double
/// criticals add +2 and supersede the +1 of a plain critical. A pool that
/// comes out at zero or less is floored to a single die with +1 armor
/// shift.
pub fn build_pool(attack: &Attack, roll: &AttributeRoll, strength: i32, bonus: i32) -> DamagePool {
    let crit_bonus = if roll.critical_success {
        2
    } else if roll.critical_hit {
        1
    } else {
        0
    };
    let strength_bonus = if attack.flags.contains(AttackFlags::ADD_STRENGTH) {
        strength
    } else {
        0
    };

    let total = attack.damage + crit_bonus + bonus + strength_bonus;
    if total <= 0 {
        DamagePool {
            dice: 1,
            armor_shift: 1,
        }
    } else {
        DamagePool {
            dice: total as u32,
            armor_shift: 0,
        }
    }
}

/// Wound threshold: base armor plus the attack's armor modifier plus any
/// pool shift, clamped to `[2, 6]`.
pub fn effective_armor(base_armor: i32, attack_armor_mod: i32, armor_shift: i32) -> u8 {
    (base_armor + attack_armor_mod + armor_shift).clamp(ARMOR_MIN, ARMOR_MAX) as u8
}

/// Rolls the pool and counts wounds. Returns the wound count and the faces
/// for narration.
pub fn roll_wounds(pool: u32, threshold: u8, dice: &dyn DiceOracle) -> (u32, Vec<u8>) {
    let faces = crate::dice::roll_xd6(dice, pool);
    let wounds = faces.iter().filter(|&&face| face >= threshold).count() as u32;
    (wounds, faces)
}
