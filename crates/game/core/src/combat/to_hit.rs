//! To-hit arithmetic for both attack pipelines.
//!
//! Pure functions only: the execute module rolls the dice and interleaves
//! trigger dispatch, then feeds the results through these helpers.

use crate::dice::AttributeRoll;
use crate::env::MapOracle;
use crate::state::Position;

/// +1 when `own` stands exactly one terrain level above `other`.
pub fn elevation_bonus(map: &dyn MapOracle, own: Option<Position>, other: Option<Position>) -> i32 {
    match (own, other) {
        (Some(own), Some(other)) if map.height(own) == map.height(other) + 1 => 1,
        _ => 0,
    }
}

/// Ranged penalty by distance band: 0 up to 3 tiles, then -1 per band of 3.
pub fn range_penalty(distance: u32) -> i32 {
    match distance {
        0..=3 => 0,
        4..=6 => -1,
        7..=9 => -2,
        _ => -3,
    }
}

/// Penalty for shooting after moving: -1 for up to half the movement pool,
/// -2 beyond half, nothing when the shooter stood still.
pub fn movement_penalty(used: u32, max: u32) -> i32 {
    if used == 0 {
        0
    } else if used * 2 <= max {
        -1
    } else {
        -2
    }
}

/// Sums every situational modifier of a ranged shot (spec-ordered:
/// weapon, back-attack, range, agility, movement, lighting). The ranged
/// attribute itself is not part of the modifier.
#[allow(clippy::too_many_arguments)]
pub fn ranged_attack_modifier(
    attack_to_hit: i32,
    back_attack_bonus: i32,
    distance: u32,
    attacker_agility: i32,
    target_agility: i32,
    movement_used: u32,
    movement_max: u32,
    darkness_penalty: i32,
) -> i32 {
    let agility_penalty = if target_agility > attacker_agility {
        -1
    } else {
        0
    };
    attack_to_hit
        + back_attack_bonus
        + range_penalty(distance)
        + agility_penalty
        + movement_penalty(movement_used, movement_max)
        + darkness_penalty
}

/// Everything the melee hit decision needs beyond the two totals.
#[derive(Clone, Copy, Debug)]
pub struct MeleeContest {
    pub attacker_total: i32,
    pub defender_total: i32,
    pub attacker_agility: i32,
    pub defender_agility: i32,
    pub attacker_has_shield: bool,
    pub defender_has_shield: bool,
}

/// Resolve a melee exchange.
///
/// Overrides first: an attacker fumble always misses; an attacker double
/// critical hits outright unless the defender also rolled one, in which
/// case the normal comparison decides. Ties go to the higher agility; when
/// agility also ties, the side without a shield loses, and a shield-tied
/// standoff defaults to the attacker.
pub fn decide_melee(
    contest: MeleeContest,
    attacker_roll: &AttributeRoll,
    defender_roll: &AttributeRoll,
) -> bool {
    if attacker_roll.fumble {
        return false;
    }
    if attacker_roll.critical_success && !defender_roll.critical_success {
        return true;
    }

    match contest.attacker_total.cmp(&contest.defender_total) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => {
            match contest.attacker_agility.cmp(&contest.defender_agility) {
                std::cmp::Ordering::Greater => true,
                std::cmp::Ordering::Less => false,
                std::cmp::Ordering::Equal => {
                    if contest.attacker_has_shield != contest.defender_has_shield {
                        contest.attacker_has_shield
                    } else {
                        true
                    }
                }
            }
        }
    }
}

/// Resolve a ranged attribute test against the configured target number.
pub fn decide_ranged(roll: &AttributeRoll, test_target: i32) -> bool {
    if roll.critical_success {
        return true;
    }
    if roll.fumble {
        return false;
    }
    roll.total >= test_target
}
