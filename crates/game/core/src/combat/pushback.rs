//! Pushback: forced relocation of the defender after a melee hit.

use crate::env::{DiceOracle, MapOracle};
use crate::state::{CreatureId, Facing, Position, Roster};

/// How a pushback attempt resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    /// The target was relocated one tile.
    Pushed { to: Position },
    /// Terrain blocked every candidate tile; the hit grinds the target
    /// against it for +1 bonus damage instead.
    CrushedAgainstTerrain,
    /// Not eligible, or another creature was in the way.
    NotPushed,
}

enum CandidateState {
    Valid(Position),
    BlockedByCreature,
    BlockedByTerrain,
}

/// Attempts to push `target` one tile away from `attacker`.
///
/// Eligible only when the attacker's size reaches the target's and this
/// attacker has not already pushed this target during the current turn.
/// Candidate destinations are the straight-line tile and the two
/// 45-degree deviations; the straight-line tile is preferred
/// deterministically, otherwise a uniformly random valid candidate is
/// taken. Only an actual relocation is recorded in the attacker's per-turn
/// push bookkeeping.
pub fn resolve_pushback(
    attacker_id: CreatureId,
    target_id: CreatureId,
    roster: &mut Roster,
    map: &dyn MapOracle,
    dice: &dyn DiceOracle,
) -> PushOutcome {
    let (Some(attacker), Some(target)) = (roster.creature(attacker_id), roster.creature(target_id))
    else {
        return PushOutcome::NotPushed;
    };
    let (Some(attacker_pos), Some(target_pos)) = (attacker.position, target.position) else {
        return PushOutcome::NotPushed;
    };

    if attacker.size < target.size || !attacker.can_push_creature(target_id) {
        return PushOutcome::NotPushed;
    }

    let Some(straight) = Facing::towards(attacker_pos, target_pos) else {
        return PushOutcome::NotPushed;
    };
    let footprint = target.footprint;

    let classify = |direction: Facing| -> CandidateState {
        let (dx, dy) = direction.delta();
        let destination = target_pos.offset(dx, dy);
        let tiles = footprint.tiles_at(destination);
        if !tiles.iter().all(|&tile| map.contains(tile) && map.is_open(tile)) {
            return CandidateState::BlockedByTerrain;
        }
        if !roster.is_area_free(&tiles, target_id) {
            return CandidateState::BlockedByCreature;
        }
        CandidateState::Valid(destination)
    };

    let candidates = [straight, straight.rotated(-1), straight.rotated(1)];
    let states: Vec<CandidateState> = candidates.iter().map(|&dir| classify(dir)).collect();

    // Straight line wins outright, without consulting the dice.
    let destination = match &states[0] {
        CandidateState::Valid(destination) => Some(*destination),
        _ => {
            let side_options: Vec<Position> = states[1..]
                .iter()
                .filter_map(|state| match state {
                    CandidateState::Valid(destination) => Some(*destination),
                    _ => None,
                })
                .collect();
            match side_options.len() {
                0 => None,
                1 => Some(side_options[0]),
                n => Some(side_options[dice.pick(n)]),
            }
        }
    };

    match destination {
        Some(destination) => {
            if let Some(target) = roster.creature_mut(target_id) {
                target.enter_tile(destination);
            }
            if let Some(attacker) = roster.creature_mut(attacker_id) {
                attacker.record_pushed_creature(target_id);
            }
            PushOutcome::Pushed { to: destination }
        }
        None => {
            let creature_in_the_way = states
                .iter()
                .any(|state| matches!(state, CandidateState::BlockedByCreature));
            if creature_in_the_way {
                PushOutcome::NotPushed
            } else {
                PushOutcome::CrushedAgainstTerrain
            }
        }
    }
}
