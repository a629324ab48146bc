//! The per-resolution combat bundle.
//!
//! Constructed once per `execute_combat` call and carried through every
//! phase. Mid-resolution target changes (ranged miss redirection) are
//! modelled as an explicit [`RedirectOutcome`] step result followed by
//! [`CombatEvent::retarget`], never as hidden in-place mutation scattered
//! through the phases.

use crate::state::{Attack, CreatureId, CreatureState, WeaponData};

/// Everything the phases need to know about the attack being resolved.
#[derive(Clone, Debug)]
pub struct CombatEvent {
    pub attacker: CreatureId,
    pub target: CreatureId,
    /// Snapshot of the acting weapon (equipped or natural).
    pub weapon: WeaponData,
    /// The one attack definition selected for this resolution.
    pub attack: Attack,
    pub distance: u32,
    /// Attacker stood behind the target both now and when the target's
    /// last turn started.
    pub is_back_attack: bool,
}

/// Result of the ranged miss-redirect step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// The resolution stays on the original target.
    Stayed,
    /// An overshoot struck someone behind the original target.
    Redirected { new_target: CreatureId },
}

impl CombatEvent {
    /// Builds the bundle for an attacker/target pair. Returns None when
    /// either creature is off the map (no geometry to resolve against).
    pub fn prepare(attacker: &CreatureState, target: &CreatureState) -> Option<CombatEvent> {
        let distance = attacker.distance_to(target)?;
        let (weapon, attack) = select_armament(attacker, distance);
        Some(CombatEvent {
            attacker: attacker.id,
            target: target.id,
            weapon,
            attack,
            distance,
            is_back_attack: back_attack(attacker, target),
        })
    }

    /// Substitutes a redirected target for all later phases.
    pub fn retarget(&mut self, attacker: &CreatureState, new_target: &CreatureState) {
        self.target = new_target.id;
        if let Some(distance) = attacker.distance_to(new_target) {
            self.distance = distance;
        }
        self.is_back_attack = back_attack(attacker, new_target);
    }
}

fn back_attack(attacker: &CreatureState, target: &CreatureState) -> bool {
    attacker
        .position
        .is_some_and(|position| target.is_behind(position))
        && target.was_behind_at_turn_start(attacker.id)
}

/// Picks the attack whose range band contains `distance`, falling back to
/// the attacker's natural weapon when the wielded one offers nothing (a
/// target standing inside a pure-ranged weapon's minimum range, say).
fn select_armament(attacker: &CreatureState, distance: u32) -> (WeaponData, Attack) {
    let weapon = attacker.loadout().main_weapon();
    if let Some(attack) = weapon.attack_for_distance(distance) {
        return (weapon.clone(), *attack);
    }

    let natural = attacker.natural_weapon();
    let attack = natural
        .attack_for_distance(distance)
        .or_else(|| natural.attacks.first())
        .copied()
        .unwrap_or_else(|| Attack::melee(0, 0));
    (natural.clone(), attack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AttackKind, CreatureBuilder, Facing, Item};

    fn bow() -> Item {
        Item::Weapon(
            WeaponData::new("bow", [Attack::ranged(2, 8, 1, 1)]).with_long_range(16),
        )
    }

    #[test]
    fn selects_attack_band_by_distance() {
        let archer = CreatureBuilder::named(1, "Archer")
            .at(0, 0)
            .main_hand(bow())
            .build();
        let far = CreatureBuilder::named(2, "Far").at(5, 0).build();

        let event = CombatEvent::prepare(&archer, &far).unwrap();
        assert_eq!(event.distance, 5);
        assert_eq!(event.attack.kind, AttackKind::Ranged);
        assert_eq!(event.weapon.name, "bow");
    }

    #[test]
    fn adjacent_target_forces_unarmed_fallback_for_pure_ranged() {
        let archer = CreatureBuilder::named(1, "Archer")
            .at(0, 0)
            .main_hand(bow())
            .build();
        let close = CreatureBuilder::named(2, "Close").at(1, 0).build();

        let event = CombatEvent::prepare(&archer, &close).unwrap();
        assert_eq!(event.attack.kind, AttackKind::Melee);
        assert_eq!(event.weapon.name, "bare hands");
    }

    #[test]
    fn off_map_participants_yield_no_event() {
        let archer = CreatureBuilder::named(1, "Archer").main_hand(bow()).build();
        let target = CreatureBuilder::named(2, "Target").at(3, 3).build();
        assert!(CombatEvent::prepare(&archer, &target).is_none());
        assert!(CombatEvent::prepare(&target, &archer).is_none());
    }

    #[test]
    fn back_attack_needs_both_now_and_turn_start() {
        let attacker = CreatureBuilder::named(1, "Rogue").at(5, 6).build();
        let mut victim = CreatureBuilder::named(2, "Mark")
            .at(5, 5)
            .facing(Facing::North)
            .build();

        // Behind now, but not recorded at the victim's turn start.
        let event = CombatEvent::prepare(&attacker, &victim).unwrap();
        assert!(!event.is_back_attack);

        victim.note_behind_at_turn_start([CreatureId(1)]);
        let event = CombatEvent::prepare(&attacker, &victim).unwrap();
        assert!(event.is_back_attack);
    }

    #[test]
    fn retarget_recomputes_geometry() {
        let archer = CreatureBuilder::named(1, "Archer")
            .at(0, 0)
            .main_hand(bow())
            .build();
        let far = CreatureBuilder::named(2, "Far").at(6, 0).build();
        let near = CreatureBuilder::named(3, "Near").at(5, 0).build();

        let mut event = CombatEvent::prepare(&archer, &far).unwrap();
        event.retarget(&archer, &near);
        assert_eq!(event.target, CreatureId(3));
        assert_eq!(event.distance, 5);
    }
}
