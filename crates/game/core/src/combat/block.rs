//! Shield block resolution and shield-break side effects.

use crate::dice::AttributeRoll;
use crate::env::DiceOracle;
use crate::state::{Attack, AttackFlags, CreatureState};

/// How the block phase resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockOutcome {
    /// The shield was engaged at all (present, usable, not bypassed by a
    /// defender fumble or back attack).
    pub engaged: bool,
    pub blocked: bool,
    pub shield_broke: bool,
    /// Direct, unblockable damage from catching a hit on a shattered
    /// shield.
    pub chip_damage: u32,
}

/// Resolve the block phase for a hit that reached the defender.
///
/// Skipped entirely when the defender fumbled. Double-critical attacks are
/// unblockable but still batter the shield, so break side effects are
/// evaluated whenever the shield is engaged. A successful block on a
/// shield that was already broken, or breaks now, lets one point of chip
/// damage through.
pub fn resolve_block(
    attacker_roll: &AttributeRoll,
    attack: &Attack,
    attacker_size: u8,
    defender: &mut CreatureState,
    is_back_attack: bool,
    defender_fumbled: bool,
    dice: &dyn DiceOracle,
) -> BlockOutcome {
    let mut outcome = BlockOutcome::default();

    if defender_fumbled {
        return outcome;
    }
    if !defender.loadout().has_shield(is_back_attack) {
        return outcome;
    }
    outcome.engaged = true;

    let defender_size = defender.size;
    let block_value = defender.loadout().shield_block_value(is_back_attack);

    if !attacker_roll.critical_success {
        // A critical raises the bar for the blocker by one.
        let required = block_value.saturating_add(u8::from(attacker_roll.critical_hit));
        outcome.blocked = dice.roll_d6() >= required;
    }

    let Some(shield) = defender.equipment.shield_mut() else {
        return outcome;
    };
    let was_broken = shield.broken;

    // Break determination, strongest cause first.
    let (mut breaks, automatic) =
        if attack.flags.contains(AttackFlags::BREAKS_SHIELDS_ON_CRITICAL)
            && attacker_roll.critical_hit
        {
            (true, true)
        } else if attacker_size > 2 && attacker_size > defender_size {
            (
                true,
                attacker_size > 3 || attack.flags.contains(AttackFlags::SHIELD_BREAKING),
            )
        } else if attack.flags.contains(AttackFlags::SHIELD_BREAKING) {
            (true, false)
        } else {
            (false, false)
        };

    if breaks && (!shield.breakable || was_broken) {
        breaks = false;
    }
    if breaks && !automatic {
        breaks = dice.roll_d6() >= shield.break_threshold;
    }
    if breaks {
        shield.broken = true;
        outcome.shield_broke = true;
    }

    if outcome.blocked && (was_broken || outcome.shield_broke) {
        outcome.chip_damage = 1;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedDice;
    use crate::state::{CreatureBuilder, Item, ShieldData};

    fn defender_with_shield(block: u8) -> CreatureState {
        CreatureBuilder::named(2, "Defender")
            .at(5, 5)
            .off_hand(Item::Shield(ShieldData::new(block)))
            .build()
    }

    fn plain_roll() -> AttributeRoll {
        AttributeRoll {
            total: 7,
            dice: [3, 4],
            modifier: 0,
            fumble: false,
            critical_hit: false,
            critical_success: false,
        }
    }

    fn critical_roll(double: bool) -> AttributeRoll {
        AttributeRoll {
            total: if double { 12 } else { 10 },
            dice: if double { [6, 6] } else { [6, 4] },
            modifier: 0,
            fumble: false,
            critical_hit: true,
            critical_success: double,
        }
    }

    #[test]
    fn block_succeeds_at_or_above_block_value() {
        let mut defender = defender_with_shield(5);
        let attack = Attack::melee(0, 2);

        let dice = ScriptedDice::new([5]);
        let outcome = resolve_block(&plain_roll(), &attack, 2, &mut defender, false, false, &dice);
        assert!(outcome.engaged);
        assert!(outcome.blocked);
        assert_eq!(outcome.chip_damage, 0);

        let dice = ScriptedDice::new([4]);
        let outcome = resolve_block(&plain_roll(), &attack, 2, &mut defender, false, false, &dice);
        assert!(!outcome.blocked);
    }

    #[test]
    fn critical_hit_raises_the_required_block() {
        let mut defender = defender_with_shield(5);
        let attack = Attack::melee(0, 2);
        // A 5 would normally block, but the critical demands a 6.
        let dice = ScriptedDice::new([5]);
        let outcome = resolve_block(
            &critical_roll(false),
            &attack,
            2,
            &mut defender,
            false,
            false,
            &dice,
        );
        assert!(!outcome.blocked);
    }

    #[test]
    fn double_critical_is_unblockable() {
        let mut defender = defender_with_shield(2);
        let attack = Attack::melee(0, 2);
        // No block die is consumed at all.
        let dice = ScriptedDice::new([]);
        let outcome = resolve_block(
            &critical_roll(true),
            &attack,
            2,
            &mut defender,
            false,
            false,
            &dice,
        );
        assert!(outcome.engaged);
        assert!(!outcome.blocked);
    }

    #[test]
    fn back_attacks_and_fumbles_skip_the_shield() {
        let mut defender = defender_with_shield(2);
        let attack = Attack::melee(0, 2);
        let dice = ScriptedDice::new([]);

        let outcome = resolve_block(&plain_roll(), &attack, 2, &mut defender, true, false, &dice);
        assert!(!outcome.engaged);

        let outcome = resolve_block(&plain_roll(), &attack, 2, &mut defender, false, true, &dice);
        assert!(!outcome.engaged);
    }

    #[test]
    fn huge_attacker_breaks_shield_automatically() {
        let mut defender = defender_with_shield(5);
        let attack = Attack::melee(0, 2);
        // Block die 6 blocks; size 4 attacker breaks the shield outright,
        // so the blocked hit still chips for 1.
        let dice = ScriptedDice::new([6]);
        let outcome = resolve_block(&plain_roll(), &attack, 4, &mut defender, false, false, &dice);
        assert!(outcome.blocked);
        assert!(outcome.shield_broke);
        assert_eq!(outcome.chip_damage, 1);
        assert!(defender.equipment.shield().unwrap().broken);
    }

    #[test]
    fn big_attacker_break_rolls_the_shield_threshold() {
        let mut defender = defender_with_shield(5);
        let attack = Attack::melee(0, 2);
        // Size 3 vs size 2 without flags: break is not automatic.
        // Block die 6 blocks, break die 3 < threshold 5 keeps the shield.
        let dice = ScriptedDice::new([6, 3]);
        let outcome = resolve_block(&plain_roll(), &attack, 3, &mut defender, false, false, &dice);
        assert!(outcome.blocked);
        assert!(!outcome.shield_broke);
        assert_eq!(outcome.chip_damage, 0);
    }

    #[test]
    fn shield_breaking_flag_rolls_even_for_small_attackers() {
        let mut defender = defender_with_shield(5);
        let attack = Attack::melee(0, 2).with_flags(AttackFlags::SHIELD_BREAKING);
        // Block die 6, break die 5 meets threshold 5: shield breaks.
        let dice = ScriptedDice::new([6, 5]);
        let outcome = resolve_block(&plain_roll(), &attack, 2, &mut defender, false, false, &dice);
        assert!(outcome.blocked);
        assert!(outcome.shield_broke);
        assert_eq!(outcome.chip_damage, 1);
    }

    #[test]
    fn crit_breaker_flag_shatters_on_critical() {
        let mut defender = defender_with_shield(5);
        let attack = Attack::melee(0, 2).with_flags(AttackFlags::BREAKS_SHIELDS_ON_CRITICAL);
        // Block die 6 meets the raised bar; the break is automatic.
        let dice = ScriptedDice::new([6]);
        let outcome = resolve_block(
            &critical_roll(false),
            &attack,
            2,
            &mut defender,
            false,
            false,
            &dice,
        );
        assert!(outcome.blocked);
        assert!(outcome.shield_broke);
    }

    #[test]
    fn already_broken_shield_chips_on_block() {
        let mut defender = defender_with_shield(3);
        defender.equipment.shield_mut().unwrap().broken = true;
        let attack = Attack::melee(0, 2);
        let dice = ScriptedDice::new([4]);
        let outcome = resolve_block(&plain_roll(), &attack, 2, &mut defender, false, false, &dice);
        assert!(outcome.blocked);
        assert!(!outcome.shield_broke);
        assert_eq!(outcome.chip_damage, 1);
    }
}
