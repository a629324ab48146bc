//! Combat resolution pipeline orchestration.
//!
//! Phases run in strict order: Validating -> WeaponSelection -> ToHit
//! (-> RangedRedirect) -> Triggers(Hit|Miss) -> Pushback -> Block ->
//! Damage -> SideEffects. Rule failures resolve to an unsuccessful
//! [`CombatResult`]; only wiring bugs (missing oracles, unknown creature
//! ids) surface as [`CombatError`].

use crate::config::GameConfig;
use crate::dice::{AttributeRoll, attribute_roll};
use crate::env::{
    CombatBlocked, DiceOracle, GameEnv, LightLevel, MapOracle, MessageCategory, MessageSink,
    OracleError,
};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{
    AttackKind, CreatureId, CreatureState, DamageOutcome, EquipSlot, Item, Roster,
    StatusEffectKind,
};
use crate::triggers::{CombatEventKind, TriggerEffect, dispatch};

use super::block::resolve_block;
use super::damage::{build_pool, effective_armor, roll_wounds};
use super::event::{CombatEvent, RedirectOutcome};
use super::pushback::{PushOutcome, resolve_pushback};
use super::to_hit::{
    MeleeContest, decide_melee, decide_ranged, elevation_bonus, ranged_attack_modifier,
};

/// Outcome of one full combat resolution.
///
/// `success` is true for every fully validated resolution, including
/// misses; false only when validation refused the attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatResult {
    pub success: bool,
    pub damage: u32,
    pub target_defeated: bool,
}

impl CombatResult {
    fn refused() -> Self {
        Self {
            success: false,
            damage: 0,
            target_defeated: false,
        }
    }

    fn resolved(damage: u32, target_defeated: bool) -> Self {
        Self {
            success: true,
            damage,
            target_defeated,
        }
    }
}

/// Wiring failures around a combat resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("unknown creature {0}")]
    UnknownCreature(CreatureId),
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }
}

/// Carries the to-hit phase result into the later phases.
struct ToHitPhase {
    hit: bool,
    attacker_roll: AttributeRoll,
    defender_fumbled: bool,
    /// Bonus damage accumulated from triggers along the way.
    bonus_damage: i32,
}

/// Resolves one attack from `attacker_id` against `target_id`.
///
/// Exactly one attacker action is consumed once validation passes,
/// regardless of hit, miss, or fumble; a refused validation consumes
/// nothing.
pub fn execute_combat(
    attacker_id: CreatureId,
    target_id: CreatureId,
    roster: &mut Roster,
    config: &GameConfig,
    env: &GameEnv<'_>,
) -> Result<CombatResult, CombatError> {
    let map = env.map()?;
    let validator = env.validator()?;
    let messages = env.messages()?;
    let dice = env.dice()?;

    // ===== Validating =====
    let verdict = {
        let attacker = creature(roster, attacker_id)?;
        let target = creature(roster, target_id)?;
        validate(attacker, target, roster, map, validator)
    };
    if let Err(reason) = verdict {
        let attacker = creature(roster, attacker_id)?;
        let target = creature(roster, target_id)?;
        messages.publish(
            MessageCategory::Combat,
            &format!("{} cannot attack {}: {}", attacker.name, target.name, reason),
        );
        return Ok(CombatResult::refused());
    }

    // ===== WeaponSelection =====
    let mut event = {
        let attacker = creature(roster, attacker_id)?;
        let target = creature(roster, target_id)?;
        match CombatEvent::prepare(attacker, target) {
            Some(event) => event,
            // Validation guarantees positions; a vanished one is a refusal.
            None => return Ok(CombatResult::refused()),
        }
    };

    // One action per resolution, spent up front.
    creature_mut(roster, attacker_id)?.use_action();
    {
        let attacker = creature(roster, attacker_id)?;
        let target = creature(roster, target_id)?;
        messages.publish(
            MessageCategory::Combat,
            &format!(
                "{} attacks {} with {}",
                attacker.name, target.name, event.weapon.name
            ),
        );
    }

    // ===== ToHit =====
    let mut phase = match event.attack.kind {
        AttackKind::Melee => melee_phase(&event, roster, config, map, dice, messages)?,
        AttackKind::Ranged => ranged_phase(&event, roster, config, map, dice, messages)?,
    };

    // ===== RangedRedirect =====
    if event.attack.kind == AttackKind::Ranged && !phase.hit && phase.attacker_roll.has_die(1) {
        if let RedirectOutcome::Redirected { .. } =
            redirect_miss(&mut event, roster, dice, messages)?
        {
            phase.hit = true;
        }
    }

    // ===== Triggers(Hit|Miss) =====
    {
        let trigger_event = if phase.hit {
            CombatEventKind::AttackHit
        } else {
            CombatEventKind::AttackMiss
        };
        let effect = {
            let attacker = creature(roster, attacker_id)?;
            dispatch(
                trigger_event,
                attacker,
                &event.weapon,
                event.attack.kind,
                &phase.attacker_roll,
                messages,
            )
        };
        apply_trigger_effect(
            effect,
            &mut phase.attacker_roll,
            Some(&mut phase.bonus_damage),
            roster,
            attacker_id,
        );
    }

    // A double critical floors the target unless it out-sizes the attacker.
    if phase.hit && phase.attacker_roll.critical_success {
        let attacker_size = creature(roster, attacker_id)?.size;
        let target = creature_mut(roster, event.target)?;
        if target.size <= attacker_size {
            target.add_status_effect(StatusEffectKind::KnockedDown, 1);
            let name = target.name.clone();
            messages.publish(
                MessageCategory::Combat,
                &format!("{name} is knocked to the ground"),
            );
        }
    }

    if !phase.hit {
        let target = creature(roster, event.target)?;
        messages.publish(
            MessageCategory::Combat,
            &format!("the attack misses {}", target.name),
        );
        return Ok(CombatResult::resolved(0, false));
    }

    // ===== Pushback ===== (melee only)
    let mut push_bonus = 0;
    if event.attack.kind == AttackKind::Melee {
        match resolve_pushback(attacker_id, event.target, roster, map, dice) {
            PushOutcome::Pushed { to } => {
                let target = creature(roster, event.target)?;
                messages.publish(
                    MessageCategory::Combat,
                    &format!("{} is shoved back to {}", target.name, to),
                );
            }
            PushOutcome::CrushedAgainstTerrain => {
                push_bonus = 1;
                let target = creature(roster, event.target)?;
                messages.publish(
                    MessageCategory::Combat,
                    &format!("{} is slammed against the terrain", target.name),
                );
            }
            PushOutcome::NotPushed => {}
        }
    }

    // ===== Block =====
    let attacker_size = creature(roster, attacker_id)?.size;
    let attacker_strength = creature(roster, attacker_id)?.attributes.strength;
    let block = {
        let is_back_attack = event.is_back_attack;
        let target = creature_mut(roster, event.target)?;
        resolve_block(
            &phase.attacker_roll,
            &event.attack,
            attacker_size,
            target,
            is_back_attack,
            phase.defender_fumbled,
            dice,
        )
    };
    if block.shield_broke {
        let target = creature(roster, event.target)?;
        messages.publish(
            MessageCategory::Combat,
            &format!("{}'s shield breaks", target.name),
        );
    }
    if block.blocked {
        {
            let target = creature(roster, event.target)?;
            messages.publish(
                MessageCategory::Combat,
                &format!("{} blocks the blow", target.name),
            );
        }
        let (damage, defeated) = if block.chip_damage > 0 {
            apply_damage(event.target, block.chip_damage, roster, dice, messages)?
        } else {
            (0, false)
        };
        return Ok(CombatResult::resolved(damage, defeated));
    }

    // ===== Damage =====
    let pool = build_pool(
        &event.attack,
        &phase.attacker_roll,
        attacker_strength,
        push_bonus + phase.bonus_damage,
    );
    let base_armor = {
        let target = creature(roster, event.target)?;
        target.loadout().effective_armor(target.natural_armor)
    };
    let threshold = effective_armor(base_armor, event.attack.armor_mod, pool.armor_shift);
    let (wounds, faces) = roll_wounds(pool.dice, threshold, dice);
    messages.publish(
        MessageCategory::Combat,
        &format!("damage dice {faces:?} against armor {threshold}: {wounds} wound(s)"),
    );

    let (damage, defeated) = apply_damage(event.target, wounds, roster, dice, messages)?;
    Ok(CombatResult::resolved(damage, defeated))
}

// ============================================================================
// Phase helpers
// ============================================================================

fn validate(
    attacker: &CreatureState,
    target: &CreatureState,
    roster: &Roster,
    map: &dyn MapOracle,
    validator: &dyn crate::env::CombatValidator,
) -> Result<(), CombatBlocked> {
    if attacker.position.is_none() {
        return Err(CombatBlocked::AttackerOffMap);
    }
    if target.position.is_none() {
        return Err(CombatBlocked::TargetOffMap);
    }
    if attacker.resources.actions == 0 {
        return Err(CombatBlocked::NoActionRemaining);
    }
    if target.is_dead() {
        return Err(CombatBlocked::TargetDead);
    }
    validator.validate(attacker, target, roster, map)
}

fn melee_phase(
    event: &CombatEvent,
    roster: &mut Roster,
    config: &GameConfig,
    map: &dyn MapOracle,
    dice: &dyn DiceOracle,
    messages: &dyn MessageSink,
) -> Result<ToHitPhase, CombatError> {
    let mut bonus_damage = 0;

    // Attacker's raw roll, exposed to triggers before bonuses are added.
    let mut attacker_roll = attribute_roll(dice, 0, config.fumble_threshold);
    let effect = {
        let attacker = creature(roster, event.attacker)?;
        dispatch(
            CombatEventKind::HitRoll,
            attacker,
            &event.weapon,
            event.attack.kind,
            &attacker_roll,
            messages,
        )
    };
    apply_trigger_effect(
        effect,
        &mut attacker_roll,
        Some(&mut bonus_damage),
        roster,
        event.attacker,
    );

    // Defender's raw roll, likewise.
    let defender_weapon = creature(roster, event.target)?.loadout().main_weapon().clone();
    let mut defender_roll = attribute_roll(dice, 0, config.fumble_threshold);
    let effect = {
        let target = creature(roster, event.target)?;
        dispatch(
            CombatEventKind::DefendRoll,
            target,
            &defender_weapon,
            AttackKind::Melee,
            &defender_roll,
            messages,
        )
    };
    apply_trigger_effect(effect, &mut defender_roll, None, roster, event.target);

    let hit = {
        let attacker = creature(roster, event.attacker)?;
        let target = creature(roster, event.target)?;
        let back_bonus = if event.is_back_attack {
            config.back_attack_bonus
        } else {
            0
        };
        let contest = MeleeContest {
            attacker_total: attacker_roll.total
                + event.attack.to_hit
                + attacker.attributes.combat
                + back_bonus
                + elevation_bonus(map, attacker.position, target.position),
            defender_total: defender_roll.total
                + defender_weapon.melee_to_hit()
                + target.attributes.combat
                + elevation_bonus(map, target.position, attacker.position),
            attacker_agility: attacker.attributes.agility,
            defender_agility: target.attributes.agility,
            attacker_has_shield: attacker.loadout().has_shield(false),
            defender_has_shield: target.loadout().has_shield(event.is_back_attack),
        };
        decide_melee(contest, &attacker_roll, &defender_roll)
    };

    if attacker_roll.fumble {
        fumble_break(event.attacker, roster, messages)?;
    }
    if defender_roll.fumble {
        fumble_break(event.target, roster, messages)?;
    }

    Ok(ToHitPhase {
        hit,
        attacker_roll,
        defender_fumbled: defender_roll.fumble,
        bonus_damage,
    })
}

fn ranged_phase(
    event: &CombatEvent,
    roster: &mut Roster,
    config: &GameConfig,
    map: &dyn MapOracle,
    dice: &dyn DiceOracle,
    messages: &dyn MessageSink,
) -> Result<ToHitPhase, CombatError> {
    let mut bonus_damage = 0;

    let (modifier, ranged_attribute) = {
        let attacker = creature(roster, event.attacker)?;
        let target = creature(roster, event.target)?;

        let in_darkness = match (target.position, attacker.position) {
            (Some(target_pos), Some(attacker_pos)) => {
                map.light_level(target_pos, attacker_pos) < LightLevel::Lit
            }
            _ => false,
        };
        let darkness_penalty = if in_darkness {
            config.darkness_penalty
        } else {
            0
        };
        let back_bonus = if event.is_back_attack {
            config.back_attack_bonus
        } else {
            0
        };
        (
            ranged_attack_modifier(
                event.attack.to_hit,
                back_bonus,
                event.distance,
                attacker.attributes.agility,
                target.attributes.agility,
                attacker.resources.movement_used(),
                attacker.resources.max_movement,
                darkness_penalty,
            ),
            attacker.attributes.ranged,
        )
    };

    let mut roll = attribute_roll(dice, ranged_attribute + modifier, config.fumble_threshold);

    // Beyond half the weapon's range a shot can never critical. Cleared
    // before anything (triggers included) reads the flags, so every
    // consumer sees the same roll.
    if event.distance > event.weapon.normal_range() / 2 {
        roll.clear_criticals();
    }

    let effect = {
        let attacker = creature(roster, event.attacker)?;
        dispatch(
            CombatEventKind::HitRoll,
            attacker,
            &event.weapon,
            event.attack.kind,
            &roll,
            messages,
        )
    };
    apply_trigger_effect(
        effect,
        &mut roll,
        Some(&mut bonus_damage),
        roster,
        event.attacker,
    );

    let hit = decide_ranged(&roll, config.attribute_test_target);

    if roll.fumble {
        fumble_break(event.attacker, roster, messages)?;
    }

    Ok(ToHitPhase {
        hit,
        attacker_roll: roll,
        defender_fumbled: false,
        bonus_damage,
    })
}

/// An overshoot with a natural 1 in it hits a random adjacent enemy of the
/// target at least the target's size, if one exists.
fn redirect_miss(
    event: &mut CombatEvent,
    roster: &mut Roster,
    dice: &dyn DiceOracle,
    messages: &dyn MessageSink,
) -> Result<RedirectOutcome, CombatError> {
    let target_size = creature(roster, event.target)?.size;
    let candidates: Vec<CreatureId> = roster
        .adjacent_enemies_of(event.target)
        .into_iter()
        .filter(|&id| {
            roster
                .creature(id)
                .is_some_and(|creature| creature.size >= target_size)
        })
        .collect();

    if candidates.is_empty() {
        return Ok(RedirectOutcome::Stayed);
    }

    let index = if candidates.len() == 1 {
        0
    } else {
        dice.pick(candidates.len())
    };
    let new_target = candidates[index];

    {
        let old_target = creature(roster, event.target)?;
        let struck = creature(roster, new_target)?;
        messages.publish(
            MessageCategory::Combat,
            &format!(
                "the shot flies past {} and strikes {}",
                old_target.name, struck.name
            ),
        );
    }

    let attacker = creature(roster, event.attacker)?.clone();
    let struck = creature(roster, new_target)?;
    event.retarget(&attacker, struck);

    Ok(RedirectOutcome::Redirected { new_target })
}

/// Routes a fired trigger effect to its destination: roll adjustment,
/// damage pool, or the owner's vitality. `bonus_damage` is None for rolls
/// whose owner is not the attacker (defense rolls add nothing to the
/// attacker's pool).
fn apply_trigger_effect(
    effect: Option<TriggerEffect>,
    roll: &mut AttributeRoll,
    bonus_damage: Option<&mut i32>,
    roster: &mut Roster,
    owner: CreatureId,
) {
    match effect {
        None => {}
        Some(TriggerEffect::RollBonus(bonus)) => roll.total += bonus,
        Some(TriggerEffect::BonusDamage(bonus)) => {
            if let Some(accumulator) = bonus_damage {
                *accumulator += bonus;
            }
        }
        Some(TriggerEffect::RestoreVitality(amount)) => {
            if let Some(creature) = roster.creature_mut(owner) {
                creature.resources.restore_vitality(amount);
            }
        }
    }
}

/// Weapon-break handling for a fumble: the acting weapon breaks (if it
/// can), heroes drop it to the ground, and the fumbling creature's turn
/// ends on the spot.
fn fumble_break(
    id: CreatureId,
    roster: &mut Roster,
    messages: &dyn MessageSink,
) -> Result<(), CombatError> {
    let slot = {
        let creature = creature(roster, id)?;
        let usable = |item: &Option<Item>| {
            item.as_ref()
                .and_then(Item::as_weapon)
                .is_some_and(|weapon| !weapon.broken && weapon.breakable)
        };
        if usable(&creature.equipment.main_hand) {
            Some(EquipSlot::MainHand)
        } else if usable(&creature.equipment.off_hand) {
            Some(EquipSlot::OffHand)
        } else {
            None
        }
    };

    let mut dropped = None;
    {
        let creature = creature_mut(roster, id)?;
        let name = creature.name.clone();
        if let Some(slot) = slot {
            let is_hero = creature.is_hero;
            let position = creature.position;
            let weapon = match slot {
                EquipSlot::MainHand => creature.equipment.main_hand.as_mut(),
                EquipSlot::OffHand => creature.equipment.off_hand.as_mut(),
                EquipSlot::Armor => None,
            }
            .and_then(Item::as_weapon_mut);

            if let Some(weapon) = weapon {
                weapon.broken = true;
                let weapon_name = weapon.name.clone();
                messages.publish(
                    MessageCategory::Combat,
                    &format!("{name}'s {weapon_name} breaks"),
                );
                if is_hero {
                    if let (Some(position), Some(item)) =
                        (position, creature.equipment.unequip(slot))
                    {
                        dropped = Some((position, item));
                    }
                }
            }
        }
        creature.resources.end_turn();
        messages.publish(
            MessageCategory::Combat,
            &format!("{name} fumbles and loses the rest of the turn"),
        );
    }

    if let Some((position, item)) = dropped {
        let label = item.label().to_string();
        roster.drop_item(position, item);
        messages.publish(
            MessageCategory::Combat,
            &format!("the {label} falls to the ground"),
        );
    }

    Ok(())
}

/// Applies wounds through the fortune-save gate and narrates the outcome.
/// Returns the damage actually suffered and whether the target fell.
fn apply_damage(
    target_id: CreatureId,
    wounds: u32,
    roster: &mut Roster,
    dice: &dyn DiceOracle,
    messages: &dyn MessageSink,
) -> Result<(u32, bool), CombatError> {
    let target = creature_mut(roster, target_id)?;
    let name = target.name.clone();
    let outcome = target.take_damage(wounds, dice);
    match outcome {
        DamageOutcome::Wounded => {
            messages.publish(
                MessageCategory::Combat,
                &format!("{name} suffers {wounds} wound(s)"),
            );
            Ok((wounds, false))
        }
        DamageOutcome::FortuneSaved { points_spent } => {
            messages.publish(
                MessageCategory::Combat,
                &format!("fortune spares {name} ({points_spent} point(s) spent)"),
            );
            Ok((0, false))
        }
        DamageOutcome::Slain => {
            messages.publish(MessageCategory::Combat, &format!("{name} is slain"));
            Ok((wounds, true))
        }
    }
}

fn creature<'r>(roster: &'r Roster, id: CreatureId) -> Result<&'r CreatureState, CombatError> {
    roster.creature(id).ok_or(CombatError::UnknownCreature(id))
}

fn creature_mut<'r>(
    roster: &'r mut Roster,
    id: CreatureId,
) -> Result<&'r mut CreatureState, CombatError> {
    roster
        .creature_mut(id)
        .ok_or(CombatError::UnknownCreature(id))
}
