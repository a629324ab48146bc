//! Combat trigger dispatch.
//!
//! Skills and weapons may register triggers that intercept combat events and
//! apply a bonus effect. Dispatch consults an explicit ordered list of
//! trigger sources (the acting creature's skills, then the acting weapon)
//! and stops at the first trigger that fires: at most one trigger fires per
//! dispatch call.
//!
//! A fumbled roll suppresses skill sources entirely; weapon sources still
//! run. The asymmetry is deliberate rule behavior.

use bitflags::bitflags;

use crate::dice::AttributeRoll;
use crate::env::{MessageCategory, MessageSink};
use crate::state::{AttackKind, CreatureState, WeaponData};

bitflags! {
    /// Event subscription set for a trigger.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TriggerEvents: u8 {
        const HIT_ROLL    = 1 << 0;
        const DEFEND_ROLL = 1 << 1;
        const ATTACK_HIT  = 1 << 2;
        const ATTACK_MISS = 1 << 3;
    }
}

/// Combat events a trigger can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CombatEventKind {
    /// Attacker's raw to-hit roll, before bonuses are added.
    HitRoll,
    /// Defender's raw defense roll, before bonuses are added.
    DefendRoll,
    /// The attack was resolved as a hit.
    AttackHit,
    /// The attack was resolved as a miss.
    AttackMiss,
}

impl CombatEventKind {
    pub fn as_flag(self) -> TriggerEvents {
        match self {
            Self::HitRoll => TriggerEvents::HIT_ROLL,
            Self::DefendRoll => TriggerEvents::DEFEND_ROLL,
            Self::AttackHit => TriggerEvents::ATTACK_HIT,
            Self::AttackMiss => TriggerEvents::ATTACK_MISS,
        }
    }
}

/// Predicate a trigger may declare against the current roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RollCondition {
    /// Fires only when the roll total (with modifier) reaches the value.
    TotalAtLeast(i32),
    /// Fires only when some die shows at least the face.
    AnyDieAtLeast(u8),
    /// Fires only on a critical roll.
    CriticalHit,
}

impl RollCondition {
    pub fn passes(&self, roll: &AttributeRoll) -> bool {
        match *self {
            Self::TotalAtLeast(total) => roll.total >= total,
            Self::AnyDieAtLeast(face) => roll.dice.iter().any(|&die| die >= face),
            Self::CriticalHit => roll.critical_hit,
        }
    }
}

/// Bonus applied by a firing trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerEffect {
    /// Adjusts the roll the trigger fired on.
    RollBonus(i32),
    /// Adds to the damage pool of the current resolution.
    BonusDamage(i32),
    /// Heals the trigger's owner.
    RestoreVitality(u32),
}

/// A registered combat trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatTrigger {
    /// Shown in narration when the trigger fires.
    pub name: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub events: TriggerEvents,
    /// When set, the trigger only applies to attacks of this kind.
    pub attack_filter: Option<AttackKind>,
    /// When set, the current roll must pass for the trigger to fire.
    pub condition: Option<RollCondition>,
    pub effect: TriggerEffect,
}

impl CombatTrigger {
    pub fn new(name: impl Into<String>, events: TriggerEvents, effect: TriggerEffect) -> Self {
        Self {
            name: name.into(),
            events,
            attack_filter: None,
            condition: None,
            effect,
        }
    }

    pub fn with_attack_filter(mut self, kind: AttackKind) -> Self {
        self.attack_filter = Some(kind);
        self
    }

    pub fn with_condition(mut self, condition: RollCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    fn matches(&self, event: CombatEventKind, attack_kind: AttackKind, roll: &AttributeRoll) -> bool {
        if !self.events.contains(event.as_flag()) {
            return false;
        }
        if self.attack_filter.is_some_and(|kind| kind != attack_kind) {
            return false;
        }
        if let Some(condition) = &self.condition {
            if !condition.passes(roll) {
                return false;
            }
        }
        true
    }
}

enum SourceKind {
    Skill,
    Weapon,
}

/// Dispatch `event` over the acting creature's trigger sources.
///
/// Sources are consulted in order: each of the creature's skills, then the
/// acting weapon. The first matching trigger fires, is narrated, and ends
/// dispatch. Returns the fired effect, if any.
pub fn dispatch(
    event: CombatEventKind,
    actor: &CreatureState,
    weapon: &WeaponData,
    attack_kind: AttackKind,
    roll: &AttributeRoll,
    messages: &dyn MessageSink,
) -> Option<TriggerEffect> {
    let skill_sources = actor
        .skills
        .iter()
        .map(|skill| (SourceKind::Skill, skill.name.as_str(), &skill.triggers));
    let weapon_source = std::iter::once((SourceKind::Weapon, weapon.name.as_str(), &weapon.triggers));

    for (kind, label, triggers) in skill_sources.chain(weapon_source) {
        // A fumble shuts down skill triggers; weapon triggers still run.
        if roll.fumble && matches!(kind, SourceKind::Skill) {
            continue;
        }

        if let Some(trigger) = triggers
            .iter()
            .find(|trigger| trigger.matches(event, attack_kind, roll))
        {
            messages.publish(
                MessageCategory::Combat,
                &format!("{} unleashes {} ({})", actor.name, trigger.name, label),
            );
            return Some(trigger.effect);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MemorySink;
    use crate::state::{Attack, CreatureBuilder, Skill};

    fn roll(dice: [u8; 2], modifier: i32) -> AttributeRoll {
        AttributeRoll {
            total: i32::from(dice[0]) + i32::from(dice[1]) + modifier,
            dice,
            modifier,
            fumble: dice[0] == dice[1] && dice[0] == 1,
            critical_hit: dice.contains(&6),
            critical_success: dice == [6, 6],
        }
    }

    fn skill_with(name: &str, events: TriggerEvents, effect: TriggerEffect) -> Skill {
        let mut skill = Skill::new(name);
        skill
            .triggers
            .push(CombatTrigger::new(name, events, effect));
        skill
    }

    fn bare_weapon() -> WeaponData {
        WeaponData::new("club", [Attack::melee(0, 1)])
    }

    #[test]
    fn first_matching_skill_wins_and_dispatch_stops() {
        let first = skill_with(
            "Flurry",
            TriggerEvents::HIT_ROLL,
            TriggerEffect::RollBonus(1),
        );
        let second = skill_with(
            "Rage",
            TriggerEvents::HIT_ROLL,
            TriggerEffect::RollBonus(5),
        );
        let creature = CreatureBuilder::named(1, "Asha")
            .skill(first)
            .skill(second)
            .build();

        let sink = MemorySink::new();
        let effect = dispatch(
            CombatEventKind::HitRoll,
            &creature,
            &bare_weapon(),
            AttackKind::Melee,
            &roll([3, 4], 0),
            &sink,
        );

        assert_eq!(effect, Some(TriggerEffect::RollBonus(1)));
        assert!(sink.contains("Flurry"));
        assert!(!sink.contains("Rage"));
    }

    #[test]
    fn event_and_attack_filters_are_respected() {
        let mut skill = Skill::new("Sniper");
        skill.triggers.push(
            CombatTrigger::new(
                "Sniper",
                TriggerEvents::ATTACK_HIT,
                TriggerEffect::BonusDamage(2),
            )
            .with_attack_filter(AttackKind::Ranged),
        );
        let creature = CreatureBuilder::named(1, "Asha").skill(skill).build();
        let sink = MemorySink::new();

        // Wrong event: nothing fires.
        assert_eq!(
            dispatch(
                CombatEventKind::HitRoll,
                &creature,
                &bare_weapon(),
                AttackKind::Ranged,
                &roll([3, 4], 0),
                &sink,
            ),
            None
        );

        // Wrong attack kind: nothing fires.
        assert_eq!(
            dispatch(
                CombatEventKind::AttackHit,
                &creature,
                &bare_weapon(),
                AttackKind::Melee,
                &roll([3, 4], 0),
                &sink,
            ),
            None
        );

        // Matching event and kind: fires.
        assert_eq!(
            dispatch(
                CombatEventKind::AttackHit,
                &creature,
                &bare_weapon(),
                AttackKind::Ranged,
                &roll([3, 4], 0),
                &sink,
            ),
            Some(TriggerEffect::BonusDamage(2))
        );
    }

    #[test]
    fn roll_condition_gates_firing() {
        let mut skill = Skill::new("Overwhelm");
        skill.triggers.push(
            CombatTrigger::new(
                "Overwhelm",
                TriggerEvents::HIT_ROLL,
                TriggerEffect::RollBonus(2),
            )
            .with_condition(RollCondition::TotalAtLeast(10)),
        );
        let creature = CreatureBuilder::named(1, "Asha").skill(skill).build();
        let sink = MemorySink::new();

        assert_eq!(
            dispatch(
                CombatEventKind::HitRoll,
                &creature,
                &bare_weapon(),
                AttackKind::Melee,
                &roll([3, 4], 0),
                &sink,
            ),
            None
        );
        assert_eq!(
            dispatch(
                CombatEventKind::HitRoll,
                &creature,
                &bare_weapon(),
                AttackKind::Melee,
                &roll([6, 4], 0),
                &sink,
            ),
            Some(TriggerEffect::RollBonus(2))
        );
    }

    #[test]
    fn fumble_suppresses_skills_but_not_weapon_triggers() {
        let skill = skill_with(
            "Flurry",
            TriggerEvents::HIT_ROLL,
            TriggerEffect::RollBonus(1),
        );
        let mut weapon = bare_weapon();
        weapon.triggers.push(CombatTrigger::new(
            "Cursed Edge",
            TriggerEvents::HIT_ROLL,
            TriggerEffect::BonusDamage(1),
        ));
        let creature = CreatureBuilder::named(1, "Asha").skill(skill).build();
        let sink = MemorySink::new();

        let effect = dispatch(
            CombatEventKind::HitRoll,
            &creature,
            &weapon,
            AttackKind::Melee,
            &roll([1, 1], 0),
            &sink,
        );

        // The skill would have fired first, but the fumble silences it and
        // the weapon trigger takes over.
        assert_eq!(effect, Some(TriggerEffect::BonusDamage(1)));
        assert!(sink.contains("Cursed Edge"));
        assert!(!sink.contains("Flurry"));
    }
}
