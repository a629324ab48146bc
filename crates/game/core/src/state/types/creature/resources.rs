//! Per-turn resource ledger for a creature.
//!
//! All spend operations return `bool` and never panic: exhaustion and death
//! are ordinary game conditions the caller checks, not errors.

use std::collections::BTreeSet;

use crate::config::GameConfig;
use crate::env::DiceOracle;
use crate::state::CreatureId;

/// Result of applying damage to a creature's vitality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageOutcome {
    /// Vitality was reduced but the creature still stands.
    Wounded,
    /// The damage would have been lethal; fortune negated it entirely.
    FortuneSaved { points_spent: u32 },
    /// Vitality dropped to zero.
    Slain,
}

impl DamageOutcome {
    pub fn is_lethal(&self) -> bool {
        matches!(self, Self::Slain)
    }
}

/// Mutable per-creature resource ledger.
///
/// Created once with the creature at its maximum values. `start_turn`
/// refills the per-turn pools (unless the creature is dead) and clears the
/// per-turn push bookkeeping; `end_turn` zeroes the per-turn pools.
/// A dead creature (`vitality == 0`) fails every spend operation until an
/// external revive (out of scope here) restores vitality.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnResources {
    pub movement: u32,
    pub max_movement: u32,
    pub actions: u32,
    pub max_actions: u32,
    pub quick_actions: u32,
    pub max_quick_actions: u32,
    pub vitality: u32,
    pub max_vitality: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub fortune: u32,
    pub max_fortune: u32,
    /// Set when the creature left an engaged position this turn.
    pub moved_while_engaged: bool,
    /// Targets this creature has already pushed this turn.
    pushed_creatures: BTreeSet<CreatureId>,
}

impl TurnResources {
    /// Creates a ledger filled to the given maximums.
    pub fn new(movement: u32, vitality: u32, mana: u32, fortune: u32) -> Self {
        Self {
            movement,
            max_movement: movement,
            actions: 1,
            max_actions: 1,
            quick_actions: 1,
            max_quick_actions: 1,
            vitality,
            max_vitality: vitality,
            mana,
            max_mana: mana,
            fortune,
            max_fortune: fortune,
            moved_while_engaged: false,
            pushed_creatures: BTreeSet::new(),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.vitality == 0
    }

    /// Refills per-turn pools and clears push tracking. Dead creatures get
    /// nothing back.
    pub fn start_turn(&mut self) {
        self.pushed_creatures.clear();
        self.moved_while_engaged = false;
        if self.is_dead() {
            return;
        }
        self.movement = self.max_movement;
        self.actions = self.max_actions;
        self.quick_actions = self.max_quick_actions;
    }

    /// Zeroes the per-turn pools; vitality, mana, and fortune persist.
    pub fn end_turn(&mut self) {
        self.movement = 0;
        self.actions = 0;
        self.quick_actions = 0;
    }

    pub fn use_movement(&mut self, tiles: u32) -> bool {
        if self.is_dead() || self.movement < tiles {
            return false;
        }
        self.movement -= tiles;
        true
    }

    pub fn use_action(&mut self) -> bool {
        if self.is_dead() || self.actions == 0 {
            return false;
        }
        self.actions -= 1;
        true
    }

    pub fn use_quick_action(&mut self) -> bool {
        if self.is_dead() || self.quick_actions == 0 {
            return false;
        }
        self.quick_actions -= 1;
        true
    }

    pub fn spend_mana(&mut self, amount: u32) -> bool {
        if self.is_dead() || self.mana < amount {
            return false;
        }
        self.mana -= amount;
        true
    }

    /// Movement already spent this turn, for ranged shooting penalties.
    pub fn movement_used(&self) -> u32 {
        self.max_movement.saturating_sub(self.movement)
    }

    /// Heals up to `amount`, capped at maximum vitality. Dead creatures stay
    /// dead; revival is not a heal.
    pub fn restore_vitality(&mut self, amount: u32) {
        if self.is_dead() {
            return;
        }
        self.vitality = (self.vitality + amount).min(self.max_vitality);
    }

    /// Applies `wounds` to vitality.
    ///
    /// Lethal damage offers a last-chance fortune save: spend one fortune
    /// point and roll a d6; on `FORTUNE_SAVE_TARGET` or higher the damage is
    /// negated entirely, otherwise a second fortune point (if available) is
    /// spent to the same effect. The save is all-or-nothing: on success
    /// vitality keeps its pre-damage value.
    pub fn take_damage(&mut self, wounds: u32, dice: &dyn DiceOracle) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::Slain;
        }
        if wounds < self.vitality {
            self.vitality -= wounds;
            return DamageOutcome::Wounded;
        }

        // Lethal: fortune save.
        if self.fortune >= 1 {
            self.fortune -= 1;
            if dice.roll_d6() >= GameConfig::FORTUNE_SAVE_TARGET {
                return DamageOutcome::FortuneSaved { points_spent: 1 };
            }
            if self.fortune >= 1 {
                self.fortune -= 1;
                return DamageOutcome::FortuneSaved { points_spent: 2 };
            }
        }

        self.vitality = 0;
        DamageOutcome::Slain
    }

    /// Records that this creature pushed `target` this turn.
    pub fn record_pushed(&mut self, target: CreatureId) {
        self.pushed_creatures.insert(target);
    }

    /// True until this creature has pushed `target` this turn.
    pub fn can_push(&self, target: CreatureId) -> bool {
        !self.pushed_creatures.contains(&target)
    }
}
