//! Status effects on a creature, with round-based expiry.

use arrayvec::ArrayVec;

use crate::config::GameConfig;

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatusEffectKind {
    /// Floored by a double-critical hit; must stand up before acting freely.
    KnockedDown,
    /// Cannot act at all.
    Stunned,
    /// Vitality loss over time.
    Poisoned,
}

/// A single status effect counting down in the affected creature's turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    pub remaining_rounds: u8,
}

/// Active status effects on a creature.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { GameConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|effect| effect.kind == kind)
    }

    /// Adds an effect for `rounds` turns. A repeated application extends the
    /// effect to the longer remaining duration.
    pub fn add(&mut self, kind: StatusEffectKind, rounds: u8) {
        if let Some(existing) = self.effects.iter_mut().find(|effect| effect.kind == kind) {
            existing.remaining_rounds = existing.remaining_rounds.max(rounds);
            return;
        }
        if !self.effects.is_full() {
            self.effects.push(StatusEffect {
                kind,
                remaining_rounds: rounds,
            });
        }
    }

    pub fn remove(&mut self, kind: StatusEffectKind) {
        self.effects.retain(|effect| effect.kind != kind);
    }

    /// Counts down one round on every effect and drops the expired ones.
    /// Called when the affected creature's turn begins.
    pub fn tick(&mut self) {
        for effect in self.effects.iter_mut() {
            effect.remaining_rounds = effect.remaining_rounds.saturating_sub(1);
        }
        self.effects.retain(|effect| effect.remaining_rounds > 0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
