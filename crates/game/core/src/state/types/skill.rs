use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::triggers::CombatTrigger;

/// An active skill a creature has learned.
///
/// Skills participate in combat exclusively through their registered
/// triggers; passive stat math lives on the creature's attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub name: String,
    pub triggers: ArrayVec<CombatTrigger, { GameConfig::MAX_TRIGGERS_PER_SOURCE }>,
}

impl Skill {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triggers: ArrayVec::new(),
        }
    }

    pub fn with_trigger(mut self, trigger: CombatTrigger) -> Self {
        if !self.triggers.is_full() {
            self.triggers.push(trigger);
        }
        self
    }
}
