//! Combat validation capability.
//!
//! Range, line-of-sight, and friend/foe policy live outside the core; the
//! pipeline consults this oracle before any die is rolled. The pipeline's
//! own structural checks (positions, action budget, dead target) reuse the
//! same reason type so every abort is narrated uniformly.

use crate::env::MapOracle;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{CreatureState, Roster};

/// Reason a combat resolution was refused before rolling.
///
/// These are game conditions, not exceptions: the pipeline returns a failed
/// [`crate::combat::CombatResult`] and logs the reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatBlocked {
    #[error("attacker is not on the map")]
    AttackerOffMap,

    #[error("target is not on the map")]
    TargetOffMap,

    #[error("attacker has no action remaining")]
    NoActionRemaining,

    #[error("target is already dead")]
    TargetDead,

    #[error("target is out of range")]
    OutOfRange,

    #[error("no line of sight to target")]
    NoLineOfSight,

    #[error("target is not hostile")]
    FriendlyTarget,
}

impl GameError for CombatBlocked {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoActionRemaining => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }
}

/// External authority approving an attack before resolution starts.
pub trait CombatValidator: Send + Sync {
    fn validate(
        &self,
        attacker: &CreatureState,
        target: &CreatureState,
        roster: &Roster,
        map: &dyn MapOracle,
    ) -> Result<(), CombatBlocked>;
}

/// Validator that checks hostility and weapon reach only, with no
/// line-of-sight model. Suitable for tests and open-room scenarios.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenFieldValidator;

impl CombatValidator for OpenFieldValidator {
    fn validate(
        &self,
        attacker: &CreatureState,
        target: &CreatureState,
        _roster: &Roster,
        _map: &dyn MapOracle,
    ) -> Result<(), CombatBlocked> {
        if !attacker.is_hostile_to(target) {
            return Err(CombatBlocked::FriendlyTarget);
        }

        let distance = match attacker.distance_to(target) {
            Some(distance) => distance,
            None => return Err(CombatBlocked::TargetOffMap),
        };
        let reach = attacker
            .loadout()
            .attack_range(crate::state::RangeBand::Long);
        if distance > reach {
            return Err(CombatBlocked::OutOfRange);
        }

        Ok(())
    }
}

/// Validator that approves everything; combat scenarios that script their
/// own setups use it to keep validation out of the way.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproveAll;

impl CombatValidator for ApproveAll {
    fn validate(
        &self,
        _attacker: &CreatureState,
        _target: &CreatureState,
        _roster: &Roster,
        _map: &dyn MapOracle,
    ) -> Result<(), CombatBlocked> {
        Ok(())
    }
}
