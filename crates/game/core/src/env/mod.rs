//! Traits describing the capabilities the rules engine borrows from its
//! collaborators.
//!
//! Oracles expose map geometry, combat validation policy, the message sink,
//! and the dice source. The [`Env`] aggregate bundles them so the combat
//! pipeline can access everything it needs without hard coupling to
//! concrete implementations.
mod error;
mod map;
mod messages;
mod rng;
mod validator;

pub use error::OracleError;
pub use map::{LightLevel, MapDimensions, MapOracle, OpenRoom, StaticTile, TerrainKind};
pub use messages::{MemorySink, MessageCategory, MessageSink, NullSink};
pub use rng::{DiceOracle, PcgDice, ScriptedDice};
pub use validator::{ApproveAll, CombatBlocked, CombatValidator, OpenFieldValidator};

/// Aggregates the capability oracles required by the combat pipeline.
#[derive(Clone, Copy, Debug)]
pub struct Env<'a, M, V, S, D>
where
    M: MapOracle + ?Sized,
    V: CombatValidator + ?Sized,
    S: MessageSink + ?Sized,
    D: DiceOracle + ?Sized,
{
    map: Option<&'a M>,
    validator: Option<&'a V>,
    messages: Option<&'a S>,
    dice: Option<&'a D>,
}

pub type GameEnv<'a> = Env<
    'a,
    dyn MapOracle + 'a,
    dyn CombatValidator + 'a,
    dyn MessageSink + 'a,
    dyn DiceOracle + 'a,
>;

impl<'a, M, V, S, D> Env<'a, M, V, S, D>
where
    M: MapOracle + ?Sized,
    V: CombatValidator + ?Sized,
    S: MessageSink + ?Sized,
    D: DiceOracle + ?Sized,
{
    pub fn new(
        map: Option<&'a M>,
        validator: Option<&'a V>,
        messages: Option<&'a S>,
        dice: Option<&'a D>,
    ) -> Self {
        Self {
            map,
            validator,
            messages,
            dice,
        }
    }

    pub fn with_all(map: &'a M, validator: &'a V, messages: &'a S, dice: &'a D) -> Self {
        Self::new(Some(map), Some(validator), Some(messages), Some(dice))
    }

    pub fn empty() -> Self {
        Self {
            map: None,
            validator: None,
            messages: None,
            dice: None,
        }
    }

    /// Returns the MapOracle, or an error if not available.
    pub fn map(&self) -> Result<&'a M, OracleError> {
        self.map.ok_or(OracleError::MapNotAvailable)
    }

    /// Returns the CombatValidator, or an error if not available.
    pub fn validator(&self) -> Result<&'a V, OracleError> {
        self.validator.ok_or(OracleError::ValidatorNotAvailable)
    }

    /// Returns the MessageSink, or an error if not available.
    pub fn messages(&self) -> Result<&'a S, OracleError> {
        self.messages.ok_or(OracleError::MessagesNotAvailable)
    }

    /// Returns the DiceOracle, or an error if not available.
    pub fn dice(&self) -> Result<&'a D, OracleError> {
        self.dice.ok_or(OracleError::DiceNotAvailable)
    }
}

impl<'a, M, V, S, D> Env<'a, M, V, S, D>
where
    M: MapOracle + 'a,
    V: CombatValidator + 'a,
    S: MessageSink + 'a,
    D: DiceOracle + 'a,
{
    /// Converts this environment into a trait-object based `GameEnv`.
    pub fn as_game_env(&self) -> GameEnv<'a> {
        let map: Option<&'a dyn MapOracle> = self.map.map(|map| map as _);
        let validator: Option<&'a dyn CombatValidator> = self.validator.map(|v| v as _);
        let messages: Option<&'a dyn MessageSink> = self.messages.map(|sink| sink as _);
        let dice: Option<&'a dyn DiceOracle> = self.dice.map(|dice| dice as _);
        Env::new(map, validator, messages, dice)
    }
}
