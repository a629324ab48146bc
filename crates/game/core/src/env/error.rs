use crate::error::{ErrorSeverity, GameError};

/// A required oracle was not supplied in the environment bundle.
///
/// This is a wiring bug in the calling layer, never a game condition, so it
/// is reported loudly instead of being folded into a combat result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("map oracle not available")]
    MapNotAvailable,

    #[error("combat validator not available")]
    ValidatorNotAvailable,

    #[error("message sink not available")]
    MessagesNotAvailable,

    #[error("dice oracle not available")]
    DiceNotAvailable,
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }
}
