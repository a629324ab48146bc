//! Common error infrastructure for skirmish-core.
//!
//! Domain-specific errors (`CombatBlocked`, `EquipError`, `OracleError`) are
//! defined in their respective modules alongside the code they guard. This
//! module provides the shared severity classification used across all of
//! them.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: temporary game conditions; retry with a different action
/// - **Validation**: invalid input, rejected cleanly without state changes
/// - **Internal**: unexpected state inconsistency, indicates a bug
/// - **Fatal**: misconfiguration or corrupted state, cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    ///
    /// Examples: destination blocked, resources exhausted
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: dead target, out of range, friendly fire
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - missing oracle or corrupted content data.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug rather than a game rule.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all skirmish-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;
}
