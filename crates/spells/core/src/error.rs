//! Error classification shared by every spells-core error type.
//!
//! `ConfigError`, `BattleError` and `AdventureCastError` live next to the code
//! that raises them. A cast that is merely not allowed is never an error: it
//! yields a [`crate::mechanics::Problem`] and the battle stays untouched.

/// How a caller should react to an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Retrying later can succeed, e.g. once a hex frees up.
    Recoverable,
    /// The request is malformed.
    Validation,
    /// Engine state contradicts itself.
    Internal,
    /// Data the engine was built from is unusable.
    Fatal,
}

impl ErrorSeverity {
    pub const fn is_bug(self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Implemented by every spells-core error.
///
/// Error codes are stable upper-case identifiers, safe to match on in logs and
/// tests.
pub trait EngineError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BattleError, BattleHex, UnitId};

    #[test]
    fn severity_names() {
        assert_eq!(ErrorSeverity::Recoverable.to_string(), "recoverable");
        assert!(ErrorSeverity::Fatal.is_bug());
        assert!(!ErrorSeverity::Validation.is_bug());
    }

    #[test]
    fn battle_errors_are_classified() {
        let missing = BattleError::UnitNotFound(UnitId(9));
        assert_eq!(missing.severity(), ErrorSeverity::Internal);
        let hex = BattleError::InvalidHex(BattleHex::INVALID);
        assert_eq!(hex.severity(), ErrorSeverity::Validation);
    }
}
