//! Move submission errors.

use crate::error::{ErrorSeverity, GameError};

/// Reasons a submitted move is rejected.
///
/// A rejected move leaves the battle untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleError {
    /// The submitting player does not hold the turn.
    #[error("Not your turn")]
    NotYourTurn,

    /// No active battle matches the request.
    #[error("Battle not found")]
    BattleNotFound,

    /// The move id is not in the catalog.
    #[error("Unknown move: {0}")]
    UnknownMove(String),

    /// The acting creature cannot pay the move's energy cost.
    #[error("Insufficient energy: requires {required}, has {available}")]
    InsufficientEnergy { required: u32, available: u32 },
}

impl GameError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotYourTurn | Self::InsufficientEnergy { .. } => ErrorSeverity::Recoverable,
            Self::BattleNotFound | Self::UnknownMove(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotYourTurn => "BATTLE_NOT_YOUR_TURN",
            Self::BattleNotFound => "BATTLE_NOT_FOUND",
            Self::UnknownMove(_) => "BATTLE_UNKNOWN_MOVE",
            Self::InsufficientEnergy { .. } => "BATTLE_INSUFFICIENT_ENERGY",
        }
    }
}
