//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from battle rules, evolution, repositories and worker
//! coordination so clients can bubble them up with consistent context.

use thiserror::Error;

use arena_core::{BattleError, CreatureId, ErrorSeverity, EvolutionError, GameError, PlayerId};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error(transparent)]
    Evolution(#[from] EvolutionError),

    #[error("invalid creatures: {reason}")]
    InvalidCreatures { reason: String },

    #[error("creature {0} not found")]
    CreatureNotFound(CreatureId),

    #[error("player {0} is already in a battle")]
    PlayerAlreadyInBattle(PlayerId),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("settlement partially recorded: creature {saved} saved, creature {failed} not")]
    PartialSettlement {
        saved: CreatureId,
        failed: CreatureId,
        #[source]
        source: RepositoryError,
    },

    #[error("runtime requires game content to be configured before building")]
    MissingContent,

    #[error("runtime worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    pub(crate) fn invalid_creatures(reason: impl Into<String>) -> Self {
        Self::InvalidCreatures {
            reason: reason.into(),
        }
    }

    /// Rule errors are rejected requests; everything else is infrastructure.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Battle(err) => err.severity(),
            Self::Evolution(err) => err.severity(),
            Self::InvalidCreatures { .. }
            | Self::CreatureNotFound(_)
            | Self::PlayerAlreadyInBattle(_) => ErrorSeverity::Validation,
            Self::Repository(_) | Self::PartialSettlement { .. } | Self::MissingContent => {
                ErrorSeverity::Internal
            }
            Self::WorkerJoin(_) => ErrorSeverity::Fatal,
        }
    }

    /// Whether the caller may retry or correct the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.severity(),
            ErrorSeverity::Recoverable | ErrorSeverity::Validation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_errors_keep_their_message() {
        let err = RuntimeError::from(BattleError::NotYourTurn);
        assert_eq!(err.to_string(), "Not your turn");
        assert!(err.is_recoverable());
    }

    #[test]
    fn repository_errors_are_internal() {
        let err = RuntimeError::from(RepositoryError::LockPoisoned);
        assert_eq!(err.severity(), ErrorSeverity::Internal);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn partial_settlement_names_both_creatures() {
        let err = RuntimeError::PartialSettlement {
            saved: CreatureId(1),
            failed: CreatureId(2),
            source: RepositoryError::Unavailable("disk full".into()),
        };
        assert_eq!(
            err.to_string(),
            "settlement partially recorded: creature #1 saved, creature #2 not"
        );
        assert_eq!(err.severity(), ErrorSeverity::Internal);
    }
}
