//! Evolution errors.

use crate::behavior::TraitKind;
use crate::error::{ErrorSeverity, GameError};
use crate::state::EvolutionStage;

/// Reasons an evolution request is refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvolutionError {
    #[error("Max evolution reached")]
    MaxEvolutionReached,

    #[error("Not eligible for evolution: {reason}")]
    NotEligibleForEvolution { reason: String },

    /// The evolution table has no tier for the classified trait.
    #[error("No {stage} evolution path for trait {trait_kind}")]
    PathNotFound {
        trait_kind: TraitKind,
        stage: EvolutionStage,
    },
}

impl GameError for EvolutionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MaxEvolutionReached | Self::NotEligibleForEvolution { .. } => {
                ErrorSeverity::Validation
            }
            Self::PathNotFound { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MaxEvolutionReached => "EVOLUTION_MAX_REACHED",
            Self::NotEligibleForEvolution { .. } => "EVOLUTION_NOT_ELIGIBLE",
            Self::PathNotFound { .. } => "EVOLUTION_PATH_NOT_FOUND",
        }
    }
}
