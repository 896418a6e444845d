//! Traits describing read-only battle data.
//!
//! Oracles expose the move catalog, the evolution path table and the random
//! source. The [`BattleEnv`] aggregate bundles what a battle session needs so
//! the rules never couple to concrete content implementations.
mod rng;

pub use rng::{PcgRng, RngOracle, compute_seed};

use crate::behavior::TraitKind;
use crate::config::GameConfig;
use crate::evolution::EvolutionTier;
use crate::moves::Move;
use crate::state::{EvolutionStage, MoveId};

/// Read-only lookup of move definitions.
pub trait MoveCatalog: Send + Sync {
    /// Returns the move with the given id, if it exists.
    fn find_move(&self, id: &MoveId) -> Option<&Move>;

    /// Returns every move id in catalog order.
    fn move_ids(&self) -> Vec<MoveId>;
}

/// Per-trait evolution outcomes, one tier per reachable stage.
pub trait EvolutionTable: Send + Sync {
    /// Returns the tier a creature with the given trait reaches at `stage`.
    ///
    /// `stage` is `Evolved` or `Ultimate`; `Base` has no tier.
    fn tier(&self, trait_kind: TraitKind, stage: EvolutionStage) -> Option<&EvolutionTier>;
}

/// Oracles and balance parameters needed to resolve moves.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    pub moves: &'a dyn MoveCatalog,
    pub rng: &'a dyn RngOracle,
    pub config: &'a GameConfig,
}

impl<'a> BattleEnv<'a> {
    pub fn new(
        moves: &'a dyn MoveCatalog,
        rng: &'a dyn RngOracle,
        config: &'a GameConfig,
    ) -> Self {
        Self { moves, rng, config }
    }
}

impl core::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
