//! Runtime wrappers around static game content.
//!
//! [`OracleBundle`] shares the loaded move catalog, evolution table and
//! balance configuration across every battle worker and builds
//! [`BattleEnv`] views on demand. The data is immutable at runtime; dynamic
//! state lives in sessions and repositories.

use std::sync::Arc;

use arena_content::{ContentBundle, EvolutionPathRegistry, MoveRegistry};
use arena_core::{BattleEnv, EvolutionTable, GameConfig, PcgRng, RngOracle};

/// Shared, read-only content handed to every session worker.
#[derive(Clone)]
pub struct OracleBundle {
    pub(crate) moves: Arc<MoveRegistry>,
    pub(crate) evolution: Arc<EvolutionPathRegistry>,
    pub(crate) config: Arc<GameConfig>,
    pub(crate) rng: Arc<dyn RngOracle>,
}

impl OracleBundle {
    /// Wraps loaded content using the deterministic PCG roll.
    pub fn new(content: ContentBundle) -> Self {
        Self::with_rng(content, Arc::new(PcgRng))
    }

    /// Wraps loaded content with a custom variance source.
    pub fn with_rng(content: ContentBundle, rng: Arc<dyn RngOracle>) -> Self {
        Self {
            moves: Arc::new(content.moves),
            evolution: Arc::new(content.evolution),
            config: Arc::new(content.config),
            rng,
        }
    }

    /// Builds the environment a battle session resolves moves against.
    pub fn as_battle_env(&self) -> BattleEnv<'_> {
        BattleEnv::new(self.moves.as_ref(), self.rng.as_ref(), &self.config)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn evolution(&self) -> &dyn EvolutionTable {
        self.evolution.as_ref()
    }
}

impl std::fmt::Debug for OracleBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleBundle")
            .field("moves", &self.moves.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
