//! Deterministic combat, behavior and evolution rules.
//!
//! `arena-core` defines the canonical rules (moves, damage, behavior scoring,
//! battle sessions, evolution) and exposes pure APIs that can be reused by
//! both the runtime and offline tools. All battle mutation flows through
//! [`engine::BattleSession`], and supporting crates depend on the types
//! re-exported here.
pub mod behavior;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod evolution;
pub mod moves;
pub mod progression;
pub mod state;

pub use behavior::{BehaviorProfile, ProfileKind, TraitKind, TraitScores, classify, dominant_trait};
pub use combat::{BattleError, MoveResolution, calculate_damage, element_multiplier};
pub use config::{
    BehaviorParams, CombatParams, EvolutionParams, GameConfig, LevelingParams, RewardParams,
};
pub use engine::{
    AbandonReason, BattleResult, BattleSession, BattleSnapshot, BattleStatus, CombatantView,
    LogEntry, MoveOutcome,
};
pub use env::{BattleEnv, EvolutionTable, MoveCatalog, PcgRng, RngOracle, compute_seed};
pub use error::{ErrorSeverity, GameError};
pub use evolution::{
    EvolutionError, EvolutionPath, EvolutionPlan, EvolutionResult, EvolutionTier, Ineligibility,
    StatBoosts, VisualTraits, evaluate_evolution, evolve,
};
pub use moves::{Move, MoveCategory, MoveEffect};
pub use progression::{PlayerSettlement, Rewards, Settlement, apply_settlement, grant_experience};
pub use state::{
    BattleId, BattleRecord, CombatantState, Creature, CreatureId, CreatureStats, CreatureTemplate,
    Element, EvolutionStage, MoveId, PlayerId, Side, StatKind, StatLine,
};
