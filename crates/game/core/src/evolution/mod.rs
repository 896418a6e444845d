//! Behavior-driven evolution.
//!
//! A creature's lifetime behavior totals pick one trait path (or blend two
//! for hybrid profiles). The evaluator only decides and computes; callers
//! persist the mutated creature.
mod blend;
mod error;
mod evaluator;
mod path;

pub use blend::blend_tiers;
pub use error::EvolutionError;
pub use evaluator::{
    EvolutionPlan, EvolutionResult, Ineligibility, apply_evolution, evaluate_evolution, evolve,
    meets_evolution_gate,
};
pub use path::{EvolutionPath, EvolutionTier, StatBoosts, VisualTraits};
