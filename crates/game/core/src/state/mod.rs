//! Creature records, combatant substates and identifiers.
mod combatant;
mod creature;
mod ids;

pub use combatant::{CombatStats, CombatantState, Effect, Side};
pub use creature::{
    BattleRecord, Creature, CreatureStats, CreatureTemplate, Element, EvolutionStage, StatKind,
    StatLine,
};
pub use ids::{BattleId, CreatureId, MoveId, PlayerId};
