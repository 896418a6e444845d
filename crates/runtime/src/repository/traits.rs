//! Repository contracts for the collaborators the arena persists through.
//!
//! The arena never owns creatures or battle history; it reads and writes them
//! through these traits. Implementations may fail independently of the
//! simulation, and callers treat every failure as recoverable.

use arena_core::{BattleId, Creature, CreatureId, LogEntry};

use super::error::Result;
use crate::session::BattleSummary;

/// Lookup and storage of long-lived creature records.
pub trait CreatureRepository: Send + Sync {
    /// Load a creature by id.
    fn find(&self, id: CreatureId) -> Result<Option<Creature>>;

    /// Insert or replace a creature record.
    fn save(&self, creature: &Creature) -> Result<()>;
}

/// Append-only storage for battle history.
pub trait BattleLogRepository: Send + Sync {
    /// Append one resolved move to a battle's log.
    fn append_entry(&self, battle: BattleId, entry: &LogEntry) -> Result<()>;

    /// Store the final summary of a terminated battle.
    fn save_summary(&self, summary: &BattleSummary) -> Result<()>;

    /// Read back every entry of a battle, in order.
    fn entries(&self, battle: BattleId) -> Result<Vec<LogEntry>>;

    fn summary(&self, battle: BattleId) -> Result<Option<BattleSummary>>;
}
