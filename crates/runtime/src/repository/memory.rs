//! In-memory repository implementations for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use arena_core::{BattleId, Creature, CreatureId, LogEntry};

use super::error::{RepositoryError, Result};
use super::traits::{BattleLogRepository, CreatureRepository};
use crate::session::BattleSummary;

/// In-memory creature store keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryCreatureRepo {
    creatures: RwLock<HashMap<CreatureId, Creature>>,
}

impl InMemoryCreatureRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `creatures`.
    pub fn with_creatures(creatures: impl IntoIterator<Item = Creature>) -> Self {
        Self {
            creatures: RwLock::new(creatures.into_iter().map(|c| (c.id, c)).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.creatures.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CreatureRepository for InMemoryCreatureRepo {
    fn find(&self, id: CreatureId) -> Result<Option<Creature>> {
        let creatures = self
            .creatures
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(creatures.get(&id).cloned())
    }

    fn save(&self, creature: &Creature) -> Result<()> {
        let mut creatures = self
            .creatures
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        creatures.insert(creature.id, creature.clone());
        Ok(())
    }
}

/// In-memory battle log keyed by battle id.
#[derive(Debug, Default)]
pub struct InMemoryBattleLogRepo {
    entries: RwLock<HashMap<BattleId, Vec<LogEntry>>>,
    summaries: RwLock<HashMap<BattleId, BattleSummary>>,
}

impl InMemoryBattleLogRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BattleLogRepository for InMemoryBattleLogRepo {
    fn append_entry(&self, battle: BattleId, entry: &LogEntry) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        entries.entry(battle).or_default().push(entry.clone());
        Ok(())
    }

    fn save_summary(&self, summary: &BattleSummary) -> Result<()> {
        let mut summaries = self
            .summaries
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        summaries.insert(summary.battle_id, summary.clone());
        Ok(())
    }

    fn entries(&self, battle: BattleId) -> Result<Vec<LogEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(entries.get(&battle).cloned().unwrap_or_default())
    }

    fn summary(&self, battle: BattleId) -> Result<Option<BattleSummary>> {
        let summaries = self
            .summaries
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(summaries.get(&battle).cloned())
    }
}
