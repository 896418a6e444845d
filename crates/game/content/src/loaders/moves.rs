//! Move catalog loader.

use std::collections::HashMap;
use std::path::Path;

use arena_core::{Move, MoveCatalog, MoveId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

const EMBEDDED_MOVES: &str = include_str!("../../data/moves.ron");

/// Move catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveCatalogFile {
    pub moves: Vec<Move>,
}

/// Immutable move catalog keyed by id, preserving file order.
#[derive(Debug, Clone, Default)]
pub struct MoveRegistry {
    order: Vec<MoveId>,
    moves: HashMap<MoveId, Move>,
}

impl MoveRegistry {
    /// Builds a registry, rejecting duplicate ids.
    pub fn from_moves(moves: Vec<Move>) -> LoadResult<Self> {
        let mut registry = Self::default();
        for mv in moves {
            if registry.moves.contains_key(&mv.id) {
                anyhow::bail!("Duplicate move id: {}", mv.id);
            }
            registry.order.push(mv.id.clone());
            registry.moves.insert(mv.id.clone(), mv);
        }
        Ok(registry)
    }

    pub fn get(&self, id: &MoveId) -> Option<&Move> {
        self.moves.get(id)
    }

    /// Iterates moves in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Move> + '_ {
        self.order.iter().filter_map(|id| self.moves.get(id))
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl MoveCatalog for MoveRegistry {
    fn find_move(&self, id: &MoveId) -> Option<&Move> {
        self.get(id)
    }

    fn move_ids(&self) -> Vec<MoveId> {
        self.order.clone()
    }
}

/// Loader for the move catalog from RON files.
pub struct MoveLoader;

impl MoveLoader {
    pub fn load(path: &Path) -> LoadResult<MoveRegistry> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load moves from {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<MoveRegistry> {
        let catalog: MoveCatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse move catalog RON: {}", e))?;
        MoveRegistry::from_moves(catalog.moves)
    }

    pub fn embedded() -> LoadResult<MoveRegistry> {
        Self::parse(EMBEDDED_MOVES)
    }
}

#[cfg(test)]
mod tests {
    use arena_core::{MoveCategory, MoveEffect};

    use super::*;

    #[test]
    fn embedded_catalog_has_nine_moves() {
        let registry = MoveLoader::embedded().expect("embedded moves parse");
        assert_eq!(registry.len(), 9);
        assert_eq!(registry.move_ids()[0], MoveId::from("savage_strike"));

        let quick = registry.find_move(&MoveId::from("quick_strike")).expect("quick_strike");
        assert_eq!(quick.energy_cost, 10);
        assert_eq!(quick.effect, MoveEffect::Attack { power: 50 });

        let burst = registry.find_move(&MoveId::from("energy_burst")).expect("energy_burst");
        assert_eq!(burst.energy_cost, 0);
        assert_eq!(burst.category(), MoveCategory::Special);

        let counter = registry.find_move(&MoveId::from("counter_stance")).expect("counter_stance");
        assert_eq!(counter.effect, MoveEffect::Counter);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let text = r#"(moves: [
            (id: "a", name: "A", energy_cost: 0, effect: Defend),
            (id: "a", name: "A again", energy_cost: 5, effect: Defend),
        ])"#;
        let err = MoveLoader::parse(text).unwrap_err();
        assert!(err.to_string().contains("Duplicate move id"));
    }
}
