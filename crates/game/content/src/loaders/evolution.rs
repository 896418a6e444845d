//! Evolution path table loader.

use std::collections::BTreeMap;
use std::path::Path;

use arena_core::{EvolutionPath, EvolutionStage, EvolutionTable, EvolutionTier, TraitKind};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::loaders::{LoadResult, read_file};

const EMBEDDED_EVOLUTION: &str = include_str!("../../data/evolution.ron");

/// Evolution table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionFile {
    pub paths: BTreeMap<TraitKind, EvolutionPath>,
}

/// One evolution path per behavior trait.
#[derive(Debug, Clone)]
pub struct EvolutionPathRegistry {
    paths: BTreeMap<TraitKind, EvolutionPath>,
}

impl EvolutionPathRegistry {
    /// Builds a registry; every trait must have a path.
    pub fn from_paths(paths: BTreeMap<TraitKind, EvolutionPath>) -> LoadResult<Self> {
        if let Some(missing) = TraitKind::iter().find(|kind| !paths.contains_key(kind)) {
            anyhow::bail!("Missing evolution path for trait {}", missing);
        }
        Ok(Self { paths })
    }

    pub fn path(&self, trait_kind: TraitKind) -> Option<&EvolutionPath> {
        self.paths.get(&trait_kind)
    }
}

impl EvolutionTable for EvolutionPathRegistry {
    fn tier(&self, trait_kind: TraitKind, stage: EvolutionStage) -> Option<&EvolutionTier> {
        self.paths.get(&trait_kind)?.tier(stage)
    }
}

/// Loader for the evolution table from RON files.
pub struct EvolutionLoader;

impl EvolutionLoader {
    pub fn load(path: &Path) -> LoadResult<EvolutionPathRegistry> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| {
            anyhow::anyhow!("Failed to load evolution table from {}: {}", path.display(), e)
        })
    }

    pub fn parse(content: &str) -> LoadResult<EvolutionPathRegistry> {
        let file: EvolutionFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse evolution table RON: {}", e))?;
        EvolutionPathRegistry::from_paths(file.paths)
    }

    pub fn embedded() -> LoadResult<EvolutionPathRegistry> {
        Self::parse(EMBEDDED_EVOLUTION)
    }
}

#[cfg(test)]
mod tests {
    use arena_core::StatKind;

    use super::*;

    #[test]
    fn embedded_table_covers_every_trait_and_stage() {
        let registry = EvolutionLoader::embedded().expect("embedded table parses");
        for kind in TraitKind::iter() {
            assert!(registry.tier(kind, EvolutionStage::Evolved).is_some());
            assert!(registry.tier(kind, EvolutionStage::Ultimate).is_some());
            assert!(registry.tier(kind, EvolutionStage::Base).is_none());
        }
    }

    #[test]
    fn berserker_tiers_match_table() {
        let registry = EvolutionLoader::embedded().expect("embedded table parses");
        let path = registry.path(TraitKind::Aggressive).expect("aggressive path");
        assert_eq!(path.name, "Berserker");

        let destroyer = registry
            .tier(TraitKind::Aggressive, EvolutionStage::Evolved)
            .expect("evolved tier");
        assert_eq!(destroyer.form, "Destroyer");
        assert_eq!(destroyer.boost(StatKind::Attack), 25);
        assert_eq!(destroyer.boost(StatKind::Defense), -5);
        assert_eq!(destroyer.boost(StatKind::Intelligence), 0);
        assert_eq!(destroyer.new_moves, vec!["Rampage", "Blood Fury"]);
        assert_eq!(destroyer.visual.aura, "fire");

        let lord = registry
            .tier(TraitKind::Risky, EvolutionStage::Ultimate)
            .expect("ultimate tier");
        assert_eq!(lord.form, "Chaos Lord");
    }

    #[test]
    fn incomplete_table_is_rejected() {
        let text = r#"(paths: {})"#;
        let err = EvolutionLoader::parse(text).unwrap_err();
        assert!(err.to_string().contains("Missing evolution path"));
    }
}
