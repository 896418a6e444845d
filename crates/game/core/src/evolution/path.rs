//! Evolution path tiers.

use std::collections::BTreeMap;

use crate::state::{EvolutionStage, StatKind};

/// Signed stat changes applied by an evolution. Missing keys mean zero.
pub type StatBoosts = BTreeMap<StatKind, i32>;

/// Cosmetic descriptors attached to an evolved creature.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualTraits {
    pub color: String,
    pub aura: String,
    pub size: f32,
}

/// What one stage of a trait path grants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionTier {
    /// Form name, e.g. `Destroyer`.
    pub form: String,
    pub stat_boosts: StatBoosts,
    pub new_moves: Vec<String>,
    pub visual: VisualTraits,
}

impl EvolutionTier {
    pub fn boost(&self, kind: StatKind) -> i32 {
        self.stat_boosts.get(&kind).copied().unwrap_or(0)
    }
}

/// A named trait path with its evolved and ultimate tiers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionPath {
    /// Path name, e.g. `Berserker`.
    pub name: String,
    pub evolved: EvolutionTier,
    pub ultimate: EvolutionTier,
}

impl EvolutionPath {
    pub fn tier(&self, stage: EvolutionStage) -> Option<&EvolutionTier> {
        match stage {
            EvolutionStage::Base => None,
            EvolutionStage::Evolved => Some(&self.evolved),
            EvolutionStage::Ultimate => Some(&self.ultimate),
        }
    }
}
