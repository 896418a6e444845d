//! Evolution eligibility and mutation.

use crate::behavior::{BehaviorProfile, ProfileKind, TraitKind, classify};
use crate::config::GameConfig;
use crate::env::EvolutionTable;
use crate::state::{Creature, EvolutionStage};

use super::blend::blend_tiers;
use super::error::EvolutionError;
use super::path::EvolutionTier;

/// Why a creature cannot evolve right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ineligibility {
    #[strum(serialize = "not enough battles")]
    NotEnoughBattles { required: u32, actual: u32 },
    #[strum(serialize = "max evolution reached")]
    MaxEvolutionReached,
}

/// The mutation a caller must apply and persist.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionPlan {
    pub next_stage: EvolutionStage,
    pub profile: BehaviorProfile,
    pub tier: EvolutionTier,
}

/// Outcome of an eligibility check.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvolutionResult {
    Eligible(EvolutionPlan),
    Ineligible(Ineligibility),
}

impl EvolutionResult {
    pub fn is_eligible(&self) -> bool {
        matches!(self, EvolutionResult::Eligible(_))
    }

    pub fn next_stage(&self) -> Option<EvolutionStage> {
        match self {
            EvolutionResult::Eligible(plan) => Some(plan.next_stage),
            EvolutionResult::Ineligible(_) => None,
        }
    }

    /// Converts an ineligible result into the matching error.
    pub fn into_plan(self) -> Result<EvolutionPlan, EvolutionError> {
        match self {
            EvolutionResult::Eligible(plan) => Ok(plan),
            EvolutionResult::Ineligible(Ineligibility::MaxEvolutionReached) => {
                Err(EvolutionError::MaxEvolutionReached)
            }
            EvolutionResult::Ineligible(reason) => Err(EvolutionError::NotEligibleForEvolution {
                reason: reason.to_string(),
            }),
        }
    }
}

/// Decides whether `creature` may evolve and computes the resulting tier.
///
/// Reads only the creature's lifetime behavior, battle count and stage.
/// Fails only when the table has no tier for the classified trait.
pub fn evaluate_evolution(
    creature: &Creature,
    table: &dyn EvolutionTable,
    config: &GameConfig,
) -> Result<EvolutionResult, EvolutionError> {
    let params = &config.evolution;
    let battles = creature.battle_stats.total_battles();

    if battles < params.evolved_battles {
        return Ok(EvolutionResult::Ineligible(Ineligibility::NotEnoughBattles {
            required: params.evolved_battles,
            actual: battles,
        }));
    }

    let Some(next_stage) = creature.evolution_stage.next() else {
        return Ok(EvolutionResult::Ineligible(Ineligibility::MaxEvolutionReached));
    };

    let required = match next_stage {
        EvolutionStage::Ultimate => params.ultimate_battles,
        _ => params.evolved_battles,
    };
    if battles < required {
        return Ok(EvolutionResult::Ineligible(Ineligibility::NotEnoughBattles {
            required,
            actual: battles,
        }));
    }

    let profile = classify(&creature.behavior, &config.behavior);
    let primary = lookup(table, profile.primary, next_stage)?;
    let tier = match (profile.kind, profile.secondary) {
        (ProfileKind::Hybrid, Some(secondary)) => {
            blend_tiers(primary, lookup(table, secondary, next_stage)?, params)
        }
        _ => primary.clone(),
    };

    Ok(EvolutionResult::Eligible(EvolutionPlan {
        next_stage,
        profile,
        tier,
    }))
}

/// Applies a plan: advances the stage, adds boosts, records the form and
/// visuals, appends signature moves and fully restores HP and energy.
pub fn apply_evolution(creature: &mut Creature, plan: &EvolutionPlan) {
    creature.evolution_stage = plan.next_stage;
    for (kind, delta) in &plan.tier.stat_boosts {
        creature.stats.apply_delta(*kind, *delta);
    }
    creature.stats.restore();
    creature.form = Some(plan.tier.form.clone());
    creature.visual = Some(plan.tier.visual.clone());
    creature
        .signature_moves
        .extend(plan.tier.new_moves.iter().cloned());
    creature.is_evolvable = false;
}

/// Evaluates and, when eligible, applies the evolution in place.
pub fn evolve(
    creature: &mut Creature,
    table: &dyn EvolutionTable,
    config: &GameConfig,
) -> Result<EvolutionPlan, EvolutionError> {
    let plan = evaluate_evolution(creature, table, config)?.into_plan()?;
    apply_evolution(creature, &plan);
    Ok(plan)
}

/// Whether a creature currently satisfies the evolution gate.
pub fn meets_evolution_gate(creature: &Creature, config: &GameConfig) -> bool {
    let battles = creature.battle_stats.total_battles();
    match creature.evolution_stage.next() {
        Some(EvolutionStage::Ultimate) => battles >= config.evolution.ultimate_battles,
        Some(_) => battles >= config.evolution.evolved_battles,
        None => false,
    }
}

fn lookup<'t>(
    table: &'t dyn EvolutionTable,
    trait_kind: TraitKind,
    stage: EvolutionStage,
) -> Result<&'t EvolutionTier, EvolutionError> {
    table
        .tier(trait_kind, stage)
        .ok_or(EvolutionError::PathNotFound { trait_kind, stage })
}
