//! Per-move behavior scoring.
//!
//! The tracker turns a resolved move plus the situation it was played in into
//! trait increments. All rules are additive; a move can trigger several.

use std::collections::HashSet;

use crate::config::BehaviorParams;
use crate::moves::{Move, MoveEffect};
use crate::state::MoveId;

use super::traits::{TraitKind, TraitScores};

/// Situation in which a move was played.
#[derive(Clone, Debug)]
pub struct BehaviorContext<'a> {
    /// Actor HP at the moment it acted, before the move resolved.
    pub hp_before: u32,
    pub max_hp: u32,
    /// The player's earlier moves in this battle, oldest first, excluding this one.
    pub previous_moves: &'a [MoveId],
}

/// Computes the trait increments earned by one move.
pub fn score_move(mv: &Move, ctx: &BehaviorContext<'_>, params: &BehaviorParams) -> TraitScores {
    let mut delta = TraitScores::default();

    match mv.effect {
        MoveEffect::Attack { power } | MoveEffect::Special { power } => {
            let aggression = if power >= params.heavy_power { 3 } else { 1 };
            delta.add(TraitKind::Aggressive, aggression);
        }
        MoveEffect::Defend => {
            delta.add(TraitKind::Defensive, 2);
            if f64::from(ctx.hp_before) > params.high_hp_ratio * f64::from(ctx.max_hp) {
                delta.add(TraitKind::Strategic, 1);
            }
        }
        MoveEffect::Heal { .. } => {
            delta.add(TraitKind::Defensive, 1);
            delta.add(TraitKind::Strategic, 2);
        }
        MoveEffect::Counter => {
            delta.add(TraitKind::Strategic, 3);
            delta.add(TraitKind::Defensive, 1);
        }
    }

    if f64::from(ctx.hp_before) < params.low_hp_ratio * f64::from(ctx.max_hp) {
        delta.add(TraitKind::Risky, 2);
    }

    if mv.energy_cost == 0 {
        delta.add(TraitKind::Strategic, 2);
    }

    if has_variety(&mv.id, ctx.previous_moves, params) {
        delta.add(TraitKind::Adaptive, 1);
    }

    delta
}

/// Scores a move and folds the result into `scores`.
pub fn track(
    scores: &mut TraitScores,
    mv: &Move,
    ctx: &BehaviorContext<'_>,
    params: &BehaviorParams,
) -> TraitScores {
    let delta = score_move(mv, ctx, params);
    *scores += delta;
    delta
}

/// Distinct ids among the last `variety_window` moves, current move included.
fn has_variety(current: &MoveId, previous: &[MoveId], params: &BehaviorParams) -> bool {
    let window = params.variety_window.max(1);
    let start = previous.len().saturating_sub(window - 1);
    let distinct: HashSet<&MoveId> = previous[start..]
        .iter()
        .chain(core::iter::once(current))
        .collect();
    distinct.len() >= params.variety_threshold
}
