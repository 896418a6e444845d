//! Hybrid tier blending.

use crate::config::EvolutionParams;

use super::path::{EvolutionTier, StatBoosts, VisualTraits};

/// Merges the tiers of a hybrid profile's primary and secondary traits.
///
/// Stats are weighted `primary_weight_pct` to the primary over the union of
/// keys, moves are concatenated then truncated, and visual descriptors are
/// joined with size averaged.
pub fn blend_tiers(
    primary: &EvolutionTier,
    secondary: &EvolutionTier,
    params: &EvolutionParams,
) -> EvolutionTier {
    EvolutionTier {
        form: format!("{}-{}", primary.form, secondary.form),
        stat_boosts: blend_stats(&primary.stat_boosts, &secondary.stat_boosts, params),
        new_moves: primary
            .new_moves
            .iter()
            .chain(&secondary.new_moves)
            .take(params.hybrid_move_limit)
            .cloned()
            .collect(),
        visual: VisualTraits {
            color: format!("{}-{}", primary.visual.color, secondary.visual.color),
            aura: format!("{}+{}", primary.visual.aura, secondary.visual.aura),
            size: (primary.visual.size + secondary.visual.size) / 2.0,
        },
    }
}

fn blend_stats(
    primary: &StatBoosts,
    secondary: &StatBoosts,
    params: &EvolutionParams,
) -> StatBoosts {
    let primary_weight = f64::from(params.primary_weight_pct.min(100)) / 100.0;
    let secondary_weight = 1.0 - primary_weight;

    primary
        .keys()
        .chain(secondary.keys())
        .map(|kind| {
            let a = f64::from(primary.get(kind).copied().unwrap_or(0));
            let b = f64::from(secondary.get(kind).copied().unwrap_or(0));
            // Round half up, so -2.5 becomes -2.
            let merged = (a * primary_weight + b * secondary_weight + 0.5).floor() as i32;
            (*kind, merged)
        })
        .collect()
}
