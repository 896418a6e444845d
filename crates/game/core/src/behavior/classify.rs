//! Dominant-trait and hybrid classification.

use crate::config::BehaviorParams;

use super::traits::{TraitKind, TraitScores};

/// Shape of a behavior profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ProfileKind {
    /// Scores are nearly flat.
    Balanced,
    /// Two traits are close at the top.
    Hybrid,
    /// One trait clearly leads.
    Pure,
}

/// Result of classifying a score vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BehaviorProfile {
    pub kind: ProfileKind,
    pub primary: TraitKind,
    /// Present only for hybrid profiles.
    pub secondary: Option<TraitKind>,
}

/// The trait with the strictly highest score. Any tie at the top, including
/// all-zero scores, resolves to `Adaptive`.
pub fn dominant_trait(scores: &TraitScores) -> TraitKind {
    let top = scores.iter().map(|(_, score)| score).max().unwrap_or(0);
    let mut leaders = scores.iter().filter(|(_, score)| *score == top);
    match (leaders.next(), leaders.next()) {
        (Some((kind, _)), None) => kind,
        _ => TraitKind::Adaptive,
    }
}

/// Population variance of the five scores.
pub fn score_variance(scores: &TraitScores) -> f64 {
    let values: Vec<f64> = scores.iter().map(|(_, score)| f64::from(score)).collect();
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / count
}

/// Classifies a score vector as balanced, hybrid or pure.
pub fn classify(scores: &TraitScores, params: &BehaviorParams) -> BehaviorProfile {
    let primary = dominant_trait(scores);

    if score_variance(scores) < params.balanced_variance {
        return BehaviorProfile {
            kind: ProfileKind::Balanced,
            primary,
            secondary: None,
        };
    }

    // A tied top resolves `primary` to adaptive, whose own score may trail.
    let top = scores.iter().map(|(_, score)| score).max().unwrap_or(0);
    let secondary = scores
        .iter()
        .filter(|(kind, score)| *kind != primary && *score > 0)
        .fold(None::<(TraitKind, u32)>, |best, (kind, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((kind, score)),
        });

    match secondary {
        Some((kind, score)) if f64::from(score) >= params.hybrid_ratio * f64::from(top) => {
            BehaviorProfile {
                kind: ProfileKind::Hybrid,
                primary,
                secondary: Some(kind),
            }
        }
        _ => BehaviorProfile {
            kind: ProfileKind::Pure,
            primary,
            secondary: None,
        },
    }
}
