//! Behavior trait dimensions and score vectors.

use core::ops::AddAssign;

use strum::IntoEnumIterator;

/// One of the five behavior dimensions accumulated from move choices.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TraitKind {
    Aggressive,
    Defensive,
    Strategic,
    Risky,
    Adaptive,
}

/// Non-negative per-trait scores.
///
/// Scores only ever grow; there is no subtraction API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitScores {
    pub aggressive: u32,
    pub defensive: u32,
    pub strategic: u32,
    pub risky: u32,
    pub adaptive: u32,
}

impl TraitScores {
    pub const fn new(
        aggressive: u32,
        defensive: u32,
        strategic: u32,
        risky: u32,
        adaptive: u32,
    ) -> Self {
        Self {
            aggressive,
            defensive,
            strategic,
            risky,
            adaptive,
        }
    }

    pub const fn get(&self, kind: TraitKind) -> u32 {
        match kind {
            TraitKind::Aggressive => self.aggressive,
            TraitKind::Defensive => self.defensive,
            TraitKind::Strategic => self.strategic,
            TraitKind::Risky => self.risky,
            TraitKind::Adaptive => self.adaptive,
        }
    }

    pub fn add(&mut self, kind: TraitKind, amount: u32) {
        let slot = match kind {
            TraitKind::Aggressive => &mut self.aggressive,
            TraitKind::Defensive => &mut self.defensive,
            TraitKind::Strategic => &mut self.strategic,
            TraitKind::Risky => &mut self.risky,
            TraitKind::Adaptive => &mut self.adaptive,
        };
        *slot = slot.saturating_add(amount);
    }

    /// Iterates `(trait, score)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (TraitKind, u32)> + '_ {
        TraitKind::iter().map(move |kind| (kind, self.get(kind)))
    }
}

impl AddAssign for TraitScores {
    fn add_assign(&mut self, rhs: Self) {
        for (kind, score) in rhs.iter() {
            self.add(kind, score);
        }
    }
}
