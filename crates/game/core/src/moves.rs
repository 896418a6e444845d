//! Move definitions.
//!
//! A move is an immutable catalog entry. Its [`MoveEffect`] is a closed set of
//! variants, each carrying only the data its effect needs, so the combat
//! resolver can dispatch with an exhaustive match.

use crate::state::MoveId;

/// What a move does when resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveEffect {
    /// Direct damage to the opponent.
    Attack { power: u32 },
    /// Halves incoming damage until the user's next move.
    Defend,
    /// Restores a fixed amount of the user's HP.
    Heal { amount: u32 },
    /// Registers a one-turn counter stance on the user.
    Counter,
    /// Heavy damage, typically at high energy cost.
    Special { power: u32 },
}

/// Category tag used for logging, behavior rules and display.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum MoveCategory {
    Attack,
    Defend,
    Heal,
    Counter,
    Special,
}

/// Immutable catalog entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    pub id: MoveId,
    pub name: String,
    pub energy_cost: u32,
    pub effect: MoveEffect,
}

impl Move {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        energy_cost: u32,
        effect: MoveEffect,
    ) -> Self {
        Self {
            id: MoveId::new(id),
            name: name.into(),
            energy_cost,
            effect,
        }
    }

    pub const fn category(&self) -> MoveCategory {
        match self.effect {
            MoveEffect::Attack { .. } => MoveCategory::Attack,
            MoveEffect::Defend => MoveCategory::Defend,
            MoveEffect::Heal { .. } => MoveCategory::Heal,
            MoveEffect::Counter => MoveCategory::Counter,
            MoveEffect::Special { .. } => MoveCategory::Special,
        }
    }

    /// Nominal power: damage power for attacks, heal amount for heals, zero otherwise.
    pub const fn power(&self) -> u32 {
        match self.effect {
            MoveEffect::Attack { power } | MoveEffect::Special { power } => power,
            MoveEffect::Heal { amount } => amount,
            MoveEffect::Defend | MoveEffect::Counter => 0,
        }
    }

    pub const fn is_damaging(&self) -> bool {
        matches!(
            self.effect,
            MoveEffect::Attack { .. } | MoveEffect::Special { .. }
        )
    }
}
