//! Battle log entries, results and outcomes.

use crate::behavior::TraitScores;
use crate::combat::MoveResolution;
use crate::moves::MoveCategory;
use crate::state::{MoveId, PlayerId};

/// Lifecycle state of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BattleStatus {
    Active,
    Completed,
    Abandoned,
}

impl BattleStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, BattleStatus::Active)
    }
}

/// Why a battle was abandoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum AbandonReason {
    Disconnect,
    Forfeit,
    TurnTimeout,
}

/// Final result of a terminated battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleResult {
    /// The loser's HP reached zero.
    Victory { winner: PlayerId, loser: PlayerId },
    /// The loser left the battle before it was decided.
    Forfeit {
        winner: PlayerId,
        loser: PlayerId,
        reason: AbandonReason,
    },
}

impl BattleResult {
    pub fn winner(&self) -> &PlayerId {
        match self {
            BattleResult::Victory { winner, .. } | BattleResult::Forfeit { winner, .. } => winner,
        }
    }

    pub fn loser(&self) -> &PlayerId {
        match self {
            BattleResult::Victory { loser, .. } | BattleResult::Forfeit { loser, .. } => loser,
        }
    }
}

/// One resolved move, appended in order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub turn: u32,
    pub player: PlayerId,
    pub move_id: MoveId,
    pub category: MoveCategory,
    pub damage: u32,
    pub healing: u32,
    pub effect: Option<String>,
}

/// Everything a caller needs to report a resolved move.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveOutcome {
    pub entry: LogEntry,
    pub resolution: MoveResolution,
    /// Trait points earned by this move.
    pub behavior_delta: TraitScores,
    /// Player to act next; `None` once the battle is over.
    pub next_player: Option<PlayerId>,
    pub result: Option<BattleResult>,
}

impl MoveOutcome {
    pub fn is_terminal(&self) -> bool {
        self.result.is_some()
    }
}
