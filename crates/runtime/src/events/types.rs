//! Event payloads published on the bus.

use serde::{Deserialize, Serialize};

use arena_core::{AbandonReason, BattleId, BattleSnapshot, CreatureId, LogEntry, PlayerId};

use crate::session::BattleSummary;

/// Battle lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BattleEvent {
    Started {
        battle_id: BattleId,
        players: [PlayerId; 2],
        creatures: [CreatureId; 2],
        first_player: PlayerId,
    },
    MoveResolved {
        battle_id: BattleId,
        entry: LogEntry,
        snapshot: Box<BattleSnapshot>,
    },
    /// Published for every terminated battle, completed or abandoned.
    Concluded { summary: Box<BattleSummary> },
    /// Addressed to the player left in an abandoned battle.
    Abandoned {
        battle_id: BattleId,
        remaining: PlayerId,
        reason: AbandonReason,
    },
}

impl BattleEvent {
    pub fn battle_id(&self) -> BattleId {
        match self {
            BattleEvent::Started { battle_id, .. }
            | BattleEvent::MoveResolved { battle_id, .. }
            | BattleEvent::Abandoned { battle_id, .. } => *battle_id,
            BattleEvent::Concluded { summary } => summary.battle_id,
        }
    }
}

/// Matchmaking queue events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MatchmakingEvent {
    Queued { player: PlayerId, creature: CreatureId },
    Cancelled { player: PlayerId },
    Matched { battle_id: BattleId, players: [PlayerId; 2] },
}
