//! First-come first-served matchmaking.
//!
//! Players wait in arrival order with the creature they want to field.
//! As soon as two are waiting, the two oldest entries are paired into a new
//! battle through the [`SessionRegistry`].

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use arena_core::{BattleId, CreatureId, PlayerId};

use crate::api::{Result, RuntimeError};
use crate::events::{EventBus, MatchmakingEvent};
use crate::session::SessionRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Ticket {
    player: PlayerId,
    creature: CreatureId,
}

/// Waiting players, oldest first.
pub struct MatchmakingQueue {
    waiting: Mutex<VecDeque<Ticket>>,
    registry: Arc<SessionRegistry>,
    event_bus: EventBus,
}

impl MatchmakingQueue {
    pub(crate) fn new(registry: Arc<SessionRegistry>, event_bus: EventBus) -> Self {
        Self {
            waiting: Mutex::new(VecDeque::new()),
            registry,
            event_bus,
        }
    }

    /// Queues a player and pairs the two oldest tickets when possible.
    ///
    /// Returns the new battle when this call produced a match. Queuing a
    /// player who already waits is a no-op.
    pub async fn enqueue(
        &self,
        player: PlayerId,
        creature: CreatureId,
    ) -> Result<Option<BattleId>> {
        if self.registry.active_battle(&player).await.is_some() {
            return Err(RuntimeError::PlayerAlreadyInBattle(player));
        }
        self.registry.owned_creature(&player, creature)?;

        let mut waiting = self.waiting.lock().await;
        if waiting.iter().any(|ticket| ticket.player == player) {
            return Ok(None);
        }

        waiting.push_back(Ticket {
            player: player.clone(),
            creature,
        });
        self.event_bus
            .publish_matchmaking(MatchmakingEvent::Queued { player, creature });

        if waiting.len() < 2 {
            return Ok(None);
        }
        let (Some(first), Some(second)) = (waiting.pop_front(), waiting.pop_front()) else {
            return Ok(None);
        };

        let battle_id = match self
            .registry
            .create_session(
                (first.player.clone(), first.creature),
                (second.player.clone(), second.creature),
            )
            .await
        {
            Ok(battle_id) => battle_id,
            Err(err) => {
                warn!(
                    first = %first.player,
                    second = %second.player,
                    error = %err,
                    "pairing failed, tickets dropped"
                );
                return Err(err);
            }
        };

        info!(%battle_id, first = %first.player, second = %second.player, "players matched");
        self.event_bus
            .publish_matchmaking(MatchmakingEvent::Matched {
                battle_id,
                players: [first.player, second.player],
            });
        Ok(Some(battle_id))
    }

    /// Removes a waiting player. Returns whether they were queued.
    pub async fn cancel(&self, player: &PlayerId) -> bool {
        let mut waiting = self.waiting.lock().await;
        let before = waiting.len();
        waiting.retain(|ticket| &ticket.player != player);
        let removed = waiting.len() != before;
        drop(waiting);

        if removed {
            self.event_bus
                .publish_matchmaking(MatchmakingEvent::Cancelled {
                    player: player.clone(),
                });
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.waiting.lock().await.len()
    }
}
