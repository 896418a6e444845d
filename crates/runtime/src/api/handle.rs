//! Cloneable façade for hosting battles.
//!
//! [`RuntimeHandle`] hides the registry and queue plumbing and offers async
//! helpers for every battle, settlement and evolution entry point, plus
//! event streams for specific topics.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;

use arena_core::{
    BattleId, BattleSnapshot, Creature, CreatureId, EvolutionPlan, EvolutionResult, MoveId,
    MoveOutcome, PlayerId, Settlement,
};

use super::errors::Result;
use super::providers::MoveProvider;
use crate::events::{Event, EventBus, Topic};
use crate::matchmaking::MatchmakingQueue;
use crate::session::{BattleSummary, SessionRegistry};

/// What one provider-driven turn produced.
#[derive(Debug, Clone)]
pub enum TurnStep {
    Moved(MoveOutcome),
    /// The provider declined to move and the player conceded.
    Conceded(BattleSummary),
}

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    registry: Arc<SessionRegistry>,
    matchmaking: Arc<MatchmakingQueue>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(
        registry: Arc<SessionRegistry>,
        matchmaking: Arc<MatchmakingQueue>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            registry,
            matchmaking,
            event_bus,
        }
    }

    pub(crate) fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Start a battle between two players' creatures
    pub async fn create_session(
        &self,
        first: (PlayerId, CreatureId),
        second: (PlayerId, CreatureId),
    ) -> Result<BattleId> {
        self.registry.create_session(first, second).await
    }

    /// Submit a move for the player holding the turn
    pub async fn submit_move(
        &self,
        battle: BattleId,
        player: &PlayerId,
        move_id: &MoveId,
    ) -> Result<MoveOutcome> {
        self.registry.submit_move(battle, player, move_id).await
    }

    /// Redacted state of a live battle
    pub async fn public_state(&self, battle: BattleId) -> Result<BattleSnapshot> {
        self.registry.public_state(battle).await
    }

    /// Play one turn, asking `provider` for the current player's move
    pub async fn play_turn(
        &self,
        battle: BattleId,
        provider: &dyn MoveProvider,
    ) -> Result<TurnStep> {
        let state = self.registry.public_state(battle).await?;
        let player = state.current_player.clone();

        match provider.choose_move(&player, &state).await? {
            Some(move_id) => Ok(TurnStep::Moved(
                self.registry.submit_move(battle, &player, &move_id).await?,
            )),
            None => Ok(TurnStep::Conceded(self.registry.forfeit(&player).await?)),
        }
    }

    /// Report a lost connection
    ///
    /// Removes the player from the matchmaking queue and abandons their live
    /// battle in favor of the opponent. Safe to call repeatedly.
    pub async fn handle_disconnect(&self, player: &PlayerId) -> Result<()> {
        self.matchmaking.cancel(player).await;
        self.registry.handle_disconnect(player).await
    }

    /// Concede the player's live battle
    pub async fn forfeit(&self, player: &PlayerId) -> Result<BattleSummary> {
        self.registry.forfeit(player).await
    }

    /// Take the rewards owed for a concluded battle
    pub async fn settle(&self, battle: BattleId) -> Result<Settlement> {
        self.registry.settle(battle).await
    }

    /// Persist a settlement onto both creatures
    pub fn record_settlement(&self, settlement: &Settlement) -> Result<(Creature, Creature)> {
        self.registry.record_settlement(settlement)
    }

    pub fn evaluate_evolution(&self, creature: CreatureId) -> Result<EvolutionResult> {
        self.registry.evaluate_evolution(creature)
    }

    pub fn evolve(&self, creature: CreatureId) -> Result<(Creature, EvolutionPlan)> {
        self.registry.evolve(creature)
    }

    /// Summary of a recently concluded battle
    pub async fn summary(&self, battle: BattleId) -> Option<BattleSummary> {
        self.registry.summary(battle).await
    }

    pub async fn active_battle(&self, player: &PlayerId) -> Option<BattleId> {
        self.registry.active_battle(player).await
    }

    pub async fn active_battles(&self) -> usize {
        self.registry.active_count().await
    }

    /// Join the matchmaking queue; returns the battle if this call paired
    pub async fn enqueue(
        &self,
        player: PlayerId,
        creature: CreatureId,
    ) -> Result<Option<BattleId>> {
        self.matchmaking.enqueue(player, creature).await
    }

    /// Leave the matchmaking queue
    pub async fn cancel_queue(&self, player: &PlayerId) -> bool {
        self.matchmaking.cancel(player).await
    }

    pub async fn queue_len(&self) -> usize {
        self.matchmaking.len().await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Battle` - battle start, resolved moves, abandonment, conclusion
    /// - `Topic::Matchmaking` - queue joins, cancellations and pairings
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }
}
