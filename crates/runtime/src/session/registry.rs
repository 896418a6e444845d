//! Session registry: the index of live battles and the entry points that
//! route requests to their workers.
//!
//! The index maps `battle → worker` and `player → battle` behind one async
//! `RwLock`, so creation and teardown serialize against lookups. Battles
//! themselves never share the lock: once a sender is cloned out of the index,
//! the request is handled by that battle's worker alone.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use rand::Rng;
use rand::rngs::StdRng;
use tokio::sync::{Mutex, RwLock, mpsc, oneshot};
use tracing::{debug, info, warn};

use arena_core::{
    AbandonReason, BattleError, BattleId, BattleSession, BattleSnapshot, Creature, CreatureId,
    EvolutionPlan, EvolutionResult, MoveId, MoveOutcome, PlayerId, PlayerSettlement, Settlement,
    apply_settlement,
};

use crate::api::{Result, RuntimeError};
use crate::events::{BattleEvent, EventBus};
use crate::oracle::OracleBundle;
use crate::repository::CreatureRepository;
use crate::runtime::RuntimeConfig;
use crate::workers::{MoveReply, SessionCommand, SessionWorker};

use super::summary::{BattleSummary, ConcludedArchive};

struct SessionEntry {
    sender: mpsc::Sender<SessionCommand>,
    players: [PlayerId; 2],
}

#[derive(Default)]
struct SessionIndex {
    battles: HashMap<BattleId, SessionEntry>,
    players: HashMap<PlayerId, BattleId>,
}

impl SessionIndex {
    /// Drops a battle and the player entries still pointing at it.
    fn remove(&mut self, battle: BattleId) -> Option<SessionEntry> {
        let entry = self.battles.remove(&battle)?;
        for player in &entry.players {
            if self.players.get(player) == Some(&battle) {
                self.players.remove(player);
            }
        }
        Some(entry)
    }
}

/// Routes battle requests to per-battle workers and keeps concluded records.
pub struct SessionRegistry {
    index: RwLock<SessionIndex>,
    archive: Mutex<ConcludedArchive>,
    next_battle: AtomicU64,
    seeds: StdMutex<StdRng>,
    oracles: OracleBundle,
    creatures: Arc<dyn CreatureRepository>,
    event_bus: EventBus,
    reaper_tx: mpsc::UnboundedSender<BattleSummary>,
    config: RuntimeConfig,
}

impl SessionRegistry {
    pub(crate) fn new(
        oracles: OracleBundle,
        creatures: Arc<dyn CreatureRepository>,
        event_bus: EventBus,
        reaper_tx: mpsc::UnboundedSender<BattleSummary>,
        seeds: StdRng,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            index: RwLock::new(SessionIndex::default()),
            archive: Mutex::new(ConcludedArchive::new(config.archive_capacity)),
            next_battle: AtomicU64::new(1),
            seeds: StdMutex::new(seeds),
            oracles,
            creatures,
            event_bus,
            reaper_tx,
            config,
        }
    }

    /// Starts a battle between two players' creatures.
    ///
    /// Fails with `InvalidCreatures` when the creatures cannot be resolved,
    /// are the same creature, or are not owned by the submitting players.
    pub async fn create_session(
        &self,
        first: (PlayerId, CreatureId),
        second: (PlayerId, CreatureId),
    ) -> Result<BattleId> {
        if first.0 == second.0 {
            return Err(RuntimeError::invalid_creatures(
                "a player cannot battle themselves",
            ));
        }
        if first.1 == second.1 {
            return Err(RuntimeError::invalid_creatures(format!(
                "creature {} cannot fight itself",
                first.1
            )));
        }

        let first_creature = self.owned_creature(&first.0, first.1)?;
        let second_creature = self.owned_creature(&second.0, second.1)?;

        let mut index = self.index.write().await;
        for player in [&first.0, &second.0] {
            if index.players.contains_key(player) {
                return Err(RuntimeError::PlayerAlreadyInBattle(player.clone()));
            }
        }

        let battle_id = BattleId(self.next_battle.fetch_add(1, Ordering::Relaxed));
        let session = BattleSession::new(
            battle_id,
            self.next_seed(),
            (first.0.clone(), &first_creature),
            (second.0.clone(), &second_creature),
        );

        let (sender, command_rx) = mpsc::channel(self.config.command_buffer_size.max(1));
        let worker = SessionWorker::new(
            session,
            self.oracles.clone(),
            command_rx,
            self.event_bus.clone(),
            self.reaper_tx.clone(),
            self.config.turn_timeout,
        );
        tokio::spawn(worker.run());

        index.players.insert(first.0.clone(), battle_id);
        index.players.insert(second.0.clone(), battle_id);
        index.battles.insert(
            battle_id,
            SessionEntry {
                sender,
                players: [first.0.clone(), second.0.clone()],
            },
        );
        drop(index);

        info!(%battle_id, first = %first.0, second = %second.0, "battle started");
        self.event_bus.publish_battle(BattleEvent::Started {
            battle_id,
            players: [first.0.clone(), second.0],
            creatures: [first.1, second.1],
            first_player: first.0,
        });

        Ok(battle_id)
    }

    /// Resolves one move. A battle-ending move retires the battle before
    /// returning; the worker also hands it to the reaper, so the battle is
    /// retired even if this call is dropped midway.
    pub async fn submit_move(
        &self,
        battle: BattleId,
        player: &PlayerId,
        move_id: &MoveId,
    ) -> Result<MoveOutcome> {
        let sender = self.sender(battle).await?;
        let (reply_tx, reply_rx) = oneshot::channel::<MoveReply>();

        sender
            .send(SessionCommand::SubmitMove {
                player: player.clone(),
                move_id: move_id.clone(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| BattleError::BattleNotFound)?;

        let (outcome, summary) = reply_rx.await.map_err(|_| BattleError::BattleNotFound)??;
        if let Some(summary) = summary {
            self.retire(summary).await;
        }
        Ok(outcome)
    }

    /// Redacted view of a live battle.
    pub async fn public_state(&self, battle: BattleId) -> Result<BattleSnapshot> {
        let sender = self.sender(battle).await?;
        let (reply_tx, reply_rx) = oneshot::channel();

        sender
            .send(SessionCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| BattleError::BattleNotFound)?;

        Ok(reply_rx.await.map_err(|_| BattleError::BattleNotFound)?)
    }

    /// Abandons the player's live battle in favor of the opponent.
    ///
    /// Idempotent: a player without a live battle is a no-op.
    pub async fn handle_disconnect(&self, player: &PlayerId) -> Result<()> {
        self.abandon(player, AbandonReason::Disconnect).await?;
        Ok(())
    }

    /// Concedes the player's live battle.
    pub async fn forfeit(&self, player: &PlayerId) -> Result<BattleSummary> {
        self.abandon(player, AbandonReason::Forfeit)
            .await?
            .ok_or(RuntimeError::Battle(BattleError::BattleNotFound))
    }

    /// Detaches the battle from the index, then asks its worker to abandon it.
    /// No new request can reach the battle once it leaves the index.
    async fn abandon(
        &self,
        player: &PlayerId,
        reason: AbandonReason,
    ) -> Result<Option<BattleSummary>> {
        let (battle, entry) = {
            let mut index = self.index.write().await;
            let Some(battle) = index.players.get(player).copied() else {
                debug!(%player, "no live battle to abandon");
                return Ok(None);
            };
            let Some(entry) = index.remove(battle) else {
                return Ok(None);
            };
            (battle, entry)
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        let sent = entry
            .sender
            .send(SessionCommand::Abandon {
                player: player.clone(),
                reason,
                reply: reply_tx,
            })
            .await;
        if sent.is_err() {
            debug!(%battle, "battle ended before it could be abandoned");
            return Ok(None);
        }

        match reply_rx.await {
            Ok(Ok(summary)) => {
                self.archive.lock().await.insert(summary.clone());
                Ok(Some(summary))
            }
            // The battle concluded on its own while the request was queued.
            Ok(Err(_)) | Err(_) => Ok(None),
        }
    }

    /// Takes the rewards owed for a concluded battle. Each battle settles once.
    pub async fn settle(&self, battle: BattleId) -> Result<Settlement> {
        self.archive
            .lock()
            .await
            .take_settlement(battle)
            .ok_or(RuntimeError::Battle(BattleError::BattleNotFound))
    }

    /// Applies a settlement to both creatures and saves them.
    ///
    /// Both records are loaded before either is written, so a missing creature
    /// leaves the store untouched. If the loser cannot be saved after the
    /// winner was, the error is `PartialSettlement` naming each creature.
    /// Returns the updated `(winner, loser)` records.
    pub fn record_settlement(&self, settlement: &Settlement) -> Result<(Creature, Creature)> {
        let mut winner = self.load_creature(settlement.winner.creature)?;
        let mut loser = self.load_creature(settlement.loser.creature)?;
        self.settle_creature(&mut winner, &settlement.winner, true);
        self.settle_creature(&mut loser, &settlement.loser, false);

        self.creatures.save(&winner)?;
        self.creatures
            .save(&loser)
            .map_err(|source| RuntimeError::PartialSettlement {
                saved: winner.id,
                failed: loser.id,
                source,
            })?;
        Ok((winner, loser))
    }

    fn settle_creature(&self, creature: &mut Creature, entry: &PlayerSettlement, won: bool) {
        let levels = apply_settlement(creature, entry, won, self.oracles.config());
        debug!(
            creature = %creature.id,
            won,
            levels,
            evolvable = creature.is_evolvable,
            "settlement recorded"
        );
    }

    /// Whether the stored creature may evolve, and into what.
    pub fn evaluate_evolution(&self, creature: CreatureId) -> Result<EvolutionResult> {
        let creature = self.load_creature(creature)?;
        Ok(arena_core::evaluate_evolution(
            &creature,
            self.oracles.evolution(),
            self.oracles.config(),
        )?)
    }

    /// Evolves the stored creature and saves it.
    pub fn evolve(&self, creature: CreatureId) -> Result<(Creature, EvolutionPlan)> {
        let mut creature = self.load_creature(creature)?;
        let plan = arena_core::evolve(
            &mut creature,
            self.oracles.evolution(),
            self.oracles.config(),
        )?;
        self.creatures.save(&creature)?;
        info!(
            creature = %creature.id,
            stage = %plan.next_stage,
            form = %plan.tier.form,
            "creature evolved"
        );
        Ok((creature, plan))
    }

    /// Summary of a concluded battle still held in the archive.
    pub async fn summary(&self, battle: BattleId) -> Option<BattleSummary> {
        self.archive.lock().await.get(battle).cloned()
    }

    /// The live battle the player is in, if any.
    pub async fn active_battle(&self, player: &PlayerId) -> Option<BattleId> {
        self.index.read().await.players.get(player).copied()
    }

    pub async fn active_count(&self) -> usize {
        self.index.read().await.battles.len()
    }

    /// Loads a creature and checks it belongs to `owner`.
    pub(crate) fn owned_creature(&self, owner: &PlayerId, id: CreatureId) -> Result<Creature> {
        let creature = self
            .creatures
            .find(id)?
            .ok_or_else(|| RuntimeError::invalid_creatures(format!("creature {id} not found")))?;
        if &creature.owner != owner {
            return Err(RuntimeError::invalid_creatures(format!(
                "creature {id} is not owned by {owner}"
            )));
        }
        Ok(creature)
    }

    /// Removes a concluded battle from the index and archives its summary.
    ///
    /// Both the caller of a finishing move and the reaper retire the same
    /// battle; the second call finds nothing to remove and the archive keeps
    /// the first summary.
    pub(crate) async fn retire(&self, summary: BattleSummary) {
        let battle_id = summary.battle_id;
        if self.index.write().await.remove(battle_id).is_some() {
            debug!(%battle_id, status = %summary.status, "battle retired");
        }
        self.archive.lock().await.insert(summary);
    }

    /// Drops every live battle; their workers stop once the channels close.
    pub(crate) async fn close_all(&self) {
        let mut index = self.index.write().await;
        let live = index.battles.len();
        index.battles.clear();
        index.players.clear();
        if live > 0 {
            warn!(live, "closing live battles on shutdown");
        }
    }

    async fn sender(&self, battle: BattleId) -> Result<mpsc::Sender<SessionCommand>> {
        self.index
            .read()
            .await
            .battles
            .get(&battle)
            .map(|entry| entry.sender.clone())
            .ok_or(RuntimeError::Battle(BattleError::BattleNotFound))
    }

    fn load_creature(&self, id: CreatureId) -> Result<Creature> {
        self.creatures
            .find(id)?
            .ok_or(RuntimeError::CreatureNotFound(id))
    }

    fn next_seed(&self) -> u64 {
        match self.seeds.lock() {
            Ok(mut rng) => rng.r#gen(),
            Err(_) => rand::random(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use arena_content::ContentFactory;
    use rand::SeedableRng;

    use super::*;
    use crate::repository::InMemoryCreatureRepo;

    fn registry() -> SessionRegistry {
        let content = ContentFactory::embedded()
            .load_bundle()
            .expect("embedded content loads");
        let (reaper_tx, _) = mpsc::unbounded_channel();
        SessionRegistry::new(
            OracleBundle::new(content),
            Arc::new(InMemoryCreatureRepo::new()),
            EventBus::new(),
            reaper_tx,
            StdRng::seed_from_u64(1),
            RuntimeConfig::default(),
        )
    }

    #[tokio::test]
    async fn full_battle_queue_does_not_block_other_battles() {
        let registry = Arc::new(registry());
        let (alice, bob) = (PlayerId::from("alice"), PlayerId::from("bob"));

        // A battle whose worker never drains its single-slot queue.
        let (sender, _stalled_rx) = mpsc::channel(1);
        sender
            .try_send(SessionCommand::Snapshot {
                reply: oneshot::channel().0,
            })
            .expect("room for one command");
        {
            let mut index = registry.index.write().await;
            index.battles.insert(
                BattleId(1),
                SessionEntry {
                    sender,
                    players: [alice.clone(), bob.clone()],
                },
            );
            index.players.insert(alice.clone(), BattleId(1));
            index.players.insert(bob, BattleId(1));
        }

        let leaving = tokio::spawn({
            let registry = registry.clone();
            async move { registry.handle_disconnect(&alice).await }
        });
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!leaving.is_finished(), "disconnect waits on the full queue");

        let live = tokio::time::timeout(Duration::from_secs(1), registry.active_count())
            .await
            .expect("index stays available");
        assert_eq!(live, 0);

        leaving.abort();
    }
}
