//! High-level runtime orchestrator.
//!
//! The runtime owns the background workers, wires up the session registry,
//! matchmaking and the event bus, and exposes a builder-based API for
//! clients to host battles.

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, info, warn};

use arena_content::ContentBundle;
use arena_core::{GameConfig, RngOracle};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::matchmaking::MatchmakingQueue;
use crate::oracle::OracleBundle;
use crate::repository::{
    BattleLogRepository, CreatureRepository, InMemoryBattleLogRepo, InMemoryCreatureRepo,
};
use crate::session::{BattleSummary, SessionRegistry};
use crate::workers::PersistenceWorker;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Replaces the balance config shipped with the content when set.
    pub game_config: Option<GameConfig>,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Idle time after which the current player forfeits. `None` disables it.
    pub turn_timeout: Option<Duration>,
    /// Concluded battles kept for `settle` and summary lookups.
    pub archive_capacity: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(120);

    /// Defaults overridden by `ARENA_TURN_TIMEOUT_SECS` (`0` disables the
    /// timer), `ARENA_EVENT_BUFFER` and `ARENA_COMMAND_BUFFER`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secs) = env_value::<u64>("ARENA_TURN_TIMEOUT_SECS") {
            config.turn_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(size) = env_value::<usize>("ARENA_EVENT_BUFFER") {
            config.event_buffer_size = size;
        }
        if let Some(size) = env_value::<usize>("ARENA_COMMAND_BUFFER") {
            config.command_buffer_size = size;
        }

        config
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: None,
            event_buffer_size: 100,
            command_buffer_size: 32,
            turn_timeout: Some(Self::DEFAULT_TURN_TIMEOUT),
            archive_capacity: 1024,
        }
    }
}

fn env_value<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}

/// Main runtime that hosts battles.
///
/// Runtime owns the background workers; [`RuntimeHandle`] provides a
/// cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    shutdown_tx: watch::Sender<bool>,
    persistence_handle: JoinHandle<()>,
    reaper_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to events of one topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// Live battles are dropped without a result; buffered battle events are
    /// persisted before the persistence worker stops.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.registry().close_all().await;
        // Receivers may already be gone; the join below still completes.
        let _ = self.shutdown_tx.send(true);

        self.reaper_handle.await.map_err(RuntimeError::WorkerJoin)?;
        self.persistence_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        info!("runtime stopped");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    content: Option<ContentBundle>,
    creatures: Option<Arc<dyn CreatureRepository>>,
    battle_log: Option<Arc<dyn BattleLogRepository>>,
    rng: Option<Arc<dyn RngOracle>>,
    seed: Option<u64>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            content: None,
            creatures: None,
            battle_log: None,
            rng: None,
            seed: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required game content
    pub fn content(mut self, content: ContentBundle) -> Self {
        self.content = Some(content);
        self
    }

    /// Creature store consulted by battles, settlement and evolution.
    ///
    /// Defaults to an empty in-memory store.
    pub fn creatures(mut self, repo: Arc<dyn CreatureRepository>) -> Self {
        self.creatures = Some(repo);
        self
    }

    /// Battle log store written by the persistence worker.
    ///
    /// Defaults to an in-memory store.
    pub fn battle_log(mut self, repo: Arc<dyn BattleLogRepository>) -> Self {
        self.battle_log = Some(repo);
        self
    }

    /// Replace the damage variance source (defaults to PCG).
    pub fn rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Fix the source of battle seeds, making battle ids and rolls replayable.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the runtime and start its workers
    pub async fn build(self) -> Result<Runtime> {
        let mut content = self.content.ok_or(RuntimeError::MissingContent)?;
        if let Some(game_config) = self.config.game_config.clone() {
            content.config = game_config;
        }

        let oracles = match self.rng {
            Some(rng) => OracleBundle::with_rng(content, rng),
            None => OracleBundle::new(content),
        };
        let creatures = self
            .creatures
            .unwrap_or_else(|| Arc::new(InMemoryCreatureRepo::new()));
        let battle_log = self
            .battle_log
            .unwrap_or_else(|| Arc::new(InMemoryBattleLogRepo::new()));
        let seeds = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (reaper_tx, reaper_rx) = mpsc::unbounded_channel::<BattleSummary>();

        // Subscribe before any battle can start so no event is missed.
        let persistence = PersistenceWorker::new(
            battle_log,
            event_bus.subscribe(Topic::Battle),
            shutdown_rx.clone(),
        );
        let persistence_handle = tokio::spawn(persistence.run());

        let registry = Arc::new(SessionRegistry::new(
            oracles,
            creatures,
            event_bus.clone(),
            reaper_tx,
            seeds,
            self.config.clone(),
        ));
        let reaper_handle = tokio::spawn(reap_concluded(
            Arc::downgrade(&registry),
            reaper_rx,
            shutdown_rx,
        ));

        let matchmaking = Arc::new(MatchmakingQueue::new(
            Arc::clone(&registry),
            event_bus.clone(),
        ));
        let handle = RuntimeHandle::new(registry, matchmaking, event_bus);

        info!(
            turn_timeout_secs = self.config.turn_timeout.map(|t| t.as_secs()),
            event_buffer = self.config.event_buffer_size,
            "runtime started"
        );

        Ok(Runtime {
            handle,
            shutdown_tx,
            persistence_handle,
            reaper_handle,
        })
    }
}

/// Retires battles that session workers ended on their own.
async fn reap_concluded(
    registry: std::sync::Weak<SessionRegistry>,
    mut reaper_rx: mpsc::UnboundedReceiver<BattleSummary>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            summary = reaper_rx.recv() => {
                let Some(summary) = summary else { break };
                let Some(registry) = registry.upgrade() else { break };
                registry.retire(summary).await;
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }
    debug!("reaper stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_enables_turn_timeout() {
        let config = RuntimeConfig::default();
        assert_eq!(config.turn_timeout, Some(Duration::from_secs(120)));
        assert_eq!(config.event_buffer_size, 100);
        assert_eq!(config.command_buffer_size, 32);
        assert!(config.game_config.is_none());
    }
}
