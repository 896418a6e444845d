//! Persistence worker that mirrors battle events into the battle log store.
//!
//! Subscribes to [`Topic::Battle`](crate::events::Topic) and writes every
//! resolved move and every concluded battle through a
//! [`BattleLogRepository`]. Storage failures are logged and skipped; the
//! in-memory sessions stay authoritative and play never waits on storage.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::events::{BattleEvent, Event};
use crate::repository::BattleLogRepository;

/// Background worker that persists battle events.
pub(crate) struct PersistenceWorker {
    repo: Arc<dyn BattleLogRepository>,
    event_rx: broadcast::Receiver<Event>,
    shutdown_rx: watch::Receiver<bool>,
    written: u64,
    failed: u64,
}

impl PersistenceWorker {
    pub(crate) fn new(
        repo: Arc<dyn BattleLogRepository>,
        event_rx: broadcast::Receiver<Event>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            repo,
            event_rx,
            shutdown_rx,
            written: 0,
            failed: 0,
        }
    }

    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                biased;

                recv = self.event_rx.recv() => match recv {
                    Ok(event) => self.persist(&event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "persistence worker lagged, battle events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        self.drain();
                        break;
                    }
                }
            }
        }

        info!(
            written = self.written,
            failed = self.failed,
            "persistence worker stopped"
        );
    }

    /// Writes whatever is still buffered before shutting down.
    fn drain(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.persist(&event);
        }
    }

    fn persist(&mut self, event: &Event) {
        let Event::Battle(event) = event else {
            return;
        };

        let result = match event {
            BattleEvent::MoveResolved {
                battle_id, entry, ..
            } => self.repo.append_entry(*battle_id, entry),
            BattleEvent::Concluded { summary } => self.repo.save_summary(summary),
            BattleEvent::Started { .. } | BattleEvent::Abandoned { .. } => return,
        };

        match result {
            Ok(()) => {
                self.written += 1;
                debug!(battle_id = %event.battle_id(), "battle event persisted");
            }
            Err(err) => {
                self.failed += 1;
                warn!(
                    battle_id = %event.battle_id(),
                    error = %err,
                    "failed to persist battle event"
                );
            }
        }
    }
}
