//! Battle worker that owns one authoritative [`BattleSession`].
//!
//! Every mutation of a battle is a [`SessionCommand`] processed in arrival
//! order, so at most one move is in flight per battle while different battles
//! run concurrently on their own tasks. The worker also owns the turn timer:
//! when the current player does not act before the deadline it forfeits them.
//! The worker never touches the registry; it reports every battle it ends
//! through the reaper channel instead.

use std::future;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Duration, Instant};
use tracing::{debug, info, warn};

use arena_core::{
    AbandonReason, BattleError, BattleSession, BattleSnapshot, MoveId, MoveOutcome, PlayerId,
};

use crate::events::{BattleEvent, EventBus};
use crate::oracle::OracleBundle;
use crate::session::BattleSummary;

/// Reply to a resolved move. The summary is present once the move ended the battle.
pub(crate) type MoveReply = Result<(MoveOutcome, Option<BattleSummary>), BattleError>;

/// Commands that can be sent to a session worker.
pub(crate) enum SessionCommand {
    SubmitMove {
        player: PlayerId,
        move_id: MoveId,
        reply: oneshot::Sender<MoveReply>,
    },
    Abandon {
        player: PlayerId,
        reason: AbandonReason,
        reply: oneshot::Sender<Result<BattleSummary, BattleError>>,
    },
    Snapshot {
        reply: oneshot::Sender<BattleSnapshot>,
    },
}

/// Background task serializing all access to one battle.
pub(crate) struct SessionWorker {
    session: BattleSession,
    oracles: OracleBundle,
    command_rx: mpsc::Receiver<SessionCommand>,
    event_bus: EventBus,
    reaper_tx: mpsc::UnboundedSender<BattleSummary>,
    turn_timeout: Option<Duration>,
    started_at: DateTime<Utc>,
}

impl SessionWorker {
    pub(crate) fn new(
        session: BattleSession,
        oracles: OracleBundle,
        command_rx: mpsc::Receiver<SessionCommand>,
        event_bus: EventBus,
        reaper_tx: mpsc::UnboundedSender<BattleSummary>,
        turn_timeout: Option<Duration>,
    ) -> Self {
        Self {
            session,
            oracles,
            command_rx,
            event_bus,
            reaper_tx,
            turn_timeout,
            started_at: Utc::now(),
        }
    }

    /// Main worker loop. Exits when the battle ends or every sender is gone.
    pub(crate) async fn run(mut self) {
        let battle_id = self.session.id();
        let mut deadline = self.next_deadline();

        loop {
            let timer = async move {
                match deadline {
                    Some(at) => time::sleep_until(at).await,
                    None => future::pending::<()>().await,
                }
            };

            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => {
                        if self.handle_command(cmd) {
                            deadline = self.next_deadline();
                        }
                    }
                    None => {
                        debug!(%battle_id, "session channel closed");
                        break;
                    }
                },
                () = timer => self.handle_timeout(),
            }

            if self.session.is_terminal() {
                break;
            }
        }

        debug!(%battle_id, status = %self.session.status(), "session worker stopped");
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.turn_timeout.map(|timeout| Instant::now() + timeout)
    }

    /// Returns true when a move was resolved, which restarts the turn timer.
    fn handle_command(&mut self, cmd: SessionCommand) -> bool {
        match cmd {
            SessionCommand::SubmitMove {
                player,
                move_id,
                reply,
            } => {
                let result = self.handle_move(&player, &move_id);
                let resolved = result.is_ok();
                if reply.send(result).is_err() {
                    debug!("SubmitMove reply channel closed (caller dropped)");
                }
                resolved
            }
            SessionCommand::Abandon {
                player,
                reason,
                reply,
            } => {
                let result = self.handle_abandon(&player, reason);
                if reply.send(result).is_err() {
                    debug!("Abandon reply channel closed (caller dropped)");
                }
                false
            }
            SessionCommand::Snapshot { reply } => {
                let snapshot = self
                    .session
                    .public_state(self.oracles.config().snapshot_log_window);
                if reply.send(snapshot).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
                false
            }
        }
    }

    fn handle_move(&mut self, player: &PlayerId, move_id: &MoveId) -> MoveReply {
        let battle_id = self.session.id();
        let outcome = {
            let env = self.oracles.as_battle_env();
            self.session.submit_move(player, move_id, &env)
        };

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(%battle_id, %player, %move_id, error = %err, "move rejected");
                return Err(err);
            }
        };

        debug!(
            %battle_id,
            %player,
            %move_id,
            turn = outcome.entry.turn,
            damage = outcome.entry.damage,
            healing = outcome.entry.healing,
            "move resolved"
        );

        let snapshot = self
            .session
            .public_state(self.oracles.config().snapshot_log_window);
        self.event_bus.publish_battle(BattleEvent::MoveResolved {
            battle_id,
            entry: outcome.entry.clone(),
            snapshot: Box::new(snapshot),
        });

        let summary = outcome.is_terminal().then(|| {
            info!(%battle_id, winner = %player, "battle completed");
            let summary = self.conclude();
            self.reap(summary.clone());
            summary
        });

        Ok((outcome, summary))
    }

    fn handle_abandon(
        &mut self,
        player: &PlayerId,
        reason: AbandonReason,
    ) -> Result<BattleSummary, BattleError> {
        let battle_id = self.session.id();
        let result = self.session.abandon(player, reason)?;

        info!(%battle_id, %player, %reason, winner = %result.winner(), "battle abandoned");
        self.event_bus.publish_battle(BattleEvent::Abandoned {
            battle_id,
            remaining: result.winner().clone(),
            reason,
        });

        Ok(self.conclude())
    }

    fn handle_timeout(&mut self) {
        let idle = self.session.current_player().clone();
        warn!(battle_id = %self.session.id(), player = %idle, "turn timed out");

        match self.handle_abandon(&idle, AbandonReason::TurnTimeout) {
            Ok(summary) => self.reap(summary),
            Err(err) => debug!(error = %err, "timeout on a finished battle"),
        }
    }

    /// Hands a battle the worker ended on its own to the reaper, which retires
    /// it whether or not the caller is still waiting.
    fn reap(&self, summary: BattleSummary) {
        if self.reaper_tx.send(summary).is_err() {
            debug!("reaper channel closed, concluded battle not archived");
        }
    }

    /// Builds the final summary and announces it.
    fn conclude(&self) -> BattleSummary {
        let summary = BattleSummary::from_session(
            &self.session,
            self.started_at,
            Utc::now(),
            &self.oracles.config().rewards,
        );
        self.event_bus.publish_battle(BattleEvent::Concluded {
            summary: Box::new(summary.clone()),
        });
        summary
    }
}
