//! Battle session state machine.
//!
//! [`BattleSession`] owns both combatants, the turn counter, the move log and
//! the per-player behavior scores for one battle. It is the single place where
//! a move is validated and resolved, so every caller (runtime actor, simulator
//! or test) observes identical rules.
//!
//! A move is processed in a fixed order:
//! 1. Reject if the battle is no longer active
//! 2. Validate turn ownership, move id and energy
//! 3. Roll variance and apply the effect
//! 4. Score behavior and append to the log
//! 5. End the battle if the defender fell, otherwise switch turn and regenerate
mod log;
mod snapshot;

pub use log::{AbandonReason, BattleResult, BattleStatus, LogEntry, MoveOutcome};
pub use snapshot::{BattleSnapshot, CombatantView};

use crate::behavior::{BehaviorContext, TraitScores, track};
use crate::combat::{BattleError, apply_move, validate_move};
use crate::env::{BattleEnv, compute_seed};
use crate::state::{BattleId, CombatantState, Creature, MoveId, PlayerId, Side};

/// Seed context for the damage variance roll.
const VARIANCE_ROLL: u32 = 0;

/// Authoritative state of one battle.
#[derive(Clone, Debug)]
pub struct BattleSession {
    id: BattleId,
    seed: u64,
    combatants: [CombatantState; 2],
    behavior: [TraitScores; 2],
    turn: u32,
    current: Side,
    status: BattleStatus,
    log: Vec<LogEntry>,
    result: Option<BattleResult>,
}

impl BattleSession {
    /// Creates an active battle at turn 1 with the first player to act.
    pub fn new(
        id: BattleId,
        seed: u64,
        first: (PlayerId, &Creature),
        second: (PlayerId, &Creature),
    ) -> Self {
        Self {
            id,
            seed,
            combatants: [
                CombatantState::new(first.0, first.1),
                CombatantState::new(second.0, second.1),
            ],
            behavior: [TraitScores::default(); 2],
            turn: 1,
            current: Side::First,
            status: BattleStatus::Active,
            log: Vec::new(),
            result: None,
        }
    }

    pub fn id(&self) -> BattleId {
        self.id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn status(&self) -> BattleStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn result(&self) -> Option<&BattleResult> {
        self.result.as_ref()
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn current_player(&self) -> &PlayerId {
        &self.combatant(self.current).player
    }

    pub fn combatant(&self, side: Side) -> &CombatantState {
        &self.combatants[side.index()]
    }

    pub fn players(&self) -> [&PlayerId; 2] {
        [&self.combatants[0].player, &self.combatants[1].player]
    }

    /// Seat of `player`, if they take part in this battle.
    pub fn side_of(&self, player: &PlayerId) -> Option<Side> {
        [Side::First, Side::Second]
            .into_iter()
            .find(|side| &self.combatant(*side).player == player)
    }

    /// Behavior accumulated by `player` during this battle.
    pub fn behavior_scores(&self, player: &PlayerId) -> Option<TraitScores> {
        self.side_of(player).map(|side| self.behavior[side.index()])
    }

    /// Validates and resolves one move by `player`.
    ///
    /// On error the session is left untouched.
    pub fn submit_move(
        &mut self,
        player: &PlayerId,
        move_id: &MoveId,
        env: &BattleEnv<'_>,
    ) -> Result<MoveOutcome, BattleError> {
        if self.is_terminal() {
            return Err(BattleError::BattleNotFound);
        }

        let side = self.current;
        let mv = validate_move(
            &self.combatant(side).player,
            player,
            self.combatant(side),
            move_id,
            env.moves,
        )?;

        let previous_moves: Vec<MoveId> = self
            .log
            .iter()
            .filter(|entry| &entry.player == player)
            .map(|entry| entry.move_id.clone())
            .collect();
        let hp_before = self.combatant(side).current_hp();
        let max_hp = self.combatant(side).stats.max_hp;

        let combat = &env.config.combat;
        let variance = env.rng.unit_range(
            compute_seed(self.seed, self.turn, side.index() as u32, VARIANCE_ROLL),
            combat.variance_min,
            combat.variance_max,
        );

        let (attacker, defender) = self.split_mut(side);
        let resolution = apply_move(mv, attacker, defender, variance, combat);
        let defender_fell = defender.is_defeated();

        let behavior_delta = track(
            &mut self.behavior[side.index()],
            mv,
            &BehaviorContext {
                hp_before,
                max_hp,
                previous_moves: &previous_moves,
            },
            &env.config.behavior,
        );

        let entry = LogEntry {
            turn: self.turn,
            player: player.clone(),
            move_id: mv.id.clone(),
            category: mv.category(),
            damage: resolution.damage,
            healing: resolution.healing,
            effect: resolution.effect.clone(),
        };
        self.log.push(entry.clone());

        if defender_fell {
            let result = BattleResult::Victory {
                winner: player.clone(),
                loser: self.combatant(side.opponent()).player.clone(),
            };
            self.status = BattleStatus::Completed;
            self.result = Some(result.clone());
            return Ok(MoveOutcome {
                entry,
                resolution,
                behavior_delta,
                next_player: None,
                result: Some(result),
            });
        }

        self.turn += 1;
        self.current = side.opponent();
        for combatant in &mut self.combatants {
            combatant.regenerate_energy(combat.energy_regen);
        }

        Ok(MoveOutcome {
            entry,
            resolution,
            behavior_delta,
            next_player: Some(self.current_player().clone()),
            result: None,
        })
    }

    /// Ends the battle in favor of the opponent of `leaver`.
    ///
    /// Used for disconnects, explicit forfeits and turn timeouts. Fails with
    /// `BattleNotFound` if the battle is already over or `leaver` is not in it.
    pub fn abandon(
        &mut self,
        leaver: &PlayerId,
        reason: AbandonReason,
    ) -> Result<BattleResult, BattleError> {
        if self.is_terminal() {
            return Err(BattleError::BattleNotFound);
        }
        let side = self.side_of(leaver).ok_or(BattleError::BattleNotFound)?;

        let result = BattleResult::Forfeit {
            winner: self.combatant(side.opponent()).player.clone(),
            loser: leaver.clone(),
            reason,
        };
        self.status = BattleStatus::Abandoned;
        self.result = Some(result.clone());
        Ok(result)
    }

    /// Redacted view including the last `log_window` log entries.
    pub fn public_state(&self, log_window: usize) -> BattleSnapshot {
        let start = self.log.len().saturating_sub(log_window);
        BattleSnapshot {
            battle_id: self.id,
            status: self.status,
            turn: self.turn,
            current_player: self.current_player().clone(),
            combatants: [
                CombatantView::from(&self.combatants[0]),
                CombatantView::from(&self.combatants[1]),
            ],
            recent_log: self.log[start..].to_vec(),
            result: self.result.clone(),
        }
    }

    fn split_mut(&mut self, attacker: Side) -> (&mut CombatantState, &mut CombatantState) {
        let [first, second] = &mut self.combatants;
        match attacker {
            Side::First => (first, second),
            Side::Second => (second, first),
        }
    }
}
