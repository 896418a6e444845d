//! Records left behind by terminated battles.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use arena_core::{
    BattleId, BattleResult, BattleSession, BattleStatus, CreatureId, PlayerId, RewardParams,
    Settlement, Side, TraitScores,
};

/// Final record of a terminated battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSummary {
    pub battle_id: BattleId,
    pub players: [PlayerId; 2],
    pub creatures: [CreatureId; 2],
    pub status: BattleStatus,
    pub result: Option<BattleResult>,
    /// Turn counter when the battle ended.
    pub turns: u32,
    /// Behavior scored during the battle, in seat order.
    pub behavior: [TraitScores; 2],
    /// Rewards owed to both sides; taken by `settle`.
    pub settlement: Option<Settlement>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl BattleSummary {
    pub fn from_session(
        session: &BattleSession,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        rewards: &RewardParams,
    ) -> Self {
        let first = session.combatant(Side::First);
        let second = session.combatant(Side::Second);
        let duration_ms = (ended_at - started_at).num_milliseconds().max(0) as u64;

        Self {
            battle_id: session.id(),
            players: [first.player.clone(), second.player.clone()],
            creatures: [first.creature, second.creature],
            status: session.status(),
            result: session.result().cloned(),
            turns: session.turn(),
            behavior: [
                session.behavior_scores(&first.player).unwrap_or_default(),
                session.behavior_scores(&second.player).unwrap_or_default(),
            ],
            settlement: Settlement::from_session(session, rewards),
            started_at,
            ended_at,
            duration_ms,
        }
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        self.result.as_ref().map(BattleResult::winner)
    }
}

/// Bounded store of recently concluded battles, oldest evicted first.
#[derive(Debug)]
pub(crate) struct ConcludedArchive {
    capacity: usize,
    order: VecDeque<BattleId>,
    summaries: HashMap<BattleId, BattleSummary>,
}

impl ConcludedArchive {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            summaries: HashMap::new(),
        }
    }

    /// Files a summary. A battle already on file keeps its first summary, so a
    /// late duplicate cannot restore a settlement that was already taken.
    pub(crate) fn insert(&mut self, summary: BattleSummary) {
        let id = summary.battle_id;
        if self.summaries.contains_key(&id) {
            return;
        }
        self.summaries.insert(id, summary);
        self.order.push_back(id);
        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.summaries.remove(&evicted);
            }
        }
    }

    pub(crate) fn get(&self, battle: BattleId) -> Option<&BattleSummary> {
        self.summaries.get(&battle)
    }

    /// Takes the unpaid settlement, leaving the summary in place.
    pub(crate) fn take_settlement(&mut self, battle: BattleId) -> Option<Settlement> {
        self.summaries.get_mut(&battle)?.settlement.take()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.summaries.len()
    }
}

#[cfg(test)]
mod tests {
    use arena_core::{AbandonReason, Creature, CreatureTemplate, Element, StatLine};
    use chrono::Duration;

    use super::*;

    fn creature(id: u64, owner: &str) -> Creature {
        Creature::from_template(
            CreatureId(id),
            "Ember",
            PlayerId::from(owner),
            &CreatureTemplate {
                element: Element::Fire,
                stats: StatLine {
                    attack: 80,
                    defense: 40,
                    speed: 60,
                    intelligence: 50,
                    max_hp: 100,
                    max_energy: 100,
                },
                moves: Vec::new(),
            },
        )
    }

    fn forfeited(id: u64) -> BattleSummary {
        let a = creature(1, "alice");
        let b = creature(2, "bob");
        let mut session = BattleSession::new(
            BattleId(id),
            11,
            (PlayerId::from("alice"), &a),
            (PlayerId::from("bob"), &b),
        );
        session
            .abandon(&PlayerId::from("alice"), AbandonReason::Forfeit)
            .expect("active");
        let started = Utc::now();
        BattleSummary::from_session(
            &session,
            started,
            started + Duration::milliseconds(1500),
            &RewardParams::default(),
        )
    }

    #[test]
    fn summary_captures_outcome() {
        let summary = forfeited(3);
        assert_eq!(summary.status, BattleStatus::Abandoned);
        assert_eq!(summary.winner(), Some(&PlayerId::from("bob")));
        assert_eq!(summary.creatures, [CreatureId(1), CreatureId(2)]);
        assert_eq!(summary.duration_ms, 1500);
        assert!(summary.settlement.is_some());
    }

    #[test]
    fn archive_evicts_oldest() {
        let mut archive = ConcludedArchive::new(2);
        archive.insert(forfeited(1));
        archive.insert(forfeited(2));
        archive.insert(forfeited(3));

        assert_eq!(archive.len(), 2);
        assert!(archive.get(BattleId(1)).is_none());
        assert!(archive.get(BattleId(3)).is_some());
    }

    #[test]
    fn settlement_is_taken_once() {
        let mut archive = ConcludedArchive::new(4);
        archive.insert(forfeited(1));

        assert!(archive.take_settlement(BattleId(1)).is_some());
        assert!(archive.take_settlement(BattleId(1)).is_none());
        assert!(archive.get(BattleId(1)).is_some());
    }

    #[test]
    fn duplicate_summary_does_not_restore_settlement() {
        let mut archive = ConcludedArchive::new(4);
        archive.insert(forfeited(1));
        assert!(archive.take_settlement(BattleId(1)).is_some());

        archive.insert(forfeited(1));

        assert_eq!(archive.len(), 1);
        assert!(archive.take_settlement(BattleId(1)).is_none());
    }
}
